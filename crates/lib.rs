pub mod domain;
pub mod infra;
pub mod multibank;
pub mod notifications;
pub mod observability;
pub mod storage;
