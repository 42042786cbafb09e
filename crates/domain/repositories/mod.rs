pub mod activities;
pub mod admins;
pub mod analytics;
pub mod cards;
pub mod categories;
pub mod chat;
pub mod comments;
pub mod devices;
pub mod distributions;
pub mod donations;
pub mod files;
pub mod fundraisings;
pub mod likes;
pub mod plans;
pub mod posts;
pub mod reports;
pub mod sms_confirmations;
pub mod social;
pub mod subscriptions;
pub mod transactions;
pub mod users;
