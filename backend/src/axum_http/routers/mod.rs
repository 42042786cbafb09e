pub mod admin;
pub mod auth;
pub mod cards;
pub mod chat;
pub mod chat_ws;
pub mod content;
pub mod creators;
pub mod devices;
pub mod donations;
pub mod files;
pub mod payments;
pub mod social;
pub mod subscriptions;
