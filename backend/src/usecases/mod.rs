pub mod activities;
pub mod admin;
pub mod analytics;
pub mod auth;
pub mod cards;
pub mod chat;
pub mod content;
pub mod creators;
pub mod devices;
pub mod donations;
pub mod files;
pub mod notifications;
pub mod payments;
pub mod social;
pub mod subscriptions;

#[cfg(test)]
pub(crate) mod test_fixtures;
