pub mod activities;
pub mod admin_permissions;
pub mod answer_options;
pub mod blocks;
pub mod cards;
pub mod categories;
pub mod chat;
pub mod comments;
pub mod devices;
pub mod donations;
pub mod files;
pub mod follows;
pub mod fundraisings;
pub mod likes;
pub mod notification_distributions;
pub mod posts;
pub mod reports;
pub mod sms_confirmations;
pub mod subscription_plans;
pub mod subscriptions;
pub mod transactions;
pub mod users;
