pub mod activity_types;
pub mod can_chat;
pub mod card_types;
pub mod device_types;
pub mod distribution_statuses;
pub mod post_types;
pub mod report_statuses;
pub mod report_types;
pub mod sms_purposes;
pub mod time_periods;
pub mod transaction_statuses;
pub mod transaction_types;
pub mod user_types;
