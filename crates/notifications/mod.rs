pub mod fcm;
pub mod sms;

pub use fcm::{FcmClient, PushOutcome, PushSender, ServiceAccountKey};
pub use sms::{SmsClient, SmsConfig, SmsSender};
