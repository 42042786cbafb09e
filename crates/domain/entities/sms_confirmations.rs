use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::sms_confirmations;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, PartialEq)]
#[diesel(table_name = sms_confirmations)]
pub struct SmsConfirmationEntity {
    pub id: Uuid,
    pub phone_number: String,
    pub code: String,
    pub purpose: String,
    pub is_used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sms_confirmations)]
pub struct InsertSmsConfirmationEntity {
    pub phone_number: String,
    pub code: String,
    pub purpose: String,
    pub expires_at: DateTime<Utc>,
}
