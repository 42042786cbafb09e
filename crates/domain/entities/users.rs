use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::users;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, PartialEq)]
#[diesel(table_name = users)]
pub struct UserEntity {
    pub id: Uuid,
    pub phone_number: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub creator_description: Option<String>,
    pub profile_photo_id: Option<Uuid>,
    pub background_photo_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub is_creator: bool,
    pub is_admin: bool,
    pub is_active: bool,
    pub is_deleted: bool,
    pub sms_verified: bool,
    pub is_blocked_by_admin: bool,
    pub temp_phone_number: Option<String>,
    pub temp_username: Option<String>,
    pub password_hash: Option<String>,
    pub pinfl: Option<String>,
    pub multibank_account: Option<String>,
    pub multibank_verified: bool,
    pub sapi_share: i32,
    pub minimum_message_donation: i64,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserEntity {
    /// Accounts that may receive split payments.
    pub fn can_receive_payments(&self) -> bool {
        self.is_creator
            && self.multibank_verified
            && self.multibank_account.is_some()
            && self.pinfl.is_some()
            && !self.is_deleted
            && !self.is_blocked_by_admin
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct InsertUserEntity {
    pub phone_number: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub is_admin: bool,
    pub is_active: bool,
    pub password_hash: Option<String>,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = users)]
pub struct UpdateUserEntity {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub creator_description: Option<String>,
    pub profile_photo_id: Option<Uuid>,
    pub background_photo_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub minimum_message_donation: Option<i64>,
    pub phone_number: Option<String>,
    pub password_hash: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}
