use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::users::UserEntity;

use super::pagination::Page;

/// The authenticated user's own profile.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserDto {
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
    pub multibank_account: Option<String>,
    pub multibank_verified: bool,
    pub sapi_share: i32,
    pub minimum_message_donation: i64,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for UserDto {
    fn from(value: UserEntity) -> Self {
        Self {
            id: value.id,
            phone_number: value.phone_number,
            username: value.username,
            full_name: value.full_name,
            creator_description: value.creator_description,
            profile_photo_id: value.profile_photo_id,
            background_photo_id: value.background_photo_id,
            category_id: value.category_id,
            is_creator: value.is_creator,
            is_admin: value.is_admin,
            multibank_account: value.multibank_account,
            multibank_verified: value.multibank_verified,
            sapi_share: value.sapi_share,
            minimum_message_donation: value.minimum_message_donation,
            created_at: value.created_at,
        }
    }
}

/// Another user's profile as seen by the viewer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PublicProfileDto {
    pub id: Uuid,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub creator_description: Option<String>,
    pub profile_photo_id: Option<Uuid>,
    pub background_photo_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub is_creator: bool,
    pub followers_count: i64,
    pub following_count: i64,
    pub is_following: bool,
    pub is_blocked: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreatorSummary {
    pub id: Uuid,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub profile_photo_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub follower_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatorSearchFilter {
    pub query: Option<String>,
    pub category_id: Option<Uuid>,
    pub page: Page,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AdminCreatorFilter {
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub is_blocked: Option<bool>,
    #[serde(skip)]
    pub page: Page,
}

/// Admin-facing view of a creator account.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdminCreatorDto {
    pub id: Uuid,
    pub phone_number: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub category_id: Option<Uuid>,
    pub sapi_share: i32,
    pub is_blocked_by_admin: bool,
    pub multibank_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for AdminCreatorDto {
    fn from(value: UserEntity) -> Self {
        let phone_number = if value.is_blocked_by_admin {
            value.temp_phone_number.unwrap_or(value.phone_number)
        } else {
            value.phone_number
        };
        let username = if value.is_blocked_by_admin {
            value.temp_username.or(value.username)
        } else {
            value.username
        };
        Self {
            id: value.id,
            phone_number,
            username,
            full_name: value.full_name,
            category_id: value.category_id,
            sapi_share: value.sapi_share,
            is_blocked_by_admin: value.is_blocked_by_admin,
            multibank_verified: value.multibank_verified,
            created_at: value.created_at,
        }
    }
}
