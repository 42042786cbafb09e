use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::infra::db::postgres::schema::{chat_messages, chat_rooms, chat_settings};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, Serialize, PartialEq)]
#[diesel(table_name = chat_rooms)]
pub struct ChatRoomEntity {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub subscriber_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatRoomEntity {
    pub fn has_participant(&self, user_id: Uuid) -> bool {
        self.creator_id == user_id || self.subscriber_id == user_id
    }

    pub fn other_participant(&self, user_id: Uuid) -> Uuid {
        if self.creator_id == user_id {
            self.subscriber_id
        } else {
            self.creator_id
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chat_rooms)]
pub struct InsertChatRoomEntity {
    pub creator_id: Uuid,
    pub subscriber_id: Uuid,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, Serialize, PartialEq)]
#[diesel(table_name = chat_messages)]
pub struct ChatMessageEntity {
    pub id: Uuid,
    pub room_id: Uuid,
    pub sender_id: Uuid,
    pub content: Option<String>,
    pub file_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chat_messages)]
pub struct InsertChatMessageEntity {
    pub room_id: Uuid,
    pub sender_id: Uuid,
    pub content: Option<String>,
    pub file_id: Option<Uuid>,
}

#[derive(Debug, Clone, Selectable, Queryable, Insertable, AsChangeset, Serialize, PartialEq)]
#[diesel(table_name = chat_settings)]
pub struct ChatSettingsEntity {
    pub creator_id: Uuid,
    pub can_chat: String,
    pub subscription_plan_ids: Vec<Uuid>,
    pub minimum_message_donation: i64,
    pub updated_at: DateTime<Utc>,
}
