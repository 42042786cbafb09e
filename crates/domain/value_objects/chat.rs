use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::chat::{ChatMessageEntity, ChatRoomEntity};

/// Frame sent by a client over the room socket.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InboundChatPayload {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub file_id: Option<Uuid>,
}

impl InboundChatPayload {
    /// Trimmed text, `None` when blank.
    pub fn text(&self) -> Option<String> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_none() && self.file_id.is_none()
    }
}

/// Message event fanned out to every socket in a room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatEvent {
    pub message_id: Uuid,
    pub room_id: Uuid,
    pub sender_id: Uuid,
    pub message: Option<String>,
    pub file_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ChatMessageEntity> for ChatEvent {
    fn from(value: ChatMessageEntity) -> Self {
        Self {
            message_id: value.id,
            room_id: value.room_id,
            sender_id: value.sender_id,
            message: value.content,
            file_id: value.file_id,
            is_read: value.is_read,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RoomSummary {
    pub room: ChatRoomEntity,
    pub other_user_id: Uuid,
    pub last_message: Option<ChatMessageEntity>,
}
