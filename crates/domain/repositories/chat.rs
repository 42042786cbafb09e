use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::chat::{
        ChatMessageEntity, ChatRoomEntity, ChatSettingsEntity, InsertChatMessageEntity,
        InsertChatRoomEntity,
    },
    value_objects::{insert_outcome::InsertOutcome, pagination::Page},
};

#[automock]
#[async_trait]
pub trait ChatRepository {
    async fn find_room(&self, room_id: Uuid) -> Result<Option<ChatRoomEntity>>;

    /// Looks the pair up in either order.
    async fn find_room_between(&self, first: Uuid, second: Uuid) -> Result<Option<ChatRoomEntity>>;

    async fn create_room(
        &self,
        insert_chat_room_entity: InsertChatRoomEntity,
    ) -> Result<InsertOutcome<ChatRoomEntity>>;

    async fn list_rooms_for(&self, user_id: Uuid) -> Result<Vec<ChatRoomEntity>>;

    async fn last_message(&self, room_id: Uuid) -> Result<Option<ChatMessageEntity>>;

    async fn insert_message(
        &self,
        insert_chat_message_entity: InsertChatMessageEntity,
    ) -> Result<ChatMessageEntity>;

    async fn mark_read(&self, message_id: Uuid) -> Result<()>;

    /// Newest first.
    async fn list_messages(&self, room_id: Uuid, page: Page) -> Result<Vec<ChatMessageEntity>>;

    async fn find_settings(&self, creator_id: Uuid) -> Result<Option<ChatSettingsEntity>>;

    async fn upsert_settings(&self, settings: ChatSettingsEntity) -> Result<ChatSettingsEntity>;
}
