use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain,
    infra::db::{
        postgres::{
            postgres_connection::PgPoolSquad,
            schema::{chat_messages, chat_rooms, chat_settings},
        },
        repositories::is_unique_violation,
    },
};
use domain::{
    entities::chat::{
        ChatMessageEntity, ChatRoomEntity, ChatSettingsEntity, InsertChatMessageEntity,
        InsertChatRoomEntity,
    },
    repositories::chat::ChatRepository,
    value_objects::{insert_outcome::InsertOutcome, pagination::Page},
};

pub struct ChatPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ChatPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ChatRepository for ChatPostgres {
    async fn find_room(&self, room_id: Uuid) -> Result<Option<ChatRoomEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let room = chat_rooms::table
            .filter(chat_rooms::id.eq(room_id))
            .select(ChatRoomEntity::as_select())
            .first::<ChatRoomEntity>(&mut conn)
            .optional()?;

        Ok(room)
    }

    async fn find_room_between(&self, first: Uuid, second: Uuid) -> Result<Option<ChatRoomEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let room = chat_rooms::table
            .filter(
                chat_rooms::creator_id
                    .eq(first)
                    .and(chat_rooms::subscriber_id.eq(second))
                    .or(chat_rooms::creator_id
                        .eq(second)
                        .and(chat_rooms::subscriber_id.eq(first))),
            )
            .select(ChatRoomEntity::as_select())
            .first::<ChatRoomEntity>(&mut conn)
            .optional()?;

        Ok(room)
    }

    async fn create_room(
        &self,
        insert_chat_room_entity: InsertChatRoomEntity,
    ) -> Result<InsertOutcome<ChatRoomEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(chat_rooms::table)
            .values(&insert_chat_room_entity)
            .returning(ChatRoomEntity::as_returning())
            .get_result::<ChatRoomEntity>(&mut conn);

        match result {
            Ok(room) => Ok(InsertOutcome::Inserted(room)),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Duplicate),
            Err(err) => Err(err.into()),
        }
    }

    async fn list_rooms_for(&self, user_id: Uuid) -> Result<Vec<ChatRoomEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rooms = chat_rooms::table
            .filter(
                chat_rooms::creator_id
                    .eq(user_id)
                    .or(chat_rooms::subscriber_id.eq(user_id)),
            )
            .order(chat_rooms::updated_at.desc())
            .select(ChatRoomEntity::as_select())
            .load::<ChatRoomEntity>(&mut conn)?;

        Ok(rooms)
    }

    async fn last_message(&self, room_id: Uuid) -> Result<Option<ChatMessageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let message = chat_messages::table
            .filter(chat_messages::room_id.eq(room_id))
            .order(chat_messages::created_at.desc())
            .select(ChatMessageEntity::as_select())
            .first::<ChatMessageEntity>(&mut conn)
            .optional()?;

        Ok(message)
    }

    async fn insert_message(
        &self,
        insert_chat_message_entity: InsertChatMessageEntity,
    ) -> Result<ChatMessageEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let message = conn.transaction::<ChatMessageEntity, diesel::result::Error, _>(|conn| {
            let message = insert_into(chat_messages::table)
                .values(&insert_chat_message_entity)
                .returning(ChatMessageEntity::as_returning())
                .get_result::<ChatMessageEntity>(conn)?;

            update(chat_rooms::table.filter(chat_rooms::id.eq(message.room_id)))
                .set(chat_rooms::updated_at.eq(Utc::now()))
                .execute(conn)?;

            Ok(message)
        })?;

        Ok(message)
    }

    async fn mark_read(&self, message_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(
            chat_messages::table
                .filter(chat_messages::id.eq(message_id))
                .filter(chat_messages::is_read.eq(false)),
        )
        .set(chat_messages::is_read.eq(true))
        .execute(&mut conn)?;

        Ok(())
    }

    async fn list_messages(&self, room_id: Uuid, page: Page) -> Result<Vec<ChatMessageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let messages = chat_messages::table
            .filter(chat_messages::room_id.eq(room_id))
            .order(chat_messages::created_at.desc())
            .limit(page.limit)
            .offset(page.offset)
            .select(ChatMessageEntity::as_select())
            .load::<ChatMessageEntity>(&mut conn)?;

        Ok(messages)
    }

    async fn find_settings(&self, creator_id: Uuid) -> Result<Option<ChatSettingsEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let settings = chat_settings::table
            .filter(chat_settings::creator_id.eq(creator_id))
            .select(ChatSettingsEntity::as_select())
            .first::<ChatSettingsEntity>(&mut conn)
            .optional()?;

        Ok(settings)
    }

    async fn upsert_settings(&self, settings: ChatSettingsEntity) -> Result<ChatSettingsEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let settings = insert_into(chat_settings::table)
            .values(&settings)
            .on_conflict(chat_settings::creator_id)
            .do_update()
            .set(&settings)
            .returning(ChatSettingsEntity::as_returning())
            .get_result::<ChatSettingsEntity>(&mut conn)?;

        Ok(settings)
    }
}
