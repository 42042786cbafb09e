use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::cards::{CardBinding, CardEntity, InsertCardEntity};

#[automock]
#[async_trait]
pub trait CardRepository {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<CardEntity>>;

    async fn find_for_user(&self, user_id: Uuid, card_id: Uuid) -> Result<Option<CardEntity>>;

    async fn create(&self, insert_card_entity: InsertCardEntity) -> Result<CardEntity>;

    /// Activates the pending card matching the binding; it becomes main when the
    /// owner has no other active main card.
    async fn activate_binding(&self, binding: CardBinding) -> Result<Option<CardEntity>>;

    /// Soft-deletes the card and hands the main flag to the newest remaining card.
    async fn soft_delete(&self, user_id: Uuid, card_id: Uuid) -> Result<()>;

    async fn set_main(&self, user_id: Uuid, card_id: Uuid) -> Result<()>;
}
