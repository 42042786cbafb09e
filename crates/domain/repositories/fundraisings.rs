use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::fundraisings::{
    FundraisingEntity, InsertFundraisingEntity, UpdateFundraisingEntity,
};

#[automock]
#[async_trait]
pub trait FundraisingRepository {
    async fn create(
        &self,
        insert_fundraising_entity: InsertFundraisingEntity,
    ) -> Result<FundraisingEntity>;

    async fn update(
        &self,
        fundraising_id: Uuid,
        changes: UpdateFundraisingEntity,
    ) -> Result<FundraisingEntity>;

    async fn find_by_id(&self, fundraising_id: Uuid) -> Result<Option<FundraisingEntity>>;

    async fn list_by_creator(
        &self,
        creator_id: Uuid,
        only_active: bool,
    ) -> Result<Vec<FundraisingEntity>>;

    async fn increment_current_amount(&self, fundraising_id: Uuid, amount: i64) -> Result<()>;
}
