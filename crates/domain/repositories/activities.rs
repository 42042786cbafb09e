use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::activities::{ActivityEntity, InsertActivityEntity},
    value_objects::pagination::Page,
};

#[automock]
#[async_trait]
pub trait ActivityRepository {
    async fn create(&self, insert_activity_entity: InsertActivityEntity) -> Result<()>;

    async fn list_for_owner(&self, owner_id: Uuid, page: Page) -> Result<Vec<ActivityEntity>>;
}
