use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::categories::CategoryEntity, value_objects::insert_outcome::InsertOutcome,
};

#[automock]
#[async_trait]
pub trait CategoryRepository {
    async fn list(&self) -> Result<Vec<CategoryEntity>>;

    async fn create(&self, name: String) -> Result<InsertOutcome<CategoryEntity>>;

    async fn rename(&self, category_id: Uuid, name: String) -> Result<Option<CategoryEntity>>;

    async fn delete(&self, category_id: Uuid) -> Result<bool>;
}
