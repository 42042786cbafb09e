use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::files::{FileEntity, InsertFileEntity};

#[automock]
#[async_trait]
pub trait FileRepository {
    async fn create(&self, insert_file_entity: InsertFileEntity) -> Result<FileEntity>;

    async fn find_by_id(&self, file_id: Uuid) -> Result<Option<FileEntity>>;

    async fn delete(&self, file_id: Uuid) -> Result<()>;
}
