use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::users::{InsertUserEntity, UpdateUserEntity, UserEntity},
    value_objects::insert_outcome::InsertOutcome,
};

#[automock]
#[async_trait]
pub trait AdminRepository {
    async fn permissions_for(&self, user_id: Uuid) -> Result<Vec<String>>;

    async fn list_admins(&self) -> Result<Vec<UserEntity>>;

    async fn create_admin(
        &self,
        insert_user_entity: InsertUserEntity,
        permissions: Vec<String>,
    ) -> Result<InsertOutcome<UserEntity>>;

    /// Replaces the permission set when `permissions` is provided.
    async fn update_admin(
        &self,
        user_id: Uuid,
        changes: UpdateUserEntity,
        permissions: Option<Vec<String>>,
    ) -> Result<Option<UserEntity>>;

    async fn delete_admin(&self, user_id: Uuid) -> Result<bool>;
}
