use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::users::{InsertUserEntity, UpdateUserEntity, UserEntity},
    value_objects::{
        insert_outcome::InsertOutcome,
        users::{AdminCreatorFilter, CreatorSearchFilter, CreatorSummary},
    },
};

#[automock]
#[async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>>;

    async fn find_by_phone(&self, phone_number: String) -> Result<Option<UserEntity>>;

    async fn create(&self, insert_user_entity: InsertUserEntity) -> Result<UserEntity>;

    async fn record_login(&self, user_id: Uuid) -> Result<()>;

    /// `Duplicate` when the requested username belongs to someone else.
    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: UpdateUserEntity,
    ) -> Result<InsertOutcome<UserEntity>>;

    async fn set_pinfl(&self, user_id: Uuid, pinfl: String) -> Result<()>;

    async fn attach_multibank_account(&self, user_id: Uuid, account: String) -> Result<()>;

    async fn become_creator(&self, user_id: Uuid) -> Result<UserEntity>;

    /// Frees phone and username for reuse and deactivates the account.
    async fn soft_delete(&self, user_id: Uuid) -> Result<()>;

    async fn block_by_admin(&self, user_id: Uuid) -> Result<()>;

    async fn update_sapi_share(&self, user_id: Uuid, sapi_share: i32) -> Result<()>;

    async fn popular_creators(
        &self,
        category_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<CreatorSummary>>;

    async fn search_creators(&self, filter: CreatorSearchFilter) -> Result<Vec<CreatorSummary>>;

    async fn list_creators(&self, filter: AdminCreatorFilter) -> Result<(Vec<UserEntity>, i64)>;
}
