use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::{
        answer_options::{AnswerOptionEntity, InsertPostAnswerEntity, PostAnswerEntity},
        posts::{InsertPostEntity, PostEntity, UpdatePostAccessEntity},
    },
    value_objects::{
        insert_outcome::InsertOutcome,
        pagination::Page,
        posts::{AnswerOptionDraft, PostListFilter},
    },
};

#[automock]
#[async_trait]
pub trait PostRepository {
    async fn create(
        &self,
        insert_post_entity: InsertPostEntity,
        options: Vec<AnswerOptionDraft>,
    ) -> Result<PostEntity>;

    async fn find_by_id(&self, post_id: Uuid) -> Result<Option<PostEntity>>;

    async fn update_access(
        &self,
        post_id: Uuid,
        changes: UpdatePostAccessEntity,
    ) -> Result<PostEntity>;

    async fn soft_delete(&self, post_id: Uuid) -> Result<()>;

    /// Published posts only: posted, due, not deleted or blocked, author not blocked.
    async fn list_published(
        &self,
        filter: PostListFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<PostEntity>>;

    async fn list_options(&self, post_id: Uuid) -> Result<Vec<AnswerOptionEntity>>;

    async fn save_answer(
        &self,
        insert_post_answer_entity: InsertPostAnswerEntity,
    ) -> Result<InsertOutcome<PostAnswerEntity>>;

    async fn set_blocked(&self, post_id: Uuid, blocked: bool) -> Result<()>;

    async fn liked_post_ids(&self, user_id: Uuid, post_ids: Vec<Uuid>) -> Result<Vec<Uuid>>;

    async fn saved_post_ids(&self, user_id: Uuid, post_ids: Vec<Uuid>) -> Result<Vec<Uuid>>;

    async fn list_liked(&self, user_id: Uuid, page: Page) -> Result<Vec<PostEntity>>;

    async fn list_saved(&self, user_id: Uuid, page: Page) -> Result<Vec<PostEntity>>;

    /// Returns `true` when the post is saved after the call.
    async fn toggle_save(&self, user_id: Uuid, post_id: Uuid) -> Result<bool>;
}
