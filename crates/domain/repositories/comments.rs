use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::comments::{CommentEntity, InsertCommentEntity},
    value_objects::pagination::Page,
};

#[automock]
#[async_trait]
pub trait CommentRepository {
    /// Inserts the comment and bumps the post's comment counter.
    async fn create(&self, insert_comment_entity: InsertCommentEntity) -> Result<CommentEntity>;

    async fn find_by_id(&self, comment_id: Uuid) -> Result<Option<CommentEntity>>;

    async fn list_top_level(&self, post_id: Uuid, page: Page) -> Result<Vec<CommentEntity>>;

    async fn list_replies(&self, parent_id: Uuid, page: Page) -> Result<Vec<CommentEntity>>;
}
