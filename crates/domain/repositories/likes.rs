use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

#[automock]
#[async_trait]
pub trait LikeRepository {
    /// Returns `true` when the post is liked after the call.
    async fn toggle_post_like(&self, user_id: Uuid, post_id: Uuid) -> Result<bool>;

    /// Returns `true` when the comment is liked after the call.
    async fn toggle_comment_like(&self, user_id: Uuid, comment_id: Uuid) -> Result<bool>;
}
