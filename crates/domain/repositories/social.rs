use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::value_objects::insert_outcome::InsertOutcome;

#[automock]
#[async_trait]
pub trait SocialRepository {
    async fn is_following(&self, follower_id: Uuid, following_id: Uuid) -> Result<bool>;

    async fn follow(&self, follower_id: Uuid, following_id: Uuid) -> Result<()>;

    async fn unfollow(&self, follower_id: Uuid, following_id: Uuid) -> Result<()>;

    async fn is_blocked(&self, blocker_id: Uuid, blocked_id: Uuid) -> Result<bool>;

    /// True when either user has blocked the other.
    async fn is_blocked_between(&self, first: Uuid, second: Uuid) -> Result<bool>;

    /// Inserts the block and drops follows in both directions.
    async fn block(&self, blocker_id: Uuid, blocked_id: Uuid) -> Result<InsertOutcome<()>>;

    async fn unblock(&self, blocker_id: Uuid, blocked_id: Uuid) -> Result<()>;

    /// `(followers, following)`
    async fn follow_counts(&self, user_id: Uuid) -> Result<(i64, i64)>;

    async fn following_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>>;

    async fn blocked_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>>;

    async fn follow_timestamps_since(
        &self,
        creator_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>>;
}
