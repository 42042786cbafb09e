use std::sync::Arc;

use crates::domain::{
    entities::activities::{ActivityEntity, InsertActivityEntity},
    repositories::activities::ActivityRepository,
    value_objects::{enums::activity_types::ActivityType, pagination::Page},
};
use tokio::task::JoinHandle;
use tracing::{debug, error};
use uuid::Uuid;

/// Writes activity feed rows in the background.
pub struct ActivityRecorder<A>
where
    A: ActivityRepository + Send + Sync + 'static,
{
    activity_repo: Arc<A>,
}

impl<A> ActivityRecorder<A>
where
    A: ActivityRepository + Send + Sync + 'static,
{
    pub fn new(activity_repo: Arc<A>) -> Self {
        Self { activity_repo }
    }

    /// Fire-and-forget insert. Nothing is recorded when a user acts on their own content.
    pub fn record(
        &self,
        activity_type: ActivityType,
        initiator_id: Uuid,
        content_owner_id: Uuid,
        content_id: Option<Uuid>,
        content: Option<String>,
    ) -> Option<JoinHandle<()>> {
        if initiator_id == content_owner_id {
            debug!(%initiator_id, %activity_type, "activities: skipping self activity");
            return None;
        }

        let activity_repo = Arc::clone(&self.activity_repo);
        let activity = InsertActivityEntity {
            activity_type: activity_type.to_string(),
            content,
            content_id: content_id.map(|id| id.to_string()),
            initiator_id: Some(initiator_id),
            content_owner_id: Some(content_owner_id),
        };

        Some(tokio::spawn(async move {
            if let Err(err) = activity_repo.create(activity).await {
                error!(
                    %initiator_id,
                    %content_owner_id,
                    %activity_type,
                    db_error = ?err,
                    "activities: failed to record activity"
                );
            }
        }))
    }

    pub async fn feed(&self, owner_id: Uuid, page: Page) -> anyhow::Result<Vec<ActivityEntity>> {
        self.activity_repo.list_for_owner(owner_id, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crates::domain::repositories::activities::MockActivityRepository;

    #[tokio::test]
    async fn records_activity_in_background() {
        let (initiator_id, owner_id, post_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut activity_repo = MockActivityRepository::new();
        activity_repo
            .expect_create()
            .withf(move |activity| {
                activity.activity_type == "liked_post"
                    && activity.initiator_id == Some(initiator_id)
                    && activity.content_owner_id == Some(owner_id)
                    && activity.content_id == Some(post_id.to_string())
            })
            .times(1)
            .returning(|_| Ok(()));

        let recorder = ActivityRecorder::new(Arc::new(activity_repo));
        let handle = recorder
            .record(ActivityType::LikedPost, initiator_id, owner_id, Some(post_id), None)
            .expect("activity should be spawned");
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn skips_own_content() {
        let user_id = Uuid::new_v4();
        let mut activity_repo = MockActivityRepository::new();
        activity_repo.expect_create().never();

        let recorder = ActivityRecorder::new(Arc::new(activity_repo));

        assert!(
            recorder
                .record(ActivityType::Commented, user_id, user_id, None, None)
                .is_none()
        );
    }

    #[tokio::test]
    async fn storage_failure_is_swallowed() {
        let mut activity_repo = MockActivityRepository::new();
        activity_repo
            .expect_create()
            .returning(|_| Err(anyhow::anyhow!("connection reset")));

        let recorder = ActivityRecorder::new(Arc::new(activity_repo));
        let handle = recorder
            .record(ActivityType::Followed, Uuid::new_v4(), Uuid::new_v4(), None, None)
            .unwrap();

        assert!(handle.await.is_ok());
    }
}
