use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::{
        subscription_plans::PlanEntity,
        subscriptions::{SubscriptionEntity, UpsertSubscriptionEntity},
    },
    value_objects::follower_stats::PlanSubscriberCount,
};

#[automock]
#[async_trait]
pub trait SubscriptionRepository {
    /// Active means `is_active` and `end_date >= now`.
    async fn find_active(
        &self,
        subscriber_id: Uuid,
        creator_id: Uuid,
        plan_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<SubscriptionEntity>>;

    /// One row per (subscriber, creator, plan); a renewal replaces the window.
    async fn upsert_after_checkout(
        &self,
        upsert_subscription_entity: UpsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity>;

    /// Inactive row whose checkout payment is still `new`, i.e. waiting for an OTP.
    async fn find_pending_checkout(
        &self,
        subscriber_id: Uuid,
        creator_id: Uuid,
        plan_id: Uuid,
    ) -> Result<Option<SubscriptionEntity>>;

    /// Activates the row paid by `transaction_id`; the window restarts at `now`.
    async fn activate_by_payment_reference(
        &self,
        transaction_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<(SubscriptionEntity, PlanEntity)>>;

    async fn list_for_subscriber(
        &self,
        subscriber_id: Uuid,
    ) -> Result<Vec<(SubscriptionEntity, PlanEntity)>>;

    async fn active_plan_prices(
        &self,
        subscriber_id: Uuid,
        creator_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<i64>>;

    async fn active_plan_ids(
        &self,
        subscriber_id: Uuid,
        creator_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>>;

    async fn subscriber_counts_by_plan(
        &self,
        creator_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<PlanSubscriberCount>>;
}
