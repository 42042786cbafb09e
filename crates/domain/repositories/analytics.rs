use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;

use crate::domain::value_objects::analytics::{AnalyticsRange, ContentTypeCount, TimeBucket};

#[automock]
#[async_trait]
pub trait AnalyticsRepository {
    /// Sum of `creator_amount` over paid transactions per bucket.
    async fn creator_earnings(&self, range: AnalyticsRange) -> Result<Vec<TimeBucket>>;

    /// Sum of `sapi_amount` over paid transactions per bucket.
    async fn platform_earnings(&self, range: AnalyticsRange) -> Result<Vec<TimeBucket>>;

    async fn registered_accounts(&self, range: AnalyticsRange) -> Result<Vec<TimeBucket>>;

    /// Subscriptions started per bucket that are still active at `now`.
    async fn active_subscriptions(
        &self,
        range: AnalyticsRange,
        now: DateTime<Utc>,
    ) -> Result<Vec<TimeBucket>>;

    async fn active_subscription_total(&self, now: DateTime<Utc>) -> Result<i64>;

    async fn content_type_counts(&self) -> Result<Vec<ContentTypeCount>>;
}
