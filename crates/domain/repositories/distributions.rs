use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::notification_distributions::{
        DistributionEntity, InsertDistributionEntity, UpdateDistributionEntity,
    },
    value_objects::{enums::distribution_statuses::DistributionStatus, pagination::Page},
};

#[automock]
#[async_trait]
pub trait DistributionRepository {
    async fn create(
        &self,
        insert_distribution_entity: InsertDistributionEntity,
    ) -> Result<DistributionEntity>;

    async fn list(&self, page: Page) -> Result<Vec<DistributionEntity>>;

    async fn find_by_id(&self, distribution_id: Uuid) -> Result<Option<DistributionEntity>>;

    async fn update(
        &self,
        distribution_id: Uuid,
        changes: UpdateDistributionEntity,
    ) -> Result<Option<DistributionEntity>>;

    /// Waiting distributions whose sending date has passed (or is unset).
    async fn list_due(&self, now: DateTime<Utc>) -> Result<Vec<DistributionEntity>>;

    async fn set_status(
        &self,
        distribution_id: Uuid,
        status: DistributionStatus,
        sent_at: Option<DateTime<Utc>>,
    ) -> Result<()>;
}
