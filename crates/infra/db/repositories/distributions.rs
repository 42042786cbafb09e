use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::notification_distributions},
};
use domain::{
    entities::notification_distributions::{
        DistributionEntity, InsertDistributionEntity, UpdateDistributionEntity,
    },
    repositories::distributions::DistributionRepository,
    value_objects::{enums::distribution_statuses::DistributionStatus, pagination::Page},
};

pub struct DistributionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl DistributionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl DistributionRepository for DistributionPostgres {
    async fn create(
        &self,
        insert_distribution_entity: InsertDistributionEntity,
    ) -> Result<DistributionEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let distribution = insert_into(notification_distributions::table)
            .values(&insert_distribution_entity)
            .returning(DistributionEntity::as_returning())
            .get_result::<DistributionEntity>(&mut conn)?;

        Ok(distribution)
    }

    async fn list(&self, page: Page) -> Result<Vec<DistributionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = notification_distributions::table
            .order(notification_distributions::created_at.desc())
            .limit(page.limit)
            .offset(page.offset)
            .select(DistributionEntity::as_select())
            .load::<DistributionEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, distribution_id: Uuid) -> Result<Option<DistributionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let distribution = notification_distributions::table
            .filter(notification_distributions::id.eq(distribution_id))
            .select(DistributionEntity::as_select())
            .first::<DistributionEntity>(&mut conn)
            .optional()?;

        Ok(distribution)
    }

    async fn update(
        &self,
        distribution_id: Uuid,
        changes: UpdateDistributionEntity,
    ) -> Result<Option<DistributionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let distribution = update(
            notification_distributions::table
                .filter(notification_distributions::id.eq(distribution_id)),
        )
        .set(&changes)
        .returning(DistributionEntity::as_returning())
        .get_result::<DistributionEntity>(&mut conn)
        .optional()?;

        Ok(distribution)
    }

    async fn list_due(&self, now: DateTime<Utc>) -> Result<Vec<DistributionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = notification_distributions::table
            .filter(notification_distributions::status.eq(DistributionStatus::Waiting.to_string()))
            .filter(
                notification_distributions::sending_date
                    .is_null()
                    .or(notification_distributions::sending_date.le(now)),
            )
            .order(notification_distributions::created_at.asc())
            .select(DistributionEntity::as_select())
            .load::<DistributionEntity>(&mut conn)?;

        Ok(results)
    }

    async fn set_status(
        &self,
        distribution_id: Uuid,
        status: DistributionStatus,
        sent_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(
            notification_distributions::table
                .filter(notification_distributions::id.eq(distribution_id)),
        )
        .set((
            notification_distributions::status.eq(status.to_string()),
            notification_distributions::sent_at.eq(sent_at),
            notification_distributions::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)?;

        Ok(())
    }
}
