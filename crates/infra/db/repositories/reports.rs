use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{insert_into, pg::Pg, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain,
    infra::db::{
        postgres::{
            postgres_connection::PgPoolSquad,
            schema::{report_comments, reports},
        },
        repositories::is_unique_violation,
    },
};
use domain::{
    entities::reports::{
        InsertReportCommentEntity, InsertReportEntity, ReportCommentEntity, ReportEntity,
    },
    repositories::reports::ReportRepository,
    value_objects::{
        enums::report_statuses::ReportStatus, insert_outcome::InsertOutcome, pagination::Page,
    },
};

pub struct ReportPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ReportPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn by_status<'a>(status: Option<ReportStatus>) -> reports::BoxedQuery<'a, Pg> {
    let mut query = reports::table.into_boxed();
    if let Some(status) = status {
        query = query.filter(reports::status.eq(status.to_string()));
    }
    query
}

#[async_trait]
impl ReportRepository for ReportPostgres {
    async fn create(
        &self,
        insert_report_entity: InsertReportEntity,
    ) -> Result<InsertOutcome<ReportEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(reports::table)
            .values(&insert_report_entity)
            .returning(ReportEntity::as_returning())
            .get_result::<ReportEntity>(&mut conn);

        match result {
            Ok(report) => Ok(InsertOutcome::Inserted(report)),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Duplicate),
            Err(err) => Err(err.into()),
        }
    }

    async fn list(
        &self,
        status: Option<ReportStatus>,
        page: Page,
    ) -> Result<(Vec<ReportEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = by_status(status).count().get_result::<i64>(&mut conn)?;
        let results = by_status(status)
            .order(reports::created_at.desc())
            .limit(page.limit)
            .offset(page.offset)
            .select(ReportEntity::as_select())
            .load::<ReportEntity>(&mut conn)?;

        Ok((results, total))
    }

    async fn find_by_id(&self, report_id: Uuid) -> Result<Option<ReportEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let report = reports::table
            .filter(reports::id.eq(report_id))
            .select(ReportEntity::as_select())
            .first::<ReportEntity>(&mut conn)
            .optional()?;

        Ok(report)
    }

    async fn resolve(&self, report_id: Uuid, status: ReportStatus) -> Result<Option<ReportEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let report = update(reports::table.filter(reports::id.eq(report_id)))
            .set((
                reports::status.eq(status.to_string()),
                reports::resolved_at.eq(Some(Utc::now())),
            ))
            .returning(ReportEntity::as_returning())
            .get_result::<ReportEntity>(&mut conn)
            .optional()?;

        Ok(report)
    }

    async fn resolve_for_post(&self, post_id: Uuid, status: ReportStatus) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(
            reports::table
                .filter(reports::post_id.eq(post_id))
                .filter(reports::status.eq(ReportStatus::Waiting.to_string())),
        )
        .set((
            reports::status.eq(status.to_string()),
            reports::resolved_at.eq(Some(Utc::now())),
        ))
        .execute(&mut conn)?;

        Ok(affected)
    }

    async fn add_comment(
        &self,
        insert_report_comment_entity: InsertReportCommentEntity,
    ) -> Result<ReportCommentEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let comment = insert_into(report_comments::table)
            .values(&insert_report_comment_entity)
            .returning(ReportCommentEntity::as_returning())
            .get_result::<ReportCommentEntity>(&mut conn)?;

        Ok(comment)
    }
}
