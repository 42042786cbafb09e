use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::reports::{
        InsertReportCommentEntity, InsertReportEntity, ReportCommentEntity, ReportEntity,
    },
    value_objects::{enums::report_statuses::ReportStatus, insert_outcome::InsertOutcome, pagination::Page},
};

#[automock]
#[async_trait]
pub trait ReportRepository {
    async fn create(
        &self,
        insert_report_entity: InsertReportEntity,
    ) -> Result<InsertOutcome<ReportEntity>>;

    async fn list(
        &self,
        status: Option<ReportStatus>,
        page: Page,
    ) -> Result<(Vec<ReportEntity>, i64)>;

    async fn find_by_id(&self, report_id: Uuid) -> Result<Option<ReportEntity>>;

    async fn resolve(&self, report_id: Uuid, status: ReportStatus) -> Result<Option<ReportEntity>>;

    /// Resolves every waiting report on the post.
    async fn resolve_for_post(&self, post_id: Uuid, status: ReportStatus) -> Result<usize>;

    async fn add_comment(
        &self,
        insert_report_comment_entity: InsertReportCommentEntity,
    ) -> Result<ReportCommentEntity>;
}
