use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::infra::db::postgres::schema::{report_comments, reports};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, Serialize, PartialEq)]
#[diesel(table_name = reports)]
pub struct ReportEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub report_type: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reports)]
pub struct InsertReportEntity {
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub report_type: String,
    pub description: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, Serialize, PartialEq)]
#[diesel(table_name = report_comments)]
pub struct ReportCommentEntity {
    pub id: Uuid,
    pub report_id: Uuid,
    pub admin_id: Uuid,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = report_comments)]
pub struct InsertReportCommentEntity {
    pub report_id: Uuid,
    pub admin_id: Uuid,
    pub comment: String,
}
