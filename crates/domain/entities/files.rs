use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::infra::db::postgres::schema::files;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, Serialize, PartialEq)]
#[diesel(table_name = files)]
pub struct FileEntity {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub name: String,
    pub size: i64,
    pub content_type: Option<String>,
    pub storage_key: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = files)]
pub struct InsertFileEntity {
    pub owner_id: Option<Uuid>,
    pub name: String,
    pub size: i64,
    pub content_type: Option<String>,
    pub storage_key: String,
}
