use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::infra::db::postgres::schema::notification_distributions;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, Serialize, PartialEq)]
#[diesel(table_name = notification_distributions)]
pub struct DistributionEntity {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub user_type: String,
    pub status: String,
    pub sending_date: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notification_distributions)]
pub struct InsertDistributionEntity {
    pub title: String,
    pub body: String,
    pub user_type: String,
    pub status: String,
    pub sending_date: Option<DateTime<Utc>>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = notification_distributions)]
pub struct UpdateDistributionEntity {
    pub title: Option<String>,
    pub body: Option<String>,
    pub user_type: Option<String>,
    pub status: Option<String>,
    pub sending_date: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
