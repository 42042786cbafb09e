use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::infra::db::postgres::schema::user_activities;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, Serialize)]
#[diesel(table_name = user_activities)]
pub struct ActivityEntity {
    pub id: Uuid,
    pub activity_type: String,
    pub content: Option<String>,
    pub content_id: Option<String>,
    pub initiator_id: Option<Uuid>,
    pub content_owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, PartialEq)]
#[diesel(table_name = user_activities)]
pub struct InsertActivityEntity {
    pub activity_type: String,
    pub content: Option<String>,
    pub content_id: Option<String>,
    pub initiator_id: Option<Uuid>,
    pub content_owner_id: Option<Uuid>,
}
