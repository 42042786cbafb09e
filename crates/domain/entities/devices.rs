use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::infra::db::postgres::schema::devices;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, Serialize, PartialEq)]
#[diesel(table_name = devices)]
pub struct DeviceEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub registration_token: String,
    pub device_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = devices)]
pub struct InsertDeviceEntity {
    pub user_id: Uuid,
    pub registration_token: String,
    pub device_type: String,
}
