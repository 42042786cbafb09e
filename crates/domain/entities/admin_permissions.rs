use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::admin_permissions;

#[derive(Debug, Clone, Selectable, Queryable)]
#[diesel(table_name = admin_permissions)]
pub struct AdminPermissionEntity {
    pub user_id: Uuid,
    pub permission: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = admin_permissions)]
pub struct InsertAdminPermissionEntity {
    pub user_id: Uuid,
    pub permission: String,
}
