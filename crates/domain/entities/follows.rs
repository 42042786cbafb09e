use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::user_follows;

#[derive(Debug, Clone, Selectable, Queryable)]
#[diesel(table_name = user_follows)]
pub struct FollowEntity {
    pub follower_id: Uuid,
    pub following_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_follows)]
pub struct InsertFollowEntity {
    pub follower_id: Uuid,
    pub following_id: Uuid,
}
