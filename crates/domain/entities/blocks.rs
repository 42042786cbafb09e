use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::blocked_users;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = blocked_users)]
pub struct InsertBlockEntity {
    pub blocker_id: Uuid,
    pub blocked_id: Uuid,
}
