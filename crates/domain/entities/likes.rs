use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::likes;

/// Exactly one of `post_id` / `comment_id` is set.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = likes)]
pub struct InsertLikeEntity {
    pub user_id: Uuid,
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
}
