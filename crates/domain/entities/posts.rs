use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::posts;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, PartialEq)]
#[diesel(table_name = posts)]
pub struct PostEntity {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub post_type: String,
    pub file_ids: Vec<Uuid>,
    pub is_premium: bool,
    pub subscription_plan_id: Option<Uuid>,
    pub is_posted: bool,
    pub publication_time: Option<DateTime<Utc>>,
    pub is_blocked: bool,
    pub is_deleted: bool,
    pub like_count: i32,
    pub comment_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostEntity {
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.is_posted
            && !self.is_deleted
            && !self.is_blocked
            && self.publication_time.map_or(true, |at| at <= now)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub struct InsertPostEntity {
    pub creator_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub post_type: String,
    pub file_ids: Vec<Uuid>,
    pub is_premium: bool,
    pub subscription_plan_id: Option<Uuid>,
    pub is_posted: bool,
    pub publication_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = posts)]
pub struct UpdatePostAccessEntity {
    pub is_premium: bool,
    pub subscription_plan_id: Option<Uuid>,
    pub is_posted: bool,
    pub publication_time: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::infra::db::postgres::schema::saved_posts)]
pub struct InsertSavedPostEntity {
    pub user_id: Uuid,
    pub post_id: Uuid,
}
