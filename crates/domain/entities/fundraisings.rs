use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::infra::db::postgres::schema::fundraisings;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, Serialize, PartialEq)]
#[diesel(table_name = fundraisings)]
pub struct FundraisingEntity {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub goal: i64,
    pub current_amount: i64,
    pub minimum_donation: i64,
    pub deadline: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FundraisingEntity {
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.deadline.map_or(true, |deadline| deadline >= now)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = fundraisings)]
pub struct InsertFundraisingEntity {
    pub creator_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub goal: i64,
    pub minimum_donation: i64,
    pub deadline: Option<DateTime<Utc>>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = fundraisings)]
pub struct UpdateFundraisingEntity {
    pub title: Option<String>,
    pub description: Option<String>,
    pub goal: Option<i64>,
    pub minimum_donation: Option<i64>,
    pub deadline: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub updated_at: Option<DateTime<Utc>>,
}
