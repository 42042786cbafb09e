use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::infra::db::postgres::schema::user_subscriptions;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, Serialize, PartialEq)]
#[diesel(table_name = user_subscriptions)]
pub struct SubscriptionEntity {
    pub id: Uuid,
    pub subscriber_id: Uuid,
    pub creator_id: Uuid,
    pub plan_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    pub payment_reference: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubscriptionEntity {
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.end_date >= now
    }
}

/// Row written on checkout; conflicts on (subscriber, creator, plan) replace the window.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = user_subscriptions)]
pub struct UpsertSubscriptionEntity {
    pub subscriber_id: Uuid,
    pub creator_id: Uuid,
    pub plan_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    pub payment_reference: Option<Uuid>,
}
