use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::infra::db::postgres::schema::donations;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, Serialize, PartialEq)]
#[diesel(table_name = donations)]
pub struct DonationEntity {
    pub id: Uuid,
    pub donator_id: Uuid,
    pub creator_id: Uuid,
    pub fundraising_id: Option<Uuid>,
    pub amount: i64,
    pub message: Option<String>,
    pub transaction_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = donations)]
pub struct InsertDonationEntity {
    pub donator_id: Uuid,
    pub creator_id: Uuid,
    pub fundraising_id: Option<Uuid>,
    pub amount: i64,
    pub message: Option<String>,
    pub transaction_id: Option<Uuid>,
}
