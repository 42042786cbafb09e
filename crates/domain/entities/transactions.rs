use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    domain::value_objects::enums::{
        transaction_statuses::TransactionStatus, transaction_types::TransactionType,
    },
    infra::db::postgres::schema::multibank_transactions,
};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, PartialEq)]
#[diesel(table_name = multibank_transactions)]
pub struct TransactionEntity {
    pub id: Uuid,
    pub payer_id: Uuid,
    pub creator_id: Uuid,
    pub transaction_type: String,
    pub status: String,
    pub amount: i64,
    pub sapi_amount: i64,
    pub creator_amount: i64,
    pub card_token: String,
    pub store_id: String,
    pub fundraising_id: Option<Uuid>,
    pub external_transaction_id: Option<String>,
    pub otp_hash: Option<String>,
    pub gateway_response: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionEntity {
    pub fn status(&self) -> TransactionStatus {
        TransactionStatus::from_str(&self.status)
    }

    pub fn kind(&self) -> Option<TransactionType> {
        TransactionType::from_str(&self.transaction_type)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = multibank_transactions)]
pub struct InsertTransactionEntity {
    pub payer_id: Uuid,
    pub creator_id: Uuid,
    pub transaction_type: String,
    pub status: String,
    pub amount: i64,
    pub sapi_amount: i64,
    pub creator_amount: i64,
    pub card_token: String,
    pub store_id: String,
    pub fundraising_id: Option<Uuid>,
}
