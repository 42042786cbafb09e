use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::infra::db::postgres::schema::cards;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, PartialEq)]
#[diesel(table_name = cards)]
pub struct CardEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub number: String,
    pub expiration: String,
    pub card_owner: Option<String>,
    pub card_type: Option<String>,
    pub token: Option<String>,
    pub is_main: bool,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CardEntity {
    /// The bound gateway token, when the card is usable for payments.
    pub fn payment_token(&self) -> Option<&str> {
        if !self.is_active || self.is_deleted {
            return None;
        }
        self.token.as_deref().filter(|token| !token.is_empty())
    }

    pub fn masked_number(&self) -> String {
        let digits: String = self.number.chars().filter(|c| c.is_ascii_digit()).collect();
        let tail = if digits.len() >= 4 {
            &digits[digits.len() - 4..]
        } else {
            digits.as_str()
        };
        format!("**** **** **** {tail}")
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cards)]
pub struct InsertCardEntity {
    pub user_id: Uuid,
    pub number: String,
    pub expiration: String,
    pub is_main: bool,
    pub is_active: bool,
}

/// Values delivered by the gateway once a card is bound.
#[derive(Debug, Clone)]
pub struct CardBinding {
    pub phone_number: String,
    pub last_four: String,
    pub token: String,
    pub card_owner: Option<String>,
    pub card_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CardDto {
    pub id: Uuid,
    pub number: String,
    pub expiration: String,
    pub card_owner: Option<String>,
    pub card_type: Option<String>,
    pub is_main: bool,
    pub is_active: bool,
}

impl From<CardEntity> for CardDto {
    fn from(value: CardEntity) -> Self {
        Self {
            number: value.masked_number(),
            id: value.id,
            expiration: value.expiration,
            card_owner: value.card_owner,
            card_type: value.card_type,
            is_main: value.is_main,
            is_active: value.is_active,
        }
    }
}
