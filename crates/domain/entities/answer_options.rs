use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::infra::db::postgres::schema::{answer_options, post_answers};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, Serialize, PartialEq)]
#[diesel(table_name = answer_options)]
pub struct AnswerOptionEntity {
    pub id: Uuid,
    pub post_id: Uuid,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = answer_options)]
pub struct InsertAnswerOptionEntity {
    pub post_id: Uuid,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Selectable, Queryable, Serialize, PartialEq)]
#[diesel(table_name = post_answers)]
pub struct PostAnswerEntity {
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub option_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = post_answers)]
pub struct InsertPostAnswerEntity {
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub option_ids: Vec<Uuid>,
}
