use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{dsl::exists, insert_into, prelude::*, select, update};
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{cards, users},
    },
};
use domain::{
    entities::cards::{CardBinding, CardEntity, InsertCardEntity},
    repositories::cards::CardRepository,
};

pub struct CardPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CardPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CardRepository for CardPostgres {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<CardEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = cards::table
            .filter(cards::user_id.eq(user_id))
            .filter(cards::is_deleted.eq(false))
            .order((cards::is_main.desc(), cards::created_at.desc()))
            .select(CardEntity::as_select())
            .load::<CardEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_for_user(&self, user_id: Uuid, card_id: Uuid) -> Result<Option<CardEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let card = cards::table
            .filter(cards::id.eq(card_id))
            .filter(cards::user_id.eq(user_id))
            .filter(cards::is_deleted.eq(false))
            .select(CardEntity::as_select())
            .first::<CardEntity>(&mut conn)
            .optional()?;

        Ok(card)
    }

    async fn create(&self, insert_card_entity: InsertCardEntity) -> Result<CardEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let card = insert_into(cards::table)
            .values(&insert_card_entity)
            .returning(CardEntity::as_returning())
            .get_result::<CardEntity>(&mut conn)?;

        Ok(card)
    }

    async fn activate_binding(&self, binding: CardBinding) -> Result<Option<CardEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let card = conn.transaction::<Option<CardEntity>, diesel::result::Error, _>(|conn| {
            let Some(owner_id) = users::table
                .filter(users::phone_number.eq(&binding.phone_number))
                .filter(users::is_deleted.eq(false))
                .select(users::id)
                .first::<Uuid>(conn)
                .optional()?
            else {
                return Ok(None);
            };

            let Some(pending) = cards::table
                .filter(cards::user_id.eq(owner_id))
                .filter(cards::is_active.eq(false))
                .filter(cards::is_deleted.eq(false))
                .filter(cards::number.like(format!("%{}", binding.last_four)))
                .order(cards::created_at.desc())
                .select(CardEntity::as_select())
                .first::<CardEntity>(conn)
                .optional()?
            else {
                return Ok(None);
            };

            let has_main = select(exists(
                cards::table
                    .filter(cards::user_id.eq(owner_id))
                    .filter(cards::is_main.eq(true))
                    .filter(cards::is_active.eq(true))
                    .filter(cards::is_deleted.eq(false)),
            ))
            .get_result::<bool>(conn)?;

            let card = update(cards::table.filter(cards::id.eq(pending.id)))
                .set((
                    cards::token.eq(Some(binding.token.clone())),
                    cards::card_owner.eq(binding.card_owner.clone().or(pending.card_owner)),
                    cards::card_type.eq(binding.card_type.clone().or(pending.card_type)),
                    cards::is_active.eq(true),
                    cards::is_main.eq(!has_main),
                    cards::updated_at.eq(Utc::now()),
                ))
                .returning(CardEntity::as_returning())
                .get_result::<CardEntity>(conn)?;

            Ok(Some(card))
        })?;

        Ok(card)
    }

    async fn soft_delete(&self, user_id: Uuid, card_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            let now = Utc::now();
            update(
                cards::table
                    .filter(cards::id.eq(card_id))
                    .filter(cards::user_id.eq(user_id)),
            )
            .set((
                cards::is_deleted.eq(true),
                cards::is_active.eq(false),
                cards::is_main.eq(false),
                cards::token.eq(None::<String>),
                cards::updated_at.eq(now),
            ))
            .execute(conn)?;

            let has_main = select(exists(
                cards::table
                    .filter(cards::user_id.eq(user_id))
                    .filter(cards::is_main.eq(true))
                    .filter(cards::is_deleted.eq(false)),
            ))
            .get_result::<bool>(conn)?;

            if !has_main {
                let replacement = cards::table
                    .filter(cards::user_id.eq(user_id))
                    .filter(cards::is_active.eq(true))
                    .filter(cards::is_deleted.eq(false))
                    .order(cards::created_at.desc())
                    .select(cards::id)
                    .first::<Uuid>(conn)
                    .optional()?;

                if let Some(replacement) = replacement {
                    update(cards::table.filter(cards::id.eq(replacement)))
                        .set((cards::is_main.eq(true), cards::updated_at.eq(now)))
                        .execute(conn)?;
                }
            }

            Ok(())
        })?;

        Ok(())
    }

    async fn set_main(&self, user_id: Uuid, card_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            let now = Utc::now();
            update(
                cards::table
                    .filter(cards::user_id.eq(user_id))
                    .filter(cards::is_main.eq(true)),
            )
            .set((cards::is_main.eq(false), cards::updated_at.eq(now)))
            .execute(conn)?;

            update(
                cards::table
                    .filter(cards::id.eq(card_id))
                    .filter(cards::user_id.eq(user_id))
                    .filter(cards::is_active.eq(true))
                    .filter(cards::is_deleted.eq(false)),
            )
            .set((cards::is_main.eq(true), cards::updated_at.eq(now)))
            .execute(conn)?;

            Ok(())
        })?;

        Ok(())
    }
}
