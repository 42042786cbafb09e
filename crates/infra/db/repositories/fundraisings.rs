use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::fundraisings},
};
use domain::{
    entities::fundraisings::{FundraisingEntity, InsertFundraisingEntity, UpdateFundraisingEntity},
    repositories::fundraisings::FundraisingRepository,
};

pub struct FundraisingPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl FundraisingPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl FundraisingRepository for FundraisingPostgres {
    async fn create(
        &self,
        insert_fundraising_entity: InsertFundraisingEntity,
    ) -> Result<FundraisingEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let fundraising = insert_into(fundraisings::table)
            .values(&insert_fundraising_entity)
            .returning(FundraisingEntity::as_returning())
            .get_result::<FundraisingEntity>(&mut conn)?;

        Ok(fundraising)
    }

    async fn update(
        &self,
        fundraising_id: Uuid,
        changes: UpdateFundraisingEntity,
    ) -> Result<FundraisingEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let fundraising = update(fundraisings::table.filter(fundraisings::id.eq(fundraising_id)))
            .set(&changes)
            .returning(FundraisingEntity::as_returning())
            .get_result::<FundraisingEntity>(&mut conn)?;

        Ok(fundraising)
    }

    async fn find_by_id(&self, fundraising_id: Uuid) -> Result<Option<FundraisingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let fundraising = fundraisings::table
            .filter(fundraisings::id.eq(fundraising_id))
            .select(FundraisingEntity::as_select())
            .first::<FundraisingEntity>(&mut conn)
            .optional()?;

        Ok(fundraising)
    }

    async fn list_by_creator(
        &self,
        creator_id: Uuid,
        only_active: bool,
    ) -> Result<Vec<FundraisingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = fundraisings::table
            .filter(fundraisings::creator_id.eq(creator_id))
            .into_boxed();
        if only_active {
            query = query.filter(fundraisings::is_active.eq(true));
        }

        let results = query
            .order(fundraisings::created_at.desc())
            .select(FundraisingEntity::as_select())
            .load::<FundraisingEntity>(&mut conn)?;

        Ok(results)
    }

    async fn increment_current_amount(&self, fundraising_id: Uuid, amount: i64) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(fundraisings::table.filter(fundraisings::id.eq(fundraising_id)))
            .set((
                fundraisings::current_amount.eq(fundraisings::current_amount + amount),
                fundraisings::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }
}
