use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{insert_into, prelude::*};
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::donations},
};
use domain::{
    entities::donations::{DonationEntity, InsertDonationEntity},
    repositories::donations::DonationRepository,
};

pub struct DonationPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl DonationPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl DonationRepository for DonationPostgres {
    async fn create(&self, insert_donation_entity: InsertDonationEntity) -> Result<DonationEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let donation = insert_into(donations::table)
            .values(&insert_donation_entity)
            .returning(DonationEntity::as_returning())
            .get_result::<DonationEntity>(&mut conn)?;

        Ok(donation)
    }

    async fn find_by_transaction(&self, transaction_id: Uuid) -> Result<Option<DonationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let donation = donations::table
            .filter(donations::transaction_id.eq(Some(transaction_id)))
            .select(DonationEntity::as_select())
            .first::<DonationEntity>(&mut conn)
            .optional()?;

        Ok(donation)
    }
}
