use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::sms_confirmations},
};
use domain::{
    entities::sms_confirmations::{InsertSmsConfirmationEntity, SmsConfirmationEntity},
    repositories::sms_confirmations::SmsConfirmationRepository,
    value_objects::enums::sms_purposes::SmsPurpose,
};

pub struct SmsConfirmationPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SmsConfirmationPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SmsConfirmationRepository for SmsConfirmationPostgres {
    async fn latest_for_phone(
        &self,
        phone_number: String,
        purpose: SmsPurpose,
    ) -> Result<Option<SmsConfirmationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let confirmation = sms_confirmations::table
            .filter(sms_confirmations::phone_number.eq(phone_number))
            .filter(sms_confirmations::purpose.eq(purpose.to_string()))
            .order(sms_confirmations::created_at.desc())
            .select(SmsConfirmationEntity::as_select())
            .first::<SmsConfirmationEntity>(&mut conn)
            .optional()?;

        Ok(confirmation)
    }

    async fn create(
        &self,
        insert_sms_confirmation_entity: InsertSmsConfirmationEntity,
    ) -> Result<SmsConfirmationEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let confirmation = insert_into(sms_confirmations::table)
            .values(&insert_sms_confirmation_entity)
            .returning(SmsConfirmationEntity::as_returning())
            .get_result::<SmsConfirmationEntity>(&mut conn)?;

        Ok(confirmation)
    }

    async fn find_unused(
        &self,
        phone_number: String,
        code: String,
        purpose: SmsPurpose,
    ) -> Result<Option<SmsConfirmationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let confirmation = sms_confirmations::table
            .filter(sms_confirmations::phone_number.eq(phone_number))
            .filter(sms_confirmations::code.eq(code))
            .filter(sms_confirmations::purpose.eq(purpose.to_string()))
            .filter(sms_confirmations::is_used.eq(false))
            .order(sms_confirmations::created_at.desc())
            .select(SmsConfirmationEntity::as_select())
            .first::<SmsConfirmationEntity>(&mut conn)
            .optional()?;

        Ok(confirmation)
    }

    async fn mark_used(&self, confirmation_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(sms_confirmations::table.filter(sms_confirmations::id.eq(confirmation_id)))
            .set(sms_confirmations::is_used.eq(true))
            .execute(&mut conn)?;

        Ok(())
    }
}
