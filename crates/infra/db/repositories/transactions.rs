use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::multibank_transactions},
};
use domain::{
    entities::transactions::{InsertTransactionEntity, TransactionEntity},
    repositories::transactions::TransactionRepository,
    value_objects::enums::transaction_statuses::TransactionStatus,
};

pub struct TransactionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl TransactionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl TransactionRepository for TransactionPostgres {
    async fn create(
        &self,
        insert_transaction_entity: InsertTransactionEntity,
    ) -> Result<TransactionEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let transaction = insert_into(multibank_transactions::table)
            .values(&insert_transaction_entity)
            .returning(TransactionEntity::as_returning())
            .get_result::<TransactionEntity>(&mut conn)?;

        Ok(transaction)
    }

    async fn find_by_id(&self, transaction_id: Uuid) -> Result<Option<TransactionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let transaction = multibank_transactions::table
            .filter(multibank_transactions::id.eq(transaction_id))
            .select(TransactionEntity::as_select())
            .first::<TransactionEntity>(&mut conn)
            .optional()?;

        Ok(transaction)
    }

    async fn record_gateway_reference(
        &self,
        transaction_id: Uuid,
        external_transaction_id: Option<String>,
        otp_hash: Option<String>,
        response: serde_json::Value,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(multibank_transactions::table.filter(multibank_transactions::id.eq(transaction_id)))
            .set((
                multibank_transactions::external_transaction_id.eq(external_transaction_id),
                multibank_transactions::otp_hash.eq(otp_hash),
                multibank_transactions::gateway_response.eq(Some(response)),
                multibank_transactions::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn finalize(
        &self,
        transaction_id: Uuid,
        status: TransactionStatus,
        response: Option<serde_json::Value>,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let target = multibank_transactions::table
            .filter(multibank_transactions::id.eq(transaction_id))
            .filter(multibank_transactions::status.eq(TransactionStatus::New.to_string()));

        let affected = match response {
            Some(response) => update(target)
                .set((
                    multibank_transactions::status.eq(status.to_string()),
                    multibank_transactions::gateway_response.eq(Some(response)),
                    multibank_transactions::updated_at.eq(Utc::now()),
                ))
                .execute(&mut conn)?,
            None => update(target)
                .set((
                    multibank_transactions::status.eq(status.to_string()),
                    multibank_transactions::updated_at.eq(Utc::now()),
                ))
                .execute(&mut conn)?,
        };

        Ok(affected > 0)
    }
}
