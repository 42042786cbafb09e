use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::transactions::{InsertTransactionEntity, TransactionEntity},
    value_objects::enums::transaction_statuses::TransactionStatus,
};

#[automock]
#[async_trait]
pub trait TransactionRepository {
    async fn create(
        &self,
        insert_transaction_entity: InsertTransactionEntity,
    ) -> Result<TransactionEntity>;

    async fn find_by_id(&self, transaction_id: Uuid) -> Result<Option<TransactionEntity>>;

    async fn record_gateway_reference(
        &self,
        transaction_id: Uuid,
        external_transaction_id: Option<String>,
        otp_hash: Option<String>,
        response: serde_json::Value,
    ) -> Result<()>;

    /// Moves a `new` transaction to a terminal status. Returns `false` when the
    /// transaction had already left `new`.
    async fn finalize(
        &self,
        transaction_id: Uuid,
        status: TransactionStatus,
        response: Option<serde_json::Value>,
    ) -> Result<bool>;
}
