use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::sms_confirmations::{InsertSmsConfirmationEntity, SmsConfirmationEntity},
    value_objects::enums::sms_purposes::SmsPurpose,
};

#[automock]
#[async_trait]
pub trait SmsConfirmationRepository {
    async fn latest_for_phone(
        &self,
        phone_number: String,
        purpose: SmsPurpose,
    ) -> Result<Option<SmsConfirmationEntity>>;

    async fn create(
        &self,
        insert_sms_confirmation_entity: InsertSmsConfirmationEntity,
    ) -> Result<SmsConfirmationEntity>;

    /// Latest unused code matching phone and code, regardless of expiry.
    async fn find_unused(
        &self,
        phone_number: String,
        code: String,
        purpose: SmsPurpose,
    ) -> Result<Option<SmsConfirmationEntity>>;

    async fn mark_used(&self, confirmation_id: Uuid) -> Result<()>;
}
