use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::donations::{DonationEntity, InsertDonationEntity};

#[automock]
#[async_trait]
pub trait DonationRepository {
    async fn create(&self, insert_donation_entity: InsertDonationEntity) -> Result<DonationEntity>;

    async fn find_by_transaction(&self, transaction_id: Uuid) -> Result<Option<DonationEntity>>;
}
