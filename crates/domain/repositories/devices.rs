use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::devices::{DeviceEntity, InsertDeviceEntity},
    value_objects::enums::user_types::UserType,
};

#[automock]
#[async_trait]
pub trait DeviceRepository {
    /// A token re-registered by another account moves to that account.
    async fn upsert(&self, insert_device_entity: InsertDeviceEntity) -> Result<DeviceEntity>;

    async fn tokens_for_user(&self, user_id: Uuid) -> Result<Vec<String>>;

    async fn tokens_for_user_type(&self, user_type: UserType) -> Result<Vec<String>>;

    async fn remove_token(&self, registration_token: String) -> Result<()>;
}
