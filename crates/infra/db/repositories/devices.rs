use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{delete, insert_into, prelude::*};
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{devices, users},
    },
};
use domain::{
    entities::devices::{DeviceEntity, InsertDeviceEntity},
    repositories::devices::DeviceRepository,
    value_objects::enums::user_types::UserType,
};

pub struct DevicePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl DevicePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl DeviceRepository for DevicePostgres {
    async fn upsert(&self, insert_device_entity: InsertDeviceEntity) -> Result<DeviceEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let device = insert_into(devices::table)
            .values(&insert_device_entity)
            .on_conflict(devices::registration_token)
            .do_update()
            .set((
                devices::user_id.eq(insert_device_entity.user_id),
                devices::device_type.eq(&insert_device_entity.device_type),
                devices::updated_at.eq(Utc::now()),
            ))
            .returning(DeviceEntity::as_returning())
            .get_result::<DeviceEntity>(&mut conn)?;

        Ok(device)
    }

    async fn tokens_for_user(&self, user_id: Uuid) -> Result<Vec<String>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let tokens = devices::table
            .filter(devices::user_id.eq(user_id))
            .select(devices::registration_token)
            .load::<String>(&mut conn)?;

        Ok(tokens)
    }

    async fn tokens_for_user_type(&self, user_type: UserType) -> Result<Vec<String>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = devices::table
            .inner_join(users::table)
            .filter(users::is_active.eq(true))
            .filter(users::is_deleted.eq(false))
            .select(devices::registration_token)
            .into_boxed();
        if let Some(is_creator) = user_type.creator_filter() {
            query = query.filter(users::is_creator.eq(is_creator));
        }

        let tokens = query.load::<String>(&mut conn)?;

        Ok(tokens)
    }

    async fn remove_token(&self, registration_token: String) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        delete(devices::table.filter(devices::registration_token.eq(registration_token)))
            .execute(&mut conn)?;

        Ok(())
    }
}
