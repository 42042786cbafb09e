use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{insert_into, prelude::*};
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::user_activities},
};
use domain::{
    entities::activities::{ActivityEntity, InsertActivityEntity},
    repositories::activities::ActivityRepository,
    value_objects::pagination::Page,
};

pub struct ActivityPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ActivityPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ActivityRepository for ActivityPostgres {
    async fn create(&self, insert_activity_entity: InsertActivityEntity) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(user_activities::table)
            .values(&insert_activity_entity)
            .execute(&mut conn)?;

        Ok(())
    }

    async fn list_for_owner(&self, owner_id: Uuid, page: Page) -> Result<Vec<ActivityEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let activities = user_activities::table
            .filter(user_activities::content_owner_id.eq(owner_id))
            .order(user_activities::created_at.desc())
            .limit(page.limit)
            .offset(page.offset)
            .select(ActivityEntity::as_select())
            .load::<ActivityEntity>(&mut conn)?;

        Ok(activities)
    }
}
