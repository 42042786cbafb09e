use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{delete, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain,
    infra::db::{
        postgres::{postgres_connection::PgPoolSquad, schema::categories},
        repositories::is_unique_violation,
    },
};
use domain::{
    entities::categories::{CategoryEntity, InsertCategoryEntity},
    repositories::categories::CategoryRepository,
    value_objects::insert_outcome::InsertOutcome,
};

pub struct CategoryPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CategoryPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CategoryRepository for CategoryPostgres {
    async fn list(&self) -> Result<Vec<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = categories::table
            .order(categories::name.asc())
            .select(CategoryEntity::as_select())
            .load::<CategoryEntity>(&mut conn)?;

        Ok(results)
    }

    async fn create(&self, name: String) -> Result<InsertOutcome<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(categories::table)
            .values(&InsertCategoryEntity { name })
            .returning(CategoryEntity::as_returning())
            .get_result::<CategoryEntity>(&mut conn);

        match result {
            Ok(category) => Ok(InsertOutcome::Inserted(category)),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Duplicate),
            Err(err) => Err(err.into()),
        }
    }

    async fn rename(&self, category_id: Uuid, name: String) -> Result<Option<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let category = update(categories::table.filter(categories::id.eq(category_id)))
            .set(categories::name.eq(name))
            .returning(CategoryEntity::as_returning())
            .get_result::<CategoryEntity>(&mut conn)
            .optional()?;

        Ok(category)
    }

    async fn delete(&self, category_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected =
            delete(categories::table.filter(categories::id.eq(category_id))).execute(&mut conn)?;

        Ok(affected > 0)
    }
}
