use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{delete, insert_into, prelude::*};
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::files},
};
use domain::{
    entities::files::{FileEntity, InsertFileEntity},
    repositories::files::FileRepository,
};

pub struct FilePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl FilePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl FileRepository for FilePostgres {
    async fn create(&self, insert_file_entity: InsertFileEntity) -> Result<FileEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let file = insert_into(files::table)
            .values(&insert_file_entity)
            .returning(FileEntity::as_returning())
            .get_result::<FileEntity>(&mut conn)?;

        Ok(file)
    }

    async fn find_by_id(&self, file_id: Uuid) -> Result<Option<FileEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let file = files::table
            .filter(files::id.eq(file_id))
            .select(FileEntity::as_select())
            .first::<FileEntity>(&mut conn)
            .optional()?;

        Ok(file)
    }

    async fn delete(&self, file_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        delete(files::table.filter(files::id.eq(file_id))).execute(&mut conn)?;

        Ok(())
    }
}
