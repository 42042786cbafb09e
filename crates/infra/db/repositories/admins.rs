use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{delete, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain,
    infra::db::{
        postgres::{
            postgres_connection::PgPoolSquad,
            schema::{admin_permissions, users},
        },
        repositories::is_unique_violation,
    },
};
use domain::{
    entities::{
        admin_permissions::InsertAdminPermissionEntity,
        users::{InsertUserEntity, UpdateUserEntity, UserEntity},
    },
    repositories::admins::AdminRepository,
    value_objects::insert_outcome::InsertOutcome,
};

pub struct AdminPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl AdminPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn grant(conn: &mut PgConnection, user_id: Uuid, permissions: &[String]) -> QueryResult<()> {
    let rows: Vec<InsertAdminPermissionEntity> = permissions
        .iter()
        .map(|permission| InsertAdminPermissionEntity {
            user_id,
            permission: permission.clone(),
        })
        .collect();

    if !rows.is_empty() {
        insert_into(admin_permissions::table)
            .values(&rows)
            .on_conflict_do_nothing()
            .execute(conn)?;
    }

    Ok(())
}

#[async_trait]
impl AdminRepository for AdminPostgres {
    async fn permissions_for(&self, user_id: Uuid) -> Result<Vec<String>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let permissions = admin_permissions::table
            .filter(admin_permissions::user_id.eq(user_id))
            .order(admin_permissions::permission.asc())
            .select(admin_permissions::permission)
            .load::<String>(&mut conn)?;

        Ok(permissions)
    }

    async fn list_admins(&self) -> Result<Vec<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let admins = users::table
            .filter(users::is_admin.eq(true))
            .filter(users::is_deleted.eq(false))
            .order(users::created_at.asc())
            .select(UserEntity::as_select())
            .load::<UserEntity>(&mut conn)?;

        Ok(admins)
    }

    async fn create_admin(
        &self,
        insert_user_entity: InsertUserEntity,
        permissions: Vec<String>,
    ) -> Result<InsertOutcome<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<UserEntity, diesel::result::Error, _>(|conn| {
            let admin = insert_into(users::table)
                .values(&insert_user_entity)
                .returning(UserEntity::as_returning())
                .get_result::<UserEntity>(conn)?;

            grant(conn, admin.id, &permissions)?;

            Ok(admin)
        });

        match result {
            Ok(admin) => Ok(InsertOutcome::Inserted(admin)),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Duplicate),
            Err(err) => Err(err.into()),
        }
    }

    async fn update_admin(
        &self,
        user_id: Uuid,
        changes: UpdateUserEntity,
        permissions: Option<Vec<String>>,
    ) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let admin = conn.transaction::<Option<UserEntity>, diesel::result::Error, _>(|conn| {
            let admin = update(
                users::table
                    .filter(users::id.eq(user_id))
                    .filter(users::is_admin.eq(true))
                    .filter(users::is_deleted.eq(false)),
            )
            .set(&changes)
            .returning(UserEntity::as_returning())
            .get_result::<UserEntity>(conn)
            .optional()?;

            if let (Some(admin), Some(permissions)) = (admin.as_ref(), permissions.as_ref()) {
                delete(admin_permissions::table.filter(admin_permissions::user_id.eq(admin.id)))
                    .execute(conn)?;
                grant(conn, admin.id, permissions)?;
            }

            Ok(admin)
        })?;

        Ok(admin)
    }

    async fn delete_admin(&self, user_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = conn.transaction::<bool, diesel::result::Error, _>(|conn| {
            let affected = update(
                users::table
                    .filter(users::id.eq(user_id))
                    .filter(users::is_admin.eq(true))
                    .filter(users::is_deleted.eq(false)),
            )
            .set((
                users::temp_phone_number.eq(users::phone_number.nullable()),
                users::phone_number.eq(format!("deleted:{user_id}")),
                users::is_deleted.eq(true),
                users::is_active.eq(false),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;

            if affected > 0 {
                delete(admin_permissions::table.filter(admin_permissions::user_id.eq(user_id)))
                    .execute(conn)?;
            }

            Ok(affected > 0)
        })?;

        Ok(deleted)
    }
}
