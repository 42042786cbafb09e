use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{dsl::count, insert_into, pg::Pg, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain,
    infra::db::{
        postgres::{
            postgres_connection::PgPoolSquad,
            schema::{user_follows, users},
        },
        repositories::is_unique_violation,
    },
};
use domain::{
    entities::users::{InsertUserEntity, UpdateUserEntity, UserEntity},
    repositories::users::UserRepository,
    value_objects::{
        insert_outcome::InsertOutcome,
        users::{AdminCreatorFilter, CreatorSearchFilter, CreatorSummary},
    },
};

pub struct UserPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn visible_creators<'a>() -> users::BoxedQuery<'a, Pg> {
    users::table
        .filter(users::is_creator.eq(true))
        .filter(users::is_deleted.eq(false))
        .filter(users::is_blocked_by_admin.eq(false))
        .into_boxed()
}

fn follower_counts(conn: &mut PgConnection, ids: &[Uuid]) -> QueryResult<HashMap<Uuid, i64>> {
    let rows = user_follows::table
        .filter(user_follows::following_id.eq_any(ids))
        .group_by(user_follows::following_id)
        .select((user_follows::following_id, count(user_follows::follower_id)))
        .load::<(Uuid, i64)>(conn)?;

    Ok(rows.into_iter().collect())
}

fn summarize(users: Vec<UserEntity>, counts: &HashMap<Uuid, i64>) -> Vec<CreatorSummary> {
    users
        .into_iter()
        .map(|user| CreatorSummary {
            follower_count: counts.get(&user.id).copied().unwrap_or(0),
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            profile_photo_id: user.profile_photo_id,
            category_id: user.category_id,
        })
        .collect()
}

fn admin_creator_query<'a>(filter: &AdminCreatorFilter) -> users::BoxedQuery<'a, Pg> {
    let mut query = users::table
        .filter(users::is_creator.eq(true))
        .filter(users::is_deleted.eq(false))
        .into_boxed();

    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        query = query.filter(
            users::username
                .ilike(pattern.clone())
                .or(users::full_name.ilike(pattern.clone()))
                .or(users::phone_number.ilike(pattern)),
        );
    }
    if let Some(category_id) = filter.category_id {
        query = query.filter(users::category_id.eq(category_id));
    }
    if let Some(from) = filter.created_from {
        query = query.filter(users::created_at.ge(from));
    }
    if let Some(to) = filter.created_to {
        query = query.filter(users::created_at.le(to));
    }
    if let Some(is_blocked) = filter.is_blocked {
        query = query.filter(users::is_blocked_by_admin.eq(is_blocked));
    }

    query
}

#[async_trait]
impl UserRepository for UserPostgres {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let user = users::table
            .filter(users::id.eq(user_id))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(user)
    }

    async fn find_by_phone(&self, phone_number: String) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let user = users::table
            .filter(users::phone_number.eq(phone_number))
            .filter(users::is_deleted.eq(false))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(user)
    }

    async fn create(&self, insert_user_entity: InsertUserEntity) -> Result<UserEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let user = insert_into(users::table)
            .values(&insert_user_entity)
            .returning(UserEntity::as_returning())
            .get_result::<UserEntity>(&mut conn)?;

        Ok(user)
    }

    async fn record_login(&self, user_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();

        update(users::table.filter(users::id.eq(user_id)))
            .set((
                users::last_login.eq(Some(now)),
                users::sms_verified.eq(true),
                users::is_active.eq(true),
                users::updated_at.eq(now),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: UpdateUserEntity,
    ) -> Result<InsertOutcome<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(users::table.filter(users::id.eq(user_id)))
            .set(&changes)
            .returning(UserEntity::as_returning())
            .get_result::<UserEntity>(&mut conn);

        match result {
            Ok(user) => Ok(InsertOutcome::Inserted(user)),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Duplicate),
            Err(err) => Err(err.into()),
        }
    }

    async fn set_pinfl(&self, user_id: Uuid, pinfl: String) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(users::table.filter(users::id.eq(user_id)))
            .set((users::pinfl.eq(Some(pinfl)), users::updated_at.eq(Utc::now())))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn attach_multibank_account(&self, user_id: Uuid, account: String) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(users::table.filter(users::id.eq(user_id)))
            .set((
                users::multibank_account.eq(Some(account)),
                users::multibank_verified.eq(true),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn become_creator(&self, user_id: Uuid) -> Result<UserEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let user = update(users::table.filter(users::id.eq(user_id)))
            .set((users::is_creator.eq(true), users::updated_at.eq(Utc::now())))
            .returning(UserEntity::as_returning())
            .get_result::<UserEntity>(&mut conn)?;

        Ok(user)
    }

    async fn soft_delete(&self, user_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(users::table.filter(users::id.eq(user_id)))
            .set((
                users::temp_phone_number.eq(users::phone_number.nullable()),
                users::temp_username.eq(users::username),
                users::phone_number.eq(format!("deleted:{user_id}")),
                users::username.eq(None::<String>),
                users::is_deleted.eq(true),
                users::is_active.eq(false),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn block_by_admin(&self, user_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(
            users::table
                .filter(users::id.eq(user_id))
                .filter(users::is_blocked_by_admin.eq(false)),
        )
        .set((
            users::temp_phone_number.eq(users::phone_number.nullable()),
            users::temp_username.eq(users::username),
            users::phone_number.eq(format!("blocked:{user_id}")),
            users::username.eq(None::<String>),
            users::is_blocked_by_admin.eq(true),
            users::is_active.eq(false),
            users::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)?;

        Ok(())
    }

    async fn update_sapi_share(&self, user_id: Uuid, sapi_share: i32) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(users::table.filter(users::id.eq(user_id)))
            .set((users::sapi_share.eq(sapi_share), users::updated_at.eq(Utc::now())))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn popular_creators(
        &self,
        category_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<CreatorSummary>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = visible_creators();
        if let Some(category_id) = category_id {
            query = query.filter(users::category_id.eq(category_id));
        }
        let creators = query
            .select(UserEntity::as_select())
            .load::<UserEntity>(&mut conn)?;

        let ids: Vec<Uuid> = creators.iter().map(|user| user.id).collect();
        let counts = follower_counts(&mut conn, &ids)?;

        let mut summaries = summarize(creators, &counts);
        summaries.sort_by(|a, b| b.follower_count.cmp(&a.follower_count));
        summaries.truncate(limit.max(0) as usize);

        Ok(summaries)
    }

    async fn search_creators(&self, filter: CreatorSearchFilter) -> Result<Vec<CreatorSummary>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = visible_creators();
        if let Some(text) = filter.query.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{text}%");
            query = query.filter(
                users::username
                    .ilike(pattern.clone())
                    .or(users::full_name.ilike(pattern)),
            );
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(users::category_id.eq(category_id));
        }

        let creators = query
            .order(users::username.asc())
            .limit(filter.page.limit)
            .offset(filter.page.offset)
            .select(UserEntity::as_select())
            .load::<UserEntity>(&mut conn)?;

        let ids: Vec<Uuid> = creators.iter().map(|user| user.id).collect();
        let counts = follower_counts(&mut conn, &ids)?;

        Ok(summarize(creators, &counts))
    }

    async fn list_creators(&self, filter: AdminCreatorFilter) -> Result<(Vec<UserEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = admin_creator_query(&filter)
            .count()
            .get_result::<i64>(&mut conn)?;

        let creators = admin_creator_query(&filter)
            .order(users::created_at.desc())
            .limit(filter.page.limit)
            .offset(filter.page.offset)
            .select(UserEntity::as_select())
            .load::<UserEntity>(&mut conn)?;

        Ok((creators, total))
    }
}
