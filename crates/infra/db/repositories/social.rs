use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{delete, dsl::exists, insert_into, prelude::*, select};
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{blocked_users, user_follows},
    },
};
use domain::{
    entities::{blocks::InsertBlockEntity, follows::InsertFollowEntity},
    repositories::social::SocialRepository,
    value_objects::insert_outcome::InsertOutcome,
};

pub struct SocialPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SocialPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SocialRepository for SocialPostgres {
    async fn is_following(&self, follower_id: Uuid, following_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let following = select(exists(
            user_follows::table
                .filter(user_follows::follower_id.eq(follower_id))
                .filter(user_follows::following_id.eq(following_id)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(following)
    }

    async fn follow(&self, follower_id: Uuid, following_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(user_follows::table)
            .values(&InsertFollowEntity {
                follower_id,
                following_id,
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)?;

        Ok(())
    }

    async fn unfollow(&self, follower_id: Uuid, following_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        delete(
            user_follows::table
                .filter(user_follows::follower_id.eq(follower_id))
                .filter(user_follows::following_id.eq(following_id)),
        )
        .execute(&mut conn)?;

        Ok(())
    }

    async fn is_blocked(&self, blocker_id: Uuid, blocked_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let blocked = select(exists(
            blocked_users::table
                .filter(blocked_users::blocker_id.eq(blocker_id))
                .filter(blocked_users::blocked_id.eq(blocked_id)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(blocked)
    }

    async fn is_blocked_between(&self, first: Uuid, second: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let blocked = select(exists(
            blocked_users::table.filter(
                blocked_users::blocker_id
                    .eq(first)
                    .and(blocked_users::blocked_id.eq(second))
                    .or(blocked_users::blocker_id
                        .eq(second)
                        .and(blocked_users::blocked_id.eq(first))),
            ),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(blocked)
    }

    async fn block(&self, blocker_id: Uuid, blocked_id: Uuid) -> Result<InsertOutcome<()>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let inserted = insert_into(blocked_users::table)
            .values(&InsertBlockEntity {
                blocker_id,
                blocked_id,
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)?;

        if inserted == 0 {
            return Ok(InsertOutcome::Duplicate);
        }

        Ok(InsertOutcome::Inserted(()))
    }

    async fn unblock(&self, blocker_id: Uuid, blocked_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        delete(
            blocked_users::table
                .filter(blocked_users::blocker_id.eq(blocker_id))
                .filter(blocked_users::blocked_id.eq(blocked_id)),
        )
        .execute(&mut conn)?;

        Ok(())
    }

    async fn follow_counts(&self, user_id: Uuid) -> Result<(i64, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let followers = user_follows::table
            .filter(user_follows::following_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)?;
        let following = user_follows::table
            .filter(user_follows::follower_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok((followers, following))
    }

    async fn following_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let ids = user_follows::table
            .filter(user_follows::follower_id.eq(user_id))
            .select(user_follows::following_id)
            .load::<Uuid>(&mut conn)?;

        Ok(ids)
    }

    async fn blocked_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let ids = blocked_users::table
            .filter(blocked_users::blocker_id.eq(user_id))
            .select(blocked_users::blocked_id)
            .load::<Uuid>(&mut conn)?;

        Ok(ids)
    }

    async fn follow_timestamps_since(
        &self,
        creator_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let timestamps = user_follows::table
            .filter(user_follows::following_id.eq(creator_id))
            .filter(user_follows::created_at.ge(since))
            .select(user_follows::created_at)
            .load::<DateTime<Utc>>(&mut conn)?;

        Ok(timestamps)
    }
}
