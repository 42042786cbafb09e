use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{delete, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{comments, likes, posts},
    },
};
use domain::{entities::likes::InsertLikeEntity, repositories::likes::LikeRepository};

pub struct LikePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl LikePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl LikeRepository for LikePostgres {
    async fn toggle_post_like(&self, user_id: Uuid, post_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let liked = conn.transaction::<bool, diesel::result::Error, _>(|conn| {
            let removed = delete(
                likes::table
                    .filter(likes::user_id.eq(user_id))
                    .filter(likes::post_id.eq(post_id)),
            )
            .execute(conn)?;

            if removed > 0 {
                update(posts::table.filter(posts::id.eq(post_id)))
                    .set(posts::like_count.eq(posts::like_count - 1))
                    .execute(conn)?;
                return Ok(false);
            }

            insert_into(likes::table)
                .values(&InsertLikeEntity {
                    user_id,
                    post_id: Some(post_id),
                    comment_id: None,
                })
                .execute(conn)?;
            update(posts::table.filter(posts::id.eq(post_id)))
                .set(posts::like_count.eq(posts::like_count + 1))
                .execute(conn)?;

            Ok(true)
        })?;

        Ok(liked)
    }

    async fn toggle_comment_like(&self, user_id: Uuid, comment_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let liked = conn.transaction::<bool, diesel::result::Error, _>(|conn| {
            let removed = delete(
                likes::table
                    .filter(likes::user_id.eq(user_id))
                    .filter(likes::comment_id.eq(comment_id)),
            )
            .execute(conn)?;

            if removed > 0 {
                update(comments::table.filter(comments::id.eq(comment_id)))
                    .set(comments::like_count.eq(comments::like_count - 1))
                    .execute(conn)?;
                return Ok(false);
            }

            insert_into(likes::table)
                .values(&InsertLikeEntity {
                    user_id,
                    post_id: None,
                    comment_id: Some(comment_id),
                })
                .execute(conn)?;
            update(comments::table.filter(comments::id.eq(comment_id)))
                .set(comments::like_count.eq(comments::like_count + 1))
                .execute(conn)?;

            Ok(true)
        })?;

        Ok(liked)
    }
}
