use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{comments, posts},
    },
};
use domain::{
    entities::comments::{CommentEntity, InsertCommentEntity},
    repositories::comments::CommentRepository,
    value_objects::pagination::Page,
};

pub struct CommentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CommentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CommentRepository for CommentPostgres {
    async fn create(&self, insert_comment_entity: InsertCommentEntity) -> Result<CommentEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let comment = conn.transaction::<CommentEntity, diesel::result::Error, _>(|conn| {
            let comment = insert_into(comments::table)
                .values(&insert_comment_entity)
                .returning(CommentEntity::as_returning())
                .get_result::<CommentEntity>(conn)?;

            update(posts::table.filter(posts::id.eq(comment.post_id)))
                .set((
                    posts::comment_count.eq(posts::comment_count + 1),
                    posts::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;

            Ok(comment)
        })?;

        Ok(comment)
    }

    async fn find_by_id(&self, comment_id: Uuid) -> Result<Option<CommentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let comment = comments::table
            .filter(comments::id.eq(comment_id))
            .select(CommentEntity::as_select())
            .first::<CommentEntity>(&mut conn)
            .optional()?;

        Ok(comment)
    }

    async fn list_top_level(&self, post_id: Uuid, page: Page) -> Result<Vec<CommentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = comments::table
            .filter(comments::post_id.eq(post_id))
            .filter(comments::parent_id.is_null())
            .order(comments::created_at.desc())
            .limit(page.limit)
            .offset(page.offset)
            .select(CommentEntity::as_select())
            .load::<CommentEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_replies(&self, parent_id: Uuid, page: Page) -> Result<Vec<CommentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = comments::table
            .filter(comments::parent_id.eq(parent_id))
            .order(comments::created_at.asc())
            .limit(page.limit)
            .offset(page.offset)
            .select(CommentEntity::as_select())
            .load::<CommentEntity>(&mut conn)?;

        Ok(results)
    }
}
