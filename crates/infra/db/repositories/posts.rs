use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{delete, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain,
    infra::db::{
        postgres::{
            postgres_connection::PgPoolSquad,
            schema::{answer_options, likes, post_answers, posts, saved_posts, users},
        },
        repositories::is_unique_violation,
    },
};
use domain::{
    entities::{
        answer_options::{
            AnswerOptionEntity, InsertAnswerOptionEntity, InsertPostAnswerEntity, PostAnswerEntity,
        },
        posts::{InsertPostEntity, InsertSavedPostEntity, PostEntity, UpdatePostAccessEntity},
    },
    repositories::posts::PostRepository,
    value_objects::{
        insert_outcome::InsertOutcome,
        pagination::Page,
        posts::{AnswerOptionDraft, PostListFilter},
    },
};

pub struct PostPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PostPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PostRepository for PostPostgres {
    async fn create(
        &self,
        insert_post_entity: InsertPostEntity,
        options: Vec<AnswerOptionDraft>,
    ) -> Result<PostEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let post = conn.transaction::<PostEntity, diesel::result::Error, _>(|conn| {
            let post = insert_into(posts::table)
                .values(&insert_post_entity)
                .returning(PostEntity::as_returning())
                .get_result::<PostEntity>(conn)?;

            if !options.is_empty() {
                let rows: Vec<InsertAnswerOptionEntity> = options
                    .iter()
                    .map(|option| InsertAnswerOptionEntity {
                        post_id: post.id,
                        text: option.text.clone(),
                        is_correct: option.is_correct,
                    })
                    .collect();

                insert_into(answer_options::table)
                    .values(&rows)
                    .execute(conn)?;
            }

            Ok(post)
        })?;

        Ok(post)
    }

    async fn find_by_id(&self, post_id: Uuid) -> Result<Option<PostEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let post = posts::table
            .filter(posts::id.eq(post_id))
            .filter(posts::is_deleted.eq(false))
            .select(PostEntity::as_select())
            .first::<PostEntity>(&mut conn)
            .optional()?;

        Ok(post)
    }

    async fn update_access(
        &self,
        post_id: Uuid,
        changes: UpdatePostAccessEntity,
    ) -> Result<PostEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let post = update(posts::table.filter(posts::id.eq(post_id)))
            .set(&changes)
            .returning(PostEntity::as_returning())
            .get_result::<PostEntity>(&mut conn)?;

        Ok(post)
    }

    async fn soft_delete(&self, post_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(posts::table.filter(posts::id.eq(post_id)))
            .set((posts::is_deleted.eq(true), posts::updated_at.eq(Utc::now())))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn list_published(
        &self,
        filter: PostListFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<PostEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let active_authors = users::table
            .filter(users::is_blocked_by_admin.eq(false))
            .filter(users::is_deleted.eq(false))
            .select(users::id);

        let mut query = posts::table
            .filter(posts::is_posted.eq(true))
            .filter(posts::is_deleted.eq(false))
            .filter(posts::is_blocked.eq(false))
            .filter(
                posts::publication_time
                    .is_null()
                    .or(posts::publication_time.le(now)),
            )
            .filter(posts::creator_id.eq_any(active_authors))
            .into_boxed();

        if let Some(category_id) = filter.category_id {
            query = query.filter(posts::category_id.eq(category_id));
        }
        if let Some(creator_id) = filter.creator_id {
            query = query.filter(posts::creator_id.eq(creator_id));
        }
        if let Some(creator_ids) = filter.creator_ids {
            query = query.filter(posts::creator_id.eq_any(creator_ids));
        }
        if let Some(post_type) = filter.post_type {
            query = query.filter(posts::post_type.eq(post_type));
        }

        let results = query
            .order(posts::created_at.desc())
            .limit(filter.page.limit)
            .offset(filter.page.offset)
            .select(PostEntity::as_select())
            .load::<PostEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_options(&self, post_id: Uuid) -> Result<Vec<AnswerOptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let options = answer_options::table
            .filter(answer_options::post_id.eq(post_id))
            .select(AnswerOptionEntity::as_select())
            .load::<AnswerOptionEntity>(&mut conn)?;

        Ok(options)
    }

    async fn save_answer(
        &self,
        insert_post_answer_entity: InsertPostAnswerEntity,
    ) -> Result<InsertOutcome<PostAnswerEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(post_answers::table)
            .values(&insert_post_answer_entity)
            .returning(PostAnswerEntity::as_returning())
            .get_result::<PostAnswerEntity>(&mut conn);

        match result {
            Ok(answer) => Ok(InsertOutcome::Inserted(answer)),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Duplicate),
            Err(err) => Err(err.into()),
        }
    }

    async fn set_blocked(&self, post_id: Uuid, blocked: bool) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(posts::table.filter(posts::id.eq(post_id)))
            .set((posts::is_blocked.eq(blocked), posts::updated_at.eq(Utc::now())))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn liked_post_ids(&self, user_id: Uuid, post_ids: Vec<Uuid>) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let ids = likes::table
            .filter(likes::user_id.eq(user_id))
            .filter(likes::post_id.eq_any(post_ids))
            .select(likes::post_id)
            .load::<Option<Uuid>>(&mut conn)?;

        Ok(ids.into_iter().flatten().collect())
    }

    async fn saved_post_ids(&self, user_id: Uuid, post_ids: Vec<Uuid>) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let ids = saved_posts::table
            .filter(saved_posts::user_id.eq(user_id))
            .filter(saved_posts::post_id.eq_any(post_ids))
            .select(saved_posts::post_id)
            .load::<Uuid>(&mut conn)?;

        Ok(ids)
    }

    async fn list_liked(&self, user_id: Uuid, page: Page) -> Result<Vec<PostEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = likes::table
            .inner_join(posts::table.on(likes::post_id.eq(posts::id.nullable())))
            .filter(likes::user_id.eq(user_id))
            .filter(posts::is_deleted.eq(false))
            .filter(posts::is_blocked.eq(false))
            .order(likes::created_at.desc())
            .limit(page.limit)
            .offset(page.offset)
            .select(PostEntity::as_select())
            .load::<PostEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_saved(&self, user_id: Uuid, page: Page) -> Result<Vec<PostEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = saved_posts::table
            .inner_join(posts::table.on(saved_posts::post_id.eq(posts::id)))
            .filter(saved_posts::user_id.eq(user_id))
            .filter(posts::is_deleted.eq(false))
            .filter(posts::is_blocked.eq(false))
            .order(saved_posts::saved_at.desc())
            .limit(page.limit)
            .offset(page.offset)
            .select(PostEntity::as_select())
            .load::<PostEntity>(&mut conn)?;

        Ok(results)
    }

    async fn toggle_save(&self, user_id: Uuid, post_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let saved = conn.transaction::<bool, diesel::result::Error, _>(|conn| {
            let removed = delete(
                saved_posts::table
                    .filter(saved_posts::user_id.eq(user_id))
                    .filter(saved_posts::post_id.eq(post_id)),
            )
            .execute(conn)?;

            if removed > 0 {
                return Ok(false);
            }

            insert_into(saved_posts::table)
                .values(&InsertSavedPostEntity { user_id, post_id })
                .execute(conn)?;

            Ok(true)
        })?;

        Ok(saved)
    }
}
