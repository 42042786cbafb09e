use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use crates::domain::{
    entities::{
        categories::CategoryEntity,
        posts::{InsertPostEntity, PostEntity, UpdatePostAccessEntity},
        users::UserEntity,
    },
    repositories::{
        categories::CategoryRepository, plans::PlanRepository, posts::PostRepository,
        social::SocialRepository, subscriptions::SubscriptionRepository, users::UserRepository,
    },
    value_objects::{
        enums::{post_types::PostType, report_types::ReportType},
        insert_outcome::InsertOutcome,
        pagination::Page,
        posts::{AnswerOptionDraft, PostDto, PostListFilter},
        visibility::{PostAccess, RequiredPlan, can_view},
    },
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostModel {
    pub category_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub post_type: PostType,
    #[serde(default)]
    pub file_ids: Vec<Uuid>,
    #[serde(default)]
    pub is_premium: bool,
    pub subscription_plan_id: Option<Uuid>,
    #[serde(default = "posted_by_default")]
    pub is_posted: bool,
    pub publication_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub options: Vec<AnswerOptionDraft>,
}

fn posted_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAccessModel {
    pub is_premium: bool,
    pub subscription_plan_id: Option<Uuid>,
    pub is_posted: bool,
    pub publication_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostQuery {
    pub post_type: Option<PostType>,
}

/// A selectable `{code, name}` pair for post and report types.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChoiceDto {
    pub code: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceKind {
    Post,
    Report,
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("only creators can publish posts")]
    NotCreator,
    #[error("admin rights required")]
    NotAdmin,
    #[error("post not found")]
    PostNotFound,
    #[error("category not found")]
    CategoryNotFound,
    #[error("category already exists")]
    CategoryExists,
    #[error("category name must not be empty")]
    EmptyCategoryName,
    #[error("subscription plan not found")]
    PlanNotFound,
    #[error("a plan can only gate a premium post")]
    PlanWithoutPremium,
    #[error("a questionnaire needs at least two options")]
    NotEnoughOptions,
    #[error("only questionnaires have answer options")]
    UnexpectedOptions,
    #[error("post must have a title, description or file")]
    EmptyPost,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ContentError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ContentError::NotCreator | ContentError::NotAdmin => StatusCode::FORBIDDEN,
            ContentError::PostNotFound
            | ContentError::CategoryNotFound
            | ContentError::PlanNotFound => StatusCode::NOT_FOUND,
            ContentError::CategoryExists
            | ContentError::EmptyCategoryName
            | ContentError::PlanWithoutPremium
            | ContentError::NotEnoughOptions
            | ContentError::UnexpectedOptions
            | ContentError::EmptyPost => StatusCode::BAD_REQUEST,
            ContentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, ContentError>;

pub fn choices(kind: ChoiceKind) -> Vec<ChoiceDto> {
    match kind {
        ChoiceKind::Post => PostType::ALL
            .iter()
            .map(|post_type| ChoiceDto {
                code: post_type.as_str(),
                name: post_type.label(),
            })
            .collect(),
        ChoiceKind::Report => ReportType::ALL
            .iter()
            .map(|report_type| ChoiceDto {
                code: report_type.as_str(),
                name: report_type.label(),
            })
            .collect(),
    }
}

pub struct ContentUseCase<U, P, Pl, S, So, C>
where
    U: UserRepository + Send + Sync + 'static,
    P: PostRepository + Send + Sync + 'static,
    Pl: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    So: SocialRepository + Send + Sync + 'static,
    C: CategoryRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    post_repo: Arc<P>,
    plan_repo: Arc<Pl>,
    subscription_repo: Arc<S>,
    social_repo: Arc<So>,
    category_repo: Arc<C>,
}

impl<U, P, Pl, S, So, C> ContentUseCase<U, P, Pl, S, So, C>
where
    U: UserRepository + Send + Sync + 'static,
    P: PostRepository + Send + Sync + 'static,
    Pl: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    So: SocialRepository + Send + Sync + 'static,
    C: CategoryRepository + Send + Sync + 'static,
{
    pub fn new(
        user_repo: Arc<U>,
        post_repo: Arc<P>,
        plan_repo: Arc<Pl>,
        subscription_repo: Arc<S>,
        social_repo: Arc<So>,
        category_repo: Arc<C>,
    ) -> Self {
        Self {
            user_repo,
            post_repo,
            plan_repo,
            subscription_repo,
            social_repo,
            category_repo,
        }
    }

    async fn load_user(&self, user_id: Uuid) -> UseCaseResult<Option<UserEntity>> {
        self.user_repo.find_by_id(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "content: failed to load user");
            ContentError::Internal(err)
        })
    }

    async fn ensure_creator(&self, user_id: Uuid) -> UseCaseResult<()> {
        match self.load_user(user_id).await? {
            Some(user) if user.is_creator && !user.is_deleted && !user.is_blocked_by_admin => Ok(()),
            _ => Err(ContentError::NotCreator),
        }
    }

    async fn ensure_admin(&self, user_id: Uuid) -> UseCaseResult<()> {
        match self.load_user(user_id).await? {
            Some(user) if user.is_admin && !user.is_deleted => Ok(()),
            _ => Err(ContentError::NotAdmin),
        }
    }

    async fn owned_post(&self, creator_id: Uuid, post_id: Uuid) -> UseCaseResult<PostEntity> {
        self.post_repo
            .find_by_id(post_id)
            .await
            .map_err(|err| {
                error!(%post_id, db_error = ?err, "content: failed to load post");
                ContentError::Internal(err)
            })?
            .filter(|post| post.creator_id == creator_id && !post.is_deleted)
            .ok_or(ContentError::PostNotFound)
    }

    async fn check_plan(
        &self,
        creator_id: Uuid,
        is_premium: bool,
        plan_id: Option<Uuid>,
    ) -> UseCaseResult<()> {
        let Some(plan_id) = plan_id else {
            return Ok(());
        };
        if !is_premium {
            return Err(ContentError::PlanWithoutPremium);
        }
        self.plan_repo
            .find_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "content: failed to load plan");
                ContentError::Internal(err)
            })?
            .filter(|plan| plan.creator_id == creator_id)
            .map(|_| ())
            .ok_or(ContentError::PlanNotFound)
    }

    /// Evaluates visibility and per-viewer flags for a batch of posts.
    async fn decorate(
        &self,
        viewer_id: Option<Uuid>,
        posts: Vec<PostEntity>,
    ) -> UseCaseResult<Vec<PostDto>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }
        let now = Utc::now();
        let post_ids: Vec<Uuid> = posts.iter().map(|post| post.id).collect();

        let (liked, saved) = match viewer_id {
            Some(viewer_id) => {
                let liked = self
                    .post_repo
                    .liked_post_ids(viewer_id, post_ids.clone())
                    .await
                    .map_err(ContentError::Internal)?;
                let saved = self
                    .post_repo
                    .saved_post_ids(viewer_id, post_ids)
                    .await
                    .map_err(ContentError::Internal)?;
                (liked, saved)
            }
            None => (Vec::new(), Vec::new()),
        };

        let mut prices_by_creator: HashMap<Uuid, Vec<i64>> = HashMap::new();
        let mut plan_prices: HashMap<Uuid, Option<i64>> = HashMap::new();
        let mut dtos = Vec::with_capacity(posts.len());

        for post in posts {
            let visible = if !post.is_premium {
                true
            } else {
                let required_price = match post.subscription_plan_id {
                    Some(plan_id) => match plan_prices.get(&plan_id) {
                        Some(price) => *price,
                        None => {
                            let price = self
                                .plan_repo
                                .find_by_id(plan_id)
                                .await
                                .map_err(ContentError::Internal)?
                                .map(|plan| plan.price);
                            plan_prices.insert(plan_id, price);
                            price
                        }
                    },
                    None => None,
                };
                let required_plan =
                    RequiredPlan::from_lookup(post.subscription_plan_id.is_some(), required_price);

                let active_prices = match viewer_id {
                    Some(viewer_id) if viewer_id != post.creator_id => {
                        match prices_by_creator.get(&post.creator_id) {
                            Some(prices) => prices.clone(),
                            None => {
                                let prices = self
                                    .subscription_repo
                                    .active_plan_prices(viewer_id, post.creator_id, now)
                                    .await
                                    .map_err(ContentError::Internal)?;
                                prices_by_creator.insert(post.creator_id, prices.clone());
                                prices
                            }
                        }
                    }
                    _ => Vec::new(),
                };

                can_view(
                    &PostAccess {
                        owner_id: post.creator_id,
                        is_premium: post.is_premium,
                        required_plan,
                    },
                    viewer_id,
                    &active_prices,
                )
            };

            let options = if visible && post.post_type == PostType::Questionnaire.as_str() {
                self.post_repo
                    .list_options(post.id)
                    .await
                    .map_err(ContentError::Internal)?
            } else {
                Vec::new()
            };

            let is_liked = liked.contains(&post.id);
            let is_saved = saved.contains(&post.id);
            dtos.push(PostDto::build(post, visible, is_liked, is_saved, options));
        }

        Ok(dtos)
    }

    pub async fn create_post(
        &self,
        creator_id: Uuid,
        model: CreatePostModel,
    ) -> UseCaseResult<PostDto> {
        self.ensure_creator(creator_id).await?;

        let title = model.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        let description = model
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if title.is_none() && description.is_none() && model.file_ids.is_empty() {
            return Err(ContentError::EmptyPost);
        }

        match model.post_type {
            PostType::Questionnaire if model.options.len() < 2 => {
                return Err(ContentError::NotEnoughOptions);
            }
            PostType::Questionnaire => {}
            _ if !model.options.is_empty() => return Err(ContentError::UnexpectedOptions),
            _ => {}
        }

        self.check_plan(creator_id, model.is_premium, model.subscription_plan_id)
            .await?;

        let post = self
            .post_repo
            .create(
                InsertPostEntity {
                    creator_id,
                    category_id: model.category_id,
                    title,
                    description,
                    post_type: model.post_type.to_string(),
                    file_ids: model.file_ids,
                    is_premium: model.is_premium,
                    subscription_plan_id: model.subscription_plan_id,
                    is_posted: model.is_posted,
                    publication_time: model.publication_time,
                },
                model.options,
            )
            .await
            .map_err(|err| {
                error!(%creator_id, db_error = ?err, "content: failed to create post");
                ContentError::Internal(err)
            })?;

        info!(%creator_id, post_id = %post.id, post_type = %post.post_type, "content: post created");
        let options = self
            .post_repo
            .list_options(post.id)
            .await
            .map_err(ContentError::Internal)?;
        Ok(PostDto::build(post, true, false, false, options))
    }

    pub async fn update_access(
        &self,
        creator_id: Uuid,
        post_id: Uuid,
        model: UpdateAccessModel,
    ) -> UseCaseResult<PostDto> {
        self.owned_post(creator_id, post_id).await?;
        self.check_plan(creator_id, model.is_premium, model.subscription_plan_id)
            .await?;

        let post = self
            .post_repo
            .update_access(
                post_id,
                UpdatePostAccessEntity {
                    is_premium: model.is_premium,
                    subscription_plan_id: model.subscription_plan_id,
                    is_posted: model.is_posted,
                    publication_time: model.publication_time,
                    updated_at: Utc::now(),
                },
            )
            .await
            .map_err(|err| {
                error!(%post_id, db_error = ?err, "content: failed to update access");
                ContentError::Internal(err)
            })?;

        info!(%creator_id, %post_id, is_premium = post.is_premium, "content: post access updated");
        Ok(PostDto::build(post, true, false, false, Vec::new()))
    }

    pub async fn delete_post(&self, creator_id: Uuid, post_id: Uuid) -> UseCaseResult<()> {
        self.owned_post(creator_id, post_id).await?;
        self.post_repo.soft_delete(post_id).await.map_err(|err| {
            error!(%post_id, db_error = ?err, "content: failed to delete post");
            ContentError::Internal(err)
        })?;
        info!(%creator_id, %post_id, "content: post deleted");
        Ok(())
    }

    pub async fn post_detail(&self, viewer_id: Uuid, post_id: Uuid) -> UseCaseResult<PostDto> {
        let post = self
            .post_repo
            .find_by_id(post_id)
            .await
            .map_err(|err| {
                error!(%post_id, db_error = ?err, "content: failed to load post");
                ContentError::Internal(err)
            })?
            .filter(|post| post.creator_id == viewer_id || post.is_published(Utc::now()))
            .ok_or(ContentError::PostNotFound)?;

        self.decorate(Some(viewer_id), vec![post])
            .await?
            .pop()
            .ok_or(ContentError::PostNotFound)
    }

    async fn list(&self, viewer_id: Uuid, filter: PostListFilter) -> UseCaseResult<Vec<PostDto>> {
        let posts = self
            .post_repo
            .list_published(filter, Utc::now())
            .await
            .map_err(|err| {
                error!(%viewer_id, db_error = ?err, "content: failed to list posts");
                ContentError::Internal(err)
            })?;
        self.decorate(Some(viewer_id), posts).await
    }

    pub async fn posts_by_category(
        &self,
        viewer_id: Uuid,
        category_id: Uuid,
        page: Page,
    ) -> UseCaseResult<Vec<PostDto>> {
        self.list(
            viewer_id,
            PostListFilter {
                category_id: Some(category_id),
                page,
                ..Default::default()
            },
        )
        .await
    }

    pub async fn posts_by_creator(
        &self,
        viewer_id: Uuid,
        creator_id: Uuid,
        query: PostQuery,
        page: Page,
    ) -> UseCaseResult<Vec<PostDto>> {
        self.list(
            viewer_id,
            PostListFilter {
                creator_id: Some(creator_id),
                post_type: query.post_type.map(|post_type| post_type.to_string()),
                page,
                ..Default::default()
            },
        )
        .await
    }

    /// Posts from creators the viewer follows or is currently subscribed to.
    pub async fn followed_feed(&self, viewer_id: Uuid, page: Page) -> UseCaseResult<Vec<PostDto>> {
        let now = Utc::now();
        let mut creator_ids = self
            .social_repo
            .following_ids(viewer_id)
            .await
            .map_err(|err| {
                error!(%viewer_id, db_error = ?err, "content: failed to load follows");
                ContentError::Internal(err)
            })?;
        let subscriptions = self
            .subscription_repo
            .list_for_subscriber(viewer_id)
            .await
            .map_err(|err| {
                error!(%viewer_id, db_error = ?err, "content: failed to load subscriptions");
                ContentError::Internal(err)
            })?;
        creator_ids.extend(
            subscriptions
                .into_iter()
                .filter(|(subscription, _)| subscription.is_current(now))
                .map(|(subscription, _)| subscription.creator_id),
        );
        creator_ids.sort();
        creator_ids.dedup();

        if creator_ids.is_empty() {
            return Ok(Vec::new());
        }

        self.list(
            viewer_id,
            PostListFilter {
                creator_ids: Some(creator_ids),
                page,
                ..Default::default()
            },
        )
        .await
    }

    pub async fn liked_posts(&self, user_id: Uuid, page: Page) -> UseCaseResult<Vec<PostDto>> {
        let posts = self
            .post_repo
            .list_liked(user_id, page)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "content: failed to list liked posts");
                ContentError::Internal(err)
            })?;
        self.decorate(Some(user_id), posts).await
    }

    pub async fn saved_posts(&self, user_id: Uuid, page: Page) -> UseCaseResult<Vec<PostDto>> {
        let posts = self
            .post_repo
            .list_saved(user_id, page)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "content: failed to list saved posts");
                ContentError::Internal(err)
            })?;
        self.decorate(Some(user_id), posts).await
    }

    pub async fn categories(&self) -> UseCaseResult<Vec<CategoryEntity>> {
        self.category_repo.list().await.map_err(|err| {
            error!(db_error = ?err, "content: failed to list categories");
            ContentError::Internal(err)
        })
    }

    pub async fn create_category(&self, admin_id: Uuid, name: &str) -> UseCaseResult<CategoryEntity> {
        self.ensure_admin(admin_id).await?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ContentError::EmptyCategoryName);
        }
        let outcome = self
            .category_repo
            .create(name.to_string())
            .await
            .map_err(ContentError::Internal)?;
        match outcome {
            InsertOutcome::Inserted(category) => {
                info!(%admin_id, category_id = %category.id, "content: category created");
                Ok(category)
            }
            InsertOutcome::Duplicate => Err(ContentError::CategoryExists),
        }
    }

    pub async fn rename_category(
        &self,
        admin_id: Uuid,
        category_id: Uuid,
        name: &str,
    ) -> UseCaseResult<CategoryEntity> {
        self.ensure_admin(admin_id).await?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ContentError::EmptyCategoryName);
        }
        self.category_repo
            .rename(category_id, name.to_string())
            .await
            .map_err(ContentError::Internal)?
            .ok_or(ContentError::CategoryNotFound)
    }

    pub async fn delete_category(&self, admin_id: Uuid, category_id: Uuid) -> UseCaseResult<()> {
        self.ensure_admin(admin_id).await?;
        let deleted = self
            .category_repo
            .delete(category_id)
            .await
            .map_err(ContentError::Internal)?;
        if !deleted {
            return Err(ContentError::CategoryNotFound);
        }
        info!(%admin_id, %category_id, "content: category deleted");
        Ok(())
    }
}
