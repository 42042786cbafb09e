use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use crates::{
    domain::value_objects::pagination::{Page, PageQuery},
    infra::db::repositories::{
        categories::CategoryPostgres, plans::PlanPostgres, posts::PostPostgres,
        social::SocialPostgres, subscriptions::SubscriptionPostgres, users::UserPostgres,
    },
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::{app_context::AppContext, error_responses::AppError},
    usecases::content::{
        ChoiceKind, ContentUseCase, CreatePostModel, PostQuery, UpdateAccessModel, choices,
    },
};

type ContentState = Arc<
    ContentUseCase<
        UserPostgres,
        PostPostgres,
        PlanPostgres,
        SubscriptionPostgres,
        SocialPostgres,
        CategoryPostgres,
    >,
>;

#[derive(Debug, Deserialize)]
pub struct CategoryModel {
    pub name: String,
}

pub fn routes(ctx: &AppContext) -> Router {
    let db_pool = &ctx.db_pool;
    let content_usecase = ContentUseCase::new(
        Arc::new(UserPostgres::new(Arc::clone(db_pool))),
        Arc::new(PostPostgres::new(Arc::clone(db_pool))),
        Arc::new(PlanPostgres::new(Arc::clone(db_pool))),
        Arc::new(SubscriptionPostgres::new(Arc::clone(db_pool))),
        Arc::new(SocialPostgres::new(Arc::clone(db_pool))),
        Arc::new(CategoryPostgres::new(Arc::clone(db_pool))),
    );

    Router::new()
        .route("/posts", post(create_post))
        .route("/posts/feed", get(followed_feed))
        .route("/posts/liked", get(liked_posts))
        .route("/posts/saved", get(saved_posts))
        .route(
            "/posts/:post_id",
            get(post_detail).patch(update_access).delete(delete_post),
        )
        .route("/categories", get(categories))
        .route("/categories/:category_id/posts", get(posts_by_category))
        .route("/creators/:creator_id/posts", get(posts_by_creator))
        .route("/choices/:kind", get(list_choices))
        .route("/admin/categories", post(create_category))
        .route(
            "/admin/categories/:category_id",
            patch(rename_category).delete(delete_category),
        )
        .with_state(Arc::new(content_usecase))
}

pub async fn create_post(
    State(content_usecase): State<ContentState>,
    auth: AuthUser,
    Json(create_post_model): Json<CreatePostModel>,
) -> Result<impl IntoResponse, AppError> {
    let post = content_usecase
        .create_post(auth.user_id, create_post_model)
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_access(
    State(content_usecase): State<ContentState>,
    auth: AuthUser,
    Path(post_id): Path<Uuid>,
    Json(update_access_model): Json<UpdateAccessModel>,
) -> Result<impl IntoResponse, AppError> {
    let post = content_usecase
        .update_access(auth.user_id, post_id, update_access_model)
        .await?;
    Ok((StatusCode::OK, Json(post)))
}

pub async fn delete_post(
    State(content_usecase): State<ContentState>,
    auth: AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    content_usecase.delete_post(auth.user_id, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn post_detail(
    State(content_usecase): State<ContentState>,
    auth: AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let post = content_usecase.post_detail(auth.user_id, post_id).await?;
    Ok((StatusCode::OK, Json(post)))
}

pub async fn followed_feed(
    State(content_usecase): State<ContentState>,
    auth: AuthUser,
    Query(page_query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let posts = content_usecase
        .followed_feed(auth.user_id, Page::from(page_query))
        .await?;
    Ok((StatusCode::OK, Json(posts)))
}

pub async fn liked_posts(
    State(content_usecase): State<ContentState>,
    auth: AuthUser,
    Query(page_query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let posts = content_usecase
        .liked_posts(auth.user_id, Page::from(page_query))
        .await?;
    Ok((StatusCode::OK, Json(posts)))
}

pub async fn saved_posts(
    State(content_usecase): State<ContentState>,
    auth: AuthUser,
    Query(page_query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let posts = content_usecase
        .saved_posts(auth.user_id, Page::from(page_query))
        .await?;
    Ok((StatusCode::OK, Json(posts)))
}

pub async fn categories(
    State(content_usecase): State<ContentState>,
) -> Result<impl IntoResponse, AppError> {
    let categories = content_usecase.categories().await?;
    Ok((StatusCode::OK, Json(categories)))
}

pub async fn posts_by_category(
    State(content_usecase): State<ContentState>,
    auth: AuthUser,
    Path(category_id): Path<Uuid>,
    Query(page_query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let posts = content_usecase
        .posts_by_category(auth.user_id, category_id, Page::from(page_query))
        .await?;
    Ok((StatusCode::OK, Json(posts)))
}

pub async fn posts_by_creator(
    State(content_usecase): State<ContentState>,
    auth: AuthUser,
    Path(creator_id): Path<Uuid>,
    Query(post_query): Query<PostQuery>,
    Query(page_query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let posts = content_usecase
        .posts_by_creator(auth.user_id, creator_id, post_query, Page::from(page_query))
        .await?;
    Ok((StatusCode::OK, Json(posts)))
}

pub async fn list_choices(Path(kind): Path<ChoiceKind>) -> impl IntoResponse {
    (StatusCode::OK, Json(choices(kind)))
}

pub async fn create_category(
    State(content_usecase): State<ContentState>,
    auth: AuthUser,
    Json(category_model): Json<CategoryModel>,
) -> Result<impl IntoResponse, AppError> {
    let category = content_usecase
        .create_category(auth.user_id, &category_model.name)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn rename_category(
    State(content_usecase): State<ContentState>,
    auth: AuthUser,
    Path(category_id): Path<Uuid>,
    Json(category_model): Json<CategoryModel>,
) -> Result<impl IntoResponse, AppError> {
    let category = content_usecase
        .rename_category(auth.user_id, category_id, &category_model.name)
        .await?;
    Ok((StatusCode::OK, Json(category)))
}

pub async fn delete_category(
    State(content_usecase): State<ContentState>,
    auth: AuthUser,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    content_usecase
        .delete_category(auth.user_id, category_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
