use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use crates::{
    domain::value_objects::{
        follower_stats::FollowerRange,
        pagination::{Page, PageQuery},
        users::CreatorSearchFilter,
    },
    infra::db::repositories::{
        categories::CategoryPostgres, social::SocialPostgres, subscriptions::SubscriptionPostgres,
        users::UserPostgres,
    },
    multibank::MultibankClient,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::{app_context::AppContext, error_responses::AppError},
    usecases::creators::{AttachAccountModel, BecomeCreatorModel, CreatorUseCase},
};

type CreatorState = Arc<
    CreatorUseCase<UserPostgres, CategoryPostgres, SocialPostgres, SubscriptionPostgres, MultibankClient>,
>;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    #[serde(default)]
    pub range: FollowerRange,
}

pub fn routes(ctx: &AppContext) -> Router {
    let db_pool = &ctx.db_pool;
    let creators_usecase = CreatorUseCase::new(
        Arc::new(UserPostgres::new(Arc::clone(db_pool))),
        Arc::new(CategoryPostgres::new(Arc::clone(db_pool))),
        Arc::new(SocialPostgres::new(Arc::clone(db_pool))),
        Arc::new(SubscriptionPostgres::new(Arc::clone(db_pool))),
        Arc::clone(&ctx.gateway),
    );

    Router::new()
        .route("/creators/accounts", get(payout_accounts).post(attach_account))
        .route("/creators/become", post(become_creator))
        .route("/creators/popular", get(popular))
        .route("/creators/popular/:category_id", get(popular_in_category))
        .route("/creators/search", get(search))
        .route("/creators/stats/followers", get(follower_stats))
        .route("/creators/stats/plans", get(plan_shares))
        .with_state(Arc::new(creators_usecase))
}

pub async fn payout_accounts(
    State(creators_usecase): State<CreatorState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let accounts = creators_usecase.payout_accounts(auth.user_id).await?;
    Ok((StatusCode::OK, Json(accounts)))
}

pub async fn attach_account(
    State(creators_usecase): State<CreatorState>,
    auth: AuthUser,
    Json(attach_account_model): Json<AttachAccountModel>,
) -> Result<impl IntoResponse, AppError> {
    let attached = creators_usecase
        .attach_account(auth.user_id, attach_account_model)
        .await?;
    Ok((StatusCode::OK, Json(attached)))
}

pub async fn become_creator(
    State(creators_usecase): State<CreatorState>,
    auth: AuthUser,
    Json(become_creator_model): Json<BecomeCreatorModel>,
) -> Result<impl IntoResponse, AppError> {
    let user = creators_usecase
        .become_creator(auth.user_id, become_creator_model)
        .await?;
    Ok((StatusCode::OK, Json(user)))
}

pub async fn popular(
    State(creators_usecase): State<CreatorState>,
    _auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let popular = creators_usecase.popular().await?;
    Ok((StatusCode::OK, Json(popular)))
}

pub async fn popular_in_category(
    State(creators_usecase): State<CreatorState>,
    _auth: AuthUser,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let creators = creators_usecase.popular_in_category(category_id).await?;
    Ok((StatusCode::OK, Json(creators)))
}

pub async fn search(
    State(creators_usecase): State<CreatorState>,
    _auth: AuthUser,
    Query(params): Query<SearchParams>,
    Query(page_query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = CreatorSearchFilter {
        query: params.query,
        category_id: params.category_id,
        page: Page::from(page_query),
    };
    let creators = creators_usecase.search(filter).await?;
    Ok((StatusCode::OK, Json(creators)))
}

pub async fn follower_stats(
    State(creators_usecase): State<CreatorState>,
    auth: AuthUser,
    Query(params): Query<RangeParams>,
) -> Result<impl IntoResponse, AppError> {
    let points = creators_usecase
        .follower_stats(auth.user_id, params.range)
        .await?;
    Ok((StatusCode::OK, Json(points)))
}

pub async fn plan_shares(
    State(creators_usecase): State<CreatorState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let shares = creators_usecase.plan_shares(auth.user_id).await?;
    Ok((StatusCode::OK, Json(shares)))
}
