use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use crates::{
    domain::value_objects::pagination::{Page, PageQuery},
    infra::db::repositories::{
        activities::ActivityPostgres, comments::CommentPostgres, likes::LikePostgres,
        posts::PostPostgres, reports::ReportPostgres, social::SocialPostgres, users::UserPostgres,
    },
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::{app_context::AppContext, error_responses::AppError},
    usecases::social::{AnswerModel, CommentModel, LikeModel, ReportModel, SocialUseCase},
};

type SocialState = Arc<
    SocialUseCase<
        UserPostgres,
        SocialPostgres,
        PostPostgres,
        CommentPostgres,
        LikePostgres,
        ReportPostgres,
        ActivityPostgres,
    >,
>;

pub fn routes(ctx: &AppContext) -> Router {
    let db_pool = &ctx.db_pool;
    let social_usecase = SocialUseCase::new(
        Arc::new(UserPostgres::new(Arc::clone(db_pool))),
        Arc::new(SocialPostgres::new(Arc::clone(db_pool))),
        Arc::new(PostPostgres::new(Arc::clone(db_pool))),
        Arc::new(CommentPostgres::new(Arc::clone(db_pool))),
        Arc::new(LikePostgres::new(Arc::clone(db_pool))),
        Arc::new(ReportPostgres::new(Arc::clone(db_pool))),
        ctx.activities(),
    );

    Router::new()
        .route("/users/:user_id", get(profile))
        .route("/users/:user_id/follow", post(toggle_follow))
        .route("/users/:user_id/block", post(toggle_block))
        .route("/likes", post(toggle_like))
        .route("/comments", post(leave_comment))
        .route("/posts/:post_id/comments", get(list_comments))
        .route("/comments/:comment_id/replies", get(list_replies))
        .route("/posts/:post_id/save", post(toggle_save))
        .route("/reports", post(report))
        .route("/answers", post(answer))
        .route("/activities", get(activity_feed))
        .with_state(Arc::new(social_usecase))
}

pub async fn profile(
    State(social_usecase): State<SocialState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let profile = social_usecase.profile(auth.user_id, user_id).await?;
    Ok((StatusCode::OK, Json(profile)))
}

pub async fn toggle_follow(
    State(social_usecase): State<SocialState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = social_usecase.toggle_follow(auth.user_id, user_id).await?;
    Ok((StatusCode::OK, Json(result)))
}

pub async fn toggle_block(
    State(social_usecase): State<SocialState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = social_usecase.toggle_block(auth.user_id, user_id).await?;
    Ok((StatusCode::OK, Json(result)))
}

pub async fn toggle_like(
    State(social_usecase): State<SocialState>,
    auth: AuthUser,
    Json(like_model): Json<LikeModel>,
) -> Result<impl IntoResponse, AppError> {
    let result = social_usecase.toggle_like(auth.user_id, like_model).await?;
    Ok((StatusCode::OK, Json(result)))
}

pub async fn leave_comment(
    State(social_usecase): State<SocialState>,
    auth: AuthUser,
    Json(comment_model): Json<CommentModel>,
) -> Result<impl IntoResponse, AppError> {
    let comment = social_usecase
        .leave_comment(auth.user_id, comment_model)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list_comments(
    State(social_usecase): State<SocialState>,
    _auth: AuthUser,
    Path(post_id): Path<Uuid>,
    Query(page_query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let comments = social_usecase
        .list_comments(post_id, Page::from(page_query))
        .await?;
    Ok((StatusCode::OK, Json(comments)))
}

pub async fn list_replies(
    State(social_usecase): State<SocialState>,
    _auth: AuthUser,
    Path(comment_id): Path<Uuid>,
    Query(page_query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let replies = social_usecase
        .list_replies(comment_id, Page::from(page_query))
        .await?;
    Ok((StatusCode::OK, Json(replies)))
}

pub async fn toggle_save(
    State(social_usecase): State<SocialState>,
    auth: AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = social_usecase.toggle_save(auth.user_id, post_id).await?;
    Ok((StatusCode::OK, Json(result)))
}

pub async fn report(
    State(social_usecase): State<SocialState>,
    auth: AuthUser,
    Json(report_model): Json<ReportModel>,
) -> Result<impl IntoResponse, AppError> {
    let report = social_usecase.report(auth.user_id, report_model).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn answer(
    State(social_usecase): State<SocialState>,
    auth: AuthUser,
    Json(answer_model): Json<AnswerModel>,
) -> Result<impl IntoResponse, AppError> {
    let answer = social_usecase.answer(auth.user_id, answer_model).await?;
    Ok((StatusCode::CREATED, Json(answer)))
}

pub async fn activity_feed(
    State(social_usecase): State<SocialState>,
    auth: AuthUser,
    Query(page_query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let activities = social_usecase
        .feed(auth.user_id, Page::from(page_query))
        .await?;
    Ok((StatusCode::OK, Json(activities)))
}
