use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use crates::{
    infra::db::repositories::{cards::CardPostgres, users::UserPostgres},
    multibank::MultibankClient,
};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::{app_context::AppContext, error_responses::AppError},
    usecases::cards::{AddCardModel, BindCardCallback, CardUseCase},
};

type CardState = Arc<CardUseCase<UserPostgres, CardPostgres, MultibankClient>>;

fn card_usecase(ctx: &AppContext) -> CardState {
    Arc::new(CardUseCase::new(
        Arc::new(UserPostgres::new(Arc::clone(&ctx.db_pool))),
        Arc::new(CardPostgres::new(Arc::clone(&ctx.db_pool))),
        Arc::clone(&ctx.gateway),
    ))
}

pub fn routes(ctx: &AppContext) -> Router {
    Router::new()
        .route("/cards", get(list_cards).post(add_card))
        .route("/cards/:card_id", delete(delete_card))
        .route("/cards/:card_id/main", post(set_main_card))
        .with_state(card_usecase(ctx))
}

/// Gateway callbacks; unauthenticated.
pub fn integration_routes(ctx: &AppContext) -> Router {
    Router::new()
        .route("/integrations/multibank/bind-card", post(bind_card_callback))
        .with_state(card_usecase(ctx))
}

pub async fn list_cards(
    State(card_usecase): State<CardState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let cards = card_usecase.list(auth.user_id).await?;
    Ok((StatusCode::OK, Json(cards)))
}

pub async fn add_card(
    State(card_usecase): State<CardState>,
    auth: AuthUser,
    Json(add_card_model): Json<AddCardModel>,
) -> Result<impl IntoResponse, AppError> {
    let added = card_usecase.add(auth.user_id, add_card_model).await?;
    Ok((StatusCode::CREATED, Json(added)))
}

pub async fn delete_card(
    State(card_usecase): State<CardState>,
    auth: AuthUser,
    Path(card_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    card_usecase.delete(auth.user_id, card_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_main_card(
    State(card_usecase): State<CardState>,
    auth: AuthUser,
    Path(card_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    card_usecase.set_main(auth.user_id, card_id).await?;
    Ok((StatusCode::OK, Json(json!({ "card_id": card_id, "is_main": true }))))
}

/// Always answers 200 so the gateway does not retry.
pub async fn bind_card_callback(
    State(card_usecase): State<CardState>,
    Json(callback): Json<BindCardCallback>,
) -> impl IntoResponse {
    let bound = match card_usecase.bind_callback(callback).await {
        Ok(bound) => bound,
        Err(err) => {
            error!(error = %err, "cards: bind callback failed");
            false
        }
    };
    info!(bound, "cards: bind callback handled");
    (StatusCode::OK, Json(json!({ "status": "ok", "bound": bound })))
}
