use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use crates::{
    domain::value_objects::pagination::{Page, PageQuery},
    infra::db::repositories::{
        chat::ChatPostgres, files::FilePostgres, social::SocialPostgres,
        subscriptions::SubscriptionPostgres, users::UserPostgres,
    },
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::{app_context::AppContext, error_responses::AppError},
    usecases::chat::{ChatSettingsModel, ChatUseCase},
};

pub type ChatState = Arc<
    ChatUseCase<ChatPostgres, UserPostgres, SocialPostgres, SubscriptionPostgres, FilePostgres>,
>;

#[derive(Debug, Deserialize)]
pub struct OpenRoomModel {
    pub user_id: Uuid,
}

/// Shared by the REST routes and the websocket endpoint so both use one hub.
pub fn chat_usecase(ctx: &AppContext) -> ChatState {
    let db_pool = &ctx.db_pool;
    Arc::new(ChatUseCase::new(
        Arc::new(ChatPostgres::new(Arc::clone(db_pool))),
        Arc::new(UserPostgres::new(Arc::clone(db_pool))),
        Arc::new(SocialPostgres::new(Arc::clone(db_pool))),
        Arc::new(SubscriptionPostgres::new(Arc::clone(db_pool))),
        Arc::new(FilePostgres::new(Arc::clone(db_pool))),
        ctx.chat_hub.clone(),
    ))
}

pub fn routes(ctx: &AppContext) -> Router {
    Router::new()
        .route("/chat/rooms", get(list_rooms).post(open_room))
        .route("/chat/rooms/:room_id/messages", get(list_messages))
        .route("/chat/settings", get(settings).put(configure))
        .with_state(chat_usecase(ctx))
}

pub async fn list_rooms(
    State(chat_usecase): State<ChatState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let rooms = chat_usecase.list_rooms(auth.user_id).await?;
    Ok((StatusCode::OK, Json(rooms)))
}

pub async fn open_room(
    State(chat_usecase): State<ChatState>,
    auth: AuthUser,
    Json(open_room_model): Json<OpenRoomModel>,
) -> Result<impl IntoResponse, AppError> {
    let room = chat_usecase
        .open_room(auth.user_id, open_room_model.user_id)
        .await?;
    Ok((StatusCode::OK, Json(room)))
}

pub async fn list_messages(
    State(chat_usecase): State<ChatState>,
    auth: AuthUser,
    Path(room_id): Path<Uuid>,
    Query(page_query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let messages = chat_usecase
        .list_messages(auth.user_id, room_id, Page::from(page_query))
        .await?;
    Ok((StatusCode::OK, Json(messages)))
}

pub async fn settings(
    State(chat_usecase): State<ChatState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let settings = chat_usecase.settings(auth.user_id).await?;
    Ok((StatusCode::OK, Json(settings)))
}

pub async fn configure(
    State(chat_usecase): State<ChatState>,
    auth: AuthUser,
    Json(chat_settings_model): Json<ChatSettingsModel>,
) -> Result<impl IntoResponse, AppError> {
    let settings = chat_usecase
        .configure(auth.user_id, chat_settings_model)
        .await?;
    Ok((StatusCode::OK, Json(settings)))
}
