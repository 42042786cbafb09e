use axum::{
    Router,
    Extension,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use crates::domain::value_objects::chat::InboundChatPayload;
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    auth::{accounts::AccountGate, ensure_usable, validate_access_token},
    axum_http::{
        app_context::AppContext,
        routers::chat::{ChatState, chat_usecase},
    },
    config::config_loader,
};

pub fn routes(ctx: &AppContext) -> Router {
    Router::new()
        .route("/ws/chat/:room_id", get(chat_socket))
        .with_state(chat_usecase(ctx))
}

/// The bearer token is checked once, at upgrade time.
pub async fn chat_socket(
    State(chat_usecase): State<ChatState>,
    Extension(accounts): Extension<AccountGate>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Path(room_id): Path<Uuid>,
    ws: WebSocketUpgrade,
) -> Response {
    let secrets = match config_loader::get_user_secret() {
        Ok(secrets) => secrets,
        Err(err) => {
            error!(error = ?err, "chat_ws: failed to load jwt secrets");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }
    };
    let user_id = match validate_access_token(bearer.token(), &secrets) {
        Ok(user_id) => user_id,
        Err(err) => {
            debug!(%room_id, error = %err, "chat_ws: invalid token");
            return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        }
    };
    if let Err(rejection) = ensure_usable(&accounts, user_id).await {
        return rejection.into_response();
    }
    match chat_usecase.verify_chat_access(room_id, user_id).await {
        Ok(true) => {}
        Ok(false) => {
            warn!(%room_id, %user_id, "chat_ws: connection refused");
            return (StatusCode::FORBIDDEN, "chat access denied").into_response();
        }
        Err(err) => {
            error!(%room_id, %user_id, error = %err, "chat_ws: access check failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }
    }

    ws.on_upgrade(move |socket| handle_socket(chat_usecase, room_id, user_id, socket))
}

async fn handle_socket(chat_usecase: ChatState, room_id: Uuid, user_id: Uuid, socket: WebSocket) {
    let (subscriber_id, mut events) = chat_usecase.hub().join(room_id).await;
    info!(%room_id, %user_id, "chat_ws: connected");

    let (mut sender, mut receiver) = socket.split();

    let writer_usecase = chat_usecase.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let frame = match serde_json::to_string(&event) {
                Ok(frame) => frame,
                Err(err) => {
                    error!(message_id = %event.message_id, error = ?err, "chat_ws: failed to encode event");
                    continue;
                }
            };
            if sender.send(Message::Text(frame)).await.is_err() {
                break;
            }
            writer_usecase.acknowledge_delivery(&event, user_id).await;
        }
    });

    let reader_usecase = chat_usecase.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            match message {
                Message::Text(text) => {
                    let payload = match serde_json::from_str::<InboundChatPayload>(&text) {
                        Ok(payload) => payload,
                        Err(err) => {
                            debug!(%room_id, %user_id, error = %err, "chat_ws: ignoring malformed frame");
                            continue;
                        }
                    };
                    if let Err(err) = reader_usecase.post_message(room_id, user_id, payload).await {
                        warn!(%room_id, %user_id, error = %err, "chat_ws: message rejected");
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    chat_usecase.hub().leave(room_id, subscriber_id).await;
    info!(%room_id, %user_id, "chat_ws: disconnected");
}
