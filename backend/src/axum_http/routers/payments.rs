use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::{
        app_context::{AppContext, Payments},
        error_responses::AppError,
    },
    usecases::payments::PaymentProcessor,
};

#[derive(Debug, Deserialize)]
pub struct ConfirmPaymentModel {
    pub otp: String,
}

pub fn routes(ctx: &AppContext) -> Router {
    Router::new()
        .route("/payments/:transaction_id/confirm", post(confirm_payment))
        .with_state(ctx.payments())
}

pub async fn confirm_payment(
    State(payments): State<Arc<Payments>>,
    auth: AuthUser,
    Path(transaction_id): Path<Uuid>,
    Json(confirm_model): Json<ConfirmPaymentModel>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = payments
        .confirm_otp(auth.user_id, transaction_id, confirm_model.otp)
        .await?;
    Ok((StatusCode::OK, Json(outcome)))
}
