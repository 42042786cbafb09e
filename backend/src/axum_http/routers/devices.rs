use std::sync::Arc;

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};
use crates::{infra::db::repositories::devices::DevicePostgres, notifications::FcmClient};

use crate::{
    auth::AuthUser,
    axum_http::{app_context::AppContext, error_responses::AppError},
    usecases::devices::{DeviceUseCase, RegisterDeviceModel},
};

type DeviceState = Arc<DeviceUseCase<DevicePostgres, FcmClient>>;

pub fn routes(ctx: &AppContext) -> Router {
    let devices_usecase = DeviceUseCase::new(
        Arc::new(DevicePostgres::new(Arc::clone(&ctx.db_pool))),
        Arc::clone(&ctx.push),
    );

    Router::new()
        .route("/devices", post(register_device))
        .route("/devices/test", post(send_test_push))
        .with_state(Arc::new(devices_usecase))
}

pub async fn register_device(
    State(devices_usecase): State<DeviceState>,
    auth: AuthUser,
    Json(register_device_model): Json<RegisterDeviceModel>,
) -> Result<impl IntoResponse, AppError> {
    let device = devices_usecase
        .register(auth.user_id, register_device_model)
        .await?;
    Ok((StatusCode::CREATED, Json(device)))
}

pub async fn send_test_push(
    State(devices_usecase): State<DeviceState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let report = devices_usecase.send_test(auth.user_id).await?;
    Ok((StatusCode::OK, Json(report)))
}
