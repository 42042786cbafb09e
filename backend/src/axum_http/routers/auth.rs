use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use crates::infra::db::repositories::{
    admins::AdminPostgres, sms_confirmations::SmsConfirmationPostgres, users::UserPostgres,
};
use crates::notifications::SmsClient;
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::AuthUser,
    axum_http::{app_context::AppContext, error_responses::AppError},
    usecases::auth::{AdminLoginModel, AuthUseCase, LoginModel, UpdateProfileModel, VerifyModel},
};

type AuthState = Arc<AuthUseCase<UserPostgres, SmsConfirmationPostgres, AdminPostgres, SmsClient>>;

#[derive(Debug, Deserialize)]
pub struct RefreshModel {
    pub refresh: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmCodeModel {
    pub code: String,
}

pub fn routes(ctx: &AppContext) -> Router {
    let db_pool = &ctx.db_pool;
    let auth_usecase = AuthUseCase::new(
        Arc::new(UserPostgres::new(Arc::clone(db_pool))),
        Arc::new(SmsConfirmationPostgres::new(Arc::clone(db_pool))),
        Arc::new(AdminPostgres::new(Arc::clone(db_pool))),
        Arc::clone(&ctx.sms),
        ctx.config.user_secret.clone(),
    );

    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/verify", post(verify))
        .route("/auth/token/refresh", post(refresh))
        .route("/auth/admin/login", post(admin_login))
        .route("/auth/me", get(me).patch(update_me))
        .route("/auth/me/delete", post(request_deletion))
        .route("/auth/me/delete/confirm", post(confirm_deletion))
        .with_state(Arc::new(auth_usecase))
}

pub async fn login(
    State(auth_usecase): State<AuthState>,
    Json(login_model): Json<LoginModel>,
) -> Result<impl IntoResponse, AppError> {
    let sent = auth_usecase.login(login_model).await?;
    Ok((StatusCode::OK, Json(sent)))
}

pub async fn verify(
    State(auth_usecase): State<AuthState>,
    Json(verify_model): Json<VerifyModel>,
) -> Result<impl IntoResponse, AppError> {
    let tokens = auth_usecase.verify(verify_model).await?;
    Ok((StatusCode::OK, Json(tokens)))
}

pub async fn refresh(
    State(auth_usecase): State<AuthState>,
    Json(refresh_model): Json<RefreshModel>,
) -> Result<impl IntoResponse, AppError> {
    let access = auth_usecase.refresh(&refresh_model.refresh).await?;
    Ok((StatusCode::OK, Json(json!({ "access": access }))))
}

pub async fn admin_login(
    State(auth_usecase): State<AuthState>,
    Json(admin_login_model): Json<AdminLoginModel>,
) -> Result<impl IntoResponse, AppError> {
    let session = auth_usecase.admin_login(admin_login_model).await?;
    Ok((StatusCode::OK, Json(session)))
}

pub async fn me(
    State(auth_usecase): State<AuthState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = auth_usecase.me(auth.user_id).await?;
    Ok((StatusCode::OK, Json(user)))
}

pub async fn update_me(
    State(auth_usecase): State<AuthState>,
    auth: AuthUser,
    Json(update_profile_model): Json<UpdateProfileModel>,
) -> Result<impl IntoResponse, AppError> {
    let user = auth_usecase
        .update_me(auth.user_id, update_profile_model)
        .await?;
    Ok((StatusCode::OK, Json(user)))
}

pub async fn request_deletion(
    State(auth_usecase): State<AuthState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    auth_usecase.request_account_deletion(auth.user_id).await?;
    Ok((StatusCode::OK, Json(json!({ "detail": "confirmation code sent" }))))
}

pub async fn confirm_deletion(
    State(auth_usecase): State<AuthState>,
    auth: AuthUser,
    Json(confirm_model): Json<ConfirmCodeModel>,
) -> Result<impl IntoResponse, AppError> {
    auth_usecase
        .confirm_account_deletion(auth.user_id, &confirm_model.code)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
