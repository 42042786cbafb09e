use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use crates::infra::db::repositories::{
    activities::ActivityPostgres, donations::DonationPostgres, fundraisings::FundraisingPostgres,
    users::UserPostgres,
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::{
        app_context::{AppContext, Payments},
        error_responses::AppError,
    },
    usecases::donations::{
        CreateFundraisingModel, DonateModel, DonationUseCase, UpdateFundraisingModel,
    },
};

type DonationState = Arc<
    DonationUseCase<UserPostgres, FundraisingPostgres, DonationPostgres, ActivityPostgres, Payments>,
>;

pub fn routes(ctx: &AppContext) -> Router {
    let db_pool = &ctx.db_pool;
    let donations_usecase = DonationUseCase::new(
        Arc::new(UserPostgres::new(Arc::clone(db_pool))),
        Arc::new(FundraisingPostgres::new(Arc::clone(db_pool))),
        Arc::new(DonationPostgres::new(Arc::clone(db_pool))),
        ctx.activities(),
        ctx.payments(),
    );

    Router::new()
        .route("/donations", post(donate))
        .route("/fundraisings", get(my_fundraisings).post(create_fundraising))
        .route(
            "/fundraisings/:fundraising_id",
            get(get_fundraising).patch(update_fundraising),
        )
        .route("/creators/:creator_id/fundraisings", get(creator_fundraisings))
        .with_state(Arc::new(donations_usecase))
}

pub async fn donate(
    State(donations_usecase): State<DonationState>,
    auth: AuthUser,
    Json(donate_model): Json<DonateModel>,
) -> Result<impl IntoResponse, AppError> {
    let receipt = donations_usecase.donate(auth.user_id, donate_model).await?;
    let status = if receipt.payment.is_paid() {
        StatusCode::CREATED
    } else {
        StatusCode::ACCEPTED
    };
    Ok((status, Json(receipt)))
}

pub async fn create_fundraising(
    State(donations_usecase): State<DonationState>,
    auth: AuthUser,
    Json(create_fundraising_model): Json<CreateFundraisingModel>,
) -> Result<impl IntoResponse, AppError> {
    let fundraising = donations_usecase
        .create_fundraising(auth.user_id, create_fundraising_model)
        .await?;
    Ok((StatusCode::CREATED, Json(fundraising)))
}

pub async fn my_fundraisings(
    State(donations_usecase): State<DonationState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let fundraisings = donations_usecase
        .list_fundraisings(auth.user_id, false)
        .await?;
    Ok((StatusCode::OK, Json(fundraisings)))
}

pub async fn get_fundraising(
    State(donations_usecase): State<DonationState>,
    _auth: AuthUser,
    Path(fundraising_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let fundraising = donations_usecase.get_fundraising(fundraising_id).await?;
    Ok((StatusCode::OK, Json(fundraising)))
}

pub async fn update_fundraising(
    State(donations_usecase): State<DonationState>,
    auth: AuthUser,
    Path(fundraising_id): Path<Uuid>,
    Json(update_fundraising_model): Json<UpdateFundraisingModel>,
) -> Result<impl IntoResponse, AppError> {
    let fundraising = donations_usecase
        .update_fundraising(auth.user_id, fundraising_id, update_fundraising_model)
        .await?;
    Ok((StatusCode::OK, Json(fundraising)))
}

pub async fn creator_fundraisings(
    State(donations_usecase): State<DonationState>,
    _auth: AuthUser,
    Path(creator_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let fundraisings = donations_usecase
        .list_fundraisings(creator_id, true)
        .await?;
    Ok((StatusCode::OK, Json(fundraisings)))
}
