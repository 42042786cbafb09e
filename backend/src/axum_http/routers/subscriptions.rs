use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use crates::infra::db::repositories::{
    activities::ActivityPostgres, plans::PlanPostgres, subscriptions::SubscriptionPostgres,
    users::UserPostgres,
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::{
        app_context::{AppContext, Payments},
        error_responses::AppError,
    },
    usecases::subscriptions::{
        CreatePlanModel, SubscribeModel, SubscriptionUseCase, UpdatePlanModel,
    },
};

type SubscriptionState = Arc<
    SubscriptionUseCase<UserPostgres, PlanPostgres, SubscriptionPostgres, ActivityPostgres, Payments>,
>;

pub fn routes(ctx: &AppContext) -> Router {
    let db_pool = &ctx.db_pool;
    let subscriptions_usecase = SubscriptionUseCase::new(
        Arc::new(UserPostgres::new(Arc::clone(db_pool))),
        Arc::new(PlanPostgres::new(Arc::clone(db_pool))),
        Arc::new(SubscriptionPostgres::new(Arc::clone(db_pool))),
        ctx.activities(),
        ctx.payments(),
    );

    Router::new()
        .route("/plans", get(my_plans).post(create_plan))
        .route("/plans/:plan_id", patch(update_plan))
        .route("/creators/:creator_id/plans", get(creator_plans))
        .route("/subscriptions", get(my_subscriptions).post(subscribe))
        .with_state(Arc::new(subscriptions_usecase))
}

pub async fn my_plans(
    State(subscriptions_usecase): State<SubscriptionState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let plans = subscriptions_usecase.my_plans(auth.user_id).await?;
    Ok((StatusCode::OK, Json(plans)))
}

pub async fn create_plan(
    State(subscriptions_usecase): State<SubscriptionState>,
    auth: AuthUser,
    Json(create_plan_model): Json<CreatePlanModel>,
) -> Result<impl IntoResponse, AppError> {
    let plan = subscriptions_usecase
        .create_plan(auth.user_id, create_plan_model)
        .await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn update_plan(
    State(subscriptions_usecase): State<SubscriptionState>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
    Json(update_plan_model): Json<UpdatePlanModel>,
) -> Result<impl IntoResponse, AppError> {
    let plan = subscriptions_usecase
        .update_plan(auth.user_id, plan_id, update_plan_model)
        .await?;
    Ok((StatusCode::OK, Json(plan)))
}

pub async fn creator_plans(
    State(subscriptions_usecase): State<SubscriptionState>,
    auth: AuthUser,
    Path(creator_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let plans = subscriptions_usecase
        .creator_plans(auth.user_id, creator_id)
        .await?;
    Ok((StatusCode::OK, Json(plans)))
}

pub async fn subscribe(
    State(subscriptions_usecase): State<SubscriptionState>,
    auth: AuthUser,
    Json(subscribe_model): Json<SubscribeModel>,
) -> Result<impl IntoResponse, AppError> {
    let checkout = subscriptions_usecase
        .subscribe(auth.user_id, subscribe_model)
        .await?;
    let status = if checkout.payment.is_paid() {
        StatusCode::CREATED
    } else {
        StatusCode::ACCEPTED
    };
    Ok((status, Json(checkout)))
}

pub async fn my_subscriptions(
    State(subscriptions_usecase): State<SubscriptionState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let subscriptions = subscriptions_usecase.my_subscriptions(auth.user_id).await?;
    Ok((StatusCode::OK, Json(subscriptions)))
}
