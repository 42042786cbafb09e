use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use crates::{
    domain::value_objects::{
        enums::report_statuses::ReportStatus,
        pagination::{Page, PageQuery},
        users::AdminCreatorFilter,
    },
    infra::db::repositories::{
        admins::AdminPostgres, analytics::AnalyticsPostgres, distributions::DistributionPostgres,
        posts::PostPostgres, reports::ReportPostgres, users::UserPostgres,
    },
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::{app_context::AppContext, error_responses::AppError},
    usecases::{
        admin::{
            AdminUseCase, CreateAdminModel, CreateDistributionModel, ReportCommentModel,
            ShareModel, UpdateAdminModel, UpdateDistributionModel,
        },
        analytics::{AnalyticsUseCase, DashboardQuery},
    },
};

type AdminState = Arc<
    AdminUseCase<UserPostgres, AdminPostgres, ReportPostgres, PostPostgres, DistributionPostgres>,
>;
type AnalyticsState = Arc<AnalyticsUseCase<UserPostgres, AdminPostgres, AnalyticsPostgres>>;

#[derive(Debug, Default, Deserialize)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
}

pub fn routes(ctx: &AppContext) -> Router {
    let db_pool = &ctx.db_pool;
    let user_repo = Arc::new(UserPostgres::new(Arc::clone(db_pool)));
    let admin_repo = Arc::new(AdminPostgres::new(Arc::clone(db_pool)));

    let admin_usecase = AdminUseCase::new(
        Arc::clone(&user_repo),
        Arc::clone(&admin_repo),
        Arc::new(ReportPostgres::new(Arc::clone(db_pool))),
        Arc::new(PostPostgres::new(Arc::clone(db_pool))),
        Arc::new(DistributionPostgres::new(Arc::clone(db_pool))),
    );
    let analytics_usecase = AnalyticsUseCase::new(
        user_repo,
        admin_repo,
        Arc::new(AnalyticsPostgres::new(Arc::clone(db_pool))),
    );

    let back_office = Router::new()
        .route("/admin/creators", get(list_creators))
        .route("/admin/creators/:creator_id", get(creator))
        .route("/admin/creators/:creator_id/block", post(block_creator))
        .route("/admin/creators/:creator_id/share", patch(update_sapi_share))
        .route("/admin/reports", get(list_reports))
        .route("/admin/reports/:report_id/ignore", post(ignore_report))
        .route("/admin/reports/:report_id/block-post", post(block_reported_post))
        .route("/admin/reports/:report_id/comments", post(comment_report))
        .route("/admin/admins", get(list_admins).post(create_admin))
        .route(
            "/admin/admins/:admin_id",
            patch(update_admin).delete(delete_admin),
        )
        .route("/admin/permissions", get(permission_catalogue))
        .route(
            "/admin/distributions",
            get(list_distributions).post(create_distribution),
        )
        .route(
            "/admin/distributions/:distribution_id",
            patch(update_distribution),
        )
        .with_state(Arc::new(admin_usecase));

    let dashboard = Router::new()
        .route("/admin/dashboard", get(dashboard))
        .with_state(Arc::new(analytics_usecase));

    back_office.merge(dashboard)
}

pub async fn list_creators(
    State(admin_usecase): State<AdminState>,
    auth: AuthUser,
    Query(filter): Query<AdminCreatorFilter>,
    Query(page_query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = AdminCreatorFilter {
        page: Page::from(page_query),
        ..filter
    };
    let creators = admin_usecase.list_creators(auth.user_id, filter).await?;
    Ok((StatusCode::OK, Json(creators)))
}

pub async fn creator(
    State(admin_usecase): State<AdminState>,
    auth: AuthUser,
    Path(creator_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let creator = admin_usecase.creator(auth.user_id, creator_id).await?;
    Ok((StatusCode::OK, Json(creator)))
}

pub async fn block_creator(
    State(admin_usecase): State<AdminState>,
    auth: AuthUser,
    Path(creator_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let creator = admin_usecase.block_creator(auth.user_id, creator_id).await?;
    Ok((StatusCode::OK, Json(creator)))
}

pub async fn update_sapi_share(
    State(admin_usecase): State<AdminState>,
    auth: AuthUser,
    Path(creator_id): Path<Uuid>,
    Json(share_model): Json<ShareModel>,
) -> Result<impl IntoResponse, AppError> {
    let creator = admin_usecase
        .update_sapi_share(auth.user_id, creator_id, share_model)
        .await?;
    Ok((StatusCode::OK, Json(creator)))
}

pub async fn list_reports(
    State(admin_usecase): State<AdminState>,
    auth: AuthUser,
    Query(report_filter): Query<ReportFilter>,
    Query(page_query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let reports = admin_usecase
        .list_reports(auth.user_id, report_filter.status, Page::from(page_query))
        .await?;
    Ok((StatusCode::OK, Json(reports)))
}

pub async fn ignore_report(
    State(admin_usecase): State<AdminState>,
    auth: AuthUser,
    Path(report_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let report = admin_usecase.ignore_report(auth.user_id, report_id).await?;
    Ok((StatusCode::OK, Json(report)))
}

pub async fn block_reported_post(
    State(admin_usecase): State<AdminState>,
    auth: AuthUser,
    Path(report_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let report = admin_usecase
        .block_reported_post(auth.user_id, report_id)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

pub async fn comment_report(
    State(admin_usecase): State<AdminState>,
    auth: AuthUser,
    Path(report_id): Path<Uuid>,
    Json(report_comment_model): Json<ReportCommentModel>,
) -> Result<impl IntoResponse, AppError> {
    let comment = admin_usecase
        .comment_report(auth.user_id, report_id, report_comment_model)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn permission_catalogue(
    State(admin_usecase): State<AdminState>,
    _auth: AuthUser,
) -> impl IntoResponse {
    (StatusCode::OK, Json(admin_usecase.permission_catalogue()))
}

pub async fn list_admins(
    State(admin_usecase): State<AdminState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let admins = admin_usecase.list_admins(auth.user_id).await?;
    Ok((StatusCode::OK, Json(admins)))
}

pub async fn create_admin(
    State(admin_usecase): State<AdminState>,
    auth: AuthUser,
    Json(create_admin_model): Json<CreateAdminModel>,
) -> Result<impl IntoResponse, AppError> {
    let admin = admin_usecase
        .create_admin(auth.user_id, create_admin_model)
        .await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

pub async fn update_admin(
    State(admin_usecase): State<AdminState>,
    auth: AuthUser,
    Path(admin_id): Path<Uuid>,
    Json(update_admin_model): Json<UpdateAdminModel>,
) -> Result<impl IntoResponse, AppError> {
    let admin = admin_usecase
        .update_admin(auth.user_id, admin_id, update_admin_model)
        .await?;
    Ok((StatusCode::OK, Json(admin)))
}

pub async fn delete_admin(
    State(admin_usecase): State<AdminState>,
    auth: AuthUser,
    Path(admin_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    admin_usecase.delete_admin(auth.user_id, admin_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_distribution(
    State(admin_usecase): State<AdminState>,
    auth: AuthUser,
    Json(create_distribution_model): Json<CreateDistributionModel>,
) -> Result<impl IntoResponse, AppError> {
    let distribution = admin_usecase
        .create_distribution(auth.user_id, create_distribution_model)
        .await?;
    Ok((StatusCode::CREATED, Json(distribution)))
}

pub async fn list_distributions(
    State(admin_usecase): State<AdminState>,
    auth: AuthUser,
    Query(page_query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let distributions = admin_usecase
        .list_distributions(auth.user_id, Page::from(page_query))
        .await?;
    Ok((StatusCode::OK, Json(distributions)))
}

pub async fn update_distribution(
    State(admin_usecase): State<AdminState>,
    auth: AuthUser,
    Path(distribution_id): Path<Uuid>,
    Json(update_distribution_model): Json<UpdateDistributionModel>,
) -> Result<impl IntoResponse, AppError> {
    let distribution = admin_usecase
        .update_distribution(auth.user_id, distribution_id, update_distribution_model)
        .await?;
    Ok((StatusCode::OK, Json(distribution)))
}

pub async fn dashboard(
    State(analytics_usecase): State<AnalyticsState>,
    auth: AuthUser,
    Query(dashboard_query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let report = analytics_usecase
        .dashboard(auth.user_id, dashboard_query)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}
