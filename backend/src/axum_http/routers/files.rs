use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
};
use crates::{infra::db::repositories::files::FilePostgres, storage::s3::S3ObjectStorage};
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::{app_context::AppContext, error_responses::AppError},
    usecases::files::FileUseCase,
};

type FileState = Arc<FileUseCase<FilePostgres, S3ObjectStorage>>;

const FILE_FIELD: &str = "file";
// Room for multipart boundaries and headers around the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn routes(ctx: &AppContext) -> Router {
    let max_upload_bytes = ctx.config.storage.max_upload_bytes;
    let files_usecase = FileUseCase::new(
        Arc::new(FilePostgres::new(Arc::clone(&ctx.db_pool))),
        Arc::clone(&ctx.storage),
        max_upload_bytes,
    );

    Router::new()
        .route(
            "/files",
            post(upload_file).layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD)),
        )
        .route("/files/:file_id", delete(delete_file))
        .with_state(Arc::new(files_usecase))
}

pub async fn upload_file(
    State(files_usecase): State<FileState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|err| {
        warn!(error = %err, "files: malformed multipart body");
        AppError::BadRequest(err.body_text())
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "upload".to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(err.body_text()))?;

        let file = files_usecase
            .upload(auth.user_id, file_name, bytes.to_vec())
            .await?;
        return Ok((StatusCode::CREATED, Json(file)));
    }

    Err(AppError::BadRequest(format!(
        "multipart field `{FILE_FIELD}` is required"
    )))
}

pub async fn delete_file(
    State(files_usecase): State<FileState>,
    auth: AuthUser,
    Path(file_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    files_usecase.delete(auth.user_id, file_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
