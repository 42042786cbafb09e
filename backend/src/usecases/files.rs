use std::sync::Arc;

use chrono::{DateTime, Utc};
use crates::{
    domain::{
        entities::files::{FileEntity, InsertFileEntity},
        repositories::files::FileRepository,
    },
    storage::ObjectStorage,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FileDto {
    pub id: Uuid,
    pub name: String,
    pub size: i64,
    pub content_type: Option<String>,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum FileError {
    #[error("file is empty")]
    EmptyFile,
    #[error("file exceeds the {limit} byte upload limit")]
    TooLarge { limit: usize },
    #[error("file not found")]
    NotFound,
    #[error("file belongs to another user")]
    NotOwner,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl FileError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            FileError::EmptyFile => StatusCode::BAD_REQUEST,
            FileError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            FileError::NotFound => StatusCode::NOT_FOUND,
            FileError::NotOwner => StatusCode::FORBIDDEN,
            FileError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, FileError>;

pub struct FileUseCase<F, S>
where
    F: FileRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    file_repo: Arc<F>,
    storage: Arc<S>,
    max_upload_bytes: usize,
}

impl<F, S> FileUseCase<F, S>
where
    F: FileRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    pub fn new(file_repo: Arc<F>, storage: Arc<S>, max_upload_bytes: usize) -> Self {
        Self {
            file_repo,
            storage,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    fn to_dto(&self, file: FileEntity) -> FileDto {
        FileDto {
            url: self.storage.public_url(&file.storage_key),
            id: file.id,
            name: file.name,
            size: file.size,
            content_type: file.content_type,
            created_at: file.created_at,
        }
    }

    pub async fn upload(
        &self,
        owner_id: Uuid,
        file_name: String,
        bytes: Vec<u8>,
    ) -> UseCaseResult<FileDto> {
        if bytes.is_empty() {
            return Err(FileError::EmptyFile);
        }
        if bytes.len() > self.max_upload_bytes {
            return Err(FileError::TooLarge {
                limit: self.max_upload_bytes,
            });
        }

        let stored = self
            .storage
            .upload(file_name.clone(), bytes)
            .await
            .map_err(|err| {
                error!(%owner_id, error = ?err, "files: upload to object storage failed");
                FileError::Internal(err)
            })?;

        let created = self
            .file_repo
            .create(InsertFileEntity {
                owner_id: Some(owner_id),
                name: file_name,
                size: stored.size,
                content_type: Some(stored.content_type),
                storage_key: stored.key.clone(),
            })
            .await;

        let file = match created {
            Ok(file) => file,
            Err(err) => {
                error!(%owner_id, db_error = ?err, "files: failed to record upload");
                if let Err(cleanup) = self.storage.delete(stored.key).await {
                    warn!(error = ?cleanup, "files: orphaned object left in storage");
                }
                return Err(FileError::Internal(err));
            }
        };

        info!(%owner_id, file_id = %file.id, size = file.size, "files: uploaded");
        Ok(self.to_dto(file))
    }

    pub async fn delete(&self, owner_id: Uuid, file_id: Uuid) -> UseCaseResult<()> {
        let file = self
            .file_repo
            .find_by_id(file_id)
            .await
            .map_err(|err| {
                error!(%file_id, db_error = ?err, "files: failed to load file");
                FileError::Internal(err)
            })?
            .ok_or(FileError::NotFound)?;
        if file.owner_id != Some(owner_id) {
            return Err(FileError::NotOwner);
        }

        self.storage
            .delete(file.storage_key.clone())
            .await
            .map_err(|err| {
                error!(%file_id, error = ?err, "files: failed to delete object");
                FileError::Internal(err)
            })?;
        self.file_repo.delete(file_id).await.map_err(|err| {
            error!(%file_id, db_error = ?err, "files: failed to delete record");
            FileError::Internal(err)
        })?;

        info!(%owner_id, %file_id, "files: deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crates::{
        domain::repositories::files::MockFileRepository,
        storage::{MockObjectStorage, StoredObject},
    };
    use mockall::predicate::eq;

    const LIMIT: usize = 16;

    fn storage_with_url() -> MockObjectStorage {
        let mut storage = MockObjectStorage::new();
        storage
            .expect_public_url()
            .returning(|key| format!("https://cdn.example.com/{key}"));
        storage
    }

    fn file(id: Uuid, owner_id: Uuid) -> FileEntity {
        FileEntity {
            id,
            owner_id: Some(owner_id),
            name: "avatar.png".to_string(),
            size: 4,
            content_type: Some("image/png".to_string()),
            storage_key: "uploads/avatar.png".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn oversized_upload_never_reaches_storage() {
        let mut storage = MockObjectStorage::new();
        storage.expect_upload().never();
        let usecase = FileUseCase::new(Arc::new(MockFileRepository::new()), Arc::new(storage), LIMIT);

        let err = usecase
            .upload(Uuid::new_v4(), "big.bin".to_string(), vec![0; LIMIT + 1])
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn upload_records_stored_object() {
        let owner_id = Uuid::new_v4();
        let mut storage = storage_with_url();
        storage
            .expect_upload()
            .with(eq("avatar.png".to_string()), eq(vec![1u8, 2, 3, 4]))
            .returning(|_, bytes| {
                Ok(StoredObject {
                    key: "uploads/avatar.png".to_string(),
                    content_type: "image/png".to_string(),
                    size: bytes.len() as i64,
                })
            });
        let mut files = MockFileRepository::new();
        files
            .expect_create()
            .withf(move |insert| {
                insert.owner_id == Some(owner_id) && insert.storage_key == "uploads/avatar.png"
            })
            .returning(move |_| Ok(file(Uuid::new_v4(), owner_id)));
        let usecase = FileUseCase::new(Arc::new(files), Arc::new(storage), LIMIT);

        let dto = usecase
            .upload(owner_id, "avatar.png".to_string(), vec![1, 2, 3, 4])
            .await
            .unwrap();

        assert_eq!(dto.url, "https://cdn.example.com/uploads/avatar.png");
        assert_eq!(dto.size, 4);
    }

    #[tokio::test]
    async fn failed_record_removes_uploaded_object() {
        let mut storage = MockObjectStorage::new();
        storage.expect_upload().returning(|_, _| {
            Ok(StoredObject {
                key: "uploads/a.txt".to_string(),
                content_type: "text/plain".to_string(),
                size: 1,
            })
        });
        storage
            .expect_delete()
            .with(eq("uploads/a.txt".to_string()))
            .times(1)
            .returning(|_| Ok(()));
        let mut files = MockFileRepository::new();
        files
            .expect_create()
            .returning(|_| Err(anyhow::anyhow!("connection reset")));
        let usecase = FileUseCase::new(Arc::new(files), Arc::new(storage), LIMIT);

        let err = usecase
            .upload(Uuid::new_v4(), "a.txt".to_string(), vec![1])
            .await
            .unwrap_err();

        assert!(matches!(err, FileError::Internal(_)));
    }

    #[tokio::test]
    async fn only_owner_can_delete() {
        let mut files = MockFileRepository::new();
        files
            .expect_find_by_id()
            .returning(|id| Ok(Some(file(id, Uuid::new_v4()))));
        files.expect_delete().never();
        let usecase = FileUseCase::new(Arc::new(files), Arc::new(MockObjectStorage::new()), LIMIT);

        let err = usecase
            .delete(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, FileError::NotOwner));
    }

    #[tokio::test]
    async fn owner_delete_removes_object_and_record() {
        let (owner_id, file_id) = (Uuid::new_v4(), Uuid::new_v4());
        let mut files = MockFileRepository::new();
        files
            .expect_find_by_id()
            .returning(move |id| Ok(Some(file(id, owner_id))));
        files
            .expect_delete()
            .with(eq(file_id))
            .times(1)
            .returning(|_| Ok(()));
        let mut storage = MockObjectStorage::new();
        storage
            .expect_delete()
            .with(eq("uploads/avatar.png".to_string()))
            .times(1)
            .returning(|_| Ok(()));
        let usecase = FileUseCase::new(Arc::new(files), Arc::new(storage), LIMIT);

        usecase.delete(owner_id, file_id).await.unwrap();
    }
}
