use std::sync::Arc;

use crates::{
    domain::{
        entities::devices::{DeviceEntity, InsertDeviceEntity},
        repositories::devices::DeviceRepository,
        value_objects::enums::device_types::DeviceType,
    },
    notifications::{PushOutcome, PushSender},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

const TEST_TITLE: &str = "Test notification";
const TEST_BODY: &str = "Push notifications are working";

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterDeviceModel {
    pub registration_token: String,
    pub device_type: DeviceType,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PushReport {
    pub delivered: usize,
    pub removed: usize,
    pub failed: usize,
}

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("registration token is required")]
    EmptyToken,
    #[error("no devices registered")]
    NoDevices,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl DeviceError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            DeviceError::EmptyToken => StatusCode::BAD_REQUEST,
            DeviceError::NoDevices => StatusCode::NOT_FOUND,
            DeviceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, DeviceError>;

/// Sends one message to every token, forgetting tokens the push service rejects.
pub async fn push_to_tokens<D, P>(
    device_repo: &D,
    push: &P,
    tokens: Vec<String>,
    title: &str,
    body: &str,
    data: Option<serde_json::Value>,
) -> PushReport
where
    D: DeviceRepository + Send + Sync + ?Sized,
    P: PushSender + Send + Sync + ?Sized,
{
    let mut report = PushReport::default();
    for token in tokens {
        match push
            .send(token.clone(), title.to_string(), body.to_string(), data.clone())
            .await
        {
            Ok(PushOutcome::Delivered) => report.delivered += 1,
            Ok(PushOutcome::InvalidToken) => {
                report.removed += 1;
                if let Err(err) = device_repo.remove_token(token).await {
                    warn!(error = ?err, "devices: failed to remove stale token");
                }
            }
            Err(err) => {
                report.failed += 1;
                warn!(error = ?err, "devices: push failed");
            }
        }
    }
    report
}

pub struct DeviceUseCase<D, P>
where
    D: DeviceRepository + Send + Sync + 'static,
    P: PushSender + Send + Sync + 'static,
{
    device_repo: Arc<D>,
    push: Arc<P>,
}

impl<D, P> DeviceUseCase<D, P>
where
    D: DeviceRepository + Send + Sync + 'static,
    P: PushSender + Send + Sync + 'static,
{
    pub fn new(device_repo: Arc<D>, push: Arc<P>) -> Self {
        Self { device_repo, push }
    }

    pub async fn register(
        &self,
        user_id: Uuid,
        model: RegisterDeviceModel,
    ) -> UseCaseResult<DeviceEntity> {
        let registration_token = model.registration_token.trim().to_string();
        if registration_token.is_empty() {
            return Err(DeviceError::EmptyToken);
        }

        let device = self
            .device_repo
            .upsert(InsertDeviceEntity {
                user_id,
                registration_token,
                device_type: model.device_type.to_string(),
            })
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "devices: failed to register device");
                DeviceError::Internal(err)
            })?;

        info!(%user_id, device_id = %device.id, device_type = %model.device_type, "devices: registered");
        Ok(device)
    }

    pub async fn send_test(&self, user_id: Uuid) -> UseCaseResult<PushReport> {
        let tokens = self.device_repo.tokens_for_user(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "devices: failed to load tokens");
            DeviceError::Internal(err)
        })?;
        if tokens.is_empty() {
            return Err(DeviceError::NoDevices);
        }

        let report = push_to_tokens(
            self.device_repo.as_ref(),
            self.push.as_ref(),
            tokens,
            TEST_TITLE,
            TEST_BODY,
            Some(json!({"kind": "test"})),
        )
        .await;
        info!(%user_id, delivered = report.delivered, removed = report.removed, "devices: test push sent");
        Ok(report)
    }
}
