use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::usecases::{
    admin::AdminError, analytics::AnalyticsError, auth::AuthUseCaseError, cards::CardError,
    chat::ChatError, content::ContentError, creators::CreatorError, devices::DeviceError,
    donations::DonationError, files::FileError, payments::PaymentError, social::SocialError,
    subscriptions::SubscriptionError,
};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Business-rule violation with the status it maps to and, for gateway
    /// failures, the raw gateway response.
    #[error("{message}")]
    Validation {
        status: StatusCode,
        message: String,
        detail: Option<Value>,
    },

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(status: StatusCode, message: impl Into<String>) -> Self {
        AppError::Validation {
            status,
            message: message.into(),
            detail: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string(), None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Validation {
                status,
                message,
                detail,
            } => (status, message, detail),
            AppError::Internal(err) => {
                // Don't leak internal error detail to client
                error!(error = ?err, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
            detail,
        });

        (status, body).into_response()
    }
}

/// Maps a usecase error onto `AppError`: server-side statuses become `Internal`,
/// everything else a `Validation` error carrying the usecase message.
macro_rules! from_usecase_error {
    ($($error:ty),* $(,)?) => {
        $(
            impl From<$error> for AppError {
                fn from(err: $error) -> Self {
                    let status = err.status_code();
                    if status.is_server_error() {
                        return AppError::Internal(anyhow::Error::new(err));
                    }
                    AppError::Validation {
                        status,
                        message: err.to_string(),
                        detail: None,
                    }
                }
            }
        )*
    };
}

from_usecase_error!(
    AdminError,
    AnalyticsError,
    AuthUseCaseError,
    ChatError,
    ContentError,
    DeviceError,
    FileError,
    SocialError,
);

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        let status = err.status_code();
        if status.is_server_error() {
            return AppError::Internal(anyhow::Error::new(err));
        }
        AppError::Validation {
            status,
            message: err.to_string(),
            detail: err.gateway_detail(),
        }
    }
}

impl From<CreatorError> for AppError {
    fn from(err: CreatorError) -> Self {
        let status = err.status_code();
        if status.is_server_error() {
            return AppError::Internal(anyhow::Error::new(err));
        }
        AppError::Validation {
            status,
            message: err.to_string(),
            detail: err.gateway_detail(),
        }
    }
}

impl From<CardError> for AppError {
    fn from(err: CardError) -> Self {
        match err {
            CardError::Payment(payment) => payment.into(),
            other => {
                let status = other.status_code();
                if status.is_server_error() {
                    return AppError::Internal(anyhow::Error::new(other));
                }
                AppError::Validation {
                    status,
                    message: other.to_string(),
                    detail: None,
                }
            }
        }
    }
}

impl From<SubscriptionError> for AppError {
    fn from(err: SubscriptionError) -> Self {
        match err {
            SubscriptionError::Payment(payment) => payment.into(),
            SubscriptionError::PendingConfirmation { transaction_id } => AppError::Validation {
                status: err.status_code(),
                message: err.to_string(),
                detail: Some(serde_json::json!({ "transaction_id": transaction_id })),
            },
            other => {
                let status = other.status_code();
                if status.is_server_error() {
                    return AppError::Internal(anyhow::Error::new(other));
                }
                AppError::validation(status, other.to_string())
            }
        }
    }
}

impl From<DonationError> for AppError {
    fn from(err: DonationError) -> Self {
        match err {
            DonationError::Payment(payment) => payment.into(),
            other => {
                let status = other.status_code();
                if status.is_server_error() {
                    return AppError::Internal(anyhow::Error::new(other));
                }
                AppError::validation(status, other.to_string())
            }
        }
    }
}
