pub mod accounts;
pub mod password;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{config_loader, config_model::UserSecret};

use self::accounts::AccountGate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub kind: TokenKind,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[derive(Debug)]
pub struct AuthError(anyhow::Error);

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError(err)
    }
}

impl AuthError {
    pub fn into_inner(self) -> anyhow::Error {
        self.0
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Tell axum how to convert `AuthError` into a response.
impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::UNAUTHORIZED,
            format!("Unauthorized: {}", self.0),
        )
            .into_response()
    }
}

fn sign(user_id: Uuid, kind: TokenKind, secret: &str, ttl_secs: i64) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        kind,
        iat: now.timestamp() as usize,
        exp: (now + Duration::seconds(ttl_secs)).timestamp() as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| anyhow::anyhow!("JWT signing failed: {}", e).into())
}

pub fn issue_access_token(user_id: Uuid, secrets: &UserSecret) -> Result<String, AuthError> {
    sign(
        user_id,
        TokenKind::Access,
        &secrets.secret,
        secrets.access_ttl_secs,
    )
}

pub fn issue_token_pair(user_id: Uuid, secrets: &UserSecret) -> Result<TokenPair, AuthError> {
    Ok(TokenPair {
        access: issue_access_token(user_id, secrets)?,
        refresh: sign(
            user_id,
            TokenKind::Refresh,
            &secrets.refresh_secret,
            secrets.refresh_ttl_secs,
        )?,
    })
}

fn validate(token: &str, secret: &str, expected: TokenKind) -> Result<Uuid, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    if token_data.claims.kind != expected {
        return Err(anyhow::anyhow!("unexpected token type").into());
    }

    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| anyhow::anyhow!("Invalid user ID in token").into())
}

pub fn validate_access_token(token: &str, secrets: &UserSecret) -> Result<Uuid, AuthError> {
    validate(token, &secrets.secret, TokenKind::Access)
}

pub fn validate_refresh_token(token: &str, secrets: &UserSecret) -> Result<Uuid, AuthError> {
    validate(token, &secrets.refresh_secret, TokenKind::Refresh)
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, (StatusCode, String)> {
    let auth_header = headers.get(axum::http::header::AUTHORIZATION).ok_or((
        StatusCode::UNAUTHORIZED,
        "Missing Authorization header".to_string(),
    ))?;

    let auth_str = auth_header.to_str().map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            "Invalid Authorization header".to_string(),
        )
    })?;

    auth_str.strip_prefix("Bearer ").ok_or((
        StatusCode::UNAUTHORIZED,
        "Invalid Authorization header format".to_string(),
    ))
}

/// Tokens outlive deactivation, so the account is re-checked on every request.
pub async fn ensure_usable(
    accounts: &AccountGate,
    user_id: Uuid,
) -> Result<(), (StatusCode, String)> {
    match accounts.is_usable(user_id).await {
        Ok(true) => Ok(()),
        Ok(false) => {
            tracing::debug!(%user_id, "auth: token belongs to an inactive account");
            Err((StatusCode::UNAUTHORIZED, "User is inactive".to_string()))
        }
        Err(err) => {
            tracing::error!(%user_id, db_error = ?err, "auth: failed to load account");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        let secrets = config_loader::get_user_secret().map_err(|e| {
            tracing::error!(error = ?e, "auth: failed to load jwt secrets");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        })?;

        let user_id = validate_access_token(token, &secrets)
            .map_err(|e| (StatusCode::UNAUTHORIZED, e.0.to_string()))?;

        let accounts = parts.extensions.get::<AccountGate>().cloned().ok_or_else(|| {
            tracing::error!("auth: account gate is not installed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        })?;
        ensure_usable(&accounts, user_id).await?;

        Ok(AuthUser { user_id })
    }
}
