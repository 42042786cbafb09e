use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use mockall::automock;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::infra::token_cache::TokenCache;

/// Provider tokens live for a month; refresh well before that.
const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub base_url: String,
    pub email: String,
    pub password: String,
    pub sender: String,
    pub request_timeout_secs: u64,
}

#[automock]
#[async_trait]
pub trait SmsSender {
    async fn send(&self, phone_number: String, message: String) -> Result<()>;
}

pub struct SmsClient {
    http: reqwest::Client,
    config: SmsConfig,
    token: TokenCache,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    data: LoginData,
}

#[derive(Deserialize)]
struct LoginData {
    token: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    mobile_phone: &'a str,
    message: &'a str,
    from: &'a str,
}

impl SmsClient {
    pub fn new(config: SmsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build sms http client")?;

        Ok(Self {
            http,
            config,
            token: TokenCache::default(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn access_token(&self) -> Result<String> {
        let now = Utc::now();
        if let Some(token) = self.token.get(now).await {
            return Ok(token);
        }

        let resp = self
            .http
            .post(self.url("api/auth/login"))
            .json(&LoginRequest {
                email: &self.config.email,
                password: &self.config.password,
            })
            .send()
            .await
            .context("sms provider login request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(status = %status, response_body = %body, "sms provider login failed");
            anyhow::bail!("SMS provider login failed with status {}", status);
        }

        let parsed: LoginResponse = resp
            .json()
            .await
            .context("sms provider login response is not valid json")?;

        self.token
            .store(parsed.data.token.clone(), now + Duration::hours(TOKEN_TTL_HOURS))
            .await;
        Ok(parsed.data.token)
    }
}

#[async_trait]
impl SmsSender for SmsClient {
    async fn send(&self, phone_number: String, message: String) -> Result<()> {
        let token = self.access_token().await?;

        let resp = self
            .http
            .post(self.url("api/message/sms/send"))
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .json(&SendRequest {
                mobile_phone: &phone_number,
                message: &message,
                from: &self.config.sender,
            })
            .send()
            .await
            .context("sms send request failed")?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.token.clear().await;
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(status = %status, response_body = %body, "sms send failed");
            anyhow::bail!("SMS send failed with status {}", status);
        }

        info!(phone_number = %phone_number, "sms sent");
        Ok(())
    }
}
