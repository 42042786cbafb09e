use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use reqwest::{Method, header::AUTHORIZATION};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, error, warn};

use super::{
    PaymentGateway,
    models::{
        AuthRequest, AuthResponse, BindCardRequest, ConfirmRequest, GatewayResponse,
        RecipientRequest, SETTLEMENT_MFO, SplitPaymentRequest,
    },
};
use crate::infra::token_cache::TokenCache;

/// Token lifetime assumed when the auth response carries no parsable expiry.
const FALLBACK_TOKEN_TTL_MINUTES: i64 = 50;

#[derive(Debug, Clone)]
pub struct MultibankConfig {
    pub base_url: String,
    pub application_id: String,
    pub secret: String,
    pub store_id: String,
    pub merchant_id: String,
    pub callback_url: String,
    pub request_timeout_secs: u64,
}

impl MultibankConfig {
    pub fn new(
        base_url: String,
        application_id: String,
        secret: String,
        store_id: String,
        merchant_id: String,
        callback_url: String,
        request_timeout_secs: u64,
    ) -> Self {
        Self {
            base_url,
            application_id,
            secret,
            store_id,
            merchant_id,
            callback_url,
            request_timeout_secs,
        }
    }
}

/// Multibank payment gateway client built on reqwest.
pub struct MultibankClient {
    http: reqwest::Client,
    config: MultibankConfig,
    token: TokenCache,
}

impl MultibankClient {
    pub fn new(config: MultibankConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build multibank http client")?;

        Ok(Self {
            http,
            config,
            token: TokenCache::default(),
        })
    }

    pub fn store_id(&self) -> &str {
        &self.config.store_id
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
            .post(self.url("auth"))
            .json(&AuthRequest {
                application_id: &self.config.application_id,
                secret: &self.config.secret,
            })
            .send()
            .await
            .context("multibank auth request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(
                status = %status,
                response_body = %body,
                context = "auth",
                "multibank api request failed"
            );
            anyhow::bail!("Multibank auth failed with status {}", status);
        }

        let parsed: AuthResponse = resp
            .json()
            .await
            .context("multibank auth response is not valid json")?;
        let expires_at = parse_expiry(parsed.expiry.as_deref(), now);

        debug!(expires_at = %expires_at, "multibank token refreshed");
        self.token.store(parsed.token.clone(), expires_at).await;
        Ok(parsed.token)
    }

    async fn call<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        context: &str,
    ) -> Result<GatewayResponse> {
        let token = self.access_token().await?;
        let mut request = self
            .http
            .request(method, self.url(path))
            .header(AUTHORIZATION, format!("Bearer {}", token));
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request
            .send()
            .await
            .with_context(|| format!("multibank request failed: {}", context))?;
        let response = read_response(resp).await;

        if response.status == 401 {
            self.token.clear().await;
        }
        if !response.is_success() {
            error!(
                status = response.status,
                response_body = %response.body,
                context = %context,
                "multibank api request failed"
            );
        }

        Ok(response)
    }
}

/// Non-JSON bodies are reported as a 400 with the raw text under `detail`.
async fn read_response(resp: reqwest::Response) -> GatewayResponse {
    let status = resp.status().as_u16();
    let text = match resp.text().await {
        Ok(text) => text,
        Err(err) => format!("<failed to read response body: {err}>"),
    };

    match serde_json::from_str::<Value>(&text) {
        Ok(body) => GatewayResponse { status, body },
        Err(_) => {
            warn!(status, "multibank returned a non-json body");
            GatewayResponse {
                status: 400,
                body: json!({ "detail": text }),
            }
        }
    }
}

fn parse_expiry(raw: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let fallback = now + Duration::minutes(FALLBACK_TOKEN_TTL_MINUTES);
    let Some(raw) = raw else {
        return fallback;
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc);
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return parsed.and_utc();
    }
    fallback
}

#[async_trait]
impl PaymentGateway for MultibankClient {
    async fn bind_card(&self, phone: String) -> Result<GatewayResponse> {
        let body = BindCardRequest {
            store_id: &self.config.store_id,
            callback_url: &self.config.callback_url,
            phone: &phone,
        };
        self.call(Method::POST, "payment/card/bind", Some(&body), "bind card")
            .await
    }

    async fn remove_card(&self, card_token: String) -> Result<GatewayResponse> {
        self.call::<Value>(
            Method::DELETE,
            &format!("payment/card/{}", card_token),
            None,
            "remove card",
        )
        .await
    }

    async fn create_payment(&self, request: SplitPaymentRequest) -> Result<GatewayResponse> {
        self.call(Method::POST, "payment", Some(&request), "create payment")
            .await
    }

    async fn confirm_payment(
        &self,
        transaction_id: String,
        otp: Option<String>,
    ) -> Result<GatewayResponse> {
        let path = format!("payment/{}", transaction_id);
        match otp.as_deref() {
            Some(otp) => {
                self.call(
                    Method::PUT,
                    &path,
                    Some(&ConfirmRequest { otp }),
                    "confirm payment",
                )
                .await
            }
            None => {
                self.call::<Value>(Method::PUT, &path, None, "confirm payment")
                    .await
            }
        }
    }

    async fn check_account(&self, phone: String) -> Result<GatewayResponse> {
        let token = self.access_token().await?;
        let resp = self
            .http
            .get(self.url("mobile/user/check_account"))
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .query(&[("phone", phone.as_str())])
            .send()
            .await
            .context("multibank request failed: check account")?;
        let response = read_response(resp).await;
        if !response.is_success() {
            error!(
                status = response.status,
                response_body = %response.body,
                context = "check account",
                "multibank api request failed"
            );
        }
        Ok(response)
    }

    async fn get_recipient(&self, tin: String, account_no: String) -> Result<GatewayResponse> {
        let body = RecipientRequest {
            tin: &tin,
            mfo: SETTLEMENT_MFO,
            account_no: &account_no,
            commitent: true,
        };
        let path = format!("payment/merchant/{}/account", self.config.merchant_id);
        self.call(Method::POST, &path, Some(&body), "get recipient")
            .await
    }
}

/// Whether a confirm response reports a settled payment.
pub fn payment_succeeded(response: &GatewayResponse) -> bool {
    response.is_success()
        && response
            .body
            .pointer("/data/status")
            .and_then(Value::as_str)
            == Some("success")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_expiry() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let expiry = parse_expiry(Some("2025-01-01T12:00:00+05:00"), now);
        assert_eq!(expiry, Utc.with_ymd_and_hms(2025, 1, 1, 7, 0, 0).unwrap());
    }

    #[test]
    fn parses_plain_expiry() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let expiry = parse_expiry(Some("2025-01-02 03:04:05"), now);
        assert_eq!(expiry, Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap());
    }

    #[test]
    fn falls_back_when_expiry_missing_or_garbled() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let expected = now + Duration::minutes(FALLBACK_TOKEN_TTL_MINUTES);
        assert_eq!(parse_expiry(None, now), expected);
        assert_eq!(parse_expiry(Some("tomorrow"), now), expected);
    }

    mod gateway_http {
        use super::*;
        use crate::multibank::models::{CardToken, SplitLeg};
        use wiremock::{
            Mock, MockServer, ResponseTemplate,
            matchers::{header, method, path},
        };

        fn client_for(server: &MockServer) -> MultibankClient {
            MultibankClient::new(MultibankConfig::new(
                server.uri(),
                "app".to_string(),
                "secret".to_string(),
                "store-1".to_string(),
                "merchant-1".to_string(),
                "https://sapi.test/callback".to_string(),
                5,
            ))
            .unwrap()
        }

        async fn mount_auth(server: &MockServer, expected_calls: u64) {
            Mock::given(method("POST"))
                .and(path("/auth"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "token": "tok-1",
                    "expiry": "2099-01-01T00:00:00+00:00"
                })))
                .expect(expected_calls)
                .mount(server)
                .await;
        }

        fn payment_request() -> SplitPaymentRequest {
            SplitPaymentRequest {
                card: CardToken {
                    token: "card-token".to_string(),
                },
                amount: 10_000,
                store_id: "store-1".to_string(),
                invoice_id: "invoice-1".to_string(),
                split: vec![SplitLeg::account("creator".to_string(), 8_800, "donation")],
            }
        }

        #[tokio::test]
        async fn reuses_cached_token() {
            let server = MockServer::start().await;
            mount_auth(&server, 1).await;
            Mock::given(method("POST"))
                .and(path("/payment/card/bind"))
                .and(header("authorization", "Bearer tok-1"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!({"data": {"url": "x"}})),
                )
                .expect(2)
                .mount(&server)
                .await;

            let client = client_for(&server);
            let first = client.bind_card("998901234567".to_string()).await.unwrap();
            let second = client.bind_card("998901234567".to_string()).await.unwrap();

            assert!(first.is_success());
            assert_eq!(second.data_str("url").as_deref(), Some("x"));
        }

        #[tokio::test]
        async fn unauthorized_response_drops_cached_token() {
            let server = MockServer::start().await;
            mount_auth(&server, 2).await;
            Mock::given(method("POST"))
                .and(path("/payment"))
                .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "expired"})))
                .up_to_n_times(1)
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/payment"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"data": {"uuid": "ext-1", "otp_hash": "h"}})),
                )
                .mount(&server)
                .await;

            let client = client_for(&server);
            let rejected = client.create_payment(payment_request()).await.unwrap();
            assert_eq!(rejected.status, 401);

            let accepted = client.create_payment(payment_request()).await.unwrap();
            assert!(accepted.is_success());
            assert_eq!(accepted.data_str("uuid").as_deref(), Some("ext-1"));
        }

        #[tokio::test]
        async fn non_json_body_is_reported_as_bad_request() {
            let server = MockServer::start().await;
            mount_auth(&server, 1).await;
            Mock::given(method("DELETE"))
                .and(path("/payment/card/card-token"))
                .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
                .mount(&server)
                .await;

            let client = client_for(&server);
            let response = client.remove_card("card-token".to_string()).await.unwrap();

            assert_eq!(response.status, 400);
            assert_eq!(response.body, json!({"detail": "Bad Gateway"}));
        }
    }

    #[test]
    fn payment_success_requires_status_field() {
        let ok = GatewayResponse {
            status: 200,
            body: json!({"data": {"status": "success"}}),
        };
        let pending = GatewayResponse {
            status: 200,
            body: json!({"data": {"status": "pending"}}),
        };
        let failed = GatewayResponse {
            status: 400,
            body: json!({"data": {"status": "success"}}),
        };

        assert!(payment_succeeded(&ok));
        assert!(!payment_succeeded(&pending));
        assert!(!payment_succeeded(&failed));
    }
}
