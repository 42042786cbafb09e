use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bank code of the gateway's settlement bank, sent with every recipient lookup.
pub const SETTLEMENT_MFO: &str = "00491";

/// Account type that may receive creator payouts.
pub const PAYOUT_ACCOUNT_TYPE: &str = "tirikchilik";

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: Value,
}

impl GatewayResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// String at `data.<key>` in the response body.
    pub fn data_str(&self, key: &str) -> Option<String> {
        self.body
            .get("data")
            .and_then(|data| data.get(key))
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Payout accounts listed by `check_account`.
    pub fn payout_accounts(&self) -> Vec<String> {
        self.body
            .pointer("/data/accounts")
            .and_then(Value::as_array)
            .map(|accounts| {
                accounts
                    .iter()
                    .filter(|account| {
                        account.get("type").and_then(Value::as_str) == Some(PAYOUT_ACCOUNT_TYPE)
                    })
                    .filter_map(|account| account.get("account").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// PINFL reported by `check_account`.
    pub fn account_pinfl(&self) -> Option<String> {
        self.body
            .pointer("/data/user/pinfl")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CardToken {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SplitLeg {
    #[serde(rename = "type")]
    pub kind: String,
    // Field name as spelled by the gateway API.
    #[serde(rename = "receipient")]
    pub recipient: String,
    pub amount: i64,
    pub details: String,
}

impl SplitLeg {
    pub fn account(recipient: String, amount: i64, details: &str) -> Self {
        Self {
            kind: "account".to_string(),
            recipient,
            amount,
            details: details.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SplitPaymentRequest {
    pub card: CardToken,
    pub amount: i64,
    pub store_id: String,
    pub invoice_id: String,
    pub split: Vec<SplitLeg>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AuthRequest<'a> {
    pub application_id: &'a str,
    pub secret: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    pub token: String,
    pub expiry: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BindCardRequest<'a> {
    pub store_id: &'a str,
    pub callback_url: &'a str,
    pub phone: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RecipientRequest<'a> {
    pub tin: &'a str,
    pub mfo: &'a str,
    pub account_no: &'a str,
    pub commitent: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ConfirmRequest<'a> {
    pub otp: &'a str,
}
