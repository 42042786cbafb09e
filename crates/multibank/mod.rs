pub mod client;
pub mod models;

pub use client::{MultibankClient, MultibankConfig, payment_succeeded};
pub use models::{CardToken, GatewayResponse, SplitLeg, SplitPaymentRequest};

use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

/// Transport-level view of the payment gateway. Every call returns the raw
/// status and JSON body; callers decide what a non-2xx response means.
#[automock]
#[async_trait]
pub trait PaymentGateway {
    /// Starts a card binding session for the phone; the body carries the form url.
    async fn bind_card(&self, phone: String) -> Result<GatewayResponse>;

    async fn remove_card(&self, card_token: String) -> Result<GatewayResponse>;

    async fn create_payment(&self, request: SplitPaymentRequest) -> Result<GatewayResponse>;

    async fn confirm_payment(
        &self,
        transaction_id: String,
        otp: Option<String>,
    ) -> Result<GatewayResponse>;

    async fn check_account(&self, phone: String) -> Result<GatewayResponse>;

    async fn get_recipient(&self, tin: String, account_no: String) -> Result<GatewayResponse>;
}
