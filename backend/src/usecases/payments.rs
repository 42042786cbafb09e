use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crates::{
    domain::{
        entities::transactions::{InsertTransactionEntity, TransactionEntity},
        repositories::{
            activities::ActivityRepository, cards::CardRepository,
            donations::DonationRepository, fundraisings::FundraisingRepository,
            subscriptions::SubscriptionRepository, transactions::TransactionRepository,
            users::UserRepository,
        },
        value_objects::{
            enums::{
                activity_types::ActivityType, transaction_statuses::TransactionStatus,
                transaction_types::TransactionType,
            },
            payment_split::{PaymentSplit, SplitError},
        },
    },
    multibank::{
        CardToken, GatewayResponse, PaymentGateway, SplitLeg, SplitPaymentRequest,
        payment_succeeded,
    },
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::activities::ActivityRecorder;

/// One split charge against a payer's bound card.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeRequest {
    pub payer_id: Uuid,
    pub creator_id: Uuid,
    pub card_id: Uuid,
    pub amount: i64,
    pub kind: TransactionType,
    pub fundraising_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PaymentOutcome {
    Paid { transaction_id: Uuid },
    NeedsConfirmation { transaction_id: Uuid },
}

impl PaymentOutcome {
    pub fn transaction_id(&self) -> Uuid {
        match self {
            PaymentOutcome::Paid { transaction_id }
            | PaymentOutcome::NeedsConfirmation { transaction_id } => *transaction_id,
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentOutcome::Paid { .. })
    }
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("amount must be positive")]
    NonPositiveAmount,
    #[error("{0}")]
    InvalidSplit(#[from] SplitError),
    #[error("card not found")]
    CardNotFound,
    #[error("card is not active")]
    CardNotActive,
    #[error("creator not found")]
    CreatorNotFound,
    #[error("creator cannot receive payments yet")]
    CreatorCannotReceivePayments,
    #[error("you cannot pay yourself")]
    SelfPayment,
    #[error("transaction not found")]
    TransactionNotFound,
    #[error("transaction belongs to another user")]
    NotPayer,
    #[error("transaction is already finalized")]
    AlreadyFinalized,
    #[error("transaction is not waiting for confirmation")]
    NoPendingConfirmation,
    #[error("payment gateway rejected the request")]
    Gateway { response: Value },
    #[error("payment was declined")]
    Declined { response: Value },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PaymentError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PaymentError::CardNotFound
            | PaymentError::CreatorNotFound
            | PaymentError::TransactionNotFound => StatusCode::NOT_FOUND,
            PaymentError::NotPayer => StatusCode::FORBIDDEN,
            PaymentError::NonPositiveAmount
            | PaymentError::InvalidSplit(_)
            | PaymentError::CardNotActive
            | PaymentError::CreatorCannotReceivePayments
            | PaymentError::SelfPayment
            | PaymentError::AlreadyFinalized
            | PaymentError::NoPendingConfirmation
            | PaymentError::Gateway { .. }
            | PaymentError::Declined { .. } => StatusCode::BAD_REQUEST,
            PaymentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Raw gateway body for errors that came back from the gateway.
    pub fn gateway_detail(&self) -> Option<Value> {
        match self {
            PaymentError::Gateway { response } | PaymentError::Declined { response } => {
                Some(response.clone())
            }
            _ => None,
        }
    }
}

pub type PaymentResult<T> = std::result::Result<T, PaymentError>;

/// Seam used by the subscription and donation flows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn charge(&self, request: ChargeRequest) -> PaymentResult<PaymentOutcome>;

    async fn confirm_otp(
        &self,
        payer_id: Uuid,
        transaction_id: Uuid,
        otp: String,
    ) -> PaymentResult<PaymentOutcome>;

    /// Fails a transaction still waiting for its OTP when it was created before
    /// `started_before`. Returns `true` once the transaction can no longer be confirmed.
    async fn expire_pending(
        &self,
        transaction_id: Uuid,
        started_before: DateTime<Utc>,
    ) -> PaymentResult<bool>;
}

#[derive(Debug, Clone)]
pub struct PaymentSettings {
    pub store_id: String,
    /// Gateway recipient id of the platform's own account.
    pub sapi_recipient_id: String,
    pub commission_bps: i64,
}

pub struct PaymentOrchestrator<U, C, T, F, S, D, A, G>
where
    U: UserRepository + Send + Sync + 'static,
    C: CardRepository + Send + Sync + 'static,
    T: TransactionRepository + Send + Sync + 'static,
    F: FundraisingRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    D: DonationRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    card_repo: Arc<C>,
    transaction_repo: Arc<T>,
    fundraising_repo: Arc<F>,
    subscription_repo: Arc<S>,
    donation_repo: Arc<D>,
    activities: Arc<ActivityRecorder<A>>,
    gateway: Arc<G>,
    settings: PaymentSettings,
}

impl<U, C, T, F, S, D, A, G> PaymentOrchestrator<U, C, T, F, S, D, A, G>
where
    U: UserRepository + Send + Sync + 'static,
    C: CardRepository + Send + Sync + 'static,
    T: TransactionRepository + Send + Sync + 'static,
    F: FundraisingRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    D: DonationRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    pub fn new(
        user_repo: Arc<U>,
        card_repo: Arc<C>,
        transaction_repo: Arc<T>,
        fundraising_repo: Arc<F>,
        subscription_repo: Arc<S>,
        donation_repo: Arc<D>,
        activities: Arc<ActivityRecorder<A>>,
        gateway: Arc<G>,
        settings: PaymentSettings,
    ) -> Self {
        Self {
            user_repo,
            card_repo,
            transaction_repo,
            fundraising_repo,
            subscription_repo,
            donation_repo,
            activities,
            gateway,
            settings,
        }
    }

    async fn mark_failed(&self, transaction_id: Uuid, response: Option<Value>) {
        if let Err(err) = self
            .transaction_repo
            .finalize(transaction_id, TransactionStatus::Failed, response)
            .await
        {
            error!(%transaction_id, db_error = ?err, "payments: failed to mark transaction failed");
        }
    }

    /// Records a rejected gateway call and turns it into the error returned to the caller.
    async fn reject(&self, transaction_id: Uuid, response: GatewayResponse) -> PaymentError {
        warn!(
            %transaction_id,
            gateway_status = response.status,
            "payments: gateway rejected request"
        );
        self.mark_failed(transaction_id, Some(response.body.clone()))
            .await;
        PaymentError::Gateway {
            response: response.body,
        }
    }

    /// `confirmed_by_otp` is set when the checkout already returned and its
    /// caller could not record the activity itself.
    async fn settle(
        &self,
        transaction: &TransactionEntity,
        response: GatewayResponse,
        confirmed_by_otp: bool,
    ) -> PaymentResult<PaymentOutcome> {
        let transaction_id = transaction.id;
        if !response.is_success() {
            return Err(self.reject(transaction_id, response).await);
        }

        if !payment_succeeded(&response) {
            info!(%transaction_id, "payments: gateway declined payment");
            self.mark_failed(transaction_id, Some(response.body.clone()))
                .await;
            return Err(PaymentError::Declined {
                response: response.body,
            });
        }

        let changed = self
            .transaction_repo
            .finalize(transaction_id, TransactionStatus::Paid, Some(response.body))
            .await
            .map_err(|err| {
                error!(%transaction_id, db_error = ?err, "payments: failed to mark transaction paid");
                PaymentError::Internal(err)
            })?;

        if changed {
            self.apply_side_effects(transaction, confirmed_by_otp).await?;
        } else {
            warn!(%transaction_id, "payments: transaction was already finalized");
        }

        info!(%transaction_id, amount = transaction.amount, "payments: transaction paid");
        Ok(PaymentOutcome::Paid { transaction_id })
    }

    async fn apply_side_effects(
        &self,
        transaction: &TransactionEntity,
        confirmed_by_otp: bool,
    ) -> PaymentResult<()> {
        let transaction_id = transaction.id;

        if let Some(fundraising_id) = transaction.fundraising_id {
            self.fundraising_repo
                .increment_current_amount(fundraising_id, transaction.creator_amount)
                .await
                .map_err(|err| {
                    error!(
                        %transaction_id,
                        %fundraising_id,
                        db_error = ?err,
                        "payments: failed to credit fundraising"
                    );
                    PaymentError::Internal(err)
                })?;
        }

        match transaction.kind() {
            Some(TransactionType::Subscription) => {
                let activated = self
                    .subscription_repo
                    .activate_by_payment_reference(transaction_id, Utc::now())
                    .await
                    .map_err(|err| {
                        error!(%transaction_id, db_error = ?err, "payments: failed to activate subscription");
                        PaymentError::Internal(err)
                    })?;
                match activated {
                    Some((subscription, plan)) if confirmed_by_otp => {
                        info!(
                            %transaction_id,
                            subscription_id = %subscription.id,
                            end_date = %subscription.end_date,
                            "payments: subscription activated"
                        );
                        self.activities.record(
                            ActivityType::Subscribed,
                            transaction.payer_id,
                            transaction.creator_id,
                            Some(plan.id),
                            Some(plan.name),
                        );
                    }
                    Some(_) => {}
                    // Checkout upserts the row after the first charge returns.
                    None => info!(%transaction_id, "payments: no subscription waiting on this payment yet"),
                }
            }
            Some(TransactionType::Donation | TransactionType::Fundraising) if confirmed_by_otp => {
                let donation = self
                    .donation_repo
                    .find_by_transaction(transaction_id)
                    .await
                    .map_err(|err| {
                        error!(%transaction_id, db_error = ?err, "payments: failed to load donation");
                        PaymentError::Internal(err)
                    })?;
                match donation {
                    Some(donation) => {
                        self.activities.record(
                            ActivityType::Donation,
                            donation.donator_id,
                            donation.creator_id,
                            Some(donation.id),
                            donation.message,
                        );
                    }
                    None => warn!(%transaction_id, "payments: confirmed payment has no donation"),
                }
            }
            _ => {}
        }

        Ok(())
    }
}

#[async_trait]
impl<U, C, T, F, S, D, A, G> PaymentProcessor for PaymentOrchestrator<U, C, T, F, S, D, A, G>
where
    U: UserRepository + Send + Sync + 'static,
    C: CardRepository + Send + Sync + 'static,
    T: TransactionRepository + Send + Sync + 'static,
    F: FundraisingRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    D: DonationRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    async fn charge(&self, request: ChargeRequest) -> PaymentResult<PaymentOutcome> {
        let payer_id = request.payer_id;
        let creator_id = request.creator_id;
        info!(
            %payer_id,
            %creator_id,
            amount = request.amount,
            kind = %request.kind,
            "payments: charge requested"
        );

        if request.amount <= 0 {
            return Err(PaymentError::NonPositiveAmount);
        }
        if payer_id == creator_id {
            return Err(PaymentError::SelfPayment);
        }

        let card = self
            .card_repo
            .find_for_user(payer_id, request.card_id)
            .await
            .map_err(|err| {
                error!(%payer_id, db_error = ?err, "payments: failed to load card");
                PaymentError::Internal(err)
            })?
            .ok_or(PaymentError::CardNotFound)?;
        let card_token = card
            .payment_token()
            .ok_or(PaymentError::CardNotActive)?
            .to_string();

        let creator = self
            .user_repo
            .find_by_id(creator_id)
            .await
            .map_err(|err| {
                error!(%creator_id, db_error = ?err, "payments: failed to load creator");
                PaymentError::Internal(err)
            })?
            .filter(|user| !user.is_deleted)
            .ok_or(PaymentError::CreatorNotFound)?;
        if !creator.can_receive_payments() {
            return Err(PaymentError::CreatorCannotReceivePayments);
        }
        let (Some(pinfl), Some(account)) = (creator.pinfl.clone(), creator.multibank_account.clone())
        else {
            return Err(PaymentError::CreatorCannotReceivePayments);
        };

        let split = PaymentSplit::compute(
            request.amount,
            creator.sapi_share,
            self.settings.commission_bps,
        )?;

        let transaction = self
            .transaction_repo
            .create(InsertTransactionEntity {
                payer_id,
                creator_id,
                transaction_type: request.kind.to_string(),
                status: TransactionStatus::New.to_string(),
                amount: split.amount,
                sapi_amount: split.sapi_amount,
                creator_amount: split.creator_amount,
                card_token: card_token.clone(),
                store_id: self.settings.store_id.clone(),
                fundraising_id: request.fundraising_id,
            })
            .await
            .map_err(|err| {
                error!(%payer_id, db_error = ?err, "payments: failed to create transaction");
                PaymentError::Internal(err)
            })?;
        let transaction_id = transaction.id;

        let recipient = match self.gateway.get_recipient(pinfl, account).await {
            Ok(response) => response,
            Err(err) => {
                error!(%transaction_id, error = ?err, "payments: recipient lookup failed");
                self.mark_failed(transaction_id, None).await;
                return Err(PaymentError::Internal(err));
            }
        };
        if !recipient.is_success() {
            return Err(self.reject(transaction_id, recipient).await);
        }
        let Some(recipient_id) = recipient.data_str("uuid") else {
            return Err(self.reject(transaction_id, recipient).await);
        };

        let details = request.kind.split_details();
        let payment = SplitPaymentRequest {
            card: CardToken { token: card_token },
            amount: split.amount,
            store_id: self.settings.store_id.clone(),
            invoice_id: transaction_id.to_string(),
            split: vec![
                SplitLeg::account(recipient_id, split.creator_amount, details),
                SplitLeg::account(
                    self.settings.sapi_recipient_id.clone(),
                    split.sapi_amount,
                    details,
                ),
            ],
        };

        let response = self.gateway.create_payment(payment).await.map_err(|err| {
            // Outcome unknown: the transaction stays `new`.
            error!(%transaction_id, error = ?err, "payments: create payment request failed");
            PaymentError::Internal(err)
        })?;
        if !response.is_success() {
            return Err(self.reject(transaction_id, response).await);
        }

        let external_id = response.data_str("uuid");
        let otp_hash = response.data_str("otp_hash");
        self.transaction_repo
            .record_gateway_reference(
                transaction_id,
                external_id.clone(),
                otp_hash.clone(),
                response.body.clone(),
            )
            .await
            .map_err(|err| {
                error!(%transaction_id, db_error = ?err, "payments: failed to store gateway reference");
                PaymentError::Internal(err)
            })?;

        if otp_hash.is_some() {
            info!(%transaction_id, "payments: waiting for otp confirmation");
            return Ok(PaymentOutcome::NeedsConfirmation { transaction_id });
        }

        let Some(external_id) = external_id else {
            return Err(self.reject(transaction_id, response).await);
        };

        let confirmation = self
            .gateway
            .confirm_payment(external_id, None)
            .await
            .map_err(|err| {
                error!(%transaction_id, error = ?err, "payments: confirm request failed");
                PaymentError::Internal(err)
            })?;

        self.settle(&transaction, confirmation, false).await
    }

    async fn confirm_otp(
        &self,
        payer_id: Uuid,
        transaction_id: Uuid,
        otp: String,
    ) -> PaymentResult<PaymentOutcome> {
        info!(%payer_id, %transaction_id, "payments: otp confirmation requested");

        let transaction = self
            .transaction_repo
            .find_by_id(transaction_id)
            .await
            .map_err(|err| {
                error!(%transaction_id, db_error = ?err, "payments: failed to load transaction");
                PaymentError::Internal(err)
            })?
            .ok_or(PaymentError::TransactionNotFound)?;

        if transaction.payer_id != payer_id {
            return Err(PaymentError::NotPayer);
        }
        if transaction.status().is_terminal() {
            return Err(PaymentError::AlreadyFinalized);
        }
        let (Some(external_id), Some(_)) = (
            transaction.external_transaction_id.clone(),
            transaction.otp_hash.as_ref(),
        ) else {
            return Err(PaymentError::NoPendingConfirmation);
        };

        let response = self
            .gateway
            .confirm_payment(external_id, Some(otp))
            .await
            .map_err(|err| {
                error!(%transaction_id, error = ?err, "payments: otp confirm request failed");
                PaymentError::Internal(err)
            })?;

        self.settle(&transaction, response, true).await
    }

    async fn expire_pending(
        &self,
        transaction_id: Uuid,
        started_before: DateTime<Utc>,
    ) -> PaymentResult<bool> {
        let transaction = self
            .transaction_repo
            .find_by_id(transaction_id)
            .await
            .map_err(|err| {
                error!(%transaction_id, db_error = ?err, "payments: failed to load transaction");
                PaymentError::Internal(err)
            })?;
        let Some(transaction) = transaction else {
            return Ok(true);
        };
        if transaction.status().is_terminal() {
            return Ok(true);
        }
        if transaction.created_at >= started_before {
            return Ok(false);
        }

        let expired = self
            .transaction_repo
            .finalize(
                transaction_id,
                TransactionStatus::Failed,
                Some(json!({ "detail": "otp confirmation expired" })),
            )
            .await
            .map_err(|err| {
                error!(%transaction_id, db_error = ?err, "payments: failed to expire transaction");
                PaymentError::Internal(err)
            })?;
        if expired {
            info!(%transaction_id, created_at = %transaction.created_at, "payments: abandoned otp payment expired");
        }
        Ok(expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_fixtures::{
        sample_card, sample_creator, sample_plan, sample_subscription, sample_transaction,
        sample_user,
    };
    use crates::{
        domain::{
            entities::donations::DonationEntity,
            repositories::{
                activities::MockActivityRepository, cards::MockCardRepository,
                donations::MockDonationRepository, fundraisings::MockFundraisingRepository,
                subscriptions::MockSubscriptionRepository,
                transactions::MockTransactionRepository, users::MockUserRepository,
            },
        },
        multibank::MockPaymentGateway,
    };
    use mockall::predicate::eq;
    use serde_json::json;

    type TestOrchestrator = PaymentOrchestrator<
        MockUserRepository,
        MockCardRepository,
        MockTransactionRepository,
        MockFundraisingRepository,
        MockSubscriptionRepository,
        MockDonationRepository,
        MockActivityRepository,
        MockPaymentGateway,
    >;

    struct Mocks {
        users: MockUserRepository,
        cards: MockCardRepository,
        transactions: MockTransactionRepository,
        fundraisings: MockFundraisingRepository,
        subscriptions: MockSubscriptionRepository,
        donations: MockDonationRepository,
        activities: MockActivityRepository,
        gateway: MockPaymentGateway,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                users: MockUserRepository::new(),
                cards: MockCardRepository::new(),
                transactions: MockTransactionRepository::new(),
                fundraisings: MockFundraisingRepository::new(),
                subscriptions: MockSubscriptionRepository::new(),
                donations: MockDonationRepository::new(),
                activities: MockActivityRepository::new(),
                gateway: MockPaymentGateway::new(),
            }
        }

        fn build(self) -> TestOrchestrator {
            PaymentOrchestrator::new(
                Arc::new(self.users),
                Arc::new(self.cards),
                Arc::new(self.transactions),
                Arc::new(self.fundraisings),
                Arc::new(self.subscriptions),
                Arc::new(self.donations),
                Arc::new(ActivityRecorder::new(Arc::new(self.activities))),
                Arc::new(self.gateway),
                PaymentSettings {
                    store_id: "store-1".to_string(),
                    sapi_recipient_id: "sapi-recipient".to_string(),
                    commission_bps: 200,
                },
            )
        }
    }

    fn ok(body: Value) -> GatewayResponse {
        GatewayResponse { status: 200, body }
    }

    /// Card and creator lookups plus transaction creation echoing the split amounts.
    fn expect_checkout(mocks: &mut Mocks, payer_id: Uuid, creator_id: Uuid, card_id: Uuid, share: i32, tx_id: Uuid) {
        mocks
            .cards
            .expect_find_for_user()
            .with(eq(payer_id), eq(card_id))
            .returning(move |_, _| Ok(Some(sample_card(card_id, payer_id))));
        mocks
            .users
            .expect_find_by_id()
            .with(eq(creator_id))
            .returning(move |_| Ok(Some(sample_creator(creator_id, share))));
        mocks.transactions.expect_create().returning(move |insert| {
            let mut transaction =
                sample_transaction(tx_id, insert.payer_id, insert.creator_id, TransactionType::Donation);
            transaction.transaction_type = insert.transaction_type;
            transaction.amount = insert.amount;
            transaction.sapi_amount = insert.sapi_amount;
            transaction.creator_amount = insert.creator_amount;
            transaction.fundraising_id = insert.fundraising_id;
            Ok(transaction)
        });
        mocks
            .gateway
            .expect_get_recipient()
            .returning(|_, _| Ok(ok(json!({"data": {"uuid": "creator-recipient"}}))));
    }

    fn donation(payer_id: Uuid, creator_id: Uuid, card_id: Uuid, amount: i64) -> ChargeRequest {
        ChargeRequest {
            payer_id,
            creator_id,
            card_id,
            amount,
            kind: TransactionType::Donation,
            fundraising_id: None,
        }
    }

    #[tokio::test]
    async fn stale_pending_payment_is_failed() {
        let (payer_id, creator_id, tx_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::new();
        mocks
            .transactions
            .expect_find_by_id()
            .with(eq(tx_id))
            .returning(move |id| {
                let mut transaction =
                    sample_transaction(id, payer_id, creator_id, TransactionType::Subscription);
                transaction.created_at = Utc::now() - chrono::Duration::hours(2);
                Ok(Some(transaction))
            });
        mocks
            .transactions
            .expect_finalize()
            .withf(move |id, status, _| *id == tx_id && *status == TransactionStatus::Failed)
            .times(1)
            .returning(|_, _, _| Ok(true));

        let orchestrator = mocks.build();
        let cutoff = Utc::now() - chrono::Duration::minutes(15);

        assert!(orchestrator.expire_pending(tx_id, cutoff).await.unwrap());
    }

    #[tokio::test]
    async fn recent_pending_payment_is_kept() {
        let (payer_id, creator_id, tx_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::new();
        mocks.transactions.expect_find_by_id().returning(move |id| {
            Ok(Some(sample_transaction(
                id,
                payer_id,
                creator_id,
                TransactionType::Subscription,
            )))
        });
        mocks.transactions.expect_finalize().never();

        let orchestrator = mocks.build();
        let cutoff = Utc::now() - chrono::Duration::minutes(15);

        assert!(!orchestrator.expire_pending(tx_id, cutoff).await.unwrap());
    }

    #[tokio::test]
    async fn direct_payment_splits_between_creator_and_platform() {
        let (payer_id, creator_id, card_id, tx_id) =
            (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::new();
        expect_checkout(&mut mocks, payer_id, creator_id, card_id, 10, tx_id);

        mocks
            .gateway
            .expect_create_payment()
            .withf(move |request| {
                request.amount == 10_000
                    && request.invoice_id == tx_id.to_string()
                    && request.store_id == "store-1"
                    && request.split
                        == vec![
                            SplitLeg::account("creator-recipient".to_string(), 8_800, "Donation payment"),
                            SplitLeg::account("sapi-recipient".to_string(), 1_000, "Donation payment"),
                        ]
            })
            .times(1)
            .returning(|_| Ok(ok(json!({"data": {"uuid": "ext-1"}}))));
        mocks
            .transactions
            .expect_record_gateway_reference()
            .withf(|_, external, otp, _| external.as_deref() == Some("ext-1") && otp.is_none())
            .returning(|_, _, _, _| Ok(()));
        mocks
            .gateway
            .expect_confirm_payment()
            .with(eq("ext-1".to_string()), eq(None::<String>))
            .returning(|_, _| Ok(ok(json!({"data": {"status": "success"}}))));
        mocks
            .transactions
            .expect_finalize()
            .withf(move |id, status, _| *id == tx_id && *status == TransactionStatus::Paid)
            .times(1)
            .returning(|_, _, _| Ok(true));

        let outcome = mocks
            .build()
            .charge(donation(payer_id, creator_id, card_id, 10_000))
            .await
            .unwrap();

        assert_eq!(outcome, PaymentOutcome::Paid { transaction_id: tx_id });
    }

    #[tokio::test]
    async fn otp_hash_defers_confirmation() {
        let (payer_id, creator_id, card_id, tx_id) =
            (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::new();
        expect_checkout(&mut mocks, payer_id, creator_id, card_id, 10, tx_id);

        mocks
            .gateway
            .expect_create_payment()
            .returning(|_| Ok(ok(json!({"data": {"uuid": "ext-1", "otp_hash": "abc"}}))));
        mocks
            .transactions
            .expect_record_gateway_reference()
            .withf(|_, _, otp, _| otp.as_deref() == Some("abc"))
            .times(1)
            .returning(|_, _, _, _| Ok(()));
        mocks.gateway.expect_confirm_payment().never();
        mocks.transactions.expect_finalize().never();

        let outcome = mocks
            .build()
            .charge(donation(payer_id, creator_id, card_id, 10_000))
            .await
            .unwrap();

        assert_eq!(outcome, PaymentOutcome::NeedsConfirmation { transaction_id: tx_id });
    }

    #[tokio::test]
    async fn gateway_rejection_marks_transaction_failed() {
        let (payer_id, creator_id, card_id, tx_id) =
            (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::new();
        expect_checkout(&mut mocks, payer_id, creator_id, card_id, 10, tx_id);

        mocks.gateway.expect_create_payment().returning(|_| {
            Ok(GatewayResponse {
                status: 422,
                body: json!({"message": "insufficient funds"}),
            })
        });
        mocks
            .transactions
            .expect_finalize()
            .withf(move |id, status, response| {
                *id == tx_id && *status == TransactionStatus::Failed && response.is_some()
            })
            .times(1)
            .returning(|_, _, _| Ok(true));

        let err = mocks
            .build()
            .charge(donation(payer_id, creator_id, card_id, 10_000))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(
            err.gateway_detail(),
            Some(json!({"message": "insufficient funds"}))
        );
    }

    #[tokio::test]
    async fn declined_confirmation_fails_transaction() {
        let (payer_id, creator_id, card_id, tx_id) =
            (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::new();
        expect_checkout(&mut mocks, payer_id, creator_id, card_id, 10, tx_id);

        mocks
            .gateway
            .expect_create_payment()
            .returning(|_| Ok(ok(json!({"data": {"uuid": "ext-1"}}))));
        mocks
            .transactions
            .expect_record_gateway_reference()
            .returning(|_, _, _, _| Ok(()));
        mocks
            .gateway
            .expect_confirm_payment()
            .returning(|_, _| Ok(ok(json!({"data": {"status": "error"}}))));
        mocks
            .transactions
            .expect_finalize()
            .withf(|_, status, _| *status == TransactionStatus::Failed)
            .times(1)
            .returning(|_, _, _| Ok(true));

        let err = mocks
            .build()
            .charge(donation(payer_id, creator_id, card_id, 10_000))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::Declined { .. }));
    }

    #[tokio::test]
    async fn paid_fundraising_credits_creator_amount() {
        let (payer_id, creator_id, card_id, tx_id) =
            (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let fundraising_id = Uuid::new_v4();
        let mut mocks = Mocks::new();
        expect_checkout(&mut mocks, payer_id, creator_id, card_id, 10, tx_id);

        mocks
            .gateway
            .expect_create_payment()
            .returning(|_| Ok(ok(json!({"data": {"uuid": "ext-1"}}))));
        mocks
            .transactions
            .expect_record_gateway_reference()
            .returning(|_, _, _, _| Ok(()));
        mocks
            .gateway
            .expect_confirm_payment()
            .returning(|_, _| Ok(ok(json!({"data": {"status": "success"}}))));
        mocks
            .transactions
            .expect_finalize()
            .returning(|_, _, _| Ok(true));
        mocks
            .fundraisings
            .expect_increment_current_amount()
            .with(eq(fundraising_id), eq(8_800))
            .times(1)
            .returning(|_, _| Ok(()));

        let request = ChargeRequest {
            kind: TransactionType::Fundraising,
            fundraising_id: Some(fundraising_id),
            ..donation(payer_id, creator_id, card_id, 10_000)
        };
        let outcome = mocks.build().charge(request).await.unwrap();

        assert!(outcome.is_paid());
    }

    #[tokio::test]
    async fn full_platform_share_is_rejected_before_the_gateway() {
        let (payer_id, creator_id, card_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::new();
        mocks
            .cards
            .expect_find_for_user()
            .returning(move |_, _| Ok(Some(sample_card(card_id, payer_id))));
        mocks
            .users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(sample_creator(creator_id, 100))));
        mocks.transactions.expect_create().never();
        mocks.gateway.expect_get_recipient().never();
        mocks.gateway.expect_create_payment().never();

        let err = mocks
            .build()
            .charge(donation(payer_id, creator_id, card_id, 10_000))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::InvalidSplit(_)));
    }

    #[tokio::test]
    async fn unverified_creator_cannot_be_paid() {
        let (payer_id, creator_id, card_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::new();
        mocks
            .cards
            .expect_find_for_user()
            .returning(move |_, _| Ok(Some(sample_card(card_id, payer_id))));
        mocks
            .users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(sample_user(creator_id))));

        let err = mocks
            .build()
            .charge(donation(payer_id, creator_id, card_id, 10_000))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::CreatorCannotReceivePayments));
    }

    #[tokio::test]
    async fn only_payer_may_confirm_otp() {
        let (payer_id, creator_id, tx_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::new();
        mocks
            .transactions
            .expect_find_by_id()
            .with(eq(tx_id))
            .returning(move |_| {
                Ok(Some(sample_transaction(tx_id, payer_id, creator_id, TransactionType::Donation)))
            });
        mocks.gateway.expect_confirm_payment().never();

        let err = mocks
            .build()
            .confirm_otp(Uuid::new_v4(), tx_id, "123456".to_string())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
    }

    fn awaiting_otp(tx_id: Uuid, payer_id: Uuid, creator_id: Uuid, kind: TransactionType) -> TransactionEntity {
        let mut transaction = sample_transaction(tx_id, payer_id, creator_id, kind);
        transaction.external_transaction_id = Some("ext-9".to_string());
        transaction.otp_hash = Some("hash".to_string());
        transaction
    }

    #[tokio::test]
    async fn otp_success_activates_subscription_from_confirmation_time() {
        let (payer_id, creator_id, tx_id, plan_id) =
            (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::new();
        mocks.transactions.expect_find_by_id().returning(move |_| {
            Ok(Some(awaiting_otp(tx_id, payer_id, creator_id, TransactionType::Subscription)))
        });
        mocks
            .gateway
            .expect_confirm_payment()
            .with(eq("ext-9".to_string()), eq(Some("123456".to_string())))
            .returning(|_, _| Ok(ok(json!({"data": {"status": "success"}}))));
        mocks
            .transactions
            .expect_finalize()
            .returning(|_, _, _| Ok(true));
        let requested_at = Utc::now();
        mocks
            .subscriptions
            .expect_activate_by_payment_reference()
            .withf(move |id, now| *id == tx_id && *now >= requested_at)
            .times(1)
            .returning(move |_, now| {
                let mut subscription = sample_subscription(payer_id, creator_id, plan_id);
                subscription.payment_reference = Some(tx_id);
                subscription.start_date = now;
                subscription.end_date = now + chrono::Duration::days(30);
                Ok(Some((subscription, sample_plan(plan_id, creator_id, 20_000))))
            });
        mocks
            .activities
            .expect_create()
            .withf(move |activity| {
                activity.activity_type == "subscribed"
                    && activity.initiator_id == Some(payer_id)
                    && activity.content_owner_id == Some(creator_id)
                    && activity.content_id == Some(plan_id.to_string())
            })
            .times(1)
            .returning(|_| Ok(()));

        let outcome = mocks
            .build()
            .confirm_otp(payer_id, tx_id, "123456".to_string())
            .await
            .unwrap();

        assert_eq!(outcome, PaymentOutcome::Paid { transaction_id: tx_id });
        tokio::task::yield_now().await;
    }

    #[tokio::test]
    async fn otp_confirmed_donation_is_announced() {
        let (payer_id, creator_id, tx_id, donation_id) =
            (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::new();
        mocks.transactions.expect_find_by_id().returning(move |_| {
            Ok(Some(awaiting_otp(tx_id, payer_id, creator_id, TransactionType::Donation)))
        });
        mocks
            .gateway
            .expect_confirm_payment()
            .returning(|_, _| Ok(ok(json!({"data": {"status": "success"}}))));
        mocks
            .transactions
            .expect_finalize()
            .returning(|_, _, _| Ok(true));
        mocks
            .donations
            .expect_find_by_transaction()
            .with(eq(tx_id))
            .returning(move |_| {
                Ok(Some(DonationEntity {
                    id: donation_id,
                    donator_id: payer_id,
                    creator_id,
                    fundraising_id: None,
                    amount: 10_000,
                    message: Some("keep going".to_string()),
                    transaction_id: Some(tx_id),
                    created_at: Utc::now(),
                }))
            });
        mocks
            .activities
            .expect_create()
            .withf(move |activity| {
                activity.activity_type == "donation"
                    && activity.content_id == Some(donation_id.to_string())
                    && activity.content.as_deref() == Some("keep going")
            })
            .times(1)
            .returning(|_| Ok(()));

        let outcome = mocks
            .build()
            .confirm_otp(payer_id, tx_id, "123456".to_string())
            .await
            .unwrap();

        assert!(outcome.is_paid());
        tokio::task::yield_now().await;
    }

    #[tokio::test]
    async fn direct_payment_leaves_activity_to_checkout() {
        let (payer_id, creator_id, card_id, tx_id) =
            (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::new();
        expect_checkout(&mut mocks, payer_id, creator_id, card_id, 10, tx_id);
        mocks
            .gateway
            .expect_create_payment()
            .returning(|_| Ok(ok(json!({"data": {"uuid": "ext-1"}}))));
        mocks
            .transactions
            .expect_record_gateway_reference()
            .returning(|_, _, _, _| Ok(()));
        mocks
            .gateway
            .expect_confirm_payment()
            .returning(|_, _| Ok(ok(json!({"data": {"status": "success"}}))));
        mocks
            .transactions
            .expect_finalize()
            .returning(|_, _, _| Ok(true));
        mocks.donations.expect_find_by_transaction().never();
        mocks.activities.expect_create().never();

        let outcome = mocks
            .build()
            .charge(donation(payer_id, creator_id, card_id, 10_000))
            .await
            .unwrap();

        assert!(outcome.is_paid());
    }
}
