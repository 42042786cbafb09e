use std::sync::Arc;

use chrono::{DateTime, Utc};
use crates::domain::{
    entities::{
        donations::{DonationEntity, InsertDonationEntity},
        fundraisings::{FundraisingEntity, InsertFundraisingEntity, UpdateFundraisingEntity},
    },
    repositories::{
        activities::ActivityRepository, donations::DonationRepository,
        fundraisings::FundraisingRepository, users::UserRepository,
    },
    value_objects::enums::{activity_types::ActivityType, transaction_types::TransactionType},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use super::{
    activities::ActivityRecorder,
    payments::{ChargeRequest, PaymentError, PaymentOutcome, PaymentProcessor},
};

#[derive(Debug, Clone, Deserialize)]
pub struct DonateModel {
    pub creator_id: Uuid,
    pub card_id: Uuid,
    pub amount: i64,
    pub message: Option<String>,
    pub fundraising_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DonationReceipt {
    pub donation: DonationEntity,
    pub payment: PaymentOutcome,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFundraisingModel {
    pub title: String,
    pub description: Option<String>,
    pub goal: i64,
    #[serde(default)]
    pub minimum_donation: i64,
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFundraisingModel {
    pub title: Option<String>,
    pub description: Option<String>,
    pub goal: Option<i64>,
    pub minimum_donation: Option<i64>,
    pub deadline: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Error)]
pub enum DonationError {
    #[error("creator not found")]
    CreatorNotFound,
    #[error("only creators can manage fundraisings")]
    NotCreator,
    #[error("fundraising not found")]
    FundraisingNotFound,
    #[error("fundraising does not belong to this creator")]
    FundraisingMismatch,
    #[error("fundraising is not active")]
    FundraisingInactive,
    #[error("fundraising deadline has passed")]
    FundraisingExpired,
    #[error("minimum donation for this fundraising is {0}")]
    BelowMinimum(i64),
    #[error("goal must be positive")]
    InvalidGoal,
    #[error("minimum donation must not be negative")]
    InvalidMinimum,
    #[error("title must not be empty")]
    EmptyTitle,
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl DonationError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            DonationError::CreatorNotFound | DonationError::FundraisingNotFound => {
                StatusCode::NOT_FOUND
            }
            DonationError::NotCreator => StatusCode::FORBIDDEN,
            DonationError::FundraisingMismatch
            | DonationError::FundraisingInactive
            | DonationError::FundraisingExpired
            | DonationError::BelowMinimum(_)
            | DonationError::InvalidGoal
            | DonationError::InvalidMinimum
            | DonationError::EmptyTitle => StatusCode::BAD_REQUEST,
            DonationError::Payment(err) => err.status_code(),
            DonationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, DonationError>;

/// The message travels with the donation only when the amount reaches the
/// creator's threshold.
fn message_for(amount: i64, minimum_message_donation: i64, message: Option<String>) -> Option<String> {
    if amount < minimum_message_donation {
        return None;
    }
    message
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

pub struct DonationUseCase<U, F, D, A, Pay>
where
    U: UserRepository + Send + Sync + 'static,
    F: FundraisingRepository + Send + Sync + 'static,
    D: DonationRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    Pay: PaymentProcessor + 'static,
{
    user_repo: Arc<U>,
    fundraising_repo: Arc<F>,
    donation_repo: Arc<D>,
    activities: Arc<ActivityRecorder<A>>,
    payments: Arc<Pay>,
}

impl<U, F, D, A, Pay> DonationUseCase<U, F, D, A, Pay>
where
    U: UserRepository + Send + Sync + 'static,
    F: FundraisingRepository + Send + Sync + 'static,
    D: DonationRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    Pay: PaymentProcessor + 'static,
{
    pub fn new(
        user_repo: Arc<U>,
        fundraising_repo: Arc<F>,
        donation_repo: Arc<D>,
        activities: Arc<ActivityRecorder<A>>,
        payments: Arc<Pay>,
    ) -> Self {
        Self {
            user_repo,
            fundraising_repo,
            donation_repo,
            activities,
            payments,
        }
    }

    async fn load_fundraising(&self, fundraising_id: Uuid) -> UseCaseResult<FundraisingEntity> {
        self.fundraising_repo
            .find_by_id(fundraising_id)
            .await
            .map_err(|err| {
                error!(%fundraising_id, db_error = ?err, "donations: failed to load fundraising");
                DonationError::Internal(err)
            })?
            .ok_or(DonationError::FundraisingNotFound)
    }

    async fn ensure_creator(&self, user_id: Uuid) -> UseCaseResult<()> {
        let user = self.user_repo.find_by_id(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "donations: failed to load user");
            DonationError::Internal(err)
        })?;
        match user {
            Some(user) if user.is_creator && !user.is_deleted => Ok(()),
            _ => Err(DonationError::NotCreator),
        }
    }

    pub async fn donate(
        &self,
        donator_id: Uuid,
        model: DonateModel,
    ) -> UseCaseResult<DonationReceipt> {
        let creator_id = model.creator_id;
        info!(%donator_id, %creator_id, amount = model.amount, "donations: donation requested");

        let creator = self
            .user_repo
            .find_by_id(creator_id)
            .await
            .map_err(|err| {
                error!(%creator_id, db_error = ?err, "donations: failed to load creator");
                DonationError::Internal(err)
            })?
            .filter(|user| user.is_creator && !user.is_deleted)
            .ok_or(DonationError::CreatorNotFound)?;

        if let Some(fundraising_id) = model.fundraising_id {
            let fundraising = self.load_fundraising(fundraising_id).await?;
            if fundraising.creator_id != creator_id {
                return Err(DonationError::FundraisingMismatch);
            }
            if !fundraising.is_active {
                return Err(DonationError::FundraisingInactive);
            }
            if !fundraising.is_open(Utc::now()) {
                return Err(DonationError::FundraisingExpired);
            }
            if model.amount < fundraising.minimum_donation {
                return Err(DonationError::BelowMinimum(fundraising.minimum_donation));
            }
        }

        let kind = if model.fundraising_id.is_some() {
            TransactionType::Fundraising
        } else {
            TransactionType::Donation
        };
        let payment = self
            .payments
            .charge(ChargeRequest {
                payer_id: donator_id,
                creator_id,
                card_id: model.card_id,
                amount: model.amount,
                kind,
                fundraising_id: model.fundraising_id,
            })
            .await?;

        let message = message_for(model.amount, creator.minimum_message_donation, model.message);
        let donation = self
            .donation_repo
            .create(InsertDonationEntity {
                donator_id,
                creator_id,
                fundraising_id: model.fundraising_id,
                amount: model.amount,
                message: message.clone(),
                transaction_id: Some(payment.transaction_id()),
            })
            .await
            .map_err(|err| {
                error!(
                    %donator_id,
                    transaction_id = %payment.transaction_id(),
                    db_error = ?err,
                    "donations: failed to store donation"
                );
                DonationError::Internal(err)
            })?;

        if payment.is_paid() {
            self.activities.record(
                ActivityType::Donation,
                donator_id,
                creator_id,
                Some(donation.id),
                message,
            );
        }

        info!(%donator_id, %creator_id, donation_id = %donation.id, "donations: donation stored");
        Ok(DonationReceipt { donation, payment })
    }

    pub async fn create_fundraising(
        &self,
        creator_id: Uuid,
        model: CreateFundraisingModel,
    ) -> UseCaseResult<FundraisingEntity> {
        self.ensure_creator(creator_id).await?;

        let title = model.title.trim().to_string();
        if title.is_empty() {
            return Err(DonationError::EmptyTitle);
        }
        if model.goal <= 0 {
            return Err(DonationError::InvalidGoal);
        }
        if model.minimum_donation < 0 {
            return Err(DonationError::InvalidMinimum);
        }

        let fundraising = self
            .fundraising_repo
            .create(InsertFundraisingEntity {
                creator_id,
                title,
                description: model.description,
                goal: model.goal,
                minimum_donation: model.minimum_donation,
                deadline: model.deadline,
                is_active: true,
            })
            .await
            .map_err(|err| {
                error!(%creator_id, db_error = ?err, "donations: failed to create fundraising");
                DonationError::Internal(err)
            })?;

        info!(%creator_id, fundraising_id = %fundraising.id, "donations: fundraising created");
        Ok(fundraising)
    }

    pub async fn update_fundraising(
        &self,
        creator_id: Uuid,
        fundraising_id: Uuid,
        model: UpdateFundraisingModel,
    ) -> UseCaseResult<FundraisingEntity> {
        let fundraising = self.load_fundraising(fundraising_id).await?;
        if fundraising.creator_id != creator_id {
            return Err(DonationError::FundraisingNotFound);
        }
        if model.goal.is_some_and(|goal| goal <= 0) {
            return Err(DonationError::InvalidGoal);
        }
        if model.minimum_donation.is_some_and(|minimum| minimum < 0) {
            return Err(DonationError::InvalidMinimum);
        }
        let title = model.title.map(|title| title.trim().to_string());
        if title.as_deref().is_some_and(str::is_empty) {
            return Err(DonationError::EmptyTitle);
        }

        self.fundraising_repo
            .update(
                fundraising_id,
                UpdateFundraisingEntity {
                    title,
                    description: model.description,
                    goal: model.goal,
                    minimum_donation: model.minimum_donation,
                    deadline: model.deadline,
                    is_active: model.is_active,
                    updated_at: Some(Utc::now()),
                },
            )
            .await
            .map_err(|err| {
                error!(%fundraising_id, db_error = ?err, "donations: failed to update fundraising");
                DonationError::Internal(err)
            })
    }

    pub async fn get_fundraising(&self, fundraising_id: Uuid) -> UseCaseResult<FundraisingEntity> {
        self.load_fundraising(fundraising_id).await
    }

    pub async fn list_fundraisings(
        &self,
        creator_id: Uuid,
        only_active: bool,
    ) -> UseCaseResult<Vec<FundraisingEntity>> {
        self.fundraising_repo
            .list_by_creator(creator_id, only_active)
            .await
            .map_err(|err| {
                error!(%creator_id, db_error = ?err, "donations: failed to list fundraisings");
                DonationError::Internal(err)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::{
        payments::MockPaymentProcessor,
        test_fixtures::{sample_creator, sample_fundraising},
    };
    use chrono::Duration;
    use crates::domain::repositories::{
        activities::MockActivityRepository, donations::MockDonationRepository,
        fundraisings::MockFundraisingRepository, users::MockUserRepository,
    };

    type TestUseCase = DonationUseCase<
        MockUserRepository,
        MockFundraisingRepository,
        MockDonationRepository,
        MockActivityRepository,
        MockPaymentProcessor,
    >;

    fn build(
        users: MockUserRepository,
        fundraisings: MockFundraisingRepository,
        donations: MockDonationRepository,
        activities: MockActivityRepository,
        payments: MockPaymentProcessor,
    ) -> TestUseCase {
        DonationUseCase::new(
            Arc::new(users),
            Arc::new(fundraisings),
            Arc::new(donations),
            Arc::new(ActivityRecorder::new(Arc::new(activities))),
            Arc::new(payments),
        )
    }

    fn creator_repo(creator_id: Uuid, minimum_message_donation: i64) -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(move |_| {
            let mut creator = sample_creator(creator_id, 10);
            creator.minimum_message_donation = minimum_message_donation;
            Ok(Some(creator))
        });
        users
    }

    fn echo_donations() -> MockDonationRepository {
        let mut donations = MockDonationRepository::new();
        donations.expect_create().returning(|insert| {
            Ok(DonationEntity {
                id: Uuid::new_v4(),
                donator_id: insert.donator_id,
                creator_id: insert.creator_id,
                fundraising_id: insert.fundraising_id,
                amount: insert.amount,
                message: insert.message,
                transaction_id: insert.transaction_id,
                created_at: Utc::now(),
            })
        });
        donations
    }

    fn model(creator_id: Uuid, amount: i64, fundraising_id: Option<Uuid>) -> DonateModel {
        DonateModel {
            creator_id,
            card_id: Uuid::new_v4(),
            amount,
            message: Some("keep going".to_string()),
            fundraising_id,
        }
    }

    #[test]
    fn message_is_dropped_below_threshold() {
        assert_eq!(message_for(4_999, 5_000, Some("hi".to_string())), None);
        assert_eq!(
            message_for(5_000, 5_000, Some(" hi ".to_string())),
            Some("hi".to_string())
        );
        assert_eq!(message_for(5_000, 0, Some("   ".to_string())), None);
    }

    #[tokio::test]
    async fn paid_donation_is_stored_with_transaction() {
        let (donator_id, creator_id, tx_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut payments = MockPaymentProcessor::new();
        payments
            .expect_charge()
            .withf(|request| request.kind == TransactionType::Donation && request.amount == 10_000)
            .returning(move |_| Ok(PaymentOutcome::Paid { transaction_id: tx_id }));
        let mut activities = MockActivityRepository::new();
        activities.expect_create().returning(|_| Ok(()));

        let usecase = build(
            creator_repo(creator_id, 20_000),
            MockFundraisingRepository::new(),
            echo_donations(),
            activities,
            payments,
        );
        let receipt = usecase
            .donate(donator_id, model(creator_id, 10_000, None))
            .await
            .unwrap();

        assert_eq!(receipt.donation.transaction_id, Some(tx_id));
        assert_eq!(receipt.donation.message, None);
    }

    #[tokio::test]
    async fn fundraising_minimum_is_enforced() {
        let (creator_id, fundraising_id) = (Uuid::new_v4(), Uuid::new_v4());
        let mut fundraisings = MockFundraisingRepository::new();
        fundraisings.expect_find_by_id().returning(move |_| {
            let mut fundraising = sample_fundraising(fundraising_id, creator_id);
            fundraising.minimum_donation = 5_000;
            Ok(Some(fundraising))
        });
        let mut payments = MockPaymentProcessor::new();
        payments.expect_charge().never();

        let usecase = build(
            creator_repo(creator_id, 0),
            fundraisings,
            MockDonationRepository::new(),
            MockActivityRepository::new(),
            payments,
        );
        let err = usecase
            .donate(Uuid::new_v4(), model(creator_id, 1_000, Some(fundraising_id)))
            .await
            .unwrap_err();

        assert!(matches!(err, DonationError::BelowMinimum(5_000)));
    }

    #[tokio::test]
    async fn expired_fundraising_is_rejected() {
        let (creator_id, fundraising_id) = (Uuid::new_v4(), Uuid::new_v4());
        let mut fundraisings = MockFundraisingRepository::new();
        fundraisings.expect_find_by_id().returning(move |_| {
            let mut fundraising = sample_fundraising(fundraising_id, creator_id);
            fundraising.deadline = Some(Utc::now() - Duration::days(1));
            Ok(Some(fundraising))
        });

        let usecase = build(
            creator_repo(creator_id, 0),
            fundraisings,
            MockDonationRepository::new(),
            MockActivityRepository::new(),
            MockPaymentProcessor::new(),
        );
        let err = usecase
            .donate(Uuid::new_v4(), model(creator_id, 10_000, Some(fundraising_id)))
            .await
            .unwrap_err();

        assert!(matches!(err, DonationError::FundraisingExpired));
    }

    #[tokio::test]
    async fn fundraising_of_another_creator_is_rejected() {
        let (creator_id, fundraising_id) = (Uuid::new_v4(), Uuid::new_v4());
        let mut fundraisings = MockFundraisingRepository::new();
        fundraisings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(sample_fundraising(fundraising_id, Uuid::new_v4()))));

        let usecase = build(
            creator_repo(creator_id, 0),
            fundraisings,
            MockDonationRepository::new(),
            MockActivityRepository::new(),
            MockPaymentProcessor::new(),
        );
        let err = usecase
            .donate(Uuid::new_v4(), model(creator_id, 10_000, Some(fundraising_id)))
            .await
            .unwrap_err();

        assert!(matches!(err, DonationError::FundraisingMismatch));
    }

    #[tokio::test]
    async fn payment_errors_keep_their_status() {
        let creator_id = Uuid::new_v4();
        let mut payments = MockPaymentProcessor::new();
        payments
            .expect_charge()
            .returning(|_| Err(PaymentError::CardNotFound));

        let usecase = build(
            creator_repo(creator_id, 0),
            MockFundraisingRepository::new(),
            MockDonationRepository::new(),
            MockActivityRepository::new(),
            payments,
        );
        let err = usecase
            .donate(Uuid::new_v4(), model(creator_id, 10_000, None))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }
}
