use std::sync::Arc;

use chrono::{Duration, Utc};
use crates::domain::{
    entities::{
        subscription_plans::{InsertPlanEntity, PlanEntity, UpdatePlanEntity},
        subscriptions::{SubscriptionEntity, UpsertSubscriptionEntity},
    },
    repositories::{
        activities::ActivityRepository, plans::PlanRepository,
        subscriptions::SubscriptionRepository, users::UserRepository,
    },
    value_objects::{
        enums::{activity_types::ActivityType, transaction_types::TransactionType},
        subscription_periods::{plan_duration_for, subscription_window},
    },
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use super::{
    activities::ActivityRecorder,
    payments::{ChargeRequest, PaymentError, PaymentOutcome, PaymentProcessor},
};

/// How long a checkout may wait for its OTP before a new checkout replaces it.
pub const PENDING_CHECKOUT_TTL_MINUTES: i64 = 15;

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlanModel {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlanModel {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeModel {
    pub plan_id: Uuid,
    pub card_id: Uuid,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanView {
    #[serde(flatten)]
    pub plan: PlanEntity,
    pub is_subscribed: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub subscription: SubscriptionEntity,
    pub plan: PlanEntity,
    pub is_current: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckoutResult {
    pub subscription: SubscriptionEntity,
    pub payment: PaymentOutcome,
}

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("only creators can manage plans")]
    NotCreator,
    #[error("plan not found")]
    PlanNotFound,
    #[error("plan is not active")]
    PlanInactive,
    #[error("plan name must not be empty")]
    EmptyName,
    #[error("price must be positive")]
    InvalidPrice,
    #[error("you cannot subscribe to your own plan")]
    SelfSubscription,
    #[error("you already have an active subscription to this plan")]
    AlreadySubscribed,
    #[error("payment {transaction_id} for this plan is waiting for confirmation")]
    PendingConfirmation { transaction_id: Uuid },
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubscriptionError::NotCreator => StatusCode::FORBIDDEN,
            SubscriptionError::PlanNotFound => StatusCode::NOT_FOUND,
            SubscriptionError::PlanInactive
            | SubscriptionError::EmptyName
            | SubscriptionError::InvalidPrice
            | SubscriptionError::SelfSubscription
            | SubscriptionError::AlreadySubscribed => StatusCode::BAD_REQUEST,
            SubscriptionError::PendingConfirmation { .. } => StatusCode::CONFLICT,
            SubscriptionError::Payment(err) => err.status_code(),
            SubscriptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SubscriptionError>;

pub struct SubscriptionUseCase<U, P, S, A, Pay>
where
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    Pay: PaymentProcessor + 'static,
{
    user_repo: Arc<U>,
    plan_repo: Arc<P>,
    subscription_repo: Arc<S>,
    activities: Arc<ActivityRecorder<A>>,
    payments: Arc<Pay>,
}

impl<U, P, S, A, Pay> SubscriptionUseCase<U, P, S, A, Pay>
where
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    Pay: PaymentProcessor + 'static,
{
    pub fn new(
        user_repo: Arc<U>,
        plan_repo: Arc<P>,
        subscription_repo: Arc<S>,
        activities: Arc<ActivityRecorder<A>>,
        payments: Arc<Pay>,
    ) -> Self {
        Self {
            user_repo,
            plan_repo,
            subscription_repo,
            activities,
            payments,
        }
    }

    async fn ensure_creator(&self, user_id: Uuid) -> UseCaseResult<()> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to load user");
                SubscriptionError::Internal(err)
            })?;
        match user {
            Some(user) if user.is_creator && !user.is_deleted => Ok(()),
            _ => Err(SubscriptionError::NotCreator),
        }
    }

    async fn owned_plan(&self, creator_id: Uuid, plan_id: Uuid) -> UseCaseResult<PlanEntity> {
        self.plan_repo
            .find_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "subscriptions: failed to load plan");
                SubscriptionError::Internal(err)
            })?
            .filter(|plan| plan.creator_id == creator_id)
            .ok_or(SubscriptionError::PlanNotFound)
    }

    pub async fn create_plan(
        &self,
        creator_id: Uuid,
        model: CreatePlanModel,
    ) -> UseCaseResult<PlanEntity> {
        self.ensure_creator(creator_id).await?;

        let name = model.name.trim().to_string();
        if name.is_empty() {
            return Err(SubscriptionError::EmptyName);
        }
        if model.price <= 0 {
            return Err(SubscriptionError::InvalidPrice);
        }

        // Fixed at creation; edits never recompute it.
        let duration_days = plan_duration_for(Utc::now());
        let plan = self
            .plan_repo
            .create(InsertPlanEntity {
                creator_id,
                name,
                description: model.description,
                price: model.price,
                duration_days,
                is_active: true,
            })
            .await
            .map_err(|err| {
                error!(%creator_id, db_error = ?err, "subscriptions: failed to create plan");
                SubscriptionError::Internal(err)
            })?;

        info!(%creator_id, plan_id = %plan.id, duration_days, "subscriptions: plan created");
        Ok(plan)
    }

    pub async fn update_plan(
        &self,
        creator_id: Uuid,
        plan_id: Uuid,
        model: UpdatePlanModel,
    ) -> UseCaseResult<PlanEntity> {
        self.owned_plan(creator_id, plan_id).await?;

        if model.price.is_some_and(|price| price <= 0) {
            return Err(SubscriptionError::InvalidPrice);
        }
        let name = model.name.map(|name| name.trim().to_string());
        if name.as_deref().is_some_and(str::is_empty) {
            return Err(SubscriptionError::EmptyName);
        }

        let plan = self
            .plan_repo
            .update(
                plan_id,
                UpdatePlanEntity {
                    name,
                    description: model.description,
                    price: model.price,
                    is_active: model.is_active,
                    updated_at: Some(Utc::now()),
                },
            )
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "subscriptions: failed to update plan");
                SubscriptionError::Internal(err)
            })?;

        info!(%creator_id, %plan_id, "subscriptions: plan updated");
        Ok(plan)
    }

    /// Every plan of the calling creator, inactive ones included.
    pub async fn my_plans(&self, creator_id: Uuid) -> UseCaseResult<Vec<PlanEntity>> {
        self.ensure_creator(creator_id).await?;
        self.plan_repo
            .list_by_creator(creator_id, false)
            .await
            .map_err(|err| {
                error!(%creator_id, db_error = ?err, "subscriptions: failed to list plans");
                SubscriptionError::Internal(err)
            })
    }

    /// Active plans of a creator flagged with the viewer's current subscriptions.
    pub async fn creator_plans(
        &self,
        viewer_id: Uuid,
        creator_id: Uuid,
    ) -> UseCaseResult<Vec<PlanView>> {
        let plans = self
            .plan_repo
            .list_by_creator(creator_id, true)
            .await
            .map_err(|err| {
                error!(%creator_id, db_error = ?err, "subscriptions: failed to list plans");
                SubscriptionError::Internal(err)
            })?;
        let subscribed = self
            .subscription_repo
            .active_plan_ids(viewer_id, creator_id, Utc::now())
            .await
            .map_err(|err| {
                error!(%viewer_id, %creator_id, db_error = ?err, "subscriptions: failed to load active plans");
                SubscriptionError::Internal(err)
            })?;

        Ok(plans
            .into_iter()
            .map(|plan| PlanView {
                is_subscribed: subscribed.contains(&plan.id),
                plan,
            })
            .collect())
    }

    pub async fn subscribe(
        &self,
        subscriber_id: Uuid,
        model: SubscribeModel,
    ) -> UseCaseResult<CheckoutResult> {
        let plan_id = model.plan_id;
        info!(%subscriber_id, %plan_id, "subscriptions: checkout requested");

        let plan = self
            .plan_repo
            .find_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "subscriptions: failed to load plan");
                SubscriptionError::Internal(err)
            })?
            .ok_or(SubscriptionError::PlanNotFound)?;
        if !plan.is_active {
            return Err(SubscriptionError::PlanInactive);
        }
        if plan.creator_id == subscriber_id {
            return Err(SubscriptionError::SelfSubscription);
        }

        let now = Utc::now();
        let existing = self
            .subscription_repo
            .find_active(subscriber_id, plan.creator_id, plan_id, now)
            .await
            .map_err(|err| {
                error!(%subscriber_id, %plan_id, db_error = ?err, "subscriptions: failed to check active subscription");
                SubscriptionError::Internal(err)
            })?;
        if existing.is_some() {
            return Err(SubscriptionError::AlreadySubscribed);
        }

        // A second charge would replace the payment reference the first OTP activates through.
        let pending = self
            .subscription_repo
            .find_pending_checkout(subscriber_id, plan.creator_id, plan_id)
            .await
            .map_err(|err| {
                error!(%subscriber_id, %plan_id, db_error = ?err, "subscriptions: failed to check pending checkout");
                SubscriptionError::Internal(err)
            })?;
        if let Some(transaction_id) = pending.and_then(|subscription| subscription.payment_reference) {
            let started_before = now - Duration::minutes(PENDING_CHECKOUT_TTL_MINUTES);
            if !self.payments.expire_pending(transaction_id, started_before).await? {
                info!(%subscriber_id, %plan_id, %transaction_id, "subscriptions: checkout already waiting for otp");
                return Err(SubscriptionError::PendingConfirmation { transaction_id });
            }
            info!(%subscriber_id, %plan_id, %transaction_id, "subscriptions: abandoned checkout replaced");
        }

        let payment = self
            .payments
            .charge(ChargeRequest {
                payer_id: subscriber_id,
                creator_id: plan.creator_id,
                card_id: model.card_id,
                amount: plan.price,
                kind: TransactionType::Subscription,
                fundraising_id: None,
            })
            .await?;

        let (start_date, end_date) = subscription_window(Utc::now(), plan.duration_days)?;
        let subscription = self
            .subscription_repo
            .upsert_after_checkout(UpsertSubscriptionEntity {
                subscriber_id,
                creator_id: plan.creator_id,
                plan_id,
                start_date,
                end_date,
                is_active: payment.is_paid(),
                payment_reference: Some(payment.transaction_id()),
            })
            .await
            .map_err(|err| {
                error!(
                    %subscriber_id,
                    %plan_id,
                    transaction_id = %payment.transaction_id(),
                    db_error = ?err,
                    "subscriptions: failed to store subscription after payment"
                );
                SubscriptionError::Internal(err)
            })?;

        if payment.is_paid() {
            self.activities.record(
                ActivityType::Subscribed,
                subscriber_id,
                plan.creator_id,
                Some(plan_id),
                Some(plan.name.clone()),
            );
        }

        info!(
            %subscriber_id,
            %plan_id,
            is_active = subscription.is_active,
            "subscriptions: checkout finished"
        );
        Ok(CheckoutResult {
            subscription,
            payment,
        })
    }

    pub async fn my_subscriptions(&self, subscriber_id: Uuid) -> UseCaseResult<Vec<SubscriptionView>> {
        let rows = self
            .subscription_repo
            .list_for_subscriber(subscriber_id)
            .await
            .map_err(|err| {
                error!(%subscriber_id, db_error = ?err, "subscriptions: failed to list subscriptions");
                SubscriptionError::Internal(err)
            })?;

        let now = Utc::now();
        Ok(rows
            .into_iter()
            .map(|(subscription, plan)| SubscriptionView {
                is_current: subscription.is_current(now),
                subscription,
                plan,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::{
        payments::MockPaymentProcessor,
        test_fixtures::{sample_creator, sample_plan, sample_subscription, sample_user},
    };
    use crates::domain::repositories::{
        activities::MockActivityRepository, plans::MockPlanRepository,
        subscriptions::MockSubscriptionRepository, users::MockUserRepository,
    };
    use mockall::predicate::eq;

    type TestUseCase = SubscriptionUseCase<
        MockUserRepository,
        MockPlanRepository,
        MockSubscriptionRepository,
        MockActivityRepository,
        MockPaymentProcessor,
    >;

    fn build(
        users: MockUserRepository,
        plans: MockPlanRepository,
        subscriptions: MockSubscriptionRepository,
        activities: MockActivityRepository,
        payments: MockPaymentProcessor,
    ) -> TestUseCase {
        SubscriptionUseCase::new(
            Arc::new(users),
            Arc::new(plans),
            Arc::new(subscriptions),
            Arc::new(ActivityRecorder::new(Arc::new(activities))),
            Arc::new(payments),
        )
    }

    #[tokio::test]
    async fn plan_duration_is_fixed_to_current_month() {
        let creator_id = Uuid::new_v4();
        let expected_days = plan_duration_for(Utc::now());

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(sample_creator(creator_id, 10))));
        let mut plans = MockPlanRepository::new();
        plans
            .expect_create()
            .withf(move |insert| insert.duration_days == expected_days && insert.price == 50_000)
            .times(1)
            .returning(move |insert| {
                let mut plan = sample_plan(Uuid::new_v4(), insert.creator_id, insert.price);
                plan.duration_days = insert.duration_days;
                Ok(plan)
            });

        let usecase = build(
            users,
            plans,
            MockSubscriptionRepository::new(),
            MockActivityRepository::new(),
            MockPaymentProcessor::new(),
        );
        let plan = usecase
            .create_plan(
                creator_id,
                CreatePlanModel {
                    name: "Gold".to_string(),
                    description: None,
                    price: 50_000,
                },
            )
            .await
            .unwrap();

        assert_eq!(plan.duration_days, expected_days);
    }

    #[tokio::test]
    async fn regular_users_cannot_create_plans() {
        let user_id = Uuid::new_v4();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(sample_user(user_id))));
        let mut plans = MockPlanRepository::new();
        plans.expect_create().never();

        let usecase = build(
            users,
            plans,
            MockSubscriptionRepository::new(),
            MockActivityRepository::new(),
            MockPaymentProcessor::new(),
        );
        let err = usecase
            .create_plan(
                user_id,
                CreatePlanModel {
                    name: "Gold".to_string(),
                    description: None,
                    price: 50_000,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SubscriptionError::NotCreator));
    }

    #[tokio::test]
    async fn active_subscription_blocks_second_checkout() {
        let (subscriber_id, creator_id, plan_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let mut plans = MockPlanRepository::new();
        plans
            .expect_find_by_id()
            .with(eq(plan_id))
            .returning(move |_| Ok(Some(sample_plan(plan_id, creator_id, 20_000))));
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_find_active()
            .withf(move |subscriber, creator, plan, _| {
                *subscriber == subscriber_id && *creator == creator_id && *plan == plan_id
            })
            .returning(move |_, _, _, _| Ok(Some(sample_subscription(subscriber_id, creator_id, plan_id))));
        let mut payments = MockPaymentProcessor::new();
        payments.expect_charge().never();

        let usecase = build(
            MockUserRepository::new(),
            plans,
            subscriptions,
            MockActivityRepository::new(),
            payments,
        );
        let err = usecase
            .subscribe(
                subscriber_id,
                SubscribeModel {
                    plan_id,
                    card_id: Uuid::new_v4(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SubscriptionError::AlreadySubscribed));
    }

    #[tokio::test]
    async fn pending_otp_stores_inactive_subscription() {
        let (subscriber_id, creator_id, plan_id, tx_id) =
            (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let mut plans = MockPlanRepository::new();
        plans
            .expect_find_by_id()
            .returning(move |_| Ok(Some(sample_plan(plan_id, creator_id, 20_000))));
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_find_active()
            .returning(|_, _, _, _| Ok(None));
        subscriptions
            .expect_find_pending_checkout()
            .returning(|_, _, _| Ok(None));
        subscriptions
            .expect_upsert_after_checkout()
            .withf(move |upsert| {
                !upsert.is_active
                    && upsert.payment_reference == Some(tx_id)
                    && (upsert.end_date - upsert.start_date).num_days() == 30
            })
            .times(1)
            .returning(move |upsert| {
                let mut subscription =
                    sample_subscription(upsert.subscriber_id, upsert.creator_id, upsert.plan_id);
                subscription.is_active = upsert.is_active;
                subscription.payment_reference = upsert.payment_reference;
                Ok(subscription)
            });
        let mut payments = MockPaymentProcessor::new();
        payments
            .expect_charge()
            .withf(move |request| {
                request.amount == 20_000
                    && request.kind == TransactionType::Subscription
                    && request.creator_id == creator_id
            })
            .returning(move |_| Ok(PaymentOutcome::NeedsConfirmation { transaction_id: tx_id }));
        let mut activities = MockActivityRepository::new();
        activities.expect_create().never();

        let usecase = build(MockUserRepository::new(), plans, subscriptions, activities, payments);
        let result = usecase
            .subscribe(
                subscriber_id,
                SubscribeModel {
                    plan_id,
                    card_id: Uuid::new_v4(),
                },
            )
            .await
            .unwrap();

        assert!(!result.subscription.is_active);
        assert_eq!(
            result.payment,
            PaymentOutcome::NeedsConfirmation { transaction_id: tx_id }
        );
    }

    #[tokio::test]
    async fn checkout_waiting_for_otp_blocks_second_charge() {
        let (subscriber_id, creator_id, plan_id, first_tx) =
            (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let mut plans = MockPlanRepository::new();
        plans
            .expect_find_by_id()
            .returning(move |_| Ok(Some(sample_plan(plan_id, creator_id, 20_000))));
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_find_active()
            .returning(|_, _, _, _| Ok(None));
        subscriptions
            .expect_find_pending_checkout()
            .with(eq(subscriber_id), eq(creator_id), eq(plan_id))
            .returning(move |subscriber, creator, plan| {
                let mut subscription = sample_subscription(subscriber, creator, plan);
                subscription.is_active = false;
                subscription.payment_reference = Some(first_tx);
                Ok(Some(subscription))
            });
        subscriptions.expect_upsert_after_checkout().never();
        let mut payments = MockPaymentProcessor::new();
        payments
            .expect_expire_pending()
            .withf(move |transaction_id, _| *transaction_id == first_tx)
            .returning(|_, _| Ok(false));
        payments.expect_charge().never();

        let usecase = build(
            MockUserRepository::new(),
            plans,
            subscriptions,
            MockActivityRepository::new(),
            payments,
        );
        let err = usecase
            .subscribe(
                subscriber_id,
                SubscribeModel {
                    plan_id,
                    card_id: Uuid::new_v4(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SubscriptionError::PendingConfirmation { transaction_id } if transaction_id == first_tx
        ));
        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn abandoned_otp_checkout_does_not_block_new_one() {
        let (subscriber_id, creator_id, plan_id, stale_tx, new_tx) = (
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
        );

        let mut plans = MockPlanRepository::new();
        plans
            .expect_find_by_id()
            .returning(move |_| Ok(Some(sample_plan(plan_id, creator_id, 20_000))));
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_find_active()
            .returning(|_, _, _, _| Ok(None));
        subscriptions
            .expect_find_pending_checkout()
            .returning(move |subscriber, creator, plan| {
                let mut subscription = sample_subscription(subscriber, creator, plan);
                subscription.is_active = false;
                subscription.payment_reference = Some(stale_tx);
                Ok(Some(subscription))
            });
        subscriptions
            .expect_upsert_after_checkout()
            .withf(move |upsert| upsert.is_active && upsert.payment_reference == Some(new_tx))
            .times(1)
            .returning(|upsert| {
                let mut subscription =
                    sample_subscription(upsert.subscriber_id, upsert.creator_id, upsert.plan_id);
                subscription.payment_reference = upsert.payment_reference;
                Ok(subscription)
            });
        let mut payments = MockPaymentProcessor::new();
        payments
            .expect_expire_pending()
            .withf(move |transaction_id, started_before| {
                *transaction_id == stale_tx
                    && *started_before
                        <= Utc::now() - Duration::minutes(PENDING_CHECKOUT_TTL_MINUTES)
            })
            .times(1)
            .returning(|_, _| Ok(true));
        payments
            .expect_charge()
            .times(1)
            .returning(move |_| Ok(PaymentOutcome::Paid { transaction_id: new_tx }));
        let mut activities = MockActivityRepository::new();
        activities.expect_create().returning(|_| Ok(()));

        let usecase = build(MockUserRepository::new(), plans, subscriptions, activities, payments);
        let result = usecase
            .subscribe(
                subscriber_id,
                SubscribeModel {
                    plan_id,
                    card_id: Uuid::new_v4(),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.payment, PaymentOutcome::Paid { transaction_id: new_tx });
    }

    #[tokio::test]
    async fn cannot_subscribe_to_own_plan() {
        let (creator_id, plan_id) = (Uuid::new_v4(), Uuid::new_v4());
        let mut plans = MockPlanRepository::new();
        plans
            .expect_find_by_id()
            .returning(move |_| Ok(Some(sample_plan(plan_id, creator_id, 20_000))));

        let usecase = build(
            MockUserRepository::new(),
            plans,
            MockSubscriptionRepository::new(),
            MockActivityRepository::new(),
            MockPaymentProcessor::new(),
        );
        let err = usecase
            .subscribe(
                creator_id,
                SubscribeModel {
                    plan_id,
                    card_id: Uuid::new_v4(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SubscriptionError::SelfSubscription));
    }

    #[tokio::test]
    async fn creator_plans_flag_current_subscriptions() {
        let (viewer_id, creator_id) = (Uuid::new_v4(), Uuid::new_v4());
        let (basic, pro) = (Uuid::new_v4(), Uuid::new_v4());

        let mut plans = MockPlanRepository::new();
        plans
            .expect_list_by_creator()
            .with(eq(creator_id), eq(true))
            .returning(move |_, _| {
                Ok(vec![
                    sample_plan(basic, creator_id, 10_000),
                    sample_plan(pro, creator_id, 30_000),
                ])
            });
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_active_plan_ids()
            .returning(move |_, _, _| Ok(vec![pro]));

        let usecase = build(
            MockUserRepository::new(),
            plans,
            subscriptions,
            MockActivityRepository::new(),
            MockPaymentProcessor::new(),
        );
        let views = usecase.creator_plans(viewer_id, creator_id).await.unwrap();

        assert!(!views[0].is_subscribed);
        assert!(views[1].is_subscribed);
    }
}
