use std::sync::Arc;

use chrono::Utc;
use crates::{
    domain::{
        entities::users::{UpdateUserEntity, UserEntity},
        repositories::{
            categories::CategoryRepository, social::SocialRepository,
            subscriptions::SubscriptionRepository, users::UserRepository,
        },
        value_objects::{
            follower_stats::{FollowerPoint, FollowerRange, PlanShare, follower_buckets, plan_shares},
            users::{CreatorSearchFilter, CreatorSummary, UserDto},
        },
    },
    multibank::PaymentGateway,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

const MOST_POPULAR_LIMIT: i64 = 10;
const PER_CATEGORY_LIMIT: i64 = 5;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PayoutAccounts {
    pub bank_accounts: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttachAccountModel {
    pub multibank_account: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AttachedAccount {
    pub user_id: Uuid,
    pub multibank_account: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BecomeCreatorModel {
    pub category_id: Option<Uuid>,
    pub username: Option<String>,
    pub creator_description: Option<String>,
    pub profile_photo_id: Option<Uuid>,
    pub background_photo_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryCreators {
    pub category_id: Uuid,
    pub category_name: String,
    pub creators: Vec<CreatorSummary>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PopularCreators {
    pub most_populars: Vec<CreatorSummary>,
    pub popular_by_categories: Vec<CategoryCreators>,
}

#[derive(Debug, Error)]
pub enum CreatorError {
    #[error("user not found")]
    UserNotFound,
    #[error("only creators have follower statistics")]
    NotCreator,
    #[error("enter a valid account number")]
    UnknownAccount,
    #[error("select a payout account first")]
    AccountRequired,
    #[error("username is already taken")]
    UsernameTaken,
    #[error("payment gateway rejected the account lookup")]
    Gateway { response: Value },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CreatorError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            CreatorError::UserNotFound => StatusCode::NOT_FOUND,
            CreatorError::NotCreator => StatusCode::FORBIDDEN,
            CreatorError::UnknownAccount
            | CreatorError::AccountRequired
            | CreatorError::UsernameTaken
            | CreatorError::Gateway { .. } => StatusCode::BAD_REQUEST,
            CreatorError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn gateway_detail(&self) -> Option<Value> {
        match self {
            CreatorError::Gateway { response } => Some(response.clone()),
            _ => None,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, CreatorError>;

pub struct CreatorUseCase<U, C, So, S, G>
where
    U: UserRepository + Send + Sync + 'static,
    C: CategoryRepository + Send + Sync + 'static,
    So: SocialRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    category_repo: Arc<C>,
    social_repo: Arc<So>,
    subscription_repo: Arc<S>,
    gateway: Arc<G>,
}

impl<U, C, So, S, G> CreatorUseCase<U, C, So, S, G>
where
    U: UserRepository + Send + Sync + 'static,
    C: CategoryRepository + Send + Sync + 'static,
    So: SocialRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    pub fn new(
        user_repo: Arc<U>,
        category_repo: Arc<C>,
        social_repo: Arc<So>,
        subscription_repo: Arc<S>,
        gateway: Arc<G>,
    ) -> Self {
        Self {
            user_repo,
            category_repo,
            social_repo,
            subscription_repo,
            gateway,
        }
    }

    async fn load_user(&self, user_id: Uuid) -> UseCaseResult<UserEntity> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "creators: failed to load user");
                CreatorError::Internal(err)
            })?
            .filter(|user| !user.is_deleted)
            .ok_or(CreatorError::UserNotFound)
    }

    async fn ensure_creator(&self, user_id: Uuid) -> UseCaseResult<()> {
        if self.load_user(user_id).await?.is_creator {
            Ok(())
        } else {
            Err(CreatorError::NotCreator)
        }
    }

    /// Payout-capable gateway accounts registered to the user's phone.
    async fn gateway_accounts(&self, user: &UserEntity) -> UseCaseResult<(Vec<String>, Option<String>)> {
        let response = self
            .gateway
            .check_account(user.phone_number.clone())
            .await
            .map_err(|err| {
                error!(user_id = %user.id, error = ?err, "creators: account lookup failed");
                CreatorError::Internal(err)
            })?;
        if !response.is_success() {
            warn!(user_id = %user.id, status = response.status, "creators: gateway rejected account lookup");
            return Err(CreatorError::Gateway {
                response: response.body,
            });
        }
        Ok((response.payout_accounts(), response.account_pinfl()))
    }

    /// First onboarding step; remembers the PINFL the gateway reports.
    pub async fn payout_accounts(&self, user_id: Uuid) -> UseCaseResult<PayoutAccounts> {
        let user = self.load_user(user_id).await?;
        let (bank_accounts, pinfl) = self.gateway_accounts(&user).await?;

        if let Some(pinfl) = pinfl {
            self.user_repo
                .set_pinfl(user_id, pinfl)
                .await
                .map_err(|err| {
                    error!(%user_id, db_error = ?err, "creators: failed to store pinfl");
                    CreatorError::Internal(err)
                })?;
        }

        Ok(PayoutAccounts { bank_accounts })
    }

    pub async fn attach_account(
        &self,
        user_id: Uuid,
        model: AttachAccountModel,
    ) -> UseCaseResult<AttachedAccount> {
        let user = self.load_user(user_id).await?;
        let account = model.multibank_account.trim().to_string();

        // Any gateway failure counts as "not one of your accounts".
        let known = match self.gateway_accounts(&user).await {
            Ok((accounts, _)) => accounts,
            Err(CreatorError::Gateway { .. }) => Vec::new(),
            Err(err) => return Err(err),
        };
        if !known.contains(&account) {
            return Err(CreatorError::UnknownAccount);
        }

        self.user_repo
            .attach_multibank_account(user_id, account.clone())
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "creators: failed to attach account");
                CreatorError::Internal(err)
            })?;

        info!(%user_id, "creators: payout account attached");
        Ok(AttachedAccount {
            user_id,
            multibank_account: account,
        })
    }

    pub async fn become_creator(
        &self,
        user_id: Uuid,
        model: BecomeCreatorModel,
    ) -> UseCaseResult<UserDto> {
        let user = self.load_user(user_id).await?;
        if !user.multibank_verified || user.multibank_account.is_none() {
            return Err(CreatorError::AccountRequired);
        }

        let outcome = self
            .user_repo
            .update_profile(
                user_id,
                UpdateUserEntity {
                    username: model
                        .username
                        .map(|username| username.trim().trim_start_matches('@').to_string())
                        .filter(|username| !username.is_empty()),
                    creator_description: model.creator_description,
                    profile_photo_id: model.profile_photo_id,
                    background_photo_id: model.background_photo_id,
                    category_id: model.category_id,
                    updated_at: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "creators: failed to update profile");
                CreatorError::Internal(err)
            })?;
        if outcome.is_duplicate() {
            return Err(CreatorError::UsernameTaken);
        }

        let creator = self.user_repo.become_creator(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "creators: failed to promote user");
            CreatorError::Internal(err)
        })?;

        info!(%user_id, "creators: user became a creator");
        Ok(creator.into())
    }

    pub async fn popular(&self) -> UseCaseResult<PopularCreators> {
        let most_populars = self
            .user_repo
            .popular_creators(None, MOST_POPULAR_LIMIT)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "creators: failed to load popular creators");
                CreatorError::Internal(err)
            })?;

        let categories = self.category_repo.list().await.map_err(CreatorError::Internal)?;
        let mut popular_by_categories = Vec::new();
        for category in categories {
            let creators = self
                .user_repo
                .popular_creators(Some(category.id), PER_CATEGORY_LIMIT)
                .await
                .map_err(CreatorError::Internal)?;
            if !creators.is_empty() {
                popular_by_categories.push(CategoryCreators {
                    category_id: category.id,
                    category_name: category.name,
                    creators,
                });
            }
        }

        Ok(PopularCreators {
            most_populars,
            popular_by_categories,
        })
    }

    pub async fn popular_in_category(&self, category_id: Uuid) -> UseCaseResult<Vec<CreatorSummary>> {
        self.user_repo
            .popular_creators(Some(category_id), MOST_POPULAR_LIMIT)
            .await
            .map_err(|err| {
                error!(%category_id, db_error = ?err, "creators: failed to load category creators");
                CreatorError::Internal(err)
            })
    }

    pub async fn search(&self, filter: CreatorSearchFilter) -> UseCaseResult<Vec<CreatorSummary>> {
        let filter = CreatorSearchFilter {
            query: filter
                .query
                .map(|query| query.trim().trim_start_matches('@').to_string())
                .filter(|query| !query.is_empty()),
            ..filter
        };
        self.user_repo.search_creators(filter).await.map_err(|err| {
            error!(db_error = ?err, "creators: search failed");
            CreatorError::Internal(err)
        })
    }

    pub async fn follower_stats(
        &self,
        creator_id: Uuid,
        range: FollowerRange,
    ) -> UseCaseResult<Vec<FollowerPoint>> {
        self.ensure_creator(creator_id).await?;

        let today = Utc::now().date_naive();
        let since = range
            .start(today)
            .and_hms_opt(0, 0, 0)
            .map(|start| start.and_utc())
            .ok_or_else(|| anyhow::anyhow!("invalid follower range start"))?;

        let followed_at = self
            .social_repo
            .follow_timestamps_since(creator_id, since)
            .await
            .map_err(|err| {
                error!(%creator_id, db_error = ?err, "creators: failed to load follows");
                CreatorError::Internal(err)
            })?;

        Ok(follower_buckets(range, today, &followed_at))
    }

    pub async fn plan_shares(&self, creator_id: Uuid) -> UseCaseResult<Vec<PlanShare>> {
        self.ensure_creator(creator_id).await?;
        let counts = self
            .subscription_repo
            .subscriber_counts_by_plan(creator_id, Utc::now())
            .await
            .map_err(|err| {
                error!(%creator_id, db_error = ?err, "creators: failed to count subscribers");
                CreatorError::Internal(err)
            })?;
        Ok(plan_shares(counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_fixtures::{sample_creator, sample_user};
    use crates::{
        domain::{
            entities::categories::CategoryEntity,
            repositories::{
                categories::MockCategoryRepository, social::MockSocialRepository,
                subscriptions::MockSubscriptionRepository, users::MockUserRepository,
            },
            value_objects::{follower_stats::PlanSubscriberCount, insert_outcome::InsertOutcome},
        },
        multibank::{GatewayResponse, MockPaymentGateway},
    };
    use mockall::predicate::eq;
    use serde_json::json;

    type TestUseCase = CreatorUseCase<
        MockUserRepository,
        MockCategoryRepository,
        MockSocialRepository,
        MockSubscriptionRepository,
        MockPaymentGateway,
    >;

    fn build(
        users: MockUserRepository,
        categories: MockCategoryRepository,
        social: MockSocialRepository,
        subscriptions: MockSubscriptionRepository,
        gateway: MockPaymentGateway,
    ) -> TestUseCase {
        CreatorUseCase::new(
            Arc::new(users),
            Arc::new(categories),
            Arc::new(social),
            Arc::new(subscriptions),
            Arc::new(gateway),
        )
    }

    fn accounts_response() -> GatewayResponse {
        GatewayResponse {
            status: 200,
            body: json!({
                "data": {
                    "user": {"pinfl": "30101900000000"},
                    "accounts": [
                        {"account": "20208000900000000001", "type": "tirikchilik"},
                        {"account": "22618000900000000002", "type": "card"}
                    ]
                }
            }),
        }
    }

    #[tokio::test]
    async fn payout_accounts_store_pinfl() {
        let user_id = Uuid::new_v4();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id))));
        users
            .expect_set_pinfl()
            .with(eq(user_id), eq("30101900000000".to_string()))
            .times(1)
            .returning(|_, _| Ok(()));
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_check_account()
            .with(eq("998901234567".to_string()))
            .returning(|_| Ok(accounts_response()));

        let accounts = build(
            users,
            MockCategoryRepository::new(),
            MockSocialRepository::new(),
            MockSubscriptionRepository::new(),
            gateway,
        )
        .payout_accounts(user_id)
        .await
        .unwrap();

        assert_eq!(accounts.bank_accounts, vec!["20208000900000000001".to_string()]);
    }

    #[tokio::test]
    async fn gateway_failure_surfaces_raw_body() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id))));
        users.expect_set_pinfl().never();
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_check_account().returning(|_| {
            Ok(GatewayResponse {
                status: 404,
                body: json!({"message": "client not found"}),
            })
        });

        let err = build(
            users,
            MockCategoryRepository::new(),
            MockSocialRepository::new(),
            MockSubscriptionRepository::new(),
            gateway,
        )
        .payout_accounts(Uuid::new_v4())
        .await
        .unwrap_err();

        assert_eq!(err.gateway_detail(), Some(json!({"message": "client not found"})));
    }

    #[tokio::test]
    async fn only_listed_payout_account_can_be_attached() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id))));
        users.expect_attach_multibank_account().never();
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_check_account()
            .returning(|_| Ok(accounts_response()));

        let err = build(
            users,
            MockCategoryRepository::new(),
            MockSocialRepository::new(),
            MockSubscriptionRepository::new(),
            gateway,
        )
        .attach_account(
            Uuid::new_v4(),
            AttachAccountModel {
                multibank_account: "22618000900000000002".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CreatorError::UnknownAccount));
    }

    #[tokio::test]
    async fn becoming_creator_requires_verified_account() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id))));
        users.expect_become_creator().never();

        let err = build(
            users,
            MockCategoryRepository::new(),
            MockSocialRepository::new(),
            MockSubscriptionRepository::new(),
            MockPaymentGateway::new(),
        )
        .become_creator(Uuid::new_v4(), BecomeCreatorModel::default())
        .await
        .unwrap_err();

        assert!(matches!(err, CreatorError::AccountRequired));
    }

    #[tokio::test]
    async fn becoming_creator_promotes_user() {
        let user_id = Uuid::new_v4();
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|id| {
            let mut user = sample_creator(id, 10);
            user.is_creator = false;
            Ok(Some(user))
        });
        users
            .expect_update_profile()
            .returning(|id, _| Ok(InsertOutcome::Inserted(sample_user(id))));
        users
            .expect_become_creator()
            .with(eq(user_id))
            .times(1)
            .returning(|id| Ok(sample_creator(id, 10)));

        let dto = build(
            users,
            MockCategoryRepository::new(),
            MockSocialRepository::new(),
            MockSubscriptionRepository::new(),
            MockPaymentGateway::new(),
        )
        .become_creator(user_id, BecomeCreatorModel::default())
        .await
        .unwrap();

        assert!(dto.is_creator);
    }

    #[tokio::test]
    async fn popular_skips_empty_categories() {
        let (music, podcasts) = (Uuid::new_v4(), Uuid::new_v4());
        let mut categories = MockCategoryRepository::new();
        categories.expect_list().returning(move || {
            Ok(vec![
                CategoryEntity {
                    id: music,
                    name: "Music".to_string(),
                    created_at: Utc::now(),
                },
                CategoryEntity {
                    id: podcasts,
                    name: "Podcasts".to_string(),
                    created_at: Utc::now(),
                },
            ])
        });
        let creator = CreatorSummary {
            id: Uuid::new_v4(),
            username: Some("singer".to_string()),
            full_name: None,
            profile_photo_id: None,
            category_id: Some(music),
            follower_count: 7,
        };
        let mut users = MockUserRepository::new();
        let top = creator.clone();
        users
            .expect_popular_creators()
            .with(eq(None::<Uuid>), eq(MOST_POPULAR_LIMIT))
            .returning(move |_, _| Ok(vec![top.clone()]));
        let in_music = creator.clone();
        users
            .expect_popular_creators()
            .with(eq(Some(music)), eq(PER_CATEGORY_LIMIT))
            .returning(move |_, _| Ok(vec![in_music.clone()]));
        users
            .expect_popular_creators()
            .with(eq(Some(podcasts)), eq(PER_CATEGORY_LIMIT))
            .returning(|_, _| Ok(Vec::new()));

        let popular = build(
            users,
            categories,
            MockSocialRepository::new(),
            MockSubscriptionRepository::new(),
            MockPaymentGateway::new(),
        )
        .popular()
        .await
        .unwrap();

        assert_eq!(popular.most_populars, vec![creator]);
        assert_eq!(popular.popular_by_categories.len(), 1);
        assert_eq!(popular.popular_by_categories[0].category_name, "Music");
    }

    #[tokio::test]
    async fn weekly_follower_stats_have_seven_points() {
        let creator_id = Uuid::new_v4();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_creator(id, 10))));
        let mut social = MockSocialRepository::new();
        social
            .expect_follow_timestamps_since()
            .withf(move |id, since| *id == creator_id && *since < Utc::now())
            .returning(|_, _| Ok(vec![Utc::now(), Utc::now()]));

        let points = build(
            users,
            MockCategoryRepository::new(),
            social,
            MockSubscriptionRepository::new(),
            MockPaymentGateway::new(),
        )
        .follower_stats(creator_id, FollowerRange::Week)
        .await
        .unwrap();

        assert_eq!(points.len(), 7);
        assert_eq!(points[6].count, 2);
    }

    #[tokio::test]
    async fn plan_shares_sum_to_hundred() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_creator(id, 10))));
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_subscriber_counts_by_plan().returning(|_, _| {
            Ok(vec![
                PlanSubscriberCount {
                    plan_id: Uuid::new_v4(),
                    name: "Basic".to_string(),
                    subscriber_count: 3,
                },
                PlanSubscriberCount {
                    plan_id: Uuid::new_v4(),
                    name: "Gold".to_string(),
                    subscriber_count: 1,
                },
            ])
        });

        let shares = build(
            users,
            MockCategoryRepository::new(),
            MockSocialRepository::new(),
            subscriptions,
            MockPaymentGateway::new(),
        )
        .plan_shares(Uuid::new_v4())
        .await
        .unwrap();

        assert_eq!(shares[0].percent, 75.0);
        assert_eq!(shares[1].percent, 25.0);
    }

    #[tokio::test]
    async fn stats_are_for_creators_only() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id))));

        let err = build(
            users,
            MockCategoryRepository::new(),
            MockSocialRepository::new(),
            MockSubscriptionRepository::new(),
            MockPaymentGateway::new(),
        )
        .plan_shares(Uuid::new_v4())
        .await
        .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
    }
}
