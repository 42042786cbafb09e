use std::{collections::BTreeMap, sync::Arc};

use chrono::{Duration, Utc};
use crates::{
    domain::{
        entities::{
            sms_confirmations::InsertSmsConfirmationEntity,
            users::{InsertUserEntity, UpdateUserEntity, UserEntity},
        },
        repositories::{
            admins::AdminRepository, sms_confirmations::SmsConfirmationRepository,
            users::UserRepository,
        },
        value_objects::{
            enums::sms_purposes::SmsPurpose,
            insert_outcome::InsertOutcome,
            permissions::{group_by_section, parse_codes},
            phone::normalize_phone,
            users::UserDto,
        },
    },
    notifications::SmsSender,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        AuthError, TokenPair, issue_access_token, issue_token_pair, password::verify_password,
        validate_refresh_token,
    },
    config::config_model::UserSecret,
};

/// A phone may request one code per purpose within this window.
const RESEND_COOLDOWN_SECS: i64 = 60;
const CODE_TTL_MINUTES: i64 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginModel {
    pub phone_number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyModel {
    pub phone_number: String,
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminLoginModel {
    pub phone_number: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileModel {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub creator_description: Option<String>,
    pub profile_photo_id: Option<Uuid>,
    pub background_photo_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub minimum_message_donation: Option<i64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CodeSent {
    pub phone_number: String,
    pub is_new_user: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdminSession {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub permissions: Vec<String>,
    pub permissions_by_category: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Error)]
pub enum AuthUseCaseError {
    #[error("phone number is required")]
    EmptyPhone,
    #[error("user not found")]
    UserNotFound,
    #[error("account is blocked")]
    AccountBlocked,
    #[error("a code was sent recently, try again in a minute")]
    TooManyRequests,
    #[error("invalid code")]
    InvalidCode,
    #[error("code has expired")]
    CodeExpired,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("wrong login or password")]
    InvalidCredentials,
    #[error("username is already taken")]
    UsernameTaken,
    #[error("minimum message donation must not be negative")]
    InvalidMinimumDonation,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthUseCaseError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            AuthUseCaseError::EmptyPhone
            | AuthUseCaseError::InvalidCode
            | AuthUseCaseError::CodeExpired
            | AuthUseCaseError::UsernameTaken
            | AuthUseCaseError::InvalidMinimumDonation => StatusCode::BAD_REQUEST,
            AuthUseCaseError::UserNotFound => StatusCode::NOT_FOUND,
            AuthUseCaseError::AccountBlocked | AuthUseCaseError::InvalidCredentials => {
                StatusCode::FORBIDDEN
            }
            AuthUseCaseError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            AuthUseCaseError::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            AuthUseCaseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for AuthUseCaseError {
    fn from(err: AuthError) -> Self {
        AuthUseCaseError::Internal(err.into_inner())
    }
}

pub type UseCaseResult<T> = std::result::Result<T, AuthUseCaseError>;

fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

pub struct AuthUseCase<U, C, A, Sms>
where
    U: UserRepository + Send + Sync + 'static,
    C: SmsConfirmationRepository + Send + Sync + 'static,
    A: AdminRepository + Send + Sync + 'static,
    Sms: SmsSender + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    confirmation_repo: Arc<C>,
    admin_repo: Arc<A>,
    sms: Arc<Sms>,
    secrets: UserSecret,
}

impl<U, C, A, Sms> AuthUseCase<U, C, A, Sms>
where
    U: UserRepository + Send + Sync + 'static,
    C: SmsConfirmationRepository + Send + Sync + 'static,
    A: AdminRepository + Send + Sync + 'static,
    Sms: SmsSender + Send + Sync + 'static,
{
    pub fn new(
        user_repo: Arc<U>,
        confirmation_repo: Arc<C>,
        admin_repo: Arc<A>,
        sms: Arc<Sms>,
        secrets: UserSecret,
    ) -> Self {
        Self {
            user_repo,
            confirmation_repo,
            admin_repo,
            sms,
            secrets,
        }
    }

    async fn load_user(&self, user_id: Uuid) -> UseCaseResult<UserEntity> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "auth: failed to load user");
                AuthUseCaseError::Internal(err)
            })?
            .filter(|user| !user.is_deleted)
            .ok_or(AuthUseCaseError::UserNotFound)
    }

    async fn find_by_phone(&self, phone_number: &str) -> UseCaseResult<Option<UserEntity>> {
        self.user_repo
            .find_by_phone(phone_number.to_string())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "auth: failed to look up phone");
                AuthUseCaseError::Internal(err)
            })
    }

    /// Issues a fresh code unless one for the same purpose went out within the cooldown.
    async fn send_code(&self, phone_number: &str, purpose: SmsPurpose) -> UseCaseResult<()> {
        let now = Utc::now();
        let latest = self
            .confirmation_repo
            .latest_for_phone(phone_number.to_string(), purpose)
            .await
            .map_err(|err| {
                error!(%purpose, db_error = ?err, "auth: failed to load latest code");
                AuthUseCaseError::Internal(err)
            })?;
        if latest.is_some_and(|confirmation| {
            confirmation.created_at > now - Duration::seconds(RESEND_COOLDOWN_SECS)
        }) {
            return Err(AuthUseCaseError::TooManyRequests);
        }

        let code = generate_code();
        self.confirmation_repo
            .create(InsertSmsConfirmationEntity {
                phone_number: phone_number.to_string(),
                code: code.clone(),
                purpose: purpose.to_string(),
                expires_at: now + Duration::minutes(CODE_TTL_MINUTES),
            })
            .await
            .map_err(|err| {
                error!(%purpose, db_error = ?err, "auth: failed to store code");
                AuthUseCaseError::Internal(err)
            })?;

        self.sms
            .send(phone_number.to_string(), purpose.message(&code))
            .await
            .map_err(|err| {
                error!(%purpose, error = ?err, "auth: failed to send sms");
                AuthUseCaseError::Internal(err)
            })?;

        info!(%purpose, "auth: confirmation code sent");
        Ok(())
    }

    /// Checks and consumes a code.
    async fn consume_code(
        &self,
        phone_number: &str,
        code: &str,
        purpose: SmsPurpose,
    ) -> UseCaseResult<()> {
        let confirmation = self
            .confirmation_repo
            .find_unused(phone_number.to_string(), code.trim().to_string(), purpose)
            .await
            .map_err(|err| {
                error!(%purpose, db_error = ?err, "auth: failed to look up code");
                AuthUseCaseError::Internal(err)
            })?
            .ok_or(AuthUseCaseError::InvalidCode)?;

        if confirmation.expires_at < Utc::now() {
            return Err(AuthUseCaseError::CodeExpired);
        }

        self.confirmation_repo
            .mark_used(confirmation.id)
            .await
            .map_err(|err| {
                error!(%purpose, db_error = ?err, "auth: failed to consume code");
                AuthUseCaseError::Internal(err)
            })
    }

    /// Starts SMS login, creating the account on first contact.
    pub async fn login(&self, model: LoginModel) -> UseCaseResult<CodeSent> {
        let phone_number =
            normalize_phone(&model.phone_number).ok_or(AuthUseCaseError::EmptyPhone)?;

        let (purpose, is_new_user) = match self.find_by_phone(&phone_number).await? {
            Some(user) if user.is_blocked_by_admin => return Err(AuthUseCaseError::AccountBlocked),
            Some(user) if user.sms_verified => (SmsPurpose::Login, false),
            Some(_) => (SmsPurpose::Register, true),
            None => {
                let user = self
                    .user_repo
                    .create(InsertUserEntity {
                        phone_number: phone_number.clone(),
                        username: None,
                        full_name: None,
                        is_admin: false,
                        is_active: false,
                        password_hash: None,
                    })
                    .await
                    .map_err(|err| {
                        error!(db_error = ?err, "auth: failed to create user");
                        AuthUseCaseError::Internal(err)
                    })?;
                info!(user_id = %user.id, "auth: user registered");
                (SmsPurpose::Register, true)
            }
        };

        self.send_code(&phone_number, purpose).await?;
        Ok(CodeSent {
            phone_number,
            is_new_user,
        })
    }

    pub async fn verify(&self, model: VerifyModel) -> UseCaseResult<TokenPair> {
        let phone_number =
            normalize_phone(&model.phone_number).ok_or(AuthUseCaseError::EmptyPhone)?;
        let user = self
            .find_by_phone(&phone_number)
            .await?
            .ok_or(AuthUseCaseError::UserNotFound)?;
        if user.is_blocked_by_admin {
            return Err(AuthUseCaseError::AccountBlocked);
        }

        let purpose = if user.sms_verified {
            SmsPurpose::Login
        } else {
            SmsPurpose::Register
        };
        self.consume_code(&phone_number, &model.code, purpose).await?;

        self.user_repo.record_login(user.id).await.map_err(|err| {
            error!(user_id = %user.id, db_error = ?err, "auth: failed to record login");
            AuthUseCaseError::Internal(err)
        })?;

        info!(user_id = %user.id, "auth: user logged in");
        Ok(issue_token_pair(user.id, &self.secrets)?)
    }

    pub async fn refresh(&self, refresh_token: &str) -> UseCaseResult<String> {
        let user_id = validate_refresh_token(refresh_token, &self.secrets).map_err(|err| {
            warn!(error = %err, "auth: refresh token rejected");
            AuthUseCaseError::InvalidRefreshToken
        })?;
        let user = self
            .load_user(user_id)
            .await
            .map_err(|_| AuthUseCaseError::InvalidRefreshToken)?;
        if user.is_blocked_by_admin {
            return Err(AuthUseCaseError::AccountBlocked);
        }
        Ok(issue_access_token(user_id, &self.secrets)?)
    }

    pub async fn admin_login(&self, model: AdminLoginModel) -> UseCaseResult<AdminSession> {
        let phone_number =
            normalize_phone(&model.phone_number).ok_or(AuthUseCaseError::InvalidCredentials)?;
        let user = self
            .find_by_phone(&phone_number)
            .await?
            .filter(|user| user.is_admin && !user.is_blocked_by_admin)
            .ok_or(AuthUseCaseError::InvalidCredentials)?;

        let password_ok = user
            .password_hash
            .as_deref()
            .is_some_and(|hash| verify_password(&model.password, hash));
        if !password_ok {
            warn!(user_id = %user.id, "auth: admin login with wrong password");
            return Err(AuthUseCaseError::InvalidCredentials);
        }

        let permissions = self.admin_repo.permissions_for(user.id).await.map_err(|err| {
            error!(user_id = %user.id, db_error = ?err, "auth: failed to load permissions");
            AuthUseCaseError::Internal(err)
        })?;
        let grouped = group_by_section(&parse_codes(&permissions));

        self.user_repo.record_login(user.id).await.map_err(|err| {
            error!(user_id = %user.id, db_error = ?err, "auth: failed to record login");
            AuthUseCaseError::Internal(err)
        })?;

        info!(user_id = %user.id, "auth: admin logged in");
        Ok(AdminSession {
            tokens: issue_token_pair(user.id, &self.secrets)?,
            permissions,
            permissions_by_category: grouped,
        })
    }

    pub async fn me(&self, user_id: Uuid) -> UseCaseResult<UserDto> {
        Ok(self.load_user(user_id).await?.into())
    }

    pub async fn update_me(
        &self,
        user_id: Uuid,
        model: UpdateProfileModel,
    ) -> UseCaseResult<UserDto> {
        if model.minimum_message_donation.is_some_and(|amount| amount < 0) {
            return Err(AuthUseCaseError::InvalidMinimumDonation);
        }
        let username = model
            .username
            .map(|username| username.trim().trim_start_matches('@').to_string())
            .filter(|username| !username.is_empty());

        let outcome = self
            .user_repo
            .update_profile(
                user_id,
                UpdateUserEntity {
                    username,
                    full_name: model.full_name,
                    creator_description: model.creator_description,
                    profile_photo_id: model.profile_photo_id,
                    background_photo_id: model.background_photo_id,
                    category_id: model.category_id,
                    minimum_message_donation: model.minimum_message_donation,
                    updated_at: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "auth: failed to update profile");
                AuthUseCaseError::Internal(err)
            })?;

        match outcome {
            InsertOutcome::Inserted(user) => Ok(user.into()),
            InsertOutcome::Duplicate => Err(AuthUseCaseError::UsernameTaken),
        }
    }

    pub async fn request_account_deletion(&self, user_id: Uuid) -> UseCaseResult<()> {
        let user = self.load_user(user_id).await?;
        self.send_code(&user.phone_number, SmsPurpose::DeleteAccount)
            .await
    }

    pub async fn confirm_account_deletion(&self, user_id: Uuid, code: &str) -> UseCaseResult<()> {
        let user = self.load_user(user_id).await?;
        self.consume_code(&user.phone_number, code, SmsPurpose::DeleteAccount)
            .await?;

        self.user_repo.soft_delete(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "auth: failed to delete account");
            AuthUseCaseError::Internal(err)
        })?;

        info!(%user_id, "auth: account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::password::hash_password, usecases::test_fixtures::sample_user};
    use crates::{
        domain::{
            entities::sms_confirmations::SmsConfirmationEntity,
            repositories::{
                admins::MockAdminRepository, sms_confirmations::MockSmsConfirmationRepository,
                users::MockUserRepository,
            },
        },
        notifications::sms::MockSmsSender,
    };
    use mockall::predicate::eq;

    type TestUseCase = AuthUseCase<
        MockUserRepository,
        MockSmsConfirmationRepository,
        MockAdminRepository,
        MockSmsSender,
    >;

    fn secrets() -> UserSecret {
        UserSecret {
            secret: "access-secret".to_string(),
            refresh_secret: "refresh-secret".to_string(),
            access_ttl_secs: 3_600,
            refresh_ttl_secs: 7_200,
        }
    }

    fn build(
        users: MockUserRepository,
        confirmations: MockSmsConfirmationRepository,
        admins: MockAdminRepository,
        sms: MockSmsSender,
    ) -> TestUseCase {
        AuthUseCase::new(
            Arc::new(users),
            Arc::new(confirmations),
            Arc::new(admins),
            Arc::new(sms),
            secrets(),
        )
    }

    fn confirmation(phone: &str, code: &str, purpose: SmsPurpose, age_secs: i64) -> SmsConfirmationEntity {
        let created_at = Utc::now() - Duration::seconds(age_secs);
        SmsConfirmationEntity {
            id: Uuid::new_v4(),
            phone_number: phone.to_string(),
            code: code.to_string(),
            purpose: purpose.to_string(),
            is_used: false,
            expires_at: created_at + Duration::minutes(CODE_TTL_MINUTES),
            created_at,
        }
    }

    #[test]
    fn codes_have_six_digits() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn login_registers_unknown_phone() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_phone()
            .with(eq("998901234567".to_string()))
            .returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|insert| insert.phone_number == "998901234567" && !insert.is_active)
            .times(1)
            .returning(|insert| {
                let mut user = sample_user(Uuid::new_v4());
                user.phone_number = insert.phone_number;
                user.sms_verified = false;
                Ok(user)
            });
        let mut confirmations = MockSmsConfirmationRepository::new();
        confirmations
            .expect_latest_for_phone()
            .returning(|_, _| Ok(None));
        confirmations
            .expect_create()
            .withf(|insert| insert.purpose == "register" && insert.code.len() == 6)
            .returning(|insert| {
                Ok(confirmation(&insert.phone_number, &insert.code, SmsPurpose::Register, 0))
            });
        let mut sms = MockSmsSender::new();
        sms.expect_send()
            .withf(|phone, message| phone == "998901234567" && message.contains("registration"))
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = build(users, confirmations, MockAdminRepository::new(), sms);
        let sent = usecase
            .login(LoginModel {
                phone_number: "+998 (90) 123-45-67".to_string(),
            })
            .await
            .unwrap();

        assert!(sent.is_new_user);
        assert_eq!(sent.phone_number, "998901234567");
    }

    #[tokio::test]
    async fn login_rejects_blank_phone() {
        let usecase = build(
            MockUserRepository::new(),
            MockSmsConfirmationRepository::new(),
            MockAdminRepository::new(),
            MockSmsSender::new(),
        );
        let err = usecase
            .login(LoginModel {
                phone_number: "phone".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn second_code_within_a_minute_is_refused() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_phone()
            .returning(|_| Ok(Some(sample_user(Uuid::new_v4()))));
        let mut confirmations = MockSmsConfirmationRepository::new();
        confirmations
            .expect_latest_for_phone()
            .with(eq("998901234567".to_string()), eq(SmsPurpose::Login))
            .returning(|phone, _| Ok(Some(confirmation(&phone, "111111", SmsPurpose::Login, 20))));
        confirmations.expect_create().never();
        let mut sms = MockSmsSender::new();
        sms.expect_send().never();

        let usecase = build(users, confirmations, MockAdminRepository::new(), sms);
        let err = usecase
            .login(LoginModel {
                phone_number: "998901234567".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AuthUseCaseError::TooManyRequests));
    }

    #[tokio::test]
    async fn verify_consumes_code_and_issues_tokens() {
        let user_id = Uuid::new_v4();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_phone()
            .returning(move |_| Ok(Some(sample_user(user_id))));
        users
            .expect_record_login()
            .with(eq(user_id))
            .times(1)
            .returning(|_| Ok(()));
        let mut confirmations = MockSmsConfirmationRepository::new();
        let stored = confirmation("998901234567", "123456", SmsPurpose::Login, 30);
        let stored_id = stored.id;
        confirmations
            .expect_find_unused()
            .with(
                eq("998901234567".to_string()),
                eq("123456".to_string()),
                eq(SmsPurpose::Login),
            )
            .returning(move |_, _, _| Ok(Some(stored.clone())));
        confirmations
            .expect_mark_used()
            .with(eq(stored_id))
            .times(1)
            .returning(|_| Ok(()));

        let usecase = build(
            users,
            confirmations,
            MockAdminRepository::new(),
            MockSmsSender::new(),
        );
        let tokens = usecase
            .verify(VerifyModel {
                phone_number: "998901234567".to_string(),
                code: "123456".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(
            crate::auth::validate_access_token(&tokens.access, &secrets()).unwrap(),
            user_id
        );
    }

    #[tokio::test]
    async fn expired_code_is_rejected() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_phone()
            .returning(|_| Ok(Some(sample_user(Uuid::new_v4()))));
        users.expect_record_login().never();
        let mut confirmations = MockSmsConfirmationRepository::new();
        confirmations.expect_find_unused().returning(|phone, code, _| {
            Ok(Some(confirmation(&phone, &code, SmsPurpose::Login, 11 * 60)))
        });
        confirmations.expect_mark_used().never();

        let usecase = build(
            users,
            confirmations,
            MockAdminRepository::new(),
            MockSmsSender::new(),
        );
        let err = usecase
            .verify(VerifyModel {
                phone_number: "998901234567".to_string(),
                code: "123456".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AuthUseCaseError::CodeExpired));
    }

    #[tokio::test]
    async fn admin_login_groups_permissions() {
        let user_id = Uuid::new_v4();
        let hash = hash_password("s3cret").unwrap();
        let mut users = MockUserRepository::new();
        users.expect_find_by_phone().returning(move |_| {
            let mut user = sample_user(user_id);
            user.is_admin = true;
            user.password_hash = Some(hash.clone());
            Ok(Some(user))
        });
        users.expect_record_login().returning(|_| Ok(()));
        let mut admins = MockAdminRepository::new();
        admins.expect_permissions_for().with(eq(user_id)).returning(|_| {
            Ok(vec![
                "VIEW_REPORTS".to_string(),
                "MODIFY_REPORTS".to_string(),
                "VIEW_CREATORS".to_string(),
            ])
        });

        let usecase = build(
            users,
            MockSmsConfirmationRepository::new(),
            admins,
            MockSmsSender::new(),
        );
        let session = usecase
            .admin_login(AdminLoginModel {
                phone_number: "998901234567".to_string(),
                password: "s3cret".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(session.permissions.len(), 3);
        assert_eq!(
            session.permissions_by_category.get("REPORTS"),
            Some(&vec!["VIEW".to_string(), "MODIFY".to_string()])
        );
    }

    #[tokio::test]
    async fn admin_login_rejects_wrong_password() {
        let hash = hash_password("s3cret").unwrap();
        let mut users = MockUserRepository::new();
        users.expect_find_by_phone().returning(move |_| {
            let mut user = sample_user(Uuid::new_v4());
            user.is_admin = true;
            user.password_hash = Some(hash.clone());
            Ok(Some(user))
        });

        let usecase = build(
            users,
            MockSmsConfirmationRepository::new(),
            MockAdminRepository::new(),
            MockSmsSender::new(),
        );
        let err = usecase
            .admin_login(AdminLoginModel {
                phone_number: "998901234567".to_string(),
                password: "guess".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn taken_username_is_reported() {
        let mut users = MockUserRepository::new();
        users
            .expect_update_profile()
            .withf(|_, changes| changes.username.as_deref() == Some("taken"))
            .returning(|_, _| Ok(InsertOutcome::Duplicate));

        let usecase = build(
            users,
            MockSmsConfirmationRepository::new(),
            MockAdminRepository::new(),
            MockSmsSender::new(),
        );
        let err = usecase
            .update_me(
                Uuid::new_v4(),
                UpdateProfileModel {
                    username: Some("@taken".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AuthUseCaseError::UsernameTaken));
    }

    #[tokio::test]
    async fn refresh_rejects_access_tokens() {
        let user_id = Uuid::new_v4();
        let access = issue_access_token(user_id, &secrets()).unwrap();
        let usecase = build(
            MockUserRepository::new(),
            MockSmsConfirmationRepository::new(),
            MockAdminRepository::new(),
            MockSmsSender::new(),
        );

        let err = usecase.refresh(&access).await.unwrap_err();

        assert!(matches!(err, AuthUseCaseError::InvalidRefreshToken));
    }
}
