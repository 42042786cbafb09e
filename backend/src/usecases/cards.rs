use std::sync::Arc;

use crates::{
    domain::{
        entities::cards::{CardBinding, CardDto, InsertCardEntity},
        repositories::{cards::CardRepository, users::UserRepository},
        value_objects::{enums::card_types::CardType, phone::normalize_phone},
    },
    multibank::PaymentGateway,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::payments::PaymentError;

#[derive(Debug, Clone, Deserialize)]
pub struct AddCardModel {
    pub number: String,
    pub expiration: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AddCardResult {
    pub card: CardDto,
    pub form_url: String,
}

/// Body posted by the gateway once the hosted card form is completed.
#[derive(Debug, Clone, Deserialize)]
pub struct BindCardCallback {
    pub phone: Option<String>,
    pub card_pan: Option<String>,
    pub card_token: Option<String>,
    pub holder_name: Option<String>,
    pub ps: Option<String>,
}

#[derive(Debug, Error)]
pub enum CardError {
    #[error("user not found")]
    UserNotFound,
    #[error("card not found")]
    CardNotFound,
    #[error("card is not active")]
    CardNotActive,
    #[error("card number must contain 16 digits")]
    InvalidNumber,
    #[error("expiration must look like MM/YY")]
    InvalidExpiration,
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CardError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            CardError::UserNotFound | CardError::CardNotFound => StatusCode::NOT_FOUND,
            CardError::CardNotActive | CardError::InvalidNumber | CardError::InvalidExpiration => {
                StatusCode::BAD_REQUEST
            }
            CardError::Payment(err) => err.status_code(),
            CardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, CardError>;

fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn valid_expiration(value: &str) -> bool {
    let Some((month, year)) = value.trim().split_once('/') else {
        return false;
    };
    let month_ok = month
        .parse::<u8>()
        .is_ok_and(|month| (1..=12).contains(&month));
    month_ok && year.len() == 2 && year.chars().all(|c| c.is_ascii_digit())
}

impl BindCardCallback {
    /// Binding values, `None` when the payload lacks the fields needed to match a card.
    pub fn binding(&self) -> Option<CardBinding> {
        let phone_number = self.phone.as_deref().and_then(normalize_phone)?;
        let pan = digits(self.card_pan.as_deref()?);
        if pan.len() < 4 {
            return None;
        }
        let token = self.card_token.clone().filter(|token| !token.is_empty())?;

        Some(CardBinding {
            phone_number,
            last_four: pan[pan.len() - 4..].to_string(),
            token,
            card_owner: self.holder_name.clone().filter(|name| !name.is_empty()),
            card_type: self
                .ps
                .as_deref()
                .and_then(CardType::from_str)
                .map(|card_type| card_type.to_string()),
        })
    }
}

pub struct CardUseCase<U, C, G>
where
    U: UserRepository + Send + Sync + 'static,
    C: CardRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    card_repo: Arc<C>,
    gateway: Arc<G>,
}

impl<U, C, G> CardUseCase<U, C, G>
where
    U: UserRepository + Send + Sync + 'static,
    C: CardRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, card_repo: Arc<C>, gateway: Arc<G>) -> Self {
        Self {
            user_repo,
            card_repo,
            gateway,
        }
    }

    pub async fn list(&self, user_id: Uuid) -> UseCaseResult<Vec<CardDto>> {
        let cards = self.card_repo.list_for_user(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "cards: failed to list cards");
            CardError::Internal(err)
        })?;
        Ok(cards.into_iter().map(CardDto::from).collect())
    }

    /// Opens a binding session on the gateway and stores the card as pending.
    pub async fn add(&self, user_id: Uuid, model: AddCardModel) -> UseCaseResult<AddCardResult> {
        let number = digits(&model.number);
        if number.len() != 16 {
            return Err(CardError::InvalidNumber);
        }
        if !valid_expiration(&model.expiration) {
            return Err(CardError::InvalidExpiration);
        }

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "cards: failed to load user");
                CardError::Internal(err)
            })?
            .ok_or(CardError::UserNotFound)?;

        let response = self.gateway.bind_card(user.phone_number).await?;
        if !response.is_success() {
            warn!(%user_id, gateway_status = response.status, "cards: bind request rejected");
            return Err(PaymentError::Gateway {
                response: response.body,
            }
            .into());
        }
        let Some(form_url) = response.data_str("form_url") else {
            warn!(%user_id, "cards: bind response carried no form url");
            return Err(PaymentError::Gateway {
                response: response.body,
            }
            .into());
        };

        // Only stored once the gateway accepted the binding request.
        let card = self
            .card_repo
            .create(InsertCardEntity {
                user_id,
                number,
                expiration: model.expiration.trim().to_string(),
                is_main: false,
                is_active: false,
            })
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "cards: failed to create card");
                CardError::Internal(err)
            })?;

        info!(%user_id, card_id = %card.id, "cards: card binding started");
        Ok(AddCardResult {
            card: card.into(),
            form_url,
        })
    }

    pub async fn delete(&self, user_id: Uuid, card_id: Uuid) -> UseCaseResult<()> {
        let card = self
            .card_repo
            .find_for_user(user_id, card_id)
            .await
            .map_err(|err| {
                error!(%user_id, %card_id, db_error = ?err, "cards: failed to load card");
                CardError::Internal(err)
            })?
            .filter(|card| !card.is_deleted)
            .ok_or(CardError::CardNotFound)?;

        if let Some(token) = card.token.clone().filter(|token| !token.is_empty()) {
            match self.gateway.remove_card(token).await {
                Ok(response) if response.is_success() => {}
                Ok(response) => {
                    warn!(%user_id, %card_id, gateway_status = response.status, "cards: gateway refused card removal");
                }
                Err(err) => {
                    warn!(%user_id, %card_id, error = ?err, "cards: gateway card removal failed");
                }
            }
        }

        self.card_repo
            .soft_delete(user_id, card_id)
            .await
            .map_err(|err| {
                error!(%user_id, %card_id, db_error = ?err, "cards: failed to delete card");
                CardError::Internal(err)
            })?;

        info!(%user_id, %card_id, "cards: card deleted");
        Ok(())
    }

    pub async fn set_main(&self, user_id: Uuid, card_id: Uuid) -> UseCaseResult<()> {
        let card = self
            .card_repo
            .find_for_user(user_id, card_id)
            .await
            .map_err(|err| {
                error!(%user_id, %card_id, db_error = ?err, "cards: failed to load card");
                CardError::Internal(err)
            })?
            .filter(|card| !card.is_deleted)
            .ok_or(CardError::CardNotFound)?;
        if !card.is_active {
            return Err(CardError::CardNotActive);
        }

        self.card_repo
            .set_main(user_id, card_id)
            .await
            .map_err(|err| {
                error!(%user_id, %card_id, db_error = ?err, "cards: failed to set main card");
                CardError::Internal(err)
            })?;
        Ok(())
    }

    /// Returns whether a pending card matched the callback.
    pub async fn bind_callback(&self, callback: BindCardCallback) -> UseCaseResult<bool> {
        let Some(binding) = callback.binding() else {
            warn!("cards: bind callback missing phone, pan or token");
            return Ok(false);
        };

        let card = self
            .card_repo
            .activate_binding(binding)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "cards: failed to activate bound card");
                CardError::Internal(err)
            })?;

        match card {
            Some(card) => {
                info!(user_id = %card.user_id, card_id = %card.id, "cards: card bound");
                Ok(true)
            }
            None => {
                warn!("cards: no pending card matches bind callback");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_fixtures::{sample_card, sample_user};
    use crates::{
        domain::repositories::{cards::MockCardRepository, users::MockUserRepository},
        multibank::{GatewayResponse, MockPaymentGateway},
    };
    use mockall::predicate::eq;
    use serde_json::json;

    #[test]
    fn callback_binding_uses_last_four_and_known_card_type() {
        let callback = BindCardCallback {
            phone: Some("+998 90 123 45 67".to_string()),
            card_pan: Some("860012******1234".to_string()),
            card_token: Some("tok".to_string()),
            holder_name: Some("ALI VALIYEV".to_string()),
            ps: Some("HUMO".to_string()),
        };

        let binding = callback.binding().unwrap();
        assert_eq!(binding.phone_number, "998901234567");
        assert_eq!(binding.last_four, "1234");
        assert_eq!(binding.card_type.as_deref(), Some("humo"));

        let unknown = BindCardCallback {
            ps: Some("amex".to_string()),
            ..callback
        };
        assert_eq!(unknown.binding().unwrap().card_type, None);
    }

    #[test]
    fn expiration_format() {
        assert!(valid_expiration("01/27"));
        assert!(!valid_expiration("13/27"));
        assert!(!valid_expiration("0127"));
    }

    #[tokio::test]
    async fn add_returns_gateway_form_url() {
        let user_id = Uuid::new_v4();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(sample_user(user_id))));
        let mut cards = MockCardRepository::new();
        cards
            .expect_create()
            .withf(|insert| !insert.is_active && !insert.is_main && insert.number.len() == 16)
            .returning(move |insert| {
                let mut card = sample_card(Uuid::new_v4(), insert.user_id);
                card.is_active = false;
                card.token = None;
                Ok(card)
            });
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_bind_card()
            .with(eq("998901234567".to_string()))
            .returning(|_| {
                Ok(GatewayResponse {
                    status: 200,
                    body: json!({"data": {"form_url": "https://pay.example/form/1"}}),
                })
            });

        let usecase = CardUseCase::new(Arc::new(users), Arc::new(cards), Arc::new(gateway));
        let result = usecase
            .add(
                user_id,
                AddCardModel {
                    number: "8600 1234 1234 1234".to_string(),
                    expiration: "12/29".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.form_url, "https://pay.example/form/1");
        assert_eq!(result.card.number, "**** **** **** 1234");
    }

    #[tokio::test]
    async fn rejected_binding_stores_no_card() {
        let user_id = Uuid::new_v4();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(sample_user(user_id))));
        let mut cards = MockCardRepository::new();
        cards.expect_create().never();
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_bind_card().returning(|_| {
            Ok(GatewayResponse {
                status: 400,
                body: json!({"message": "phone is not registered"}),
            })
        });

        let usecase = CardUseCase::new(Arc::new(users), Arc::new(cards), Arc::new(gateway));
        let err = usecase
            .add(
                user_id,
                AddCardModel {
                    number: "8600123412341234".to_string(),
                    expiration: "12/29".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CardError::Payment(PaymentError::Gateway { .. })));
    }

    #[tokio::test]
    async fn delete_survives_gateway_failure() {
        let (user_id, card_id) = (Uuid::new_v4(), Uuid::new_v4());
        let mut cards = MockCardRepository::new();
        cards
            .expect_find_for_user()
            .returning(move |_, _| Ok(Some(sample_card(card_id, user_id))));
        cards
            .expect_soft_delete()
            .with(eq(user_id), eq(card_id))
            .times(1)
            .returning(|_, _| Ok(()));
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_remove_card()
            .returning(|_| Err(anyhow::anyhow!("timeout")));

        let usecase = CardUseCase::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(cards),
            Arc::new(gateway),
        );

        assert!(usecase.delete(user_id, card_id).await.is_ok());
    }

    #[tokio::test]
    async fn inactive_card_cannot_be_main() {
        let (user_id, card_id) = (Uuid::new_v4(), Uuid::new_v4());
        let mut cards = MockCardRepository::new();
        cards.expect_find_for_user().returning(move |_, _| {
            let mut card = sample_card(card_id, user_id);
            card.is_active = false;
            Ok(Some(card))
        });
        cards.expect_set_main().never();

        let usecase = CardUseCase::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(cards),
            Arc::new(MockPaymentGateway::new()),
        );
        let err = usecase.set_main(user_id, card_id).await.unwrap_err();

        assert!(matches!(err, CardError::CardNotActive));
    }
}
