use std::sync::Arc;

use anyhow::Result;
use axum::async_trait;
use crates::domain::{entities::users::UserEntity, repositories::users::UserRepository};
use uuid::Uuid;

/// Answers whether a token holder may still use the API.
#[async_trait]
pub trait AccountStatus: Send + Sync {
    async fn is_usable(&self, user_id: Uuid) -> Result<bool>;
}

/// Installed on the api router as an `Extension`.
pub type AccountGate = Arc<dyn AccountStatus>;

pub struct UserAccountStatus<U>
where
    U: UserRepository + Send + Sync,
{
    user_repo: Arc<U>,
}

impl<U> UserAccountStatus<U>
where
    U: UserRepository + Send + Sync,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }
}

pub fn account_is_usable(user: &UserEntity) -> bool {
    user.is_active && !user.is_deleted && !user.is_blocked_by_admin
}

#[async_trait]
impl<U> AccountStatus for UserAccountStatus<U>
where
    U: UserRepository + Send + Sync,
{
    async fn is_usable(&self, user_id: Uuid) -> Result<bool> {
        let user = self.user_repo.find_by_id(user_id).await?;
        Ok(user.as_ref().is_some_and(account_is_usable))
    }
}
