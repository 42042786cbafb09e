use std::sync::Arc;

use chrono::{DateTime, Utc};
use crates::domain::{
    repositories::{admins::AdminRepository, analytics::AnalyticsRepository, users::UserRepository},
    value_objects::{
        analytics::{AnalyticsRange, DashboardReport, DashboardType, series_total},
        enums::{time_periods::TimePeriod, user_types::UserType},
        permissions::{Access, Section},
    },
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use super::admin::{AdminError, PermissionGate};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    pub dashboard_type: String,
    pub time_period: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub user_type: Option<String>,
}

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("unknown dashboard type {0}")]
    UnknownDashboard(String),
    #[error("unknown time period {0}")]
    UnknownPeriod(String),
    #[error("`from` must not be after `to`")]
    InvalidRange,
    #[error(transparent)]
    Access(#[from] AdminError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AnalyticsError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            AnalyticsError::UnknownDashboard(_)
            | AnalyticsError::UnknownPeriod(_)
            | AnalyticsError::InvalidRange => StatusCode::BAD_REQUEST,
            AnalyticsError::Access(err) => err.status_code(),
            AnalyticsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, AnalyticsError>;

pub struct AnalyticsUseCase<U, A, R>
where
    U: UserRepository + Send + Sync + 'static,
    A: AdminRepository + Send + Sync + 'static,
    R: AnalyticsRepository + Send + Sync + 'static,
{
    gate: PermissionGate<U, A>,
    analytics_repo: Arc<R>,
}

impl<U, A, R> AnalyticsUseCase<U, A, R>
where
    U: UserRepository + Send + Sync + 'static,
    A: AdminRepository + Send + Sync + 'static,
    R: AnalyticsRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, admin_repo: Arc<A>, analytics_repo: Arc<R>) -> Self {
        Self {
            gate: PermissionGate::new(user_repo, admin_repo),
            analytics_repo,
        }
    }

    pub async fn dashboard(&self, admin_id: Uuid, query: DashboardQuery) -> UseCaseResult<DashboardReport> {
        self.gate
            .check(admin_id, Section::Statistics, Access::View)
            .await?;

        let dashboard_type = DashboardType::from_str(&query.dashboard_type)
            .ok_or_else(|| AnalyticsError::UnknownDashboard(query.dashboard_type.clone()))?;
        let period = match query.time_period.as_deref() {
            Some(raw) => TimePeriod::from_str(raw).ok_or_else(|| AnalyticsError::UnknownPeriod(raw.to_string()))?,
            None => TimePeriod::default(),
        };
        if let (Some(from), Some(to)) = (query.from, query.to) {
            if from > to {
                return Err(AnalyticsError::InvalidRange);
            }
        }
        let range = AnalyticsRange {
            period,
            from: query.from,
            to: query.to,
            user_type: query
                .user_type
                .as_deref()
                .map(UserType::from_str)
                .unwrap_or_default(),
        };
        debug!(%admin_id, ?dashboard_type, ?range, "analytics: building dashboard");

        let report = match dashboard_type {
            DashboardType::CreatorEarnings => {
                let series = self
                    .analytics_repo
                    .creator_earnings(range)
                    .await
                    .map_err(log_failure)?;
                DashboardReport::CreatorEarnings {
                    period,
                    total: series_total(&series),
                    series,
                }
            }
            DashboardType::PlatformEarnings => {
                let series = self
                    .analytics_repo
                    .platform_earnings(range)
                    .await
                    .map_err(log_failure)?;
                DashboardReport::PlatformEarnings {
                    period,
                    total: series_total(&series),
                    series,
                }
            }
            DashboardType::RegisteredAccounts => {
                let user_type = range.user_type;
                let series = self
                    .analytics_repo
                    .registered_accounts(range)
                    .await
                    .map_err(log_failure)?;
                DashboardReport::RegisteredAccounts {
                    period,
                    user_type,
                    series,
                }
            }
            DashboardType::ActiveSubscriptions => {
                let now = Utc::now();
                let series = self
                    .analytics_repo
                    .active_subscriptions(range, now)
                    .await
                    .map_err(log_failure)?;
                let total = self
                    .analytics_repo
                    .active_subscription_total(now)
                    .await
                    .map_err(log_failure)?;
                DashboardReport::ActiveSubscriptions {
                    period,
                    total,
                    series,
                }
            }
            DashboardType::ContentTypeCounts => DashboardReport::ContentTypeCounts {
                counts: self
                    .analytics_repo
                    .content_type_counts()
                    .await
                    .map_err(log_failure)?,
            },
        };

        Ok(report)
    }
}

fn log_failure(err: anyhow::Error) -> AnalyticsError {
    error!(db_error = ?err, "analytics: query failed");
    AnalyticsError::Internal(err)
}
