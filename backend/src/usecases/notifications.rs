use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use crates::{
    domain::{
        entities::notification_distributions::DistributionEntity,
        repositories::{devices::DeviceRepository, distributions::DistributionRepository},
        value_objects::enums::{distribution_statuses::DistributionStatus, user_types::UserType},
    },
    notifications::PushSender,
};
use serde_json::json;
use tracing::{error, info, warn};

use super::devices::push_to_tokens;

/// Sends due `waiting` distributions as push notifications to their audience.
pub struct DistributionDispatcher<Dr, Dv, P>
where
    Dr: DistributionRepository + Send + Sync + 'static,
    Dv: DeviceRepository + Send + Sync + 'static,
    P: PushSender + Send + Sync + 'static,
{
    distribution_repo: Arc<Dr>,
    device_repo: Arc<Dv>,
    push: Arc<P>,
}

impl<Dr, Dv, P> DistributionDispatcher<Dr, Dv, P>
where
    Dr: DistributionRepository + Send + Sync + 'static,
    Dv: DeviceRepository + Send + Sync + 'static,
    P: PushSender + Send + Sync + 'static,
{
    pub fn new(distribution_repo: Arc<Dr>, device_repo: Arc<Dv>, push: Arc<P>) -> Self {
        Self {
            distribution_repo,
            device_repo,
            push,
        }
    }

    pub async fn run(self: Arc<Self>, interval: Duration) {
        info!(interval_secs = interval.as_secs(), "dispatcher: started");
        loop {
            if let Err(err) = self.dispatch_due(Utc::now()).await {
                error!(error = ?err, "dispatcher: tick failed");
            }

            tokio::time::sleep(interval).await;
        }
    }

    /// One pass over due distributions; returns how many were marked sent.
    pub async fn dispatch_due(&self, now: DateTime<Utc>) -> anyhow::Result<usize> {
        let due = self.distribution_repo.list_due(now).await?;
        if due.is_empty() {
            return Ok(0);
        }

        let mut sent = 0;
        for distribution in due {
            let status = self.deliver(&distribution).await;
            let sent_at = (status == DistributionStatus::Sent).then(Utc::now);
            if let Err(err) = self
                .distribution_repo
                .set_status(distribution.id, status, sent_at)
                .await
            {
                error!(distribution_id = %distribution.id, db_error = ?err, "dispatcher: failed to store status");
                continue;
            }
            if status == DistributionStatus::Sent {
                sent += 1;
            }
        }
        Ok(sent)
    }

    async fn deliver(&self, distribution: &DistributionEntity) -> DistributionStatus {
        let user_type = UserType::from_str(&distribution.user_type);
        let tokens = match self.device_repo.tokens_for_user_type(user_type).await {
            Ok(tokens) => tokens,
            Err(err) => {
                error!(distribution_id = %distribution.id, db_error = ?err, "dispatcher: failed to load audience");
                return DistributionStatus::Failed;
            }
        };
        let audience = tokens.len();

        let report = push_to_tokens(
            self.device_repo.as_ref(),
            self.push.as_ref(),
            tokens,
            &distribution.title,
            &distribution.body,
            Some(json!({"distribution_id": distribution.id})),
        )
        .await;

        if audience > 0 && report.delivered == 0 && report.failed > 0 {
            warn!(distribution_id = %distribution.id, failed = report.failed, "dispatcher: nothing delivered");
            return DistributionStatus::Failed;
        }
        info!(
            distribution_id = %distribution.id,
            %user_type,
            delivered = report.delivered,
            removed = report.removed,
            "dispatcher: distribution sent"
        );
        DistributionStatus::Sent
    }
}
