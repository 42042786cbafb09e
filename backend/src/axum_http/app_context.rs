use std::sync::Arc;

use anyhow::{Context, Result};
use crates::{
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            activities::ActivityPostgres, cards::CardPostgres, donations::DonationPostgres,
            fundraisings::FundraisingPostgres, subscriptions::SubscriptionPostgres,
            transactions::TransactionPostgres, users::UserPostgres,
        },
    },
    multibank::{MultibankClient, MultibankConfig},
    notifications::{FcmClient, ServiceAccountKey, SmsClient, SmsConfig},
    storage::s3::{S3Config, S3ObjectStorage},
};
use tracing::info;

use crate::{
    config::config_model::DotEnvyConfig,
    usecases::{
        activities::ActivityRecorder,
        chat::ChatHub,
        payments::{PaymentOrchestrator, PaymentSettings},
    },
};

pub type Payments = PaymentOrchestrator<
    UserPostgres,
    CardPostgres,
    TransactionPostgres,
    FundraisingPostgres,
    SubscriptionPostgres,
    DonationPostgres,
    ActivityPostgres,
    MultibankClient,
>;

pub type Activities = ActivityRecorder<ActivityPostgres>;

/// Long-lived clients shared by every router.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<DotEnvyConfig>,
    pub db_pool: Arc<PgPoolSquad>,
    pub gateway: Arc<MultibankClient>,
    pub sms: Arc<SmsClient>,
    pub push: Arc<FcmClient>,
    pub storage: Arc<S3ObjectStorage>,
    pub chat_hub: ChatHub,
}

impl AppContext {
    pub async fn build(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<Self> {
        let multibank = &config.multibank;
        let gateway = MultibankClient::new(MultibankConfig::new(
            multibank.base_url.clone(),
            multibank.application_id.clone(),
            multibank.secret.clone(),
            multibank.store_id.clone(),
            multibank.merchant_id.clone(),
            multibank.callback_url.clone(),
            multibank.request_timeout_secs,
        ))?;

        let sms = SmsClient::new(SmsConfig {
            base_url: config.sms.base_url.clone(),
            email: config.sms.email.clone(),
            password: config.sms.password.clone(),
            sender: config.sms.sender.clone(),
            request_timeout_secs: config.sms.request_timeout_secs,
        })?;

        let credentials = ServiceAccountKey::from_file(&config.fcm.service_account_path)
            .await
            .context("failed to load fcm credentials")?;
        let project_id = config
            .fcm
            .project_id
            .clone()
            .unwrap_or_else(|| credentials.project_id.clone());
        let push = FcmClient::new(project_id, credentials);

        let storage_config = &config.storage;
        let storage = S3ObjectStorage::new(S3Config {
            key_prefix: storage_config.key_prefix.clone(),
            public_base_url: storage_config.public_base_url.clone(),
            ..S3Config::new(
                storage_config.endpoint.clone(),
                storage_config.region.clone(),
                storage_config.bucket.clone(),
                storage_config.access_key.clone(),
                storage_config.secret_key.clone(),
            )
        })
        .await?;
        info!("External clients have been initialized");

        Ok(Self {
            config,
            db_pool,
            gateway: Arc::new(gateway),
            sms: Arc::new(sms),
            push: Arc::new(push),
            storage: Arc::new(storage),
            chat_hub: ChatHub::new(),
        })
    }

    pub fn activities(&self) -> Arc<Activities> {
        Arc::new(ActivityRecorder::new(Arc::new(ActivityPostgres::new(
            Arc::clone(&self.db_pool),
        ))))
    }

    pub fn payments(&self) -> Arc<Payments> {
        let db_pool = &self.db_pool;
        Arc::new(PaymentOrchestrator::new(
            Arc::new(UserPostgres::new(Arc::clone(db_pool))),
            Arc::new(CardPostgres::new(Arc::clone(db_pool))),
            Arc::new(TransactionPostgres::new(Arc::clone(db_pool))),
            Arc::new(FundraisingPostgres::new(Arc::clone(db_pool))),
            Arc::new(SubscriptionPostgres::new(Arc::clone(db_pool))),
            Arc::new(DonationPostgres::new(Arc::clone(db_pool))),
            self.activities(),
            Arc::clone(&self.gateway),
            PaymentSettings {
                store_id: self.config.multibank.store_id.clone(),
                sapi_recipient_id: self.config.multibank.sapi_recipient_id.clone(),
                commission_bps: self.config.multibank.commission_bps,
            },
        ))
    }
}
