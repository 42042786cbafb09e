#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub user_secret: UserSecret,
    pub multibank: Multibank,
    pub sms: Sms,
    pub fcm: Fcm,
    pub storage: Storage,
    pub dispatcher: Dispatcher,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct UserSecret {
    pub secret: String,
    pub refresh_secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

#[derive(Debug, Clone)]
pub struct Multibank {
    pub base_url: String,
    pub application_id: String,
    pub secret: String,
    pub store_id: String,
    pub merchant_id: String,
    pub callback_url: String,
    /// Gateway recipient that receives the platform leg of every split.
    pub sapi_recipient_id: String,
    pub commission_bps: i64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Sms {
    pub base_url: String,
    pub email: String,
    pub password: String,
    pub sender: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Fcm {
    pub service_account_path: String,
    pub project_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Storage {
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub key_prefix: String,
    pub public_base_url: Option<String>,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    pub interval_secs: u64,
}
