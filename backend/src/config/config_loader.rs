use std::str::FromStr;

use anyhow::{Context, Result};
use crates::domain::value_objects::payment_split::DEFAULT_COMMISSION_BPS;
use url::Url;

use super::config_model::{
    BackendServer, Database, Dispatcher, DotEnvyConfig, Fcm, Multibank, Sms, Storage, UserSecret,
};

const DEFAULT_ACCESS_TTL_SECS: i64 = 24 * 60 * 60;
const DEFAULT_REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: parsed("SERVER_PORT")?,
        body_limit: parsed_or("SERVER_BODY_LIMIT", 25)?,
        timeout: parsed_or("SERVER_TIMEOUT", 30)?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
    };

    let multibank = Multibank {
        base_url: required_url("MULTIBANK_BASE_URL")?,
        application_id: required("MULTIBANK_APPLICATION_ID")?,
        secret: required("MULTIBANK_SECRET")?,
        store_id: required("MULTIBANK_STORE_ID")?,
        merchant_id: required("MULTIBANK_MERCHANT_ID")?,
        callback_url: required_url("MULTIBANK_CALLBACK_URL")?,
        sapi_recipient_id: required("MULTIBANK_SAPI_RECIPIENT_ID")?,
        commission_bps: parsed_or("MULTIBANK_COMMISSION_BPS", DEFAULT_COMMISSION_BPS)?,
        request_timeout_secs: parsed_or("MULTIBANK_TIMEOUT", 30)?,
    };

    let sms = Sms {
        base_url: required_url("SMS_BASE_URL")?,
        email: required("SMS_EMAIL")?,
        password: required("SMS_PASSWORD")?,
        sender: optional("SMS_SENDER").unwrap_or_else(|| "4546".to_string()),
        request_timeout_secs: parsed_or("SMS_TIMEOUT", 15)?,
    };

    let fcm = Fcm {
        service_account_path: required("FCM_SERVICE_ACCOUNT_PATH")?,
        project_id: optional("FCM_PROJECT_ID"),
    };

    let storage = Storage {
        endpoint: required_url("S3_ENDPOINT")?,
        region: optional("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
        bucket: required("S3_BUCKET")?,
        access_key: required("S3_ACCESS_KEY")?,
        secret_key: required("S3_SECRET_KEY")?,
        key_prefix: optional("S3_KEY_PREFIX").unwrap_or_else(|| "uploads".to_string()),
        public_base_url: optional("S3_PUBLIC_BASE_URL"),
        max_upload_bytes: parsed_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
    };

    let dispatcher = Dispatcher {
        interval_secs: parsed_or("DISTRIBUTION_DISPATCH_INTERVAL", 60)?,
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        user_secret: get_user_secret()?,
        multibank,
        sms,
        fcm,
        storage,
        dispatcher,
    })
}

pub fn get_user_secret() -> Result<UserSecret> {
    dotenvy::dotenv().ok();

    Ok(UserSecret {
        secret: required("JWT_USER_SECRET")?,
        refresh_secret: required("JWT_USER_REFRESH_SECRET")?,
        access_ttl_secs: parsed_or("JWT_ACCESS_TTL", DEFAULT_ACCESS_TTL_SECS)?,
        refresh_ttl_secs: parsed_or("JWT_REFRESH_TTL", DEFAULT_REFRESH_TTL_SECS)?,
    })
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(key: &str) -> Result<String> {
    optional(key).with_context(|| format!("{key} is invalid"))
}

fn required_url(key: &str) -> Result<String> {
    let value = required(key)?;
    Url::parse(&value).with_context(|| format!("{key} is not a valid url"))?;
    Ok(value)
}

fn parsed<T>(key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    required(key)?
        .parse()
        .with_context(|| format!("{key} is invalid"))
}

fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(key) {
        Some(value) => value.parse().with_context(|| format!("{key} is invalid")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_values_fall_back_to_default() {
        unsafe {
            std::env::remove_var("CONFIG_TEST_MISSING");
            std::env::set_var("CONFIG_TEST_PRESENT", " 350 ");
            std::env::set_var("CONFIG_TEST_GARBAGE", "abc");
        }

        assert_eq!(parsed_or::<i64>("CONFIG_TEST_MISSING", 200).unwrap(), 200);
        assert_eq!(parsed_or::<i64>("CONFIG_TEST_PRESENT", 200).unwrap(), 350);
        assert!(parsed_or::<i64>("CONFIG_TEST_GARBAGE", 200).is_err());
        assert!(required("CONFIG_TEST_MISSING").is_err());
    }

    #[test]
    fn urls_are_validated() {
        unsafe {
            std::env::set_var("CONFIG_TEST_URL", "https://partner.multibank.uz/api/v1");
            std::env::set_var("CONFIG_TEST_BAD_URL", "not a url");
        }

        assert!(required_url("CONFIG_TEST_URL").is_ok());
        assert!(required_url("CONFIG_TEST_BAD_URL").is_err());
    }
}
