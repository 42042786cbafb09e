use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, timeout::TimeoutConfig};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    Client,
    config::{Region, StalledStreamProtectionConfig},
    primitives::ByteStream,
};
use http::Uri;
use mime_guess::MimeGuess;
use tracing::info;
use uuid::Uuid;

use super::{ObjectStorage, StoredObject};

#[derive(Debug, Clone)]
pub struct S3Config {
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub key_prefix: String,
    pub public_base_url: Option<String>,
    pub force_path_style: bool,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl S3Config {
    pub fn new(
        endpoint: String,
        region: String,
        bucket: String,
        access_key: String,
        secret_key: String,
    ) -> Self {
        Self {
            endpoint,
            region,
            bucket,
            access_key,
            secret_key,
            key_prefix: "uploads".to_string(),
            public_base_url: None,
            force_path_style: true,
            connect_timeout_secs: 10,
            read_timeout_secs: 60,
        }
    }
}

pub async fn build_s3_client(config: &S3Config) -> Result<Client> {
    let endpoint = format!("{}/", config.endpoint.trim_end_matches('/'));
    Uri::from_str(&endpoint).context("invalid s3 endpoint URL")?;

    let credentials = Credentials::new(
        config.access_key.clone(),
        config.secret_key.clone(),
        None,
        None,
        "s3-compatible",
    );

    let region = Region::new(config.region.clone());
    let shared_config = aws_config::defaults(BehaviorVersion::latest())
        .region(region.clone())
        .credentials_provider(credentials)
        .timeout_config(
            TimeoutConfig::builder()
                .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
                .read_timeout(Duration::from_secs(config.read_timeout_secs))
                .build(),
        )
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
        .endpoint_url(endpoint)
        .force_path_style(config.force_path_style)
        .region(region)
        .stalled_stream_protection(StalledStreamProtectionConfig::disabled())
        .build();

    Ok(Client::from_conf(s3_config))
}

pub struct S3ObjectStorage {
    client: Client,
    bucket: String,
    key_prefix: String,
    public_base_url: String,
}

impl S3ObjectStorage {
    pub async fn new(config: S3Config) -> Result<Self> {
        let client = build_s3_client(&config)
            .await
            .context("failed to build s3 client")?;

        let public_base_url = config.public_base_url.clone().unwrap_or_else(|| {
            format!(
                "{}/{}",
                config.endpoint.trim_end_matches('/'),
                config.bucket
            )
        });

        Ok(Self {
            client,
            bucket: config.bucket,
            key_prefix: normalize_prefix(&config.key_prefix),
            public_base_url,
        })
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn upload(&self, file_name: String, bytes: Vec<u8>) -> Result<StoredObject> {
        let key = object_key(&self.key_prefix, &file_name, Uuid::new_v4());
        let content_type = MimeGuess::from_path(&file_name)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();
        let size = i64::try_from(bytes.len()).context("file is too large")?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(&content_type)
            .send()
            .await
            .with_context(|| format!("failed to upload {} to object storage", key))?;

        info!(key = %key, size, "object uploaded");

        Ok(StoredObject {
            key,
            content_type,
            size,
        })
    }

    async fn delete(&self, key: String) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .with_context(|| format!("failed to delete {} from object storage", key))?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), key)
    }
}

fn object_key(prefix: &str, file_name: &str, id: Uuid) -> String {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty());

    match extension {
        Some(ext) => format!("{}{}.{}", prefix, id, ext.to_ascii_lowercase()),
        None => format!("{}{}", prefix, id),
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}/", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_normalized() {
        assert_eq!(normalize_prefix("/uploads/"), "uploads/");
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("a/b"), "a/b/");
    }

    #[test]
    fn key_keeps_lowercased_extension() {
        let id = Uuid::nil();
        assert_eq!(
            object_key("uploads/", "Photo.JPG", id),
            format!("uploads/{}.jpg", id)
        );
        assert_eq!(object_key("", "README", id), id.to_string());
    }
}
