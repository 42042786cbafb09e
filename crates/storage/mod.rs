pub mod s3;

use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub key: String,
    pub content_type: String,
    pub size: i64,
}

#[automock]
#[async_trait]
pub trait ObjectStorage {
    /// Uploads `bytes` under a key derived from `file_name`; the content type is guessed from it.
    async fn upload(&self, file_name: String, bytes: Vec<u8>) -> Result<StoredObject>;

    async fn delete(&self, key: String) -> Result<()>;

    /// Public URL of the stored object.
    fn public_url(&self, key: &str) -> String;
}
