use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// In-process bearer token cache shared by the outbound API clients.
///
/// A token is handed out only while it stays valid for at least `leeway`.
#[derive(Debug)]
pub struct TokenCache {
    inner: RwLock<Option<CachedToken>>,
    leeway: Duration,
}

impl TokenCache {
    pub fn new(leeway: Duration) -> Self {
        Self {
            inner: RwLock::new(None),
            leeway,
        }
    }

    pub async fn get(&self, now: DateTime<Utc>) -> Option<String> {
        let guard = self.inner.read().await;
        guard
            .as_ref()
            .filter(|cached| cached.expires_at - self.leeway > now)
            .map(|cached| cached.token.clone())
    }

    pub async fn store(&self, token: String, expires_at: DateTime<Utc>) {
        let mut guard = self.inner.write().await;
        *guard = Some(CachedToken { token, expires_at });
    }

    pub async fn clear(&self) {
        let mut guard = self.inner.write().await;
        *guard = None;
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(Duration::seconds(30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_token_until_leeway() {
        let cache = TokenCache::new(Duration::seconds(60));
        let now = Utc::now();

        assert_eq!(cache.get(now).await, None);

        cache.store("abc".to_string(), now + Duration::minutes(5)).await;
        assert_eq!(cache.get(now).await.as_deref(), Some("abc"));
        assert_eq!(cache.get(now + Duration::minutes(4) + Duration::seconds(1)).await, None);
    }

    #[tokio::test]
    async fn expired_token_is_replaced() {
        let cache = TokenCache::default();
        let now = Utc::now();

        cache.store("old".to_string(), now - Duration::seconds(1)).await;
        assert_eq!(cache.get(now).await, None);

        cache.store("new".to_string(), now + Duration::hours(1)).await;
        assert_eq!(cache.get(now).await.as_deref(), Some("new"));

        cache.clear().await;
        assert_eq!(cache.get(now).await, None);
    }
}
