//! Cache for the bearer token of the app client.

/// An error that can occur when accessing the `TokenCache`.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TokenCacheError {
    #[error("Token is expired")]
    Expired,
    #[error("Cache is empty")]
    Empty,
}

/// A cache for the OAuth2 bearer token.
#[derive(Debug, Default)]
pub(crate) struct TokenCache {
    /// The cached token.
    inner: async_lock::RwLock<Option<TokenCacheStorage>>,
    /// How long before the reported expiry a token is considered expired.
    margin: std::time::Duration,
}

impl TokenCache {
    #[must_use]
    pub(crate) fn new(margin: std::time::Duration) -> Self {
        Self {
            margin,
            ..Default::default()
        }
    }

    pub(crate) async fn get(&self) -> Result<String, TokenCacheError> {
        let cache = self.inner.read().await;
        Self::check((*cache).as_ref())
    }

    /// Returns the cached token, or takes the write lock and calls `refresh` if there is no
    /// valid one. The cache is checked again once the lock is held, so concurrent callers
    /// only refresh once.
    pub(crate) async fn get_or_refresh<F, Fut, E>(&self, refresh: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<(String, std::time::Duration), E>>,
    {
        if let Ok(token) = self.get().await {
            tracing::debug!("Token is up-to-date");
            return Ok(token);
        }

        let mut cache = self.inner.write().await;
        match Self::check((*cache).as_ref()) {
            Ok(token) => Ok(token),
            Err(reason) => {
                tracing::info!("{reason}, requesting a new token...");
                let (token, lifetime) = refresh().await?;
                *cache = Some(self.storage(token.clone(), lifetime));
                Ok(token)
            }
        }
    }

    #[cfg(test)]
    pub(crate) async fn update(&self, token: String, lifetime: std::time::Duration) -> String {
        let mut cache = self.inner.write().await;
        *cache = Some(self.storage(token.clone(), lifetime));
        token
    }

    fn storage(&self, token: String, lifetime: std::time::Duration) -> TokenCacheStorage {
        // Lifetimes chrono cannot represent are capped at the latest representable instant
        let expires = chrono::TimeDelta::from_std(lifetime.saturating_sub(self.margin))
            .ok()
            .and_then(|lifetime| chrono::Utc::now().checked_add_signed(lifetime))
            .unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC);
        TokenCacheStorage { token, expires }
    }

    fn check(cache: Option<&TokenCacheStorage>) -> Result<String, TokenCacheError> {
        match cache {
            Some(cache) if cache.expires <= chrono::Utc::now() => Err(TokenCacheError::Expired),
            Some(cache) => Ok(cache.token.clone()),
            None => Err(TokenCacheError::Empty),
        }
    }
}

/// The storage of the cache.
#[derive(Debug)]
struct TokenCacheStorage {
    /// Point in time after which the token must not be used anymore.
    expires: chrono::DateTime<chrono::Utc>,
    /// The bearer token.
    token: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn token_cache() {
        let cache = TokenCache::new(std::time::Duration::from_secs(1));
        assert_eq!(Err(TokenCacheError::Empty), cache.get().await);

        cache
            .update("abc".to_string(), std::time::Duration::from_secs(2))
            .await;
        assert_eq!(Ok("abc".to_string()), cache.get().await);

        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        assert_eq!(Err(TokenCacheError::Expired), cache.get().await);
    }

    #[tokio::test]
    async fn lifetime_below_margin_is_expired() {
        let cache = TokenCache::new(std::time::Duration::from_secs(60));
        cache
            .update("abc".to_string(), std::time::Duration::from_secs(30))
            .await;
        assert_eq!(Err(TokenCacheError::Expired), cache.get().await);
    }

    #[tokio::test]
    async fn huge_lifetime_never_expires() {
        let cache = TokenCache::new(std::time::Duration::from_secs(60));
        cache
            .update("abc".to_string(), std::time::Duration::from_secs(u64::MAX))
            .await;
        assert_eq!(Ok("abc".to_string()), cache.get().await);
    }

    #[tokio::test]
    async fn refresh_only_when_needed() {
        let cache = TokenCache::new(std::time::Duration::from_secs(0));
        let counter = std::sync::atomic::AtomicUsize::new(0);
        let calls = &counter;

        for _ in 0..3 {
            let token = cache
                .get_or_refresh(move || async move {
                    calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    Ok::<_, std::convert::Infallible>((
                        "fresh".to_string(),
                        std::time::Duration::from_secs(3600),
                    ))
                })
                .await
                .unwrap();
            assert_eq!("fresh", token);
        }

        assert_eq!(1, counter.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn failed_refresh_leaves_cache_empty() {
        let cache = TokenCache::new(std::time::Duration::from_secs(0));
        let result = cache
            .get_or_refresh(|| async { Err::<(String, std::time::Duration), _>("denied") })
            .await;

        assert_eq!(Err("denied"), result);
        assert_eq!(Err(TokenCacheError::Empty), cache.get().await);
    }
}
