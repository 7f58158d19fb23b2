//! Token cache capability and its in-process implementation.

use std::collections::HashMap;
use std::error;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::tokens::AccessToken;

/// Error type returned by cache implementations.
pub type CacheError = Box<dyn error::Error + Send + Sync + 'static>;

/// A key-value store for access tokens.
///
/// Implement this over a shared store (memcached, redis, ...) to let several
/// processes reuse one token. Keys are app ids or caller-chosen aliases. The
/// `ttl` passed to [`set`](TokenCache::set) is the token's remaining lifetime;
/// stores that cannot expire entries on their own may ignore it, since the
/// token store re-checks [`AccessToken::expires_at`] on every read.
///
/// Concurrent refreshes through a shared store are not coordinated: two
/// callers that both observe an expired token will both request a new one.
#[async_trait]
pub trait TokenCache: Send + Sync {
    /// Returns the token stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<AccessToken>, CacheError>;

    /// Stores `token` under `key` for `ttl`.
    async fn set(&self, key: &str, token: &AccessToken, ttl: Duration) -> Result<(), CacheError>;

    /// Removes the token stored under `key`.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// An in-process token cache.
///
/// Share one instance through an `Arc` to let several services in the same
/// process reuse a token.
#[derive(Debug, Default)]
pub struct MemoryTokenCache {
    tokens: RwLock<HashMap<String, AccessToken>>,
}

impl MemoryTokenCache {
    /// Constructs an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenCache for MemoryTokenCache {
    async fn get(&self, key: &str) -> Result<Option<AccessToken>, CacheError> {
        Ok(self.tokens.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, token: &AccessToken, _ttl: Duration) -> Result<(), CacheError> {
        self.tokens
            .write()
            .await
            .insert(key.to_string(), token.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.tokens.write().await.remove(key);
        Ok(())
    }
}
