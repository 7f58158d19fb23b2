//! Access token lifecycle: cache lookup, grant and refresh.

use std::sync::Arc;

use chrono::TimeDelta;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::error::DecodeError;
use crate::http::{ApiRequest, HttpClient, TOKEN_GRANT, TokenGrantResponse};

use super::cache::TokenCache;
use super::clock::Clock;
use super::credentials::Credentials;
use super::tokens::AccessToken;

/// Produces a currently valid access token on demand.
///
/// Tokens live in a [`TokenCache`] under a cache key, which defaults to the
/// app id. A new token is granted only when the cache holds none or holds an
/// expired one. Within one store, refreshes are serialized so concurrent
/// callers observing an expired token cause a single grant call.
pub struct TokenStore {
    credentials: Credentials,
    cache_key: String,
    cache: Arc<dyn TokenCache>,
    clock: Arc<dyn Clock>,
    refresh: Mutex<()>,
}

impl TokenStore {
    /// Create a store for `credentials`.
    ///
    /// `alias` overrides the cache key; without it the app id is used.
    pub fn new(
        credentials: Credentials,
        alias: Option<String>,
        cache: Arc<dyn TokenCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache_key = alias.unwrap_or_else(|| credentials.app_id().to_string());
        Self {
            credentials,
            cache_key,
            cache,
            clock,
            refresh: Mutex::new(()),
        }
    }

    /// Returns the key tokens are cached under.
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    /// Returns the credentials this store grants tokens for.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Return the cached token if it is still valid, otherwise grant a new one.
    ///
    /// A failed grant is propagated and nothing is cached.
    #[instrument(skip(self, http), fields(app_id = %self.credentials.app_id(), cache_key = %self.cache_key))]
    pub(crate) async fn get_token(&self, http: &HttpClient) -> Result<AccessToken> {
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let _guard = self.refresh.lock().await;

        // Another caller may have refreshed while we waited for the lock.
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let token = self.grant(http).await?;
        self.persist(&token).await;
        Ok(token)
    }

    /// Drop the cached token so the next call grants a new one.
    #[instrument(skip(self), fields(cache_key = %self.cache_key))]
    pub(crate) async fn invalidate(&self) {
        debug!("Invalidating cached access token");
        if let Err(error) = self.cache.remove(&self.cache_key).await {
            warn!(error = &*error as &dyn std::error::Error, "unable to remove token from cache");
        }
    }

    async fn cached(&self) -> Option<AccessToken> {
        match self.cache.get(&self.cache_key).await {
            Ok(Some(token)) if token.is_valid_at(self.clock.now()) => Some(token),
            Ok(Some(token)) => {
                debug!(expires_at = %token.expires_at(), "cached token has expired");
                None
            }
            Ok(None) => None,
            Err(error) => {
                warn!(error = &*error as &dyn std::error::Error, "token cache returned error, granting a new token");
                None
            }
        }
    }

    async fn persist(&self, token: &AccessToken) {
        let Some(ttl) = token.remaining_at(self.clock.now()) else {
            debug!("granted token has no remaining lifetime, not caching");
            return;
        };

        if let Err(error) = self.cache.set(&self.cache_key, token, ttl).await {
            warn!(error = &*error as &dyn std::error::Error, "unable to push new token to cache");
        }
    }

    async fn grant(&self, http: &HttpClient) -> Result<AccessToken> {
        info!("Granting new access token");

        let request = ApiRequest::get(TOKEN_GRANT).params([
            ("grant_type", "client_credential"),
            ("appid", self.credentials.app_id()),
            ("secret", self.credentials.app_secret()),
        ]);

        let value = http.execute(request).await?;
        let now = self.clock.now();

        let response: TokenGrantResponse =
            serde_json::from_value(value).map_err(|e| DecodeError::Shape {
                reason: format!("token grant response: {}", e),
            })?;

        if response.expires_in <= 0 {
            return Err(DecodeError::Shape {
                reason: format!("token lifetime must be positive, got {}", response.expires_in),
            }
            .into());
        }

        let lifetime = TimeDelta::try_seconds(response.expires_in).ok_or_else(|| DecodeError::Shape {
            reason: format!("token lifetime out of range: {}", response.expires_in),
        })?;

        let token = AccessToken::granted(response.access_token, now, lifetime);
        debug!(expires_at = %token.expires_at(), "Access token granted");
        Ok(token)
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("credentials", &self.credentials)
            .field("cache_key", &self.cache_key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryTokenCache, SystemClock};

    fn store(alias: Option<&str>) -> TokenStore {
        TokenStore::new(
            Credentials::new("wxappid", "secret").unwrap(),
            alias.map(str::to_string),
            Arc::new(MemoryTokenCache::new()),
            Arc::new(SystemClock),
        )
    }

    #[test]
    fn cache_key_defaults_to_app_id() {
        assert_eq!(store(None).cache_key(), "wxappid");
    }

    #[test]
    fn alias_overrides_cache_key() {
        assert_eq!(store(Some("shared")).cache_key(), "shared");
    }

    #[test]
    fn debug_redacts_secret() {
        let debug = format!("{:?}", store(None));
        assert!(!debug.contains("\"secret\""));
        assert!(debug.contains("[REDACTED]"));
    }
}
