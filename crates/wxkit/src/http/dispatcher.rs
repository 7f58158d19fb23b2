//! Token-aware request dispatch.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::Result;
use crate::auth::{AccessToken, TokenStore};
use crate::error::Error;
use crate::types::ApiUrl;

use super::client::HttpClient;
use super::endpoints::CALLBACK_IPS;
use super::request::ApiRequest;

/// Sends requests on behalf of one account.
///
/// The dispatcher attaches the current access token to every request that
/// carries no explicit query parameters, and surfaces every failure to the
/// caller unchanged. Dispatchers are cheap to clone (they use internal `Arc`)
/// and safe to share across tasks.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    http: HttpClient,
    tokens: TokenStore,
}

impl Dispatcher {
    pub(crate) fn new(http: HttpClient, tokens: TokenStore) -> Self {
        Self {
            inner: Arc::new(DispatcherInner { http, tokens }),
        }
    }

    /// Returns the API base URL requests are sent to.
    pub fn base_url(&self) -> &ApiUrl {
        self.inner.http.base()
    }

    /// Returns the token store backing this dispatcher.
    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    /// Returns a currently valid access token, granting one if needed.
    pub async fn access_token(&self) -> Result<AccessToken> {
        self.inner.tokens.get_token(&self.inner.http).await
    }

    /// Perform one call and return the decoded JSON body.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] if the call fails or returns a non-2xx status
    /// - [`Error::Decode`] if the body is not JSON
    /// - [`Error::Remote`] if the body carries a non-zero `errcode`
    ///
    /// When a remote error reports the attached token as invalid or expired,
    /// the cached token is dropped before the error is returned.
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    pub async fn send(&self, request: ApiRequest) -> Result<Value> {
        let uses_cached_token = !request.has_params();

        let request = if uses_cached_token {
            let token = self.access_token().await?;
            request.params([("access_token", token.as_str())])
        } else {
            request
        };

        match self.inner.http.execute(request).await {
            Err(Error::Remote(err)) if uses_cached_token && err.is_token_error() => {
                debug!(code = err.code, "access token rejected");
                self.inner.tokens.invalidate().await;
                Err(Error::Remote(err))
            }
            result => result,
        }
    }

    /// Get the list of IP addresses the platform sends callbacks from.
    ///
    /// Returns the raw JSON, e.g. `{"ip_list": ["127.0.0.1"]}`.
    pub async fn callback_ips(&self) -> Result<Value> {
        self.send(ApiRequest::get(CALLBACK_IPS)).await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", self.inner.http.base())
            .field("tokens", &self.inner.tokens)
            .finish()
    }
}
