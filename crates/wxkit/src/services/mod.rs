//! Service façades and the factory that builds them.
//!
//! A service is chosen by name ("Shake" or "Card"). The [`ServiceFactory`]
//! validates the name, wires up transport and token handling, and acquires
//! an access token before handing the service back, so bad credentials fail
//! at construction rather than on the first call.

pub mod card;
pub mod shake;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::Result;
use crate::auth::{Clock, Credentials, MemoryTokenCache, SystemClock, TokenCache, TokenStore};
use crate::error::{ConfigurationError, Error};
use crate::http::{Dispatcher, HttpClient};
use crate::types::ApiUrl;

pub use card::CardService;
pub use shake::ShakeService;

/// The services the factory can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// Shake Around (beacon devices and pages).
    Shake,
    /// Cards and coupons.
    Card,
}

impl ServiceKind {
    /// Returns the name the service is selected by.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Shake => "Shake",
            ServiceKind::Card => "Card",
        }
    }
}

impl FromStr for ServiceKind {
    type Err = Error;

    /// Names are matched exactly.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Shake" => Ok(ServiceKind::Shake),
            "Card" => Ok(ServiceKind::Card),
            _ => Err(ConfigurationError::UnknownService {
                name: s.to_string(),
            }
            .into()),
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A service built by name.
#[derive(Debug, Clone)]
pub enum Service {
    Shake(ShakeService),
    Card(CardService),
}

impl Service {
    /// Returns which service this is.
    pub fn kind(&self) -> ServiceKind {
        match self {
            Service::Shake(_) => ServiceKind::Shake,
            Service::Card(_) => ServiceKind::Card,
        }
    }

    pub fn as_shake(&self) -> Option<&ShakeService> {
        match self {
            Service::Shake(service) => Some(service),
            Service::Card(_) => None,
        }
    }

    pub fn as_card(&self) -> Option<&CardService> {
        match self {
            Service::Card(service) => Some(service),
            Service::Shake(_) => None,
        }
    }

    pub fn into_shake(self) -> Option<ShakeService> {
        match self {
            Service::Shake(service) => Some(service),
            Service::Card(_) => None,
        }
    }

    pub fn into_card(self) -> Option<CardService> {
        match self {
            Service::Card(service) => Some(service),
            Service::Shake(_) => None,
        }
    }

    /// Returns the dispatcher backing this service.
    pub fn dispatcher(&self) -> &Dispatcher {
        match self {
            Service::Shake(service) => service.dispatcher(),
            Service::Card(service) => service.dispatcher(),
        }
    }
}

/// Builds services for one account.
///
/// Every service built gets its own transport and token store. Unless a
/// shared [`TokenCache`] is supplied, the store owns a private in-memory
/// cache, so two services from the same factory each acquire a token.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use wxkit::{Credentials, MemoryTokenCache, ServiceFactory};
///
/// # async fn example() -> Result<(), wxkit::Error> {
/// let cache = Arc::new(MemoryTokenCache::new());
/// let factory = ServiceFactory::new(Credentials::new("wxappid", "secret")?)
///     .token_cache(cache)
///     .cache_alias("main-account");
///
/// let shake = factory.shake().await?;
/// let card = factory.card().await?; // reuses the cached token
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ServiceFactory {
    credentials: Credentials,
    base_url: ApiUrl,
    http_client: Option<reqwest::Client>,
    token_cache: Option<Arc<dyn TokenCache>>,
    cache_alias: Option<String>,
    clock: Arc<dyn Clock>,
}

impl ServiceFactory {
    /// Create a factory for `credentials` talking to the public API.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: ApiUrl::default(),
            http_client: None,
            token_cache: None,
            cache_alias: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Send requests to `base_url` instead of the public API.
    pub fn base_url(mut self, base_url: ApiUrl) -> Self {
        self.base_url = base_url;
        self
    }

    /// Use a preconfigured HTTP client (proxy, timeouts, ...).
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Keep tokens in `cache`, shared with whoever else holds it.
    pub fn token_cache(mut self, cache: Arc<dyn TokenCache>) -> Self {
        self.token_cache = Some(cache);
        self
    }

    /// Cache tokens under `alias` instead of the app id.
    pub fn cache_alias(mut self, alias: impl Into<String>) -> Self {
        self.cache_alias = Some(alias.into());
        self
    }

    /// Read the current time from `clock` when checking token expiry.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the credentials services are built for.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build the service registered under `name`.
    ///
    /// # Errors
    ///
    /// - [`Error::Configuration`] if `name` is not a known service; no
    ///   network call is made in that case
    /// - any error from acquiring the initial access token
    #[instrument(skip(self), fields(app_id = %self.credentials.app_id()))]
    pub async fn create(&self, name: &str) -> Result<Service> {
        let kind: ServiceKind = name.parse()?;
        self.build(kind).await
    }

    /// Build a service of the given kind.
    #[instrument(skip(self), fields(app_id = %self.credentials.app_id()))]
    pub async fn build(&self, kind: ServiceKind) -> Result<Service> {
        let dispatcher = self.dispatcher()?;

        // Fail at construction on bad credentials.
        dispatcher.access_token().await?;
        debug!("Service ready");

        Ok(match kind {
            ServiceKind::Shake => Service::Shake(ShakeService::new(dispatcher)),
            ServiceKind::Card => Service::Card(CardService::new(dispatcher)),
        })
    }

    /// Build the Shake service.
    pub async fn shake(&self) -> Result<ShakeService> {
        let dispatcher = self.ready_dispatcher().await?;
        Ok(ShakeService::new(dispatcher))
    }

    /// Build the Card service.
    pub async fn card(&self) -> Result<CardService> {
        let dispatcher = self.ready_dispatcher().await?;
        Ok(CardService::new(dispatcher))
    }

    async fn ready_dispatcher(&self) -> Result<Dispatcher> {
        let dispatcher = self.dispatcher()?;
        dispatcher.access_token().await?;
        Ok(dispatcher)
    }

    fn dispatcher(&self) -> Result<Dispatcher> {
        let http = match &self.http_client {
            Some(client) => HttpClient::with_client(client.clone(), self.base_url.clone()),
            None => HttpClient::new(self.base_url.clone())?,
        };

        let cache: Arc<dyn TokenCache> = match &self.token_cache {
            Some(cache) => Arc::clone(cache),
            None => Arc::new(MemoryTokenCache::new()),
        };

        let tokens = TokenStore::new(
            self.credentials.clone(),
            self.cache_alias.clone(),
            cache,
            Arc::clone(&self.clock),
        );

        Ok(Dispatcher::new(http, tokens))
    }
}

impl fmt::Debug for ServiceFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceFactory")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .field("shared_cache", &self.token_cache.is_some())
            .field("cache_alias", &self.cache_alias)
            .finish_non_exhaustive()
    }
}

/// Build the service named `name` for an account, against the public API.
///
/// Shorthand for [`ServiceFactory::new`] followed by
/// [`ServiceFactory::create`].
///
/// ```no_run
/// # async fn example() -> Result<(), wxkit::Error> {
/// let service = wxkit::create("wxappid", "secret", "Shake").await?;
/// let shake = service.into_shake().expect("asked for Shake");
/// let pages = shake.search_pages_by_range(0, 10).await?;
/// # Ok(())
/// # }
/// ```
pub async fn create(
    app_id: impl Into<String>,
    app_secret: impl Into<String>,
    name: &str,
) -> Result<Service> {
    // Reject the name before touching credentials or the network.
    let kind: ServiceKind = name.parse()?;
    ServiceFactory::new(Credentials::new(app_id, app_secret)?)
        .build(kind)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_names_are_exact() {
        assert_eq!("Shake".parse::<ServiceKind>().unwrap(), ServiceKind::Shake);
        assert_eq!("Card".parse::<ServiceKind>().unwrap(), ServiceKind::Card);

        for name in ["shake", "CARD", "Bogus", "", " Card"] {
            let err = name.parse::<ServiceKind>().unwrap_err();
            assert!(
                matches!(
                    err,
                    Error::Configuration(ConfigurationError::UnknownService { .. })
                ),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn kind_display_matches_name() {
        assert_eq!(ServiceKind::Shake.to_string(), "Shake");
        assert_eq!(ServiceKind::Card.to_string(), "Card");
    }

    #[tokio::test]
    async fn unknown_name_fails_without_network() {
        // Port 9 (discard) would fail the grant if one were attempted.
        let factory = ServiceFactory::new(Credentials::new("wxappid", "secret").unwrap())
            .base_url(ApiUrl::new("http://127.0.0.1:9").unwrap());

        let err = factory.create("Bogus").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::UnknownService { ref name }) if name == "Bogus"
        ));
    }

    #[test]
    fn factory_debug_redacts_secret() {
        let factory = ServiceFactory::new(Credentials::new("wxappid", "hunter2").unwrap());
        let debug = format!("{factory:?}");
        assert!(!debug.contains("hunter2"));
    }
}
