//! wxkit - WeChat Official Account API client
//!
//! This library wraps the Shake Around and Card endpoints of the WeChat
//! Official Account platform. Services are built by name from a
//! [`ServiceFactory`]; each one manages its own access token, attaching it to
//! every call and granting a new one when it expires.
//!
//! Every operation returns the decoded JSON body. A body carrying a non-zero
//! `errcode` becomes [`Error::Remote`].
//!
//! # Example
//!
//! ```no_run
//! use wxkit::{Credentials, DeviceIdentifier, ServiceFactory};
//!
//! # async fn example() -> Result<(), wxkit::Error> {
//! let factory = ServiceFactory::new(Credentials::new("wxappid", "secret")?);
//! let shake = factory.create("Shake").await?.into_shake().expect("asked for Shake");
//!
//! let device = DeviceIdentifier::id(10011);
//! shake.bind_page(&device, &[1234, 5678], true, false).await?;
//!
//! let info = shake.search_device(&device).await?;
//! println!("{}", info["data"]);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod error;
pub mod http;
pub mod services;
pub mod types;

// Re-export primary types at crate root for convenience
pub use auth::{AccessToken, CacheError, Clock, Credentials, MemoryTokenCache, SystemClock, TokenCache, TokenStore};
pub use error::{ConfigurationError, DecodeError, Error, RemoteError, TransportError};
pub use http::{ApiRequest, Dispatcher, Media};
pub use services::{CardService, Service, ServiceFactory, ServiceKind, ShakeService, create};
pub use types::{ApiUrl, DeviceIdentifier};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
