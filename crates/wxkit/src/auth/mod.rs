//! Credentials, access tokens and the token lifecycle.
//!
//! Every call to the platform needs a short-lived access token. The
//! [`TokenStore`] obtains one with the account's [`Credentials`], caches it in
//! a [`TokenCache`] and grants a new one once it expires.

mod cache;
mod clock;
mod credentials;
mod store;
mod tokens;

pub use cache::{CacheError, MemoryTokenCache, TokenCache};
pub use clock::{Clock, SystemClock};
pub use credentials::Credentials;
pub use store::TokenStore;
pub use tokens::AccessToken;
