//! Account credentials type.

use std::fmt;

use crate::error::{ConfigurationError, Error};

/// Credentials of an official account: its app id and app secret.
///
/// # Security
///
/// The secret is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use wxkit::Credentials;
///
/// let creds = Credentials::new("wx1234567890abcdef", "app-secret").unwrap();
/// assert_eq!(creds.app_id(), "wx1234567890abcdef");
/// ```
#[derive(Clone)]
pub struct Credentials {
    app_id: String,
    app_secret: String,
}

impl Credentials {
    /// Create new credentials.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either value is empty or contains
    /// whitespace.
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Result<Self, Error> {
        let app_id = app_id.into();
        let app_secret = app_secret.into();

        for (name, value) in [("app id", &app_id), ("app secret", &app_secret)] {
            if value.is_empty() {
                return Err(ConfigurationError::InvalidCredentials {
                    reason: format!("{} must not be empty", name),
                }
                .into());
            }
            if value.chars().any(char::is_whitespace) {
                return Err(ConfigurationError::InvalidCredentials {
                    reason: format!("{} must not contain whitespace", name),
                }
                .into());
            }
        }

        Ok(Self { app_id, app_secret })
    }

    /// Returns the app id.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Returns the app secret.
    ///
    /// Use this only when constructing the token grant request.
    pub(crate) fn app_secret(&self) -> &str {
        &self.app_secret
    }
}

// Intentionally hide the secret in Debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &"[REDACTED]")
            .finish()
    }
}
