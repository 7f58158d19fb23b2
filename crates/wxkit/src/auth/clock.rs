//! Time source used for token expiry.

use chrono::{DateTime, Utc};

/// Represents a clock, which can tell the current time.
///
/// The token store reads time only through this trait so that expiry can be
/// driven deterministically in tests.
pub trait Clock: Send + Sync {
    /// Gets the current time according to this clock.
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
