//! Validated value types shared across the services.

mod api_url;
mod device;

pub use api_url::{ApiUrl, DEFAULT_BASE_URL};
pub use device::DeviceIdentifier;
