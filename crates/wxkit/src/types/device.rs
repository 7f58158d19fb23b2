//! Beacon device identifier type.

use serde::Serialize;
use std::fmt;

use crate::error::{ConfigurationError, Error};

/// Identifies one beacon device.
///
/// The platform accepts exactly one of two shapes: the opaque device id it
/// assigned, or the iBeacon `(uuid, major, minor)` triple.
///
/// The UUID is checked only by [`beacon`](Self::beacon) and
/// [`from_parts`](Self::from_parts); building the `Beacon` variant directly
/// sends the fields as given.
///
/// # Example
///
/// ```
/// use wxkit::DeviceIdentifier;
///
/// let by_id = DeviceIdentifier::id(10100);
/// let by_beacon = DeviceIdentifier::beacon("fda50693-a4e2-4fb1-afcf-c6eb07647825", 10001, 10002).unwrap();
/// assert_ne!(by_id, by_beacon);
///
/// // Supplying neither shape is a usage error.
/// assert!(DeviceIdentifier::from_parts(None, None, Some(1), None).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum DeviceIdentifier {
    /// The device id assigned by the platform.
    Id {
        /// Device id.
        device_id: u64,
    },
    /// The iBeacon triple.
    Beacon {
        /// Upper-case canonical UUID.
        uuid: String,
        /// Major number.
        major: u32,
        /// Minor number.
        minor: u32,
    },
}

impl DeviceIdentifier {
    /// Identify a device by its platform-assigned id.
    pub fn id(device_id: u64) -> Self {
        Self::Id { device_id }
    }

    /// Identify a device by its iBeacon triple.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the uuid is not a canonical
    /// `8-4-4-4-12` hexadecimal UUID.
    pub fn beacon(uuid: impl AsRef<str>, major: u32, minor: u32) -> Result<Self, Error> {
        let uuid = normalize_uuid(uuid.as_ref())?;
        Ok(Self::Beacon { uuid, major, minor })
    }

    /// Build an identifier from optional parts.
    ///
    /// Exactly one shape must be complete: either `device_id`, or all of
    /// `uuid`, `major` and `minor`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingDeviceIdentifier`] when neither
    /// shape is complete and [`ConfigurationError::AmbiguousDeviceIdentifier`]
    /// when both are.
    pub fn from_parts(
        device_id: Option<u64>,
        uuid: Option<&str>,
        major: Option<u32>,
        minor: Option<u32>,
    ) -> Result<Self, Error> {
        match (device_id, uuid, major, minor) {
            (Some(_), Some(_), Some(_), Some(_)) => {
                Err(ConfigurationError::AmbiguousDeviceIdentifier.into())
            }
            (Some(device_id), _, _, _) => Ok(Self::id(device_id)),
            (None, Some(uuid), Some(major), Some(minor)) => Self::beacon(uuid, major, minor),
            _ => Err(ConfigurationError::MissingDeviceIdentifier.into()),
        }
    }
}

impl fmt::Display for DeviceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id { device_id } => write!(f, "device {}", device_id),
            Self::Beacon { uuid, major, minor } => write!(f, "beacon {}/{}/{}", uuid, major, minor),
        }
    }
}

fn normalize_uuid(value: &str) -> Result<String, Error> {
    let invalid = |reason: &str| -> Error {
        ConfigurationError::InvalidUuid {
            value: value.to_string(),
            reason: reason.to_string(),
        }
        .into()
    };

    let groups: Vec<&str> = value.split('-').collect();
    let lengths: Vec<usize> = groups.iter().map(|g| g.len()).collect();
    if lengths != [8, 4, 4, 4, 12] {
        return Err(invalid("must have the form xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"));
    }

    if !groups
        .iter()
        .all(|g| g.chars().all(|c| c.is_ascii_hexdigit()))
    {
        return Err(invalid("must contain only hexadecimal digits"));
    }

    Ok(value.to_ascii_uppercase())
}
