//! Domain types for the device store.
//!
//! A [`Device`] is a persisted record; a [`NewDevice`] is one that has not
//! been inserted yet and therefore carries neither an id nor a creation
//! time. Persisted types serialize to/from JSON, both for storage in redb
//! tables and on the HTTP wire, and describe themselves for the OpenAPI
//! document.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Unique identifier for a device, assigned by the store.
pub type DeviceId = u64;

// ── State ─────────────────────────────────────────────────────────

/// Lifecycle state of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceState {
    Available,
    InUse,
    Inactive,
}

impl DeviceState {
    /// All states, in declaration order.
    pub const ALL: [DeviceState; 3] = [Self::Available, Self::InUse, Self::Inactive];

    /// Wire name of the state (`AVAILABLE`, `IN_USE`, `INACTIVE`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::InUse => "IN_USE",
            Self::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the three state names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown device state '{0}', expected one of AVAILABLE, IN_USE, INACTIVE")]
pub struct ParseDeviceStateError(pub String);

impl FromStr for DeviceState {
    type Err = ParseDeviceStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ParseDeviceStateError(s.to_string()))
    }
}

// ── Device ────────────────────────────────────────────────────────

/// A persisted device record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[schema(value_type = u64)]
    pub id: DeviceId,
    pub name: String,
    /// Manufacturer or vendor label.
    pub brand: String,
    pub state: DeviceState,
    /// Set once by the store on insert; never rewritten.
    pub creation_time: DateTime<Utc>,
}

/// A device that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDevice {
    pub name: String,
    pub brand: String,
    pub state: DeviceState,
}

impl NewDevice {
    pub fn new(name: impl Into<String>, brand: impl Into<String>, state: DeviceState) -> Self {
        Self {
            name: name.into(),
            brand: brand.into(),
            state,
        }
    }

    /// Attach the store-assigned id and creation time.
    pub fn into_device(self, id: DeviceId, creation_time: DateTime<Utc>) -> Device {
        Device {
            id,
            name: self.name,
            brand: self.brand,
            state: self.state,
            creation_time,
        }
    }
}
