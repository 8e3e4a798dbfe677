//! inventory-rules — the device rules engine.
//!
//! [`DeviceService`] wraps a [`DeviceStore`](inventory_state::DeviceStore)
//! handle and enforces the guards that depend on a device's current state:
//!
//! - while a device is `IN_USE` its name and brand are frozen;
//! - an `IN_USE` device cannot be deleted.
//!
//! State transitions themselves are unrestricted. Store outcomes are
//! translated into typed [`RulesError`]s.

pub mod error;
pub mod service;

pub use error::{RulesError, RulesResult};
pub use service::{DeviceService, DeviceUpdate};
