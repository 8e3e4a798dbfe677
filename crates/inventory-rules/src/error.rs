//! Error types for the rules engine.

use inventory_state::{DeviceId, StateError};
use thiserror::Error;

/// Result type alias for rules engine operations.
pub type RulesResult<T> = Result<T, RulesError>;

/// Errors returned by [`DeviceService`](crate::DeviceService).
#[derive(Debug, Error)]
pub enum RulesError {
    /// No record exists for the given id.
    #[error("device {0} not found")]
    NotFound(DeviceId),

    /// A state guard rejected the mutation.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error(transparent)]
    Store(#[from] StateError),
}
