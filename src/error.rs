//! Error taxonomy shared by every runtime entry point
//!
//! All failures are reported synchronously through [`ActionError`]. Nothing in the
//! runtime retries internally; a device failure during synchronization or haptics
//! ends that call and is handed back to the caller unchanged.

use crate::device::DeviceError;
use thiserror::Error;

/// Errors returned by the action runtime
#[derive(Debug, Error)]
pub enum ActionError {
    /// Unknown session, action or action set reference
    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    /// Malformed call-site arguments
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Path handle that was never interned
    #[error("Invalid path handle: {0}")]
    PathInvalid(u64),

    /// Caller buffer too small, nothing was written
    #[error("Buffer too small: {required} elements required, {capacity} provided")]
    SizeInsufficient { required: usize, capacity: usize },

    /// Action queried through an accessor that does not match its declared type
    #[error("Action type mismatch: expected {expected}, action is {actual}")]
    TypeMismatch {
        expected: crate::action::ActionType,
        actual: crate::action::ActionType,
    },

    /// Action set was never attached to the session
    #[error("Action set not attached")]
    NotAttached,

    /// Bindings or action sets were already attached to the session
    #[error("Action sets already attached")]
    AlreadyAttached,

    /// Failure reported by the device layer
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),
}

impl ActionError {
    /// Short machine-friendly name of the error kind, used in log output
    pub fn kind(&self) -> &'static str {
        match self {
            ActionError::InvalidHandle(_) => "invalid-handle",
            ActionError::InvalidArgument(_) => "invalid-argument",
            ActionError::PathInvalid(_) => "path-invalid",
            ActionError::SizeInsufficient { .. } => "size-insufficient",
            ActionError::TypeMismatch { .. } => "type-mismatch",
            ActionError::NotAttached => "not-attached",
            ActionError::AlreadyAttached => "already-attached",
            ActionError::Device(_) => "device",
        }
    }
}
