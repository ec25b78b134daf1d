//! Error types for the feature state core.
//!
//! The notification engine itself never returns errors to its callers. These
//! errors only appear at the observer seam (a failed delivery) and when raw
//! state codes arrive from outside.

use thiserror::Error;

/// Convenient result alias for observer delivery.
pub type Result<T> = std::result::Result<T, FeatureError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeatureError {
    /// The remote target behind an observer handle no longer exists.
    #[error("observer is no longer alive")]
    DeadObject,

    /// Any other failure reported by the transport.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A raw state code that does not name a lifecycle state.
    #[error("invalid feature state code {0}")]
    InvalidStateCode(i32),
}

impl FeatureError {
    /// Build a transport error from anything displayable.
    pub fn transport(reason: impl std::fmt::Display) -> Self {
        Self::Transport(reason.to_string())
    }
}
