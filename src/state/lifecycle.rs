//! Feature lifecycle state and its holder.
//!
//! # State Diagram
//!
//! ```text
//! ┌───────────────┐         ┌──────────────┐         ┌─────────┐
//! │ NOT_AVAILABLE │◀───────▶│ INITIALIZING │◀───────▶│  READY  │
//! └───────┬───────┘         └──────────────┘         └────┬────┘
//!         ▲                                               │
//!         └───────────────────────────────────────────────┘
//! ```
//!
//! Every state is reachable from every other state. The holder does not
//! validate edges; it only suppresses redundant writes.

use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

/// Availability of a feature at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureState {
    /// The feature cannot be used
    #[default]
    NotAvailable,

    /// The feature is coming up
    Initializing,

    /// The feature is ready to serve requests
    Ready,
}

/// Every lifecycle state, in code order.
pub const ALL_STATES: [FeatureState; 3] = [
    FeatureState::NotAvailable,
    FeatureState::Initializing,
    FeatureState::Ready,
];

impl FeatureState {
    /// Stable integer code carried over the observer transport.
    pub const fn code(self) -> i32 {
        match self {
            Self::NotAvailable => 0,
            Self::Initializing => 1,
            Self::Ready => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotAvailable => "NOT_AVAILABLE",
            Self::Initializing => "INITIALIZING",
            Self::Ready => "READY",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for FeatureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i32> for FeatureState {
    type Error = FeatureError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        ALL_STATES
            .into_iter()
            .find(|state| state.code() == code)
            .ok_or(FeatureError::InvalidStateCode(code))
    }
}

/// Point-in-time view of a [`StateHolder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StateSnapshot {
    pub state: FeatureState,

    /// When the current state was committed (None until the first change)
    pub changed_at: Option<DateTime<Utc>>,
}

impl StateSnapshot {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "state": self.state.as_str(),
            "code": self.state.code(),
            "changed_at": self.changed_at.map(|t| t.to_rfc3339()),
        })
    }
}

/// Owns the current lifecycle state of one feature instance.
///
/// Reads never block on a fan-out: the holder's own lock is released as soon
/// as a write is committed.
#[derive(Debug, Default)]
pub struct StateHolder {
    inner: RwLock<StateSnapshot>,
}

impl StateHolder {
    /// Create a holder in [`FeatureState::NotAvailable`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn get(&self) -> FeatureState {
        self.inner.read().state
    }

    pub fn snapshot(&self) -> StateSnapshot {
        *self.inner.read()
    }

    /// Commit `state` if it differs from the current one.
    ///
    /// Returns the previous state when a change was committed, `None` when the
    /// write was redundant.
    pub fn replace(&self, state: FeatureState) -> Option<FeatureState> {
        let mut inner = self.inner.write();
        if inner.state == state {
            return None;
        }
        let previous = inner.state;
        inner.state = state;
        inner.changed_at = Some(Utc::now());
        Some(previous)
    }
}
