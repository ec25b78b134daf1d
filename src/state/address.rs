//! Where compatibility broadcasts go.
//!
//! A broadcast needs a host environment to send through and a slot index to
//! tag it with. Until both are set, emission is skipped.

use serde::Deserialize;

/// Slot index meaning "no slot assigned".
pub const INVALID_SLOT_INDEX: i32 = -1;

/// Opaque identity of the host environment a feature runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
    name: String,
}

impl HostContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Host environment plus slot index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressContext {
    pub host: Option<HostContext>,
    pub slot_index: i32,
}

impl Default for AddressContext {
    fn default() -> Self {
        Self {
            host: None,
            slot_index: INVALID_SLOT_INDEX,
        }
    }
}

impl AddressContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: HostContext) -> Self {
        self.host = Some(host);
        self
    }

    pub fn with_slot(mut self, slot_index: i32) -> Self {
        self.slot_index = slot_index;
        self
    }

    /// Whether both a host and a real slot are known.
    pub fn is_complete(&self) -> bool {
        self.host.is_some() && self.slot_index != INVALID_SLOT_INDEX
    }

    /// Slot to tag a broadcast with, or `None` when emission must be skipped.
    pub fn emission_slot(&self) -> Option<i32> {
        self.is_complete().then_some(self.slot_index)
    }
}

/// Deserializable address settings for a feature.
///
/// ```
/// use feature_state::FeatureConfig;
///
/// let config: FeatureConfig = serde_json::from_str(r#"{"host": "ims", "slot_index": 0}"#).unwrap();
/// assert!(config.address().is_complete());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub host: Option<String>,
    pub slot_index: i32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            host: None,
            slot_index: INVALID_SLOT_INDEX,
        }
    }
}

impl FeatureConfig {
    pub fn address(&self) -> AddressContext {
        AddressContext {
            host: self.host.as_deref().map(HostContext::new),
            slot_index: self.slot_index,
        }
    }
}
