//! Feature state module.
//!
//! This module provides the lifecycle state and its notification engine:
//!
//! - `lifecycle` - Feature state values and the holder that owns them
//! - `observer` - Status callbacks and the weakly-held observer registry
//! - `dispatch` - Fan-out of state changes to observers and the sink
//! - `sink` - Compatibility "service up / down" broadcast seam
//! - `address` - Host and slot used to address compatibility broadcasts
//! - `feature` - Owner-facing trait implemented by concrete features
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                          FeatureCore                           │
//! │                                                                │
//! │  ┌───────────────┐  transition  ┌─────────────────────────┐    │
//! │  │  StateHolder  │─────────────▶│ NotificationDispatcher  │    │
//! │  │               │              │                         │    │
//! │  │ NOT_AVAILABLE │              │  ObserverRegistry       │────┼──▶ observers
//! │  │ INITIALIZING  │              │    Weak<StatusCallback> │    │
//! │  │ READY         │              │                         │    │
//! │  └───────────────┘              │  AddressContext         │────┼──▶ BroadcastSink
//! │                                 │    host + slot          │    │
//! │                                 └─────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use feature_state::state::{FeatureCore, FeatureState, ObserverHandle};
//!
//! let core = FeatureCore::default();
//! core.add_status_callback(Some(&handle)); // handle receives NOT_AVAILABLE
//! core.set_feature_state(FeatureState::Ready); // handle receives READY
//! ```

pub mod address;
pub mod dispatch;
pub mod feature;
pub mod lifecycle;
pub mod observer;
pub mod sink;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

// Re-export commonly used types
pub use address::{AddressContext, FeatureConfig, HostContext, INVALID_SLOT_INDEX};
pub use dispatch::{BroadcastReport, NotificationDispatcher};
pub use feature::Feature;
pub use lifecycle::{FeatureState, StateHolder, StateSnapshot, ALL_STATES};
pub use observer::{ObserverHandle, ObserverRegistry, StatusCallback};
pub use sink::{
    BroadcastSink, CompatIntent, DiscardSink, IntentSink, ServiceSignal, ACTION_SERVICE_DOWN,
    ACTION_SERVICE_UP, EXTRA_SLOT_INDEX,
};

/// Lifecycle state plus its observers, embedded by every feature.
///
/// None of the operations fail: delivery problems turn into observer
/// eviction, an incomplete address turns into a skipped broadcast.
#[derive(Debug)]
pub struct FeatureCore {
    holder: StateHolder,
    dispatcher: NotificationDispatcher,
}

impl Default for FeatureCore {
    fn default() -> Self {
        Self::new(Arc::new(DiscardSink))
    }
}

impl FeatureCore {
    pub fn new(sink: Arc<dyn BroadcastSink>) -> Self {
        Self {
            holder: StateHolder::new(),
            dispatcher: NotificationDispatcher::new(sink),
        }
    }

    pub fn feature_state(&self) -> FeatureState {
        self.holder.get()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.holder.snapshot()
    }

    /// Move to `state`, notifying observers and the sink if it changed.
    ///
    /// Setting the current state again does nothing at all.
    pub fn set_feature_state(&self, state: FeatureState) -> Option<BroadcastReport> {
        self.dispatcher.transition(&self.holder, state)
    }

    /// Push `state` to observers and the sink without touching the holder.
    pub fn broadcast(&self, state: FeatureState) -> BroadcastReport {
        self.dispatcher.broadcast(state)
    }

    pub fn add_status_callback(&self, handle: Option<&ObserverHandle>) -> bool {
        self.dispatcher.registry().add(handle, &self.holder)
    }

    pub fn remove_status_callback(&self, handle: Option<&ObserverHandle>) -> bool {
        self.dispatcher.registry().remove(handle)
    }

    pub fn registry(&self) -> &ObserverRegistry {
        self.dispatcher.registry()
    }

    pub fn set_host_context(&self, host: Option<HostContext>) {
        self.dispatcher.update_address(|ctx| ctx.host = host);
    }

    pub fn set_slot_index(&self, slot_index: i32) {
        self.dispatcher
            .update_address(|ctx| ctx.slot_index = slot_index);
    }

    pub fn address(&self) -> AddressContext {
        self.dispatcher.address()
    }

    /// Apply address settings from configuration.
    pub fn configure(&self, config: &FeatureConfig) {
        let address = config.address();
        tracing::debug!(
            host = address.host.as_ref().map(HostContext::name),
            slot_index = address.slot_index,
            "configuring feature address"
        );
        self.dispatcher.update_address(|ctx| *ctx = address);
    }
}
