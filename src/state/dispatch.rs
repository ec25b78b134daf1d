//! State fan-out to observers and the compatibility sink.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use super::address::AddressContext;
use super::lifecycle::{FeatureState, StateHolder};
use super::observer::{Member, ObserverRegistry};
use super::sink::{BroadcastSink, ServiceSignal};

/// Outcome of one fan-out. Purely informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BroadcastReport {
    pub state: FeatureState,

    /// Observers that accepted the notification
    pub delivered: usize,

    /// Observers evicted, either released or failing delivery
    pub pruned: usize,

    /// Signal handed to the sink, if the address context allowed it
    pub signal: Option<ServiceSignal>,
}

/// Pushes state changes to every registered observer, then to the sink.
pub struct NotificationDispatcher {
    registry: ObserverRegistry,
    address: RwLock<AddressContext>,
    sink: Arc<dyn BroadcastSink>,
}

impl NotificationDispatcher {
    pub fn new(sink: Arc<dyn BroadcastSink>) -> Self {
        Self {
            registry: ObserverRegistry::new(),
            address: RwLock::new(AddressContext::default()),
            sink,
        }
    }

    pub fn registry(&self) -> &ObserverRegistry {
        &self.registry
    }

    pub fn address(&self) -> AddressContext {
        self.address.read().clone()
    }

    /// Mutate the address context in place.
    pub fn update_address(&self, f: impl FnOnce(&mut AddressContext)) {
        f(&mut *self.address.write());
    }

    /// Deliver `state` to every observer and the sink.
    pub fn broadcast(&self, state: FeatureState) -> BroadcastReport {
        let mut members = self.registry.lock();
        self.fan_out(&mut members, state)
    }

    /// Commit `state` into `holder` and, if it changed, broadcast it.
    ///
    /// The commit happens under the registry lock, so concurrent transitions
    /// reach each observer in commit order and a joining observer never
    /// misses a transition newer than the state it was synced with.
    pub fn transition(&self, holder: &StateHolder, state: FeatureState) -> Option<BroadcastReport> {
        let mut members = self.registry.lock();
        match holder.replace(state) {
            Some(previous) => {
                tracing::debug!(from = %previous, to = %state, "feature state changed");
                Some(self.fan_out(&mut members, state))
            }
            None => {
                tracing::debug!(%state, "feature state unchanged, nothing to notify");
                None
            }
        }
    }

    fn fan_out(&self, members: &mut Vec<Member>, state: FeatureState) -> BroadcastReport {
        let mut delivered = 0;
        let mut pruned = 0;

        members.retain(|member| {
            let Some(target) = member.target() else {
                tracing::debug!(
                    registered_at = %member.registered_at(),
                    "observer released, dropping it"
                );
                pruned += 1;
                return false;
            };

            tracing::info!(%state, "notifying feature state");
            match target.notify_feature_status(state) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(e) => {
                    // No longer alive
                    tracing::warn!(%state, error = %e, "couldn't notify feature state");
                    pruned += 1;
                    false
                }
            }
        });

        let signal = self.emit(state);
        BroadcastReport {
            state,
            delivered,
            pruned,
            signal,
        }
    }

    fn emit(&self, state: FeatureState) -> Option<ServiceSignal> {
        let Some(slot_index) = self.address.read().emission_slot() else {
            tracing::debug!(%state, "address context incomplete, skipping compat broadcast");
            return None;
        };

        let signal = ServiceSignal::from(state);
        self.sink.emit(signal, slot_index);
        Some(signal)
    }
}

impl fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("registry", &self.registry)
            .field("address", &*self.address.read())
            .finish_non_exhaustive()
    }
}
