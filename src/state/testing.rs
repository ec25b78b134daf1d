//! Recording doubles shared by the unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::lifecycle::FeatureState;
use super::observer::StatusCallback;
use super::sink::{BroadcastSink, ServiceSignal};
use crate::error::{FeatureError, Result};

/// Observer that records every state it receives.
#[derive(Default)]
pub struct RecordingCallback {
    seen: Mutex<Vec<FeatureState>>,
    fail: AtomicBool,
}

impl RecordingCallback {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the next delivery fail as if the target had died.
    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn seen(&self) -> Vec<FeatureState> {
        self.seen.lock().clone()
    }
}

impl StatusCallback for RecordingCallback {
    fn notify_feature_status(&self, state: FeatureState) -> Result<()> {
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(FeatureError::DeadObject);
        }
        self.seen.lock().push(state);
        Ok(())
    }
}

/// Sink that records every signal it is handed.
#[derive(Default)]
pub struct RecordingSink {
    signals: Mutex<Vec<(ServiceSignal, i32)>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn signals(&self) -> Vec<(ServiceSignal, i32)> {
        self.signals.lock().clone()
    }
}

impl BroadcastSink for RecordingSink {
    fn emit(&self, signal: ServiceSignal, slot_index: i32) {
        self.signals.lock().push((signal, slot_index));
    }
}
