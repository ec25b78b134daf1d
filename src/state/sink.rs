//! Compatibility broadcast sink.
//!
//! Older consumers learn about feature availability from a process-wide
//! "service up / service down" broadcast rather than from status callbacks.
//! The core only sees the narrow [`BroadcastSink`] seam; [`IntentSink`] adapts
//! it to whatever actually sends the broadcast.

use serde::Serialize;

use super::lifecycle::FeatureState;

/// Broadcast action sent when the service comes up.
pub const ACTION_SERVICE_UP: &str = "com.android.ims.IMS_SERVICE_UP";

/// Broadcast action sent when the service goes down.
pub const ACTION_SERVICE_DOWN: &str = "com.android.ims.IMS_SERVICE_DOWN";

/// Extra carrying the slot index of the service coming up or down.
pub const EXTRA_SLOT_INDEX: &str = "android:phone_id";

/// Two-valued signal understood by the compatibility sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceSignal {
    Up,
    Down,
}

impl ServiceSignal {
    /// Broadcast action for this signal.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Up => ACTION_SERVICE_UP,
            Self::Down => ACTION_SERVICE_DOWN,
        }
    }
}

impl From<FeatureState> for ServiceSignal {
    fn from(state: FeatureState) -> Self {
        match state {
            FeatureState::Ready => Self::Up,
            FeatureState::NotAvailable | FeatureState::Initializing => Self::Down,
        }
    }
}

/// Fire-and-forget receiver of compatibility signals.
pub trait BroadcastSink: Send + Sync {
    fn emit(&self, signal: ServiceSignal, slot_index: i32);
}

/// Sink that drops every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl BroadcastSink for DiscardSink {
    fn emit(&self, _signal: ServiceSignal, _slot_index: i32) {}
}

/// A compatibility broadcast ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatIntent {
    pub action: &'static str,
    pub slot_index: i32,
}

impl CompatIntent {
    pub fn new(signal: ServiceSignal, slot_index: i32) -> Self {
        Self {
            action: signal.action(),
            slot_index,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "action": self.action,
            "extras": { (EXTRA_SLOT_INDEX): self.slot_index },
        })
    }
}

/// Adapts an intent sender into a [`BroadcastSink`].
pub struct IntentSink<F> {
    send: F,
}

impl<F> IntentSink<F>
where
    F: Fn(CompatIntent) + Send + Sync,
{
    pub fn new(send: F) -> Self {
        Self { send }
    }
}

impl<F> BroadcastSink for IntentSink<F>
where
    F: Fn(CompatIntent) + Send + Sync,
{
    fn emit(&self, signal: ServiceSignal, slot_index: i32) {
        let intent = CompatIntent::new(signal, slot_index);
        tracing::debug!(action = intent.action, slot_index, "sending compat broadcast");
        (self.send)(intent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_signal_mapping() {
        assert_eq!(ServiceSignal::from(FeatureState::Ready), ServiceSignal::Up);
        assert_eq!(
            ServiceSignal::from(FeatureState::Initializing),
            ServiceSignal::Down
        );
        assert_eq!(
            ServiceSignal::from(FeatureState::NotAvailable),
            ServiceSignal::Down
        );
    }

    #[test]
    fn test_intent_sink_builds_intent() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let sink = IntentSink::new({
            let sent = Arc::clone(&sent);
            move |intent| sent.lock().push(intent)
        });

        sink.emit(ServiceSignal::Up, 1);
        sink.emit(ServiceSignal::Down, 1);

        let sent = sent.lock();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].action, ACTION_SERVICE_UP);
        assert_eq!(sent[1].action, ACTION_SERVICE_DOWN);
        assert_eq!(sent[1].slot_index, 1);
    }

    #[test]
    fn test_intent_json() {
        let json = CompatIntent::new(ServiceSignal::Down, 0).to_json();
        assert_eq!(json["action"], "com.android.ims.IMS_SERVICE_DOWN");
        assert_eq!(json["extras"]["android:phone_id"], 0);
    }
}
