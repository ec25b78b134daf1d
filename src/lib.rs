//! Feature State Library
//!
//! This crate provides the lifecycle state and status-notification core for
//! pluggable features.
//!
//! # Overview
//!
//! A feature is always in one of three states (`NOT_AVAILABLE`,
//! `INITIALIZING`, `READY`). Remote observers register a status callback and
//! are told about every change:
//!
//! - **State Holder** - Owns the current state and suppresses redundant writes.
//!
//! - **Observer Registry** - Weakly-held, deduplicated set of status callbacks.
//!   A joining observer is synced with the current state before it is added.
//!
//! - **Notification Dispatcher** - Pushes each change to every observer and
//!   evicts observers whose delivery fails.
//!
//! - **Compatibility Sink** - Mirrors each change as a "service up / down"
//!   broadcast for the configured slot.
//!
//! # Design Principles
//!
//! 1. **Never fail the caller** - Delivery problems evict the observer, an
//!    incomplete address skips the broadcast. Nothing is returned as an error.
//!
//! 2. **No transport** - Observers and the sink are traits; this crate does
//!    not know how they reach the other side.
//!
//! 3. **Shared, passive object** - No threads of its own. Every operation is
//!    safe to call concurrently.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use feature_state::{
//!     CompatIntent, FeatureCore, FeatureError, FeatureState, HostContext, IntentSink,
//!     ObserverHandle, StatusCallback,
//! };
//!
//! struct Logger;
//!
//! impl StatusCallback for Logger {
//!     fn notify_feature_status(&self, state: FeatureState) -> Result<(), FeatureError> {
//!         println!("feature is now {state}");
//!         Ok(())
//!     }
//! }
//!
//! let sink = IntentSink::new(|intent: CompatIntent| println!("broadcast {}", intent.to_json()));
//! let core = FeatureCore::new(Arc::new(sink));
//! core.set_host_context(Some(HostContext::new("ims")));
//! core.set_slot_index(0);
//!
//! let observer = ObserverHandle::from(Arc::new(Logger));
//! core.add_status_callback(Some(&observer));
//!
//! core.set_feature_state(FeatureState::Initializing);
//! let report = core.set_feature_state(FeatureState::Ready).unwrap();
//! assert_eq!(report.delivered, 1);
//! ```

pub mod error;
pub mod state;

pub use error::FeatureError;

// Re-export everything from state module at crate root
pub use state::*;
