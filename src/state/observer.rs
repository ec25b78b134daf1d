//! Status observers and their registry.
//!
//! Observers are remote parties reached through a [`StatusCallback`]. The
//! registry only holds weak references: registering an observer never keeps
//! it alive. An entry whose target has been released is dropped the next time
//! the registry is walked, and an entry whose delivery fails is evicted.

use std::fmt;
use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};

use super::lifecycle::{FeatureState, StateHolder};
use crate::error::Result;

/// Remote-callable target of feature status notifications.
///
/// A returned error means the target is unreachable; the registry evicts it.
pub trait StatusCallback: Send + Sync {
    fn notify_feature_status(&self, state: FeatureState) -> Result<()>;
}

/// Strong, identity-compared handle to an observer.
///
/// Two handles are equal when they point at the same target.
#[derive(Clone)]
pub struct ObserverHandle(Arc<dyn StatusCallback>);

impl ObserverHandle {
    pub fn new(callback: Arc<dyn StatusCallback>) -> Self {
        Self(callback)
    }

    /// Deliver `state` to the target.
    pub fn notify(&self, state: FeatureState) -> Result<()> {
        self.0.notify_feature_status(state)
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0).cast()
    }

    fn downgrade(&self) -> Weak<dyn StatusCallback> {
        Arc::downgrade(&self.0)
    }
}

impl<C: StatusCallback + 'static> From<Arc<C>> for ObserverHandle {
    fn from(callback: Arc<C>) -> Self {
        Self(callback)
    }
}

impl PartialEq for ObserverHandle {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for ObserverHandle {}

impl fmt::Debug for ObserverHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObserverHandle({:p})", self.addr())
    }
}

/// One registered observer.
pub(crate) struct Member {
    target: Weak<dyn StatusCallback>,
    registered_at: DateTime<Utc>,
}

impl Member {
    fn new(handle: &ObserverHandle) -> Self {
        Self {
            target: handle.downgrade(),
            registered_at: Utc::now(),
        }
    }

    fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }

    fn is(&self, handle: &ObserverHandle) -> bool {
        self.target.as_ptr().cast::<()>() == handle.addr()
    }

    /// Upgrade to a live callback, if the target still exists.
    pub(crate) fn target(&self) -> Option<Arc<dyn StatusCallback>> {
        self.target.upgrade()
    }

    pub(crate) fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }
}

/// Deduplicated, weakly-held set of observers.
///
/// Every walk of the set, and every insertion or removal, happens under one
/// lock. Callbacks run while that lock is held, so a callback must not call
/// back into the registry that is notifying it.
#[derive(Default)]
pub struct ObserverRegistry {
    members: Mutex<Vec<Member>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer, first syncing it with the current state.
    ///
    /// The current state is read under the registry lock and delivered to the
    /// observer before it joins. If that delivery fails the observer is
    /// discarded. Returns whether the observer is a member afterwards.
    pub fn add(&self, handle: Option<&ObserverHandle>, holder: &StateHolder) -> bool {
        let Some(handle) = handle else {
            return false;
        };

        let mut members = self.members.lock();
        // A released target's address may be reused by a new allocation
        members.retain(Member::is_alive);

        let state = holder.get();
        if let Err(e) = handle.notify(state) {
            tracing::warn!(%state, error = %e, "couldn't notify feature state, observer discarded");
            return false;
        }

        if !members.iter().any(|m| m.is(handle)) {
            members.push(Member::new(handle));
        }
        true
    }

    /// Unregister an observer. Returns whether it was a member.
    pub fn remove(&self, handle: Option<&ObserverHandle>) -> bool {
        let Some(handle) = handle else {
            return false;
        };

        let mut members = self.members.lock();
        let before = members.len();
        members.retain(|m| !m.is(handle));
        members.len() != before
    }

    pub fn contains(&self, handle: &ObserverHandle) -> bool {
        self.members
            .lock()
            .iter()
            .any(|m| m.is_alive() && m.is(handle))
    }

    /// Number of live members.
    pub fn len(&self) -> usize {
        self.members.lock().iter().filter(|m| m.is_alive()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// When `handle` joined, if it is a live member.
    pub fn registered_at(&self, handle: &ObserverHandle) -> Option<DateTime<Utc>> {
        self.members
            .lock()
            .iter()
            .find(|m| m.is_alive() && m.is(handle))
            .map(Member::registered_at)
    }

    /// Exclusive access to the member list for a fan-out.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Vec<Member>> {
        self.members.lock()
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("members", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::RecordingCallback;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_delivers_current_state() {
        let registry = ObserverRegistry::new();
        let holder = StateHolder::new();
        holder.replace(FeatureState::Initializing);

        let cb = RecordingCallback::new();
        let handle = ObserverHandle::from(cb.clone());

        assert!(registry.add(Some(&handle), &holder));
        assert!(registry.contains(&handle));
        assert!(registry.registered_at(&handle).is_some());
        assert_eq!(cb.seen(), vec![FeatureState::Initializing]);
    }

    #[test]
    fn test_add_none_is_noop() {
        let registry = ObserverRegistry::new();
        let holder = StateHolder::new();

        assert!(!registry.add(None, &holder));
        assert!(!registry.remove(None));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_failed_on_arrival_is_discarded() {
        let registry = ObserverRegistry::new();
        let holder = StateHolder::new();

        let cb = RecordingCallback::new();
        cb.fail_next();
        let handle = ObserverHandle::from(cb.clone());

        assert!(!registry.add(Some(&handle), &holder));
        assert!(!registry.contains(&handle));
        assert!(cb.seen().is_empty());
    }

    #[test]
    fn test_add_is_deduplicated() {
        let registry = ObserverRegistry::new();
        let holder = StateHolder::new();

        let cb = RecordingCallback::new();
        let handle = ObserverHandle::from(cb.clone());
        let same = handle.clone();

        registry.add(Some(&handle), &holder);
        registry.add(Some(&same), &holder);

        assert_eq!(handle, same);
        assert_eq!(registry.len(), 1);
        // Joining again re-syncs the state
        assert_eq!(cb.seen().len(), 2);
    }

    #[test]
    fn test_distinct_targets_are_distinct() {
        let a = ObserverHandle::from(RecordingCallback::new());
        let b = ObserverHandle::from(RecordingCallback::new());
        assert_ne!(a, b);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let registry = ObserverRegistry::new();
        let holder = StateHolder::new();

        let handle = ObserverHandle::from(RecordingCallback::new());
        let stranger = ObserverHandle::from(RecordingCallback::new());
        registry.add(Some(&handle), &holder);

        assert!(!registry.remove(Some(&stranger)));
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(Some(&handle)));
        assert!(!registry.remove(Some(&handle)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_membership_is_weak() {
        let registry = ObserverRegistry::new();
        let holder = StateHolder::new();

        let cb = RecordingCallback::new();
        let handle = ObserverHandle::from(cb);
        registry.add(Some(&handle), &holder);
        assert_eq!(registry.len(), 1);

        // Dropping the last strong handle releases the observer
        drop(handle);
        assert_eq!(registry.len(), 0);
        assert!(registry.is_empty());
    }
}
