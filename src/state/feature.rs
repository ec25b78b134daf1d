//! Owner-facing feature surface.
//!
//! A concrete feature embeds a [`FeatureCore`] and implements [`Feature`].
//! The provided methods are what other parties call; moving the feature
//! between states is done by the implementation through
//! [`FeatureCore::set_feature_state`], which is not part of this trait.

use super::address::HostContext;
use super::lifecycle::FeatureState;
use super::observer::ObserverHandle;
use super::FeatureCore;

pub trait Feature {
    /// Handle other processes use to reach this feature.
    type Binder;

    /// The embedded notification core.
    fn core(&self) -> &FeatureCore;

    /// Called when the feature is being removed and must release its own
    /// resources. Observers need no explicit cleanup.
    fn on_feature_removed(&self);

    fn binder(&self) -> Self::Binder;

    fn feature_state(&self) -> FeatureState {
        self.core().feature_state()
    }

    fn add_status_callback(&self, handle: Option<&ObserverHandle>) {
        self.core().add_status_callback(handle);
    }

    fn remove_status_callback(&self, handle: Option<&ObserverHandle>) {
        self.core().remove_status_callback(handle);
    }

    fn set_host_context(&self, host: Option<HostContext>) {
        self.core().set_host_context(host);
    }

    fn set_slot_index(&self, slot_index: i32) {
        self.core().set_slot_index(slot_index);
    }
}
