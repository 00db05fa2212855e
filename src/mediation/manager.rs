use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::core::{Injector, Signal, TypeKey};

use super::mapping::MediatorMapping;
use super::view::{InstanceKey, MediatorHandle, View};

/// Lifecycle callbacks a mediator may opt into through
/// [`MediatorType::with_lifecycle`](super::mapping::MediatorType::with_lifecycle).
pub trait Mediator: Any {
    fn initialize(&self, _view: &View) {}

    fn destroy(&self) {}
}

/// Observes every mediator the factory adds or removes, and tells the
/// factory when a view goes away.
pub trait MediatorManager {
    fn view_removed(&self) -> &Signal<View>;

    fn add_mediator(&self, mediator: &MediatorHandle, view: &View, mapping: &MediatorMapping);

    fn remove_mediator(&self, mediator: &MediatorHandle, view: &View, mapping: &MediatorMapping);
}

/// Returns the manager bound in `injector` as `dyn MediatorManager`, if any.
pub fn resolve_manager(injector: &Injector) -> Option<Rc<dyn MediatorManager>> {
    if !injector.has_mapping(TypeKey::of::<dyn MediatorManager>()) {
        return None;
    }
    match injector.get_shared::<dyn MediatorManager>() {
        Ok(manager) => Some(manager),
        Err(err) => {
            tracing::warn!(error = %err, "mediator manager binding unusable, using default");
            None
        }
    }
}

/// Manager used when the injector provides none.
///
/// Initializes and destroys lifecycle-aware mediators and keeps count of
/// auto-remove mediators per view. [`notify_view_removed`] only forwards
/// removals for views that still have such a mediator.
///
/// [`notify_view_removed`]: DefaultMediatorManager::notify_view_removed
pub struct DefaultMediatorManager {
    view_removed: Signal<View>,
    tracked: RefCell<FxHashMap<InstanceKey, usize>>,
}

impl DefaultMediatorManager {
    pub fn new() -> Self {
        Self {
            view_removed: Signal::new(),
            tracked: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn is_tracking(&self, view: &View) -> bool {
        self.tracked.borrow().contains_key(&view.key())
    }

    /// Called when `view` leaves the display. Returns whether listeners were notified.
    pub fn notify_view_removed(&self, view: &View) -> bool {
        if !self.is_tracking(view) {
            return false;
        }
        tracing::debug!(view = ?view.key(), "view removed");
        self.view_removed.dispatch(view);
        true
    }
}

impl Default for DefaultMediatorManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MediatorManager for DefaultMediatorManager {
    fn view_removed(&self) -> &Signal<View> {
        &self.view_removed
    }

    fn add_mediator(&self, mediator: &MediatorHandle, view: &View, mapping: &MediatorMapping) {
        if mapping.auto_remove_enabled() {
            *self.tracked.borrow_mut().entry(view.key()).or_insert(0) += 1;
        }
        if let Some(lifecycle) = mediator.lifecycle() {
            lifecycle.initialize(view);
        }
    }

    fn remove_mediator(&self, mediator: &MediatorHandle, view: &View, mapping: &MediatorMapping) {
        if mapping.auto_remove_enabled() {
            let mut tracked = self.tracked.borrow_mut();
            if let Some(count) = tracked.get_mut(&view.key()) {
                *count -= 1;
                if *count == 0 {
                    tracked.remove(&view.key());
                }
            }
        }
        if let Some(lifecycle) = mediator.lifecycle() {
            lifecycle.destroy();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mediation/manager.rs"]
mod tests;
