//! Creates, deduplicates and tears down mediators per `(view, mapping)` pair.
//!
//! Guards, hooks and manager callbacks may call back into the factory. No
//! registry borrow is held across those calls, and removal works on entries
//! already detached from the registry.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::core::injector::Result;
use crate::core::{Injector, InjectorError, Instance, ListenerKey, ScopedBindings, TypeKey};

use super::guard;
use super::hook;
use super::manager::{resolve_manager, DefaultMediatorManager, MediatorManager};
use super::mapping::MediatorMapping;
use super::registry::MediatorRegistry;
use super::view::{MediatorHandle, View};

pub struct MediatorFactory {
    injector: Rc<Injector>,
    manager: Rc<dyn MediatorManager>,
    registry: RefCell<MediatorRegistry>,
    subscription: Cell<Option<ListenerKey>>,
}

impl MediatorFactory {
    /// Uses the `dyn MediatorManager` bound in `injector`, or a
    /// [`DefaultMediatorManager`] when there is none.
    pub fn new(injector: Rc<Injector>) -> Rc<Self> {
        let manager: Rc<dyn MediatorManager> = match resolve_manager(&injector) {
            Some(manager) => manager,
            None => Rc::new(DefaultMediatorManager::new()),
        };
        Self::with_manager(injector, manager)
    }

    pub fn with_manager(injector: Rc<Injector>, manager: Rc<dyn MediatorManager>) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let subscription = manager.view_removed().subscribe(move |view: &View| {
                if let Some(factory) = weak.upgrade() {
                    factory.remove_mediators(view);
                }
            });
            Self {
                injector,
                manager,
                registry: RefCell::new(MediatorRegistry::new()),
                subscription: Cell::new(Some(subscription)),
            }
        })
    }

    pub fn injector(&self) -> &Rc<Injector> {
        &self.injector
    }

    pub fn manager(&self) -> &Rc<dyn MediatorManager> {
        &self.manager
    }

    pub fn get_mediator(&self, view: &View, mapping: &MediatorMapping) -> Option<MediatorHandle> {
        self.registry.borrow().get(view, mapping)
    }

    /// Returns one mediator per mapping, in input order, creating those that
    /// do not exist yet. Mappings whose guards reject are left out.
    ///
    /// While a mediator is built, `view` is bound in the injector as
    /// `view_type` and as every `all_of` type of the mapping's filter. A type
    /// the view does not provide (see [`View::with_interface`]) fails with
    /// [`InjectorError::NotProvided`] before anything is bound.
    pub fn create_mediators(
        &self,
        view: &View,
        view_type: TypeKey,
        mappings: &[Rc<MediatorMapping>],
    ) -> Result<Vec<MediatorHandle>> {
        let mut mediators = Vec::with_capacity(mappings.len());
        for mapping in mappings {
            if let Some(existing) = self.get_mediator(view, mapping) {
                tracing::trace!(view = ?view.key(), mapping = %mapping.id(), "mediator reused");
                mediators.push(existing);
                continue;
            }

            let bindings = view_bindings(view, mapping.matcher().required_types(view_type))?;
            let created = {
                let _bindings = ScopedBindings::install(&self.injector, bindings);
                self.create_mediator(view, mapping)?
            };
            if let Some(mediator) = created {
                mediators.push(mediator);
            }
        }
        Ok(mediators)
    }

    /// Detaches every mediator of `view`, then tells the manager about each in
    /// registration order. During those callbacks the view is already gone
    /// from the registry.
    pub fn remove_mediators(&self, view: &View) {
        let removed = self.registry.borrow_mut().take_view(view);
        if removed.is_empty() {
            return;
        }

        tracing::debug!(view = ?view.key(), count = removed.len(), "removing mediators");
        for entry in &removed {
            self.manager
                .remove_mediator(&entry.mediator, &entry.view, &entry.mapping);
        }
    }

    /// Removes every mediator, then detaches from the manager's view-removed
    /// notification. Safe to call more than once.
    pub fn remove_all_mediators(&self) {
        let views = self.registry.borrow().views();
        for view in &views {
            self.remove_mediators(view);
        }

        if let Some(key) = self.subscription.take() {
            self.manager.view_removed().unsubscribe(key);
            tracing::debug!(views = views.len(), "mediator factory torn down");
        }
    }

    pub fn is_subscribed(&self) -> bool {
        let key = self.subscription.get();
        key.map_or(false, |key| self.manager.view_removed().is_subscribed(key))
    }

    pub fn view_count(&self) -> usize {
        self.registry.borrow().view_count()
    }

    pub fn mediator_count(&self) -> usize {
        self.registry.borrow().mediator_count()
    }

    fn create_mediator(
        &self,
        view: &View,
        mapping: &Rc<MediatorMapping>,
    ) -> Result<Option<MediatorHandle>> {
        if let Some(existing) = self.get_mediator(view, mapping) {
            return Ok(Some(existing));
        }

        if !mapping.guards().is_empty() && !guard::approve(&self.injector, mapping.guards())? {
            tracing::debug!(view = ?view.key(), mapping = %mapping.id(), "guards rejected mediator");
            return Ok(None);
        }

        let mediator = mapping.mediator_type().instantiate(&self.injector)?;
        if !mapping.hooks().is_empty() {
            let _self_binding = ScopedBindings::install(
                &self.injector,
                [(mapping.mediator_type().key(), Rc::clone(mediator.instance()))],
            );
            hook::apply(&self.injector, mapping.hooks())?;
        }

        // A hook may have mediated this very pair already.
        if let Some(existing) = self.get_mediator(view, mapping) {
            tracing::warn!(
                view = ?view.key(),
                mapping = %mapping.id(),
                "mediator created re-entrantly, discarding duplicate"
            );
            return Ok(Some(existing));
        }

        self.add_mediator(&mediator, view, mapping);
        Ok(Some(mediator))
    }

    fn add_mediator(&self, mediator: &MediatorHandle, view: &View, mapping: &Rc<MediatorMapping>) {
        self.registry
            .borrow_mut()
            .insert(view, mapping, mediator.clone());
        tracing::debug!(
            view = ?view.key(),
            mapping = %mapping.id(),
            mediator = %mediator.type_key(),
            "mediator added"
        );
        self.manager.add_mediator(mediator, view, mapping);
    }
}

fn view_bindings(view: &View, required: Vec<TypeKey>) -> Result<Vec<(TypeKey, Instance)>> {
    required
        .into_iter()
        .map(|key| {
            view.binding_for(key)
                .map(|instance| (key, instance))
                .ok_or(InjectorError::NotProvided {
                    type_name: key.name(),
                })
        })
        .collect()
}

impl Drop for MediatorFactory {
    fn drop(&mut self) {
        if let Some(key) = self.subscription.get_mut().take() {
            self.manager.view_removed().unsubscribe(key);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mediation/factory.rs"]
mod tests;
