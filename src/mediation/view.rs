use std::any::Any;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::core::{Instance, TypeKey};

use super::manager::Mediator;

/// Identity of a shared instance: the address of its allocation.
///
/// Only meaningful while a handle to the instance is alive; the registry
/// keeps one for every key it stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstanceKey(usize);

impl InstanceKey {
    fn of(instance: &Instance) -> Self {
        Self::of_ptr(Rc::as_ptr(instance) as *const ())
    }

    fn of_ptr(ptr: *const ()) -> Self {
        Self(ptr as usize)
    }
}

/// A view being mediated, compared by identity.
///
/// Besides its concrete type, a view can be bound as any interface it was
/// registered with through [`View::with_interface`].
#[derive(Clone)]
pub struct View {
    instance: Instance,
    type_key: TypeKey,
    interfaces: FxHashMap<TypeKey, Instance>,
}

impl View {
    pub fn new<T: Any>(view: Rc<T>) -> Self {
        Self {
            instance: view,
            type_key: TypeKey::of::<T>(),
            interfaces: FxHashMap::default(),
        }
    }

    /// Registers the view as an implementation of `I`, so mediators can
    /// resolve it with `Injector::get_shared::<I>()`.
    ///
    /// `interface` must point at the view's own allocation; anything else is
    /// ignored with a warning.
    pub fn with_interface<I: ?Sized + 'static>(mut self, interface: Rc<I>) -> Self {
        let key = TypeKey::of::<I>();
        if InstanceKey::of_ptr(Rc::as_ptr(&interface) as *const ()) != self.key() {
            tracing::warn!(view = ?self.key(), ty = %key, "interface is not the view itself, ignoring");
            return self;
        }
        self.interfaces.insert(key, Rc::new(interface));
        self
    }

    /// The value to bind for `key`: the view itself for its concrete type,
    /// the shared interface handle for a registered interface.
    pub fn binding_for(&self, key: TypeKey) -> Option<Instance> {
        if key == self.type_key {
            return Some(Rc::clone(&self.instance));
        }
        self.interfaces.get(&key).cloned()
    }

    pub fn provides(&self, key: TypeKey) -> bool {
        key == self.type_key || self.interfaces.contains_key(&key)
    }

    pub fn key(&self) -> InstanceKey {
        InstanceKey::of(&self.instance)
    }

    /// The concrete type the view was created from.
    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn downcast<T: Any>(&self) -> Option<Rc<T>> {
        Rc::clone(&self.instance).downcast::<T>().ok()
    }

    pub fn ptr_eq(&self, other: &View) -> bool {
        self.key() == other.key()
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("type", &self.type_key)
            .field("key", &self.key())
            .field("interfaces", &self.interfaces.len())
            .finish()
    }
}

/// A mediator instance created by the factory.
///
/// Carries the lifecycle view of the instance when its mediator type
/// exposes one, so managers can drive `initialize`/`destroy`.
#[derive(Clone)]
pub struct MediatorHandle {
    instance: Instance,
    type_key: TypeKey,
    lifecycle: Option<Rc<dyn Mediator>>,
}

impl MediatorHandle {
    pub(crate) fn new(
        instance: Instance,
        type_key: TypeKey,
        lifecycle: Option<Rc<dyn Mediator>>,
    ) -> Self {
        Self {
            instance,
            type_key,
            lifecycle,
        }
    }

    pub fn key(&self) -> InstanceKey {
        InstanceKey::of(&self.instance)
    }

    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn lifecycle(&self) -> Option<&Rc<dyn Mediator>> {
        self.lifecycle.as_ref()
    }

    pub fn downcast<T: Any>(&self) -> Option<Rc<T>> {
        Rc::clone(&self.instance).downcast::<T>().ok()
    }

    pub fn ptr_eq(&self, other: &MediatorHandle) -> bool {
        self.key() == other.key()
    }
}

impl fmt::Debug for MediatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediatorHandle")
            .field("type", &self.type_key)
            .field("key", &self.key())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mediation/view.rs"]
mod tests;
