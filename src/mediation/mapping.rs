use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::injector::{Constructor, Injectable, Injector, Instance, Result};
use crate::core::TypeKey;

use super::guard::GuardSpec;
use super::hook::HookSpec;
use super::manager::Mediator;
use super::view::MediatorHandle;

static NEXT_MAPPING_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a mapping. Two mappings built from identical parts still
/// get different ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MappingId(u64);

impl MappingId {
    fn next() -> Self {
        Self(NEXT_MAPPING_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for MappingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Type constraints a mapping was declared with.
#[derive(Clone, Debug, Default)]
pub struct TypeFilter {
    all_of: Vec<TypeKey>,
    any_of: Vec<TypeKey>,
    none_of: Vec<TypeKey>,
}

impl TypeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all_of(mut self, types: impl IntoIterator<Item = TypeKey>) -> Self {
        self.all_of.extend(types);
        self
    }

    pub fn any_of(mut self, types: impl IntoIterator<Item = TypeKey>) -> Self {
        self.any_of.extend(types);
        self
    }

    pub fn none_of(mut self, types: impl IntoIterator<Item = TypeKey>) -> Self {
        self.none_of.extend(types);
        self
    }

    pub fn all_of_types(&self) -> &[TypeKey] {
        &self.all_of
    }

    pub fn any_of_types(&self) -> &[TypeKey] {
        &self.any_of
    }

    pub fn none_of_types(&self) -> &[TypeKey] {
        &self.none_of
    }

    /// Types a view is bound as while its mediator is built: every
    /// `all_of` type plus the view's own type, without duplicates.
    pub fn required_types(&self, view_type: TypeKey) -> Vec<TypeKey> {
        let mut required: Vec<TypeKey> = Vec::with_capacity(self.all_of.len() + 1);
        for key in self.all_of.iter().copied().chain(std::iter::once(view_type)) {
            if !required.contains(&key) {
                required.push(key);
            }
        }
        required
    }
}

type LifecycleCast = fn(Instance) -> Option<Rc<dyn Mediator>>;

fn cast_lifecycle<M: Mediator>(instance: Instance) -> Option<Rc<dyn Mediator>> {
    instance
        .downcast::<M>()
        .ok()
        .map(|mediator| mediator as Rc<dyn Mediator>)
}

/// How to build the mediator of a mapping.
#[derive(Clone, Debug)]
pub struct MediatorType {
    constructor: Constructor,
    lifecycle: Option<LifecycleCast>,
}

impl MediatorType {
    pub fn of<M: Injectable>() -> Self {
        Self::from_constructor(Constructor::of::<M>())
    }

    /// Like [`MediatorType::of`], and managers will drive the mediator's
    /// [`Mediator`] callbacks.
    pub fn with_lifecycle<M: Injectable + Mediator>() -> Self {
        Self {
            constructor: Constructor::of::<M>(),
            lifecycle: Some(cast_lifecycle::<M>),
        }
    }

    pub fn from_constructor(constructor: Constructor) -> Self {
        Self {
            constructor,
            lifecycle: None,
        }
    }

    pub fn key(&self) -> TypeKey {
        self.constructor.key()
    }

    pub(crate) fn instantiate(&self, injector: &Injector) -> Result<MediatorHandle> {
        let instance = injector.instantiate_unmapped(&self.constructor)?;
        let lifecycle = self.lifecycle.and_then(|cast| cast(Rc::clone(&instance)));
        Ok(MediatorHandle::new(instance, self.key(), lifecycle))
    }
}

/// Immutable description of one mediator to create for matching views.
///
/// Not `Clone`: a mapping's identity is its [`MappingId`]. Share it with `Rc`.
pub struct MediatorMapping {
    id: MappingId,
    matcher: TypeFilter,
    mediator: MediatorType,
    guards: Vec<GuardSpec>,
    hooks: Vec<HookSpec>,
    auto_remove: bool,
}

impl MediatorMapping {
    pub fn new(matcher: TypeFilter, mediator: MediatorType) -> Self {
        Self {
            id: MappingId::next(),
            matcher,
            mediator,
            guards: Vec::new(),
            hooks: Vec::new(),
            auto_remove: true,
        }
    }

    pub fn with_guards(mut self, guards: impl IntoIterator<Item = GuardSpec>) -> Self {
        self.guards.extend(guards);
        self
    }

    pub fn with_hooks(mut self, hooks: impl IntoIterator<Item = HookSpec>) -> Self {
        self.hooks.extend(hooks);
        self
    }

    /// Whether removing the view from the display should tear its mediator
    /// down automatically. On by default.
    pub fn auto_remove(mut self, enabled: bool) -> Self {
        self.auto_remove = enabled;
        self
    }

    pub fn id(&self) -> MappingId {
        self.id
    }

    pub fn matcher(&self) -> &TypeFilter {
        &self.matcher
    }

    pub fn mediator_type(&self) -> &MediatorType {
        &self.mediator
    }

    pub fn guards(&self) -> &[GuardSpec] {
        &self.guards
    }

    pub fn hooks(&self) -> &[HookSpec] {
        &self.hooks
    }

    pub fn auto_remove_enabled(&self) -> bool {
        self.auto_remove
    }
}

impl fmt::Debug for MediatorMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediatorMapping")
            .field("id", &self.id)
            .field("mediator", &self.mediator.key())
            .field("guards", &self.guards.len())
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mediation/mapping.rs"]
mod tests;
