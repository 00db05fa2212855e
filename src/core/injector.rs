use std::any::{type_name, Any};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::types::TypeKey;

pub type Result<T> = std::result::Result<T, InjectorError>;

/// A type-erased instance held by the injector.
pub type Instance = Rc<dyn Any>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectorError {
    Unmapped { type_name: &'static str },
    TypeMismatch { type_name: &'static str },
    /// A view was asked to stand in for a type it was not registered as.
    NotProvided { type_name: &'static str },
    Failed {
        type_name: &'static str,
        message: String,
    },
}

impl InjectorError {
    pub fn unmapped(key: TypeKey) -> Self {
        InjectorError::Unmapped {
            type_name: key.name(),
        }
    }

    /// Construction of `T` failed for a reason outside the injector.
    pub fn failed<T: ?Sized + 'static>(message: impl Into<String>) -> Self {
        InjectorError::Failed {
            type_name: type_name::<T>(),
            message: message.into(),
        }
    }
}

impl fmt::Display for InjectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectorError::Unmapped { type_name } => {
                write!(f, "No mapping found for type: {}", type_name)
            }
            InjectorError::TypeMismatch { type_name } => {
                write!(f, "Mapped instance is not of type: {}", type_name)
            }
            InjectorError::NotProvided { type_name } => {
                write!(f, "View does not provide type: {}", type_name)
            }
            InjectorError::Failed { type_name, message } => {
                write!(f, "Failed to construct {}: {}", type_name, message)
            }
        }
    }
}

impl std::error::Error for InjectorError {}

/// Types the injector can build, pulling their dependencies from the
/// bindings visible at construction time.
pub trait Injectable: Any + Sized {
    fn construct(injector: &Injector) -> Result<Self>;
}

type BuildFn = Rc<dyn Fn(&Injector) -> Result<Instance>>;

#[derive(Clone)]
pub struct Constructor {
    key: TypeKey,
    build: BuildFn,
}

impl Constructor {
    pub fn of<T: Injectable>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            build: Rc::new(|injector: &Injector| Ok(Rc::new(T::construct(injector)?) as Instance)),
        }
    }

    pub fn from_fn<T, F>(build: F) -> Self
    where
        T: Any,
        F: Fn(&Injector) -> Result<T> + 'static,
    {
        Self {
            key: TypeKey::of::<T>(),
            build: Rc::new(move |injector: &Injector| Ok(Rc::new(build(injector)?) as Instance)),
        }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    fn build(&self, injector: &Injector) -> Result<Instance> {
        (self.build)(injector)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Constructor").field(&self.key).finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BindingId(u64);

#[derive(Clone)]
enum Provider {
    Value(Instance),
    Singleton {
        constructor: Constructor,
        cache: Rc<RefCell<Option<Instance>>>,
    },
    Type(Constructor),
}

/// A single type binding. Removed bindings can be handed back to
/// [`Injector::restore`] and keep their original id.
#[derive(Clone)]
pub struct Binding {
    id: BindingId,
    provider: Provider,
}

impl Binding {
    pub fn id(&self) -> BindingId {
        self.id
    }

    pub fn is_value(&self) -> bool {
        matches!(self.provider, Provider::Value(_))
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.provider {
            Provider::Value(_) => "value",
            Provider::Singleton { .. } => "singleton",
            Provider::Type(_) => "type",
        };
        f.debug_struct("Binding")
            .field("id", &self.id)
            .field("kind", &kind)
            .finish()
    }
}

/// Type-keyed dependency container.
///
/// Single-threaded and re-entrant: no internal borrow is held while a
/// constructor runs, so constructors may resolve further dependencies or
/// map and unmap bindings.
pub struct Injector {
    parent: Option<Rc<Injector>>,
    bindings: RefCell<FxHashMap<TypeKey, Binding>>,
    next_binding: Cell<u64>,
}

impl Injector {
    pub fn new() -> Self {
        Self {
            parent: None,
            bindings: RefCell::new(FxHashMap::default()),
            next_binding: Cell::new(0),
        }
    }

    /// A child injector resolves through its own bindings first, then its parent's.
    pub fn create_child(self: &Rc<Self>) -> Injector {
        Self {
            parent: Some(Rc::clone(self)),
            ..Self::new()
        }
    }

    pub fn parent(&self) -> Option<&Rc<Injector>> {
        self.parent.as_ref()
    }

    pub fn map(&self, key: TypeKey) -> MappingBuilder<'_> {
        MappingBuilder {
            injector: self,
            key,
        }
    }

    pub fn map_value<T: Any>(&self, value: Rc<T>) -> BindingId {
        self.map(TypeKey::of::<T>()).to_value(value)
    }

    /// Binds a shared, possibly unsized value such as `Rc<dyn Trait>`.
    /// Resolve it with [`Injector::get_shared`].
    pub fn map_shared<T: ?Sized + 'static>(&self, value: Rc<T>) -> BindingId {
        self.map(TypeKey::of::<T>()).to_value(Rc::new(value))
    }

    pub fn unmap(&self, key: TypeKey) -> Option<Binding> {
        let removed = self.bindings.borrow_mut().remove(&key);
        if removed.is_some() {
            tracing::trace!(ty = %key, "unmapped");
        }
        removed
    }

    /// Reinstalls a binding previously returned by [`Injector::unmap`].
    pub fn restore(&self, key: TypeKey, binding: Binding) {
        tracing::trace!(ty = %key, binding = ?binding.id, "binding restored");
        self.bindings.borrow_mut().insert(key, binding);
    }

    pub fn has_mapping(&self, key: TypeKey) -> bool {
        self.has_direct_mapping(key)
            || self
                .parent
                .as_ref()
                .map_or(false, |parent| parent.has_mapping(key))
    }

    pub fn has_direct_mapping(&self, key: TypeKey) -> bool {
        self.bindings.borrow().contains_key(&key)
    }

    /// True only when this injector itself (not a parent) can provide `key`.
    pub fn satisfies_directly(&self, key: TypeKey) -> bool {
        self.has_direct_mapping(key)
    }

    pub fn binding_id(&self, key: TypeKey) -> Option<BindingId> {
        self.bindings.borrow().get(&key).map(Binding::id)
    }

    pub fn get_instance(&self, key: TypeKey) -> Result<Instance> {
        let (binding, owner) = self
            .lookup(key)
            .ok_or_else(|| InjectorError::unmapped(key))?;
        self.provide(binding, owner)
    }

    pub fn get<T: Any>(&self) -> Result<Rc<T>> {
        self.get_instance(TypeKey::of::<T>())?
            .downcast::<T>()
            .map_err(|_| InjectorError::TypeMismatch {
                type_name: type_name::<T>(),
            })
    }

    pub fn try_get<T: Any>(&self) -> Option<Rc<T>> {
        self.get::<T>().ok()
    }

    pub fn get_shared<T: ?Sized + 'static>(&self) -> Result<Rc<T>> {
        let outer = self
            .get_instance(TypeKey::of::<T>())?
            .downcast::<Rc<T>>()
            .map_err(|_| InjectorError::TypeMismatch {
                type_name: type_name::<T>(),
            })?;
        Ok(Rc::clone(&outer))
    }

    /// Builds a fresh instance, ignoring any binding for the constructor's
    /// own type. Dependencies still resolve through the current bindings.
    pub fn instantiate_unmapped(&self, constructor: &Constructor) -> Result<Instance> {
        tracing::trace!(ty = %constructor.key(), "instantiate unmapped");
        constructor.build(self)
    }

    pub fn instantiate<T: Injectable>(&self) -> Result<T> {
        T::construct(self)
    }

    pub fn len(&self) -> usize {
        self.bindings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.borrow().is_empty()
    }

    fn insert(&self, key: TypeKey, provider: Provider) -> BindingId {
        let id = BindingId(self.next_binding.get());
        self.next_binding.set(id.0 + 1);
        let replaced = self
            .bindings
            .borrow_mut()
            .insert(key, Binding { id, provider })
            .is_some();
        tracing::trace!(ty = %key, binding = ?id, replaced, "mapped");
        id
    }

    fn lookup(&self, key: TypeKey) -> Option<(Binding, &Injector)> {
        let local = self.bindings.borrow().get(&key).cloned();
        match local {
            Some(binding) => Some((binding, self)),
            None => self.parent.as_deref().and_then(|parent| parent.lookup(key)),
        }
    }

    fn provide(&self, binding: Binding, owner: &Injector) -> Result<Instance> {
        match binding.provider {
            Provider::Value(instance) => Ok(instance),
            Provider::Type(constructor) => constructor.build(self),
            Provider::Singleton { constructor, cache } => {
                let cached = cache.borrow().clone();
                if let Some(instance) = cached {
                    return Ok(instance);
                }
                let instance = constructor.build(owner)?;
                *cache.borrow_mut() = Some(Rc::clone(&instance));
                Ok(instance)
            }
        }
    }
}

impl Default for Injector {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MappingBuilder<'a> {
    injector: &'a Injector,
    key: TypeKey,
}

impl MappingBuilder<'_> {
    pub fn to_value(self, value: Instance) -> BindingId {
        self.injector.insert(self.key, Provider::Value(value))
    }

    pub fn to_singleton(self, constructor: Constructor) -> BindingId {
        self.injector.insert(
            self.key,
            Provider::Singleton {
                constructor,
                cache: Rc::new(RefCell::new(None)),
            },
        )
    }

    pub fn to_type(self, constructor: Constructor) -> BindingId {
        self.injector.insert(self.key, Provider::Type(constructor))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/injector.rs"]
mod tests;
