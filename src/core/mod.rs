//! Framework primitives the mediation layer is built on:
//! - types: type keys used for bindings
//! - injector: type-keyed dependency container
//! - scope: temporary bindings released on drop
//! - signal: synchronous notification source

pub mod injector;
pub mod scope;
pub mod signal;
pub mod types;

pub use injector::{
    Binding, BindingId, Constructor, Injectable, Injector, InjectorError, Instance,
};
pub use scope::ScopedBindings;
pub use signal::{ListenerKey, Signal};
pub use types::TypeKey;
