//! mediation - mediator lifecycle for dependency-injected views
//!
//! Module layout:
//! - core: injector, type keys, scoped bindings, signals
//! - mediation: mappings, guards, hooks, manager, registry, factory
//! - config: serde-backed settings
//! - logging: tracing subscriber setup

pub mod config;
pub mod core;
pub mod logging;
pub mod mediation;

pub use crate::core::{Injectable, Injector, InjectorError, TypeKey};
pub use crate::mediation::{
    GuardSpec, HookSpec, MediatorFactory, MediatorHandle, MediatorMapping, MediatorType,
    TypeFilter, View,
};
