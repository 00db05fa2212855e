//! View mediation: one mediator per `(view, mapping)` pair.
//!
//! - view: identity handles for views and mediators
//! - mapping: mapping descriptors, type filters, mediator types
//! - guard / hook: creation policy and post-creation setup
//! - manager: lifecycle observer and view-removed source
//! - registry: `view -> mapping -> mediator` bookkeeping
//! - factory: creates, reuses and removes mediators

pub mod factory;
pub mod guard;
pub mod hook;
pub mod manager;
pub mod mapping;
pub mod registry;
pub mod view;

pub use factory::MediatorFactory;
pub use guard::{Guard, GuardSpec};
pub use hook::{Hook, HookSpec};
pub use manager::{DefaultMediatorManager, Mediator, MediatorManager};
pub use mapping::{MappingId, MediatorMapping, MediatorType, TypeFilter};
pub use registry::MediatorRegistry;
pub use view::{InstanceKey, MediatorHandle, View};
