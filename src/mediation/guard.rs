//! Guards veto mediator creation.

use std::fmt;
use std::rc::Rc;

use crate::core::injector::{Injectable, Injector, Result};

pub trait Guard {
    fn approve(&self) -> bool;
}

type ApproveFn = Rc<dyn Fn(&Injector) -> Result<bool>>;

/// One entry of a mapping's guard list.
#[derive(Clone)]
pub struct GuardSpec {
    label: &'static str,
    approve: ApproveFn,
}

impl GuardSpec {
    pub fn from_fn<F>(approve: F) -> Self
    where
        F: Fn(&Injector) -> bool + 'static,
    {
        Self {
            label: "fn",
            approve: Rc::new(move |injector: &Injector| Ok(approve(injector))),
        }
    }

    pub fn instance<G: Guard + 'static>(guard: Rc<G>) -> Self {
        Self {
            label: std::any::type_name::<G>(),
            approve: Rc::new(move |_: &Injector| Ok(guard.approve())),
        }
    }

    /// A guard type built by the injector each time it is evaluated, so it
    /// sees the bindings in place for the current view.
    pub fn of_type<G: Guard + Injectable>() -> Self {
        Self {
            label: std::any::type_name::<G>(),
            approve: Rc::new(|injector: &Injector| Ok(injector.instantiate::<G>()?.approve())),
        }
    }

    pub fn always() -> Self {
        Self::from_fn(|_| true)
    }

    pub fn never() -> Self {
        Self::from_fn(|_| false)
    }

    pub fn approve(&self, injector: &Injector) -> Result<bool> {
        (self.approve)(injector)
    }
}

impl fmt::Debug for GuardSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GuardSpec").field(&self.label).finish()
    }
}

/// Evaluates guards in order and stops at the first rejection.
/// An empty list approves.
pub fn approve(injector: &Injector, guards: &[GuardSpec]) -> Result<bool> {
    for guard in guards {
        if !guard.approve(injector)? {
            tracing::trace!(guard = guard.label, "guard rejected");
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
#[path = "../../tests/unit/mediation/guard.rs"]
mod tests;
