//! Hooks run once against a freshly created mediator before it is registered.

use std::fmt;
use std::rc::Rc;

use crate::core::injector::{Injectable, Injector, Result};

pub trait Hook {
    fn hook(&self) -> Result<()>;
}

type HookFn = Rc<dyn Fn(&Injector) -> Result<()>>;

#[derive(Clone)]
pub struct HookSpec {
    label: &'static str,
    run: HookFn,
}

impl HookSpec {
    pub fn from_fn<F>(run: F) -> Self
    where
        F: Fn(&Injector) -> Result<()> + 'static,
    {
        Self {
            label: "fn",
            run: Rc::new(run),
        }
    }

    pub fn instance<H: Hook + 'static>(hook: Rc<H>) -> Self {
        Self {
            label: std::any::type_name::<H>(),
            run: Rc::new(move |_: &Injector| hook.hook()),
        }
    }

    /// Built through the injector on every run; the mediator being set up
    /// is resolvable by its own type at that point.
    pub fn of_type<H: Hook + Injectable>() -> Self {
        Self {
            label: std::any::type_name::<H>(),
            run: Rc::new(|injector: &Injector| injector.instantiate::<H>()?.hook()),
        }
    }

    pub fn run(&self, injector: &Injector) -> Result<()> {
        (self.run)(injector)
    }
}

impl fmt::Debug for HookSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HookSpec").field(&self.label).finish()
    }
}

/// Runs every hook in order; the first error aborts the rest.
pub fn apply(injector: &Injector, hooks: &[HookSpec]) -> Result<()> {
    for hook in hooks {
        tracing::trace!(hook = hook.label, "applying hook");
        hook.run(injector)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/mediation/hook.rs"]
mod tests;
