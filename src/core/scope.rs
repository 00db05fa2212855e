//! Temporary injector bindings released on every exit path.

use super::injector::{Binding, BindingId, Injector, Instance};
use super::types::TypeKey;

struct Installed {
    key: TypeKey,
    id: BindingId,
    previous: Option<Binding>,
}

/// Binds a set of types for the lifetime of the guard.
///
/// On drop each binding is removed only if it is still exactly the one this
/// guard installed, and whatever was bound before the guard is put back.
/// Nested scopes over the same type therefore unwind like a stack.
pub struct ScopedBindings<'a> {
    injector: &'a Injector,
    installed: Vec<Installed>,
}

impl<'a> ScopedBindings<'a> {
    pub fn install<I>(injector: &'a Injector, bindings: I) -> Self
    where
        I: IntoIterator<Item = (TypeKey, Instance)>,
    {
        let installed = bindings
            .into_iter()
            .map(|(key, value)| {
                let previous = injector.unmap(key);
                let id = injector.map(key).to_value(value);
                Installed { key, id, previous }
            })
            .collect();
        Self {
            injector,
            installed,
        }
    }

    pub fn len(&self) -> usize {
        self.installed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installed.is_empty()
    }
}

impl Drop for ScopedBindings<'_> {
    fn drop(&mut self) {
        while let Some(entry) = self.installed.pop() {
            if self.injector.binding_id(entry.key) != Some(entry.id) {
                tracing::debug!(ty = %entry.key, "scoped binding was replaced, leaving it");
                continue;
            }
            self.injector.unmap(entry.key);
            if let Some(previous) = entry.previous {
                self.injector.restore(entry.key, previous);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/scope.rs"]
mod tests;
