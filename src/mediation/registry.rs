use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::mapping::{MappingId, MediatorMapping};
use super::view::{InstanceKey, MediatorHandle, View};

struct Registered {
    seq: u64,
    mapping: Rc<MediatorMapping>,
    mediator: MediatorHandle,
}

struct ViewEntry {
    view: View,
    mediators: FxHashMap<MappingId, Registered>,
}

/// A mediator removed from the registry together with what it was keyed by.
pub struct RemovedMediator {
    pub view: View,
    pub mapping: Rc<MediatorMapping>,
    pub mediator: MediatorHandle,
}

/// `view -> mapping -> mediator`, keyed by identity on both levels.
///
/// A view key is present only while it has at least one mediator.
#[derive(Default)]
pub struct MediatorRegistry {
    views: FxHashMap<InstanceKey, ViewEntry>,
    next_seq: u64,
}

impl MediatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, view: &View, mapping: &MediatorMapping) -> Option<MediatorHandle> {
        self.views
            .get(&view.key())
            .and_then(|entry| entry.mediators.get(&mapping.id()))
            .map(|registered| registered.mediator.clone())
    }

    /// Stores `mediator` for the pair, returning whatever was there before.
    pub fn insert(
        &mut self,
        view: &View,
        mapping: &Rc<MediatorMapping>,
        mediator: MediatorHandle,
    ) -> Option<MediatorHandle> {
        let seq = self.next_seq;
        self.next_seq += 1;

        let entry = self.views.entry(view.key()).or_insert_with(|| ViewEntry {
            view: view.clone(),
            mediators: FxHashMap::default(),
        });
        entry
            .mediators
            .insert(
                mapping.id(),
                Registered {
                    seq,
                    mapping: Rc::clone(mapping),
                    mediator,
                },
            )
            .map(|previous| previous.mediator)
    }

    /// Detaches every mediator of `view`, in registration order.
    pub fn take_view(&mut self, view: &View) -> Vec<RemovedMediator> {
        let Some(entry) = self.views.remove(&view.key()) else {
            return Vec::new();
        };

        let mut registered: Vec<Registered> = entry.mediators.into_values().collect();
        registered.sort_by_key(|r| r.seq);
        registered
            .into_iter()
            .map(|r| RemovedMediator {
                view: entry.view.clone(),
                mapping: r.mapping,
                mediator: r.mediator,
            })
            .collect()
    }

    pub fn views(&self) -> Vec<View> {
        let mut entries: Vec<(u64, &View)> = self
            .views
            .values()
            .map(|entry| {
                let first = entry.mediators.values().map(|r| r.seq).min().unwrap_or(0);
                (first, &entry.view)
            })
            .collect();
        entries.sort_by_key(|(first, _)| *first);
        entries.into_iter().map(|(_, view)| view.clone()).collect()
    }

    pub fn contains_view(&self, view: &View) -> bool {
        self.views.contains_key(&view.key())
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    pub fn mediator_count(&self) -> usize {
        self.views.values().map(|entry| entry.mediators.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mediation/registry.rs"]
mod tests;
