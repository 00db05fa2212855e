use super::*;
use crate::core::injector::{Injectable, Injector, Result};
use crate::mediation::mapping::{MediatorType, TypeFilter};

struct Panel;
struct Noop;

impl Injectable for Noop {
    fn construct(_: &Injector) -> Result<Self> {
        Ok(Noop)
    }
}

fn mapping() -> Rc<MediatorMapping> {
    Rc::new(MediatorMapping::new(TypeFilter::new(), MediatorType::of::<Noop>()))
}

fn mediator() -> MediatorHandle {
    MediatorType::of::<Noop>().instantiate(&Injector::new()).unwrap()
}

#[test]
fn lookup_is_per_view_and_mapping() {
    let mut registry = MediatorRegistry::new();
    let (v1, v2) = (View::new(Rc::new(Panel)), View::new(Rc::new(Panel)));
    let (m1, m2) = (mapping(), mapping());
    let mediator = mediator();

    assert!(registry.insert(&v1, &m1, mediator.clone()).is_none());

    assert!(registry.get(&v1, &m1).unwrap().ptr_eq(&mediator));
    assert!(registry.get(&v1, &m2).is_none());
    assert!(registry.get(&v2, &m1).is_none());
    assert_eq!(registry.mediator_count(), 1);
}

#[test]
fn take_view_returns_registration_order_and_drops_entry() {
    let mut registry = MediatorRegistry::new();
    let view = View::new(Rc::new(Panel));
    let mappings = [mapping(), mapping(), mapping()];
    for m in &mappings {
        registry.insert(&view, m, mediator());
    }

    let removed = registry.take_view(&view);
    let ids: Vec<MappingId> = removed.iter().map(|r| r.mapping.id()).collect();
    let expected: Vec<MappingId> = mappings.iter().map(|m| m.id()).collect();
    assert_eq!(ids, expected);
    assert!(removed.iter().all(|r| r.view.ptr_eq(&view)));

    assert!(!registry.contains_view(&view));
    assert!(registry.is_empty());
    assert!(registry.take_view(&view).is_empty());
}

#[test]
fn views_snapshot_in_first_registration_order() {
    let mut registry = MediatorRegistry::new();
    let (a, b) = (View::new(Rc::new(Panel)), View::new(Rc::new(Panel)));
    registry.insert(&b, &mapping(), mediator());
    registry.insert(&a, &mapping(), mediator());
    registry.insert(&b, &mapping(), mediator());

    let views = registry.views();
    assert_eq!(views.len(), 2);
    assert!(views[0].ptr_eq(&b));
    assert!(views[1].ptr_eq(&a));
    assert_eq!(registry.view_count(), 2);
    assert_eq!(registry.mediator_count(), 3);
}
