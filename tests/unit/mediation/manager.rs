use super::*;
use crate::core::injector::{Injectable, Result};
use crate::mediation::mapping::{MediatorType, TypeFilter};
use std::cell::{Cell, RefCell};

struct Panel;

#[derive(Default)]
struct LifecycleMediator {
    events: RefCell<Vec<&'static str>>,
}

impl Injectable for LifecycleMediator {
    fn construct(_: &Injector) -> Result<Self> {
        Ok(Self::default())
    }
}

impl Mediator for LifecycleMediator {
    fn initialize(&self, view: &View) {
        assert!(view.downcast::<Panel>().is_some());
        self.events.borrow_mut().push("initialize");
    }

    fn destroy(&self) {
        self.events.borrow_mut().push("destroy");
    }
}

fn mapping(auto_remove: bool) -> MediatorMapping {
    MediatorMapping::new(
        TypeFilter::new(),
        MediatorType::with_lifecycle::<LifecycleMediator>(),
    )
    .auto_remove(auto_remove)
}

fn mediator() -> MediatorHandle {
    MediatorType::with_lifecycle::<LifecycleMediator>()
        .instantiate(&Injector::new())
        .unwrap()
}

#[test]
fn drives_mediator_lifecycle() {
    let manager = DefaultMediatorManager::new();
    let view = View::new(Rc::new(Panel));
    let mapping = mapping(true);
    let mediator = mediator();

    manager.add_mediator(&mediator, &view, &mapping);
    manager.remove_mediator(&mediator, &view, &mapping);

    let inner = mediator.downcast::<LifecycleMediator>().unwrap();
    assert_eq!(*inner.events.borrow(), vec!["initialize", "destroy"]);
}

#[test]
fn tracks_views_until_last_auto_remove_mediator_is_gone() {
    let manager = DefaultMediatorManager::new();
    let view = View::new(Rc::new(Panel));
    let first = mapping(true);
    let second = mapping(true);
    let (a, b) = (mediator(), mediator());

    manager.add_mediator(&a, &view, &first);
    manager.add_mediator(&b, &view, &second);
    assert!(manager.is_tracking(&view));

    manager.remove_mediator(&a, &view, &first);
    assert!(manager.is_tracking(&view));
    manager.remove_mediator(&b, &view, &second);
    assert!(!manager.is_tracking(&view));
}

#[test]
fn removal_notice_ignores_untracked_views() {
    let manager = DefaultMediatorManager::new();
    let notified = Rc::new(Cell::new(0));
    let counter = Rc::clone(&notified);
    manager
        .view_removed()
        .subscribe(move |_| counter.set(counter.get() + 1));

    let view = View::new(Rc::new(Panel));
    let manual = mapping(false);
    manager.add_mediator(&mediator(), &view, &manual);
    assert!(!manager.notify_view_removed(&view));

    manager.add_mediator(&mediator(), &view, &mapping(true));
    assert!(manager.notify_view_removed(&view));
    assert_eq!(notified.get(), 1);
}

#[test]
fn resolves_manager_from_injector() {
    let injector = Injector::new();
    assert!(resolve_manager(&injector).is_none());

    let manager: Rc<dyn MediatorManager> = Rc::new(DefaultMediatorManager::new());
    injector.map_shared(Rc::clone(&manager));

    let resolved = resolve_manager(&injector).unwrap();
    assert!(Rc::ptr_eq(&resolved, &manager));
}

#[test]
fn unusable_manager_binding_falls_back() {
    let injector = Injector::new();
    injector
        .map(TypeKey::of::<dyn MediatorManager>())
        .to_value(Rc::new(5_u8));

    assert!(resolve_manager(&injector).is_none());
}
