use super::*;
use crate::core::injector::InjectorError;
use std::cell::Cell;

struct Flag(Cell<bool>);

impl Guard for Flag {
    fn approve(&self) -> bool {
        self.0.get()
    }
}

struct Enabled {
    enabled: bool,
}

struct RequiresEnabled {
    settings: Rc<Enabled>,
}

impl Injectable for RequiresEnabled {
    fn construct(injector: &Injector) -> Result<Self> {
        Ok(Self {
            settings: injector.get::<Enabled>()?,
        })
    }
}

impl Guard for RequiresEnabled {
    fn approve(&self) -> bool {
        self.settings.enabled
    }
}

#[test]
fn empty_list_approves() {
    let injector = Injector::new();
    assert!(approve(&injector, &[]).unwrap());
}

#[test]
fn first_rejection_short_circuits() {
    let injector = Injector::new();
    let evaluated = Rc::new(Cell::new(0));
    let counter = Rc::clone(&evaluated);

    let guards = vec![
        GuardSpec::always(),
        GuardSpec::never(),
        GuardSpec::from_fn(move |_| {
            counter.set(counter.get() + 1);
            true
        }),
    ];

    assert!(!approve(&injector, &guards).unwrap());
    assert_eq!(evaluated.get(), 0);
}

#[test]
fn instance_guard_reflects_current_state() {
    let injector = Injector::new();
    let flag = Rc::new(Flag(Cell::new(false)));
    let guards = vec![GuardSpec::instance(Rc::clone(&flag))];

    assert!(!approve(&injector, &guards).unwrap());
    flag.0.set(true);
    assert!(approve(&injector, &guards).unwrap());
}

#[test]
fn typed_guard_is_built_through_injector() {
    let injector = Injector::new();
    let guards = vec![GuardSpec::of_type::<RequiresEnabled>()];

    let err = approve(&injector, &guards).err().unwrap();
    assert!(matches!(err, InjectorError::Unmapped { .. }));

    injector.map_value(Rc::new(Enabled { enabled: true }));
    assert!(approve(&injector, &guards).unwrap());
}
