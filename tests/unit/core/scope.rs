use super::*;
use std::rc::Rc;

struct Panel;
struct Label;

fn instance<T: 'static>(value: T) -> Instance {
    Rc::new(value)
}

#[test]
fn bindings_are_removed_on_drop() {
    let injector = Injector::new();
    let view = instance(Panel);
    {
        let scope = ScopedBindings::install(
            &injector,
            [
                (TypeKey::of::<Panel>(), Rc::clone(&view)),
                (TypeKey::of::<Label>(), Rc::clone(&view)),
            ],
        );
        assert_eq!(scope.len(), 2);
        assert!(injector.satisfies_directly(TypeKey::of::<Panel>()));
        assert!(injector.satisfies_directly(TypeKey::of::<Label>()));
    }
    assert!(injector.is_empty());
}

#[test]
fn previous_binding_is_restored() {
    let injector = Injector::new();
    let key = TypeKey::of::<Panel>();
    let original = injector.map_value(Rc::new(Panel));

    {
        let _scope = ScopedBindings::install(&injector, [(key, instance(Panel))]);
        assert_ne!(injector.binding_id(key), Some(original));
    }

    assert_eq!(injector.binding_id(key), Some(original));
}

#[test]
fn nested_scopes_unwind_like_a_stack() {
    let injector = Injector::new();
    let key = TypeKey::of::<Panel>();
    let outer_view = instance(Panel);
    let inner_view = instance(Panel);

    let outer = ScopedBindings::install(&injector, [(key, Rc::clone(&outer_view))]);
    {
        let _inner = ScopedBindings::install(&injector, [(key, Rc::clone(&inner_view))]);
        let bound = injector.get_instance(key).unwrap();
        assert!(Rc::ptr_eq(&bound, &inner_view));
    }

    let bound = injector.get_instance(key).unwrap();
    assert!(Rc::ptr_eq(&bound, &outer_view));

    drop(outer);
    assert!(!injector.has_mapping(key));
}

#[test]
fn replaced_binding_is_left_alone() {
    let injector = Injector::new();
    let key = TypeKey::of::<Panel>();

    let scope = ScopedBindings::install(&injector, [(key, instance(Panel))]);
    let replacement = injector.map_value(Rc::new(Panel));
    drop(scope);

    assert_eq!(injector.binding_id(key), Some(replacement));
}

#[test]
fn bindings_are_released_during_unwinding() {
    let injector = Injector::new();
    let key = TypeKey::of::<Label>();

    let result: std::result::Result<(), &str> = (|| {
        let _scope = ScopedBindings::install(&injector, [(key, instance(Label))]);
        Err("construction failed")
    })();

    assert!(result.is_err());
    assert!(!injector.has_mapping(key));
}

#[test]
fn each_key_gets_its_own_value() {
    let injector = Injector::new();
    let panel = instance(Panel);
    let label = instance(Label);

    let _scope = ScopedBindings::install(
        &injector,
        [
            (TypeKey::of::<Panel>(), Rc::clone(&panel)),
            (TypeKey::of::<Label>(), Rc::clone(&label)),
        ],
    );

    assert!(Rc::ptr_eq(&injector.get_instance(TypeKey::of::<Panel>()).unwrap(), &panel));
    assert!(Rc::ptr_eq(&injector.get_instance(TypeKey::of::<Label>()).unwrap(), &label));
}
