use super::*;
use rustc_hash::FxHashSet;

trait Marker {}

struct Widget;

#[test]
fn same_type_yields_equal_keys() {
    assert_eq!(TypeKey::of::<Widget>(), TypeKey::of::<Widget>());
    assert_ne!(TypeKey::of::<Widget>(), TypeKey::of::<String>());
}

#[test]
fn trait_objects_are_valid_keys() {
    let key = TypeKey::of::<dyn Marker>();
    assert!(key.name().contains("Marker"));
    assert_ne!(key, TypeKey::of::<Widget>());
}

#[test]
fn keys_hash_by_type_id() {
    let mut set = FxHashSet::default();
    set.insert(TypeKey::of::<Widget>());
    set.insert(TypeKey::of::<Widget>());
    set.insert(TypeKey::of::<u32>());
    assert_eq!(set.len(), 2);
}

#[test]
fn display_uses_type_name() {
    let key = TypeKey::of::<Widget>();
    assert!(key.to_string().ends_with("Widget"));
}
