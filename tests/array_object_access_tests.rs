// ============================================================================
// Integration Tests for dual-access proxies
// ============================================================================
//
// Test Coverage:
// - Iteration over the backing entity
// - Read / write / isset / unset through both surfaces
// - Aliasing between the proxy and the original entity
// - Own-field shadowing on a specialized proxy
//
// ============================================================================

use fieldbag::{
    ArrayObject, BagError, Collection, DerivedArrayObject, Entity, EntityRef, FieldAccess, Key,
    Lookup, OwnFields, Value,
};
use pretty_assertions::assert_eq;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn new_c() -> EntityRef {
    Entity::with_fields("C", [("prop", "C::prop.orig")]).into_shared()
}

fn my_array_object(c: &EntityRef) -> DerivedArrayObject {
    DerivedArrayObject::new(
        Value::Object(c.clone()),
        "MyArrayObject",
        OwnFields::new().declare("prop", "MyArrayObject::prop.orig"),
    )
    .unwrap()
}

fn prop_key() -> Key {
    Key::from("prop")
}

fn iteration(ao: &impl FieldAccess) -> Vec<(Key, Value)> {
    ao.iterate().unwrap().collect::<fieldbag::Result<_>>().unwrap()
}

// ============================================================================
// PLAIN PROXY
// ============================================================================

#[test]
fn test_plain_proxy_full_access_sequence() {
    let c = new_c();
    let mut ao = ArrayObject::new(Value::Object(c.clone())).unwrap();

    // Iteration
    assert_eq!(iteration(&ao), vec![(prop_key(), Value::from("C::prop.orig"))]);

    // Read
    assert_eq!(ao.prop("prop").unwrap(), Lookup::Found(Value::from("C::prop.orig")));
    assert_eq!(
        ao.offset_get(&prop_key()).unwrap(),
        Lookup::Found(Value::from("C::prop.orig"))
    );

    // Write
    ao.set_prop("prop", Value::from("changed1")).unwrap();
    assert_eq!(c.read().unwrap().get("prop"), Some(&Value::from("changed1")));
    ao.offset_set(prop_key(), Value::from("changed2")).unwrap();
    assert_eq!(ao.prop("prop").unwrap(), Lookup::Found(Value::from("changed2")));
    assert_eq!(ao.offset_get(&prop_key()).unwrap(), Lookup::Found(Value::from("changed2")));

    // Isset
    assert!(ao.isset_prop("prop").unwrap());
    assert!(ao.offset_exists(&prop_key()).unwrap());

    // Unset
    ao.unset_prop("prop").unwrap();
    ao.offset_unset(&prop_key()).unwrap();
    assert_eq!(ao.prop("prop").unwrap().into_value_or_null(), Value::Null);
    assert_eq!(ao.offset_get(&prop_key()).unwrap(), Lookup::Absent);

    // After
    assert!(c.read().unwrap().is_empty());
    assert_eq!(ao.count().unwrap(), 0);
    assert!(iteration(&ao).is_empty());
}

#[test]
fn test_third_party_writes_are_visible_through_proxy() {
    let c = new_c();
    let ao = ArrayObject::new(Value::Object(c.clone())).unwrap();

    c.write().unwrap().set("prop", "direct");
    c.write().unwrap().set("late", 7);

    assert_eq!(ao.prop("prop").unwrap(), Lookup::Found(Value::from("direct")));
    assert_eq!(ao.offset_get(&Key::from("late")).unwrap(), Lookup::Found(Value::from(7)));
    assert_eq!(
        iteration(&ao).into_iter().map(|(k, _)| k).collect::<Vec<_>>(),
        vec![prop_key(), Key::from("late")]
    );
}

#[test]
fn test_two_proxies_over_one_entity_share_state() {
    let c = new_c();
    let mut first = ArrayObject::new(Value::Object(c.clone())).unwrap();
    let second = ArrayObject::new(Value::Object(c.clone())).unwrap();

    first.set_prop("prop", Value::from("via first")).unwrap();
    assert_eq!(
        second.offset_get(&prop_key()).unwrap(),
        Lookup::Found(Value::from("via first"))
    );
    assert!(first.backing().is_same(&Value::Object(c)));
}

#[test]
fn test_proxy_over_keyed_collection() {
    let list = Collection::from_values([10, 20]).into_shared();
    let mut ao = ArrayObject::new(Value::Array(list.clone())).unwrap();

    // "1" and 1 address the same entry in a keyed collection
    assert_eq!(ao.prop("1").unwrap(), Lookup::Found(Value::from(20)));
    assert_eq!(ao.offset_get(&Key::Int(1)).unwrap(), Lookup::Found(Value::from(20)));

    ao.offset_set(Key::from("name"), Value::from("x")).unwrap();
    ao.append(Value::from(30)).unwrap();
    assert_eq!(
        list.read().unwrap().keys(),
        vec![Key::Int(0), Key::Int(1), Key::from("name"), Key::Int(2)]
    );
}

#[test]
fn test_construction_over_scalar_fails() {
    for value in [Value::from(1), Value::from("text"), Value::Null, Value::from(1.5)] {
        assert!(matches!(ArrayObject::new(value), Err(BagError::TypeMismatch(_))));
    }
    let own = OwnFields::new().declare("prop", 1);
    assert!(DerivedArrayObject::new(Value::from(false), "MyArrayObject", own).is_err());
}

// ============================================================================
// SPECIALIZED PROXY
// ============================================================================

#[test]
fn test_specialized_proxy_full_access_sequence() {
    let c = new_c();
    let mut ao = my_array_object(&c);

    // Iteration sees only the backing
    assert_eq!(iteration(&ao), vec![(prop_key(), Value::from("C::prop.orig"))]);

    // Read: own field wins on both surfaces
    let own = Lookup::Found(Value::from("MyArrayObject::prop.orig"));
    assert_eq!(ao.prop("prop").unwrap(), own);
    assert_eq!(ao.offset_get(&prop_key()).unwrap(), own);

    // Write lands in the own slot only
    ao.set_prop("prop", Value::from("changed1")).unwrap();
    ao.offset_set(prop_key(), Value::from("changed2")).unwrap();
    assert_eq!(ao.prop("prop").unwrap(), Lookup::Found(Value::from("changed2")));
    assert_eq!(ao.offset_get(&prop_key()).unwrap(), Lookup::Found(Value::from("changed2")));
    assert_eq!(c.read().unwrap().get("prop"), Some(&Value::from("C::prop.orig")));

    // Isset
    assert!(ao.isset_prop("prop").unwrap());
    assert!(ao.offset_exists(&prop_key()).unwrap());

    // Unset never falls through to the backing
    ao.unset_prop("prop").unwrap();
    ao.offset_unset(&prop_key()).unwrap();
    assert_eq!(ao.prop("prop").unwrap(), Lookup::Absent);
    assert_eq!(ao.offset_get(&prop_key()).unwrap(), Lookup::Absent);
    assert!(!ao.isset_prop("prop").unwrap());

    // After
    assert_eq!(c.read().unwrap().get("prop"), Some(&Value::from("C::prop.orig")));
    assert_eq!(iteration(&ao), vec![(prop_key(), Value::from("C::prop.orig"))]);
}

#[test]
fn test_specialized_proxy_reflects_backing_for_undeclared_names() {
    let c = new_c();
    let mut ao = my_array_object(&c);

    c.write().unwrap().set("other", "from C");
    assert_eq!(ao.prop("other").unwrap(), Lookup::Found(Value::from("from C")));

    ao.offset_set(Key::from("other"), Value::from("from proxy")).unwrap();
    assert_eq!(c.read().unwrap().get("other"), Some(&Value::from("from proxy")));

    ao.unset_prop("other").unwrap();
    assert!(!c.read().unwrap().has("other"));
    assert!(!ao.offset_exists(&Key::from("other")).unwrap());
}

#[test]
fn test_iteration_restarts_from_current_order() {
    let c = new_c();
    let ao = ArrayObject::new(Value::Object(c.clone())).unwrap();
    let mut iter = ao.iterate().unwrap();
    assert_eq!(iter.next().map(|field| field.unwrap().0), Some(prop_key()));
    assert!(iter.next().is_none());

    c.write().unwrap().set("second", 2);
    iter.rewind().unwrap();
    assert_eq!(iter.count(), 2);
}

#[test]
fn test_iteration_under_conflicting_borrow_reports_errors() {
    let c = Entity::with_fields("C", [("a", 1), ("b", 2)]).into_shared();
    let ao = ArrayObject::new(Value::Object(c.clone())).unwrap();
    let iter = ao.iterate().unwrap();

    let guard = c.write().unwrap();
    let fields: Vec<fieldbag::Result<(Key, Value)>> = iter.collect();
    assert_eq!(fields.len(), 2);
    assert!(fields.iter().all(|f| matches!(f, Err(BagError::BorrowConflict(_)))));
    assert!(matches!(ao.iterate(), Err(BagError::BorrowConflict(_))));
    drop(guard);

    assert_eq!(iteration(&ao).len(), 2);
}
