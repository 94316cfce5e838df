#![cfg(feature = "schema")]

use proptest::prelude::*;
use structcheck::schema::{
    array, check, create, date, defaulted, is, nonempty, number, object, optional, r#type,
    string, trimmed, union, validate, Schema, ValidateOptions,
};
use structcheck::value::{PathSegment, Value};

fn keys(path: &[&str]) -> Vec<PathSegment> {
    path.iter().map(|key| PathSegment::from(*key)).collect()
}

#[test]
fn open_and_closed_objects_differ_on_unknown_keys() {
    let value = Value::object([("a", Value::from("x")), ("b", Value::from(1))]);

    let open = r#type([("a", string())]);
    let output = validate(value.clone(), &open, ValidateOptions::default()).unwrap();
    assert_eq!(output.get("b"), &Value::from(1));

    let closed = object([("a", string())]);
    let err = validate(value, &closed, ValidateOptions::default()).unwrap_err();
    assert_eq!(err.failures().len(), 1);
    assert_eq!(err.kind(), "never");
    assert_eq!(err.path(), keys(&["b"]).as_slice());
}

#[test]
fn union_passes_when_any_candidate_does() {
    let schema = union([string(), number()]);
    assert!(is(&Value::from("a"), &schema));
    assert!(is(&Value::from(5), &schema));

    let err = validate(Value::Bool(true), &schema, ValidateOptions::default()).unwrap_err();
    let kinds: Vec<_> = err.failures().iter().map(|f| f.kind.as_str()).collect();
    assert_eq!(kinds, vec!["union", "string", "number"]);
    assert!(err
        .message()
        .starts_with("Expected the value to satisfy a union of `string | number`"));
}

#[test]
fn nested_failure_path_is_depth_first() {
    let schema = object([("a", object([("b", object([("c", string())]))]))]);
    let value = Value::object([(
        "a",
        Value::object([("b", Value::object([("c", 1)]))]),
    )]);

    let failures = check(value, &schema, false).unwrap_err();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures.first().path, keys(&["a", "b", "c"]));
    assert_eq!(failures.first().branch.len(), 4);
}

#[test]
fn structural_child_failure_suppresses_root_refiner() {
    let schema = nonempty(&array(number()));

    let failures = check(Value::Array(vec![Value::from("x")]), &schema, false).unwrap_err();
    assert_eq!(failures.len(), 1);
    assert!(failures.iter().all(|f| f.refinement.is_none()));

    let failures = check(Value::Array(vec![]), &schema, false).unwrap_err();
    assert_eq!(failures.first().refinement.as_deref(), Some("nonempty"));
}

#[test]
fn create_under_type_round_trips() {
    let schema = r#type([("id", string()), ("tags", array(string()))]);
    let value = Value::from(serde_json::json!({
        "id": "1",
        "tags": ["a", "b"],
        "extra": {"nested": [1, 2, null]},
    }));
    assert_eq!(create(value.clone(), &schema, None).unwrap(), value);
}

#[test]
fn validation_never_errors_on_odd_roots() {
    let schema = object([("a", string())]);
    for value in [
        Value::Undefined,
        Value::Null,
        Value::from(0),
        Value::Array(vec![]),
        Value::set([1]),
    ] {
        let err = validate(value, &schema, ValidateOptions::default()).unwrap_err();
        assert_eq!(err.failures().len(), 1);
        assert!(err.path().is_empty());
    }
}

#[test]
fn schemas_are_shared_across_threads() {
    let schema = object([("n", number())]);
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let schema = schema.clone();
            std::thread::spawn(move || is(&Value::object([("n", i)]), &schema))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

fn coercing_schemas() -> Vec<Schema> {
    vec![
        object([
            ("at", date()),
            ("name", trimmed(&string())),
            ("count", defaulted(&number(), 1)),
            ("note", optional(&string())),
        ]),
        r#type([("when", union([date(), number()]))]),
        array(trimmed(&string())),
    ]
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Undefined),
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-1.0e12f64..1.0e12).prop_map(Value::from),
        "[ a-z0-9:T-]{0,16}".prop_map(Value::from),
    ]
}

fn input() -> impl Strategy<Value = Value> {
    let field = prop_oneof![
        Just("at"),
        Just("name"),
        Just("count"),
        Just("note"),
        Just("when"),
        Just("other"),
    ];
    prop_oneof![
        prop::collection::vec((field, leaf()), 0..6).prop_map(|pairs| Value::object(pairs)),
        prop::collection::vec(leaf(), 0..4).prop_map(Value::Array),
        leaf(),
    ]
}

proptest! {
    #[test]
    fn coercion_is_idempotent(value in input()) {
        for schema in coercing_schemas() {
            let once = match check(value.clone(), &schema, true) {
                Ok(output) => output,
                Err(_) => continue,
            };
            let twice = check(once.clone(), &schema, true);
            prop_assert_eq!(twice, Ok(once));
        }
    }
}
