//! Integration tests for value coercion and flattening.
//!
//! These exercise the public `Value` API the way adapters use it: wrapping
//! raw driver output, reading it back as typed data, and flattening it for
//! native clients.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicI32, AtomicI64};

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use tessera_model::value::convert::to_list;
use tessera_model::{
    CoercionError, ModelError, TypeRef, TypeReference, Value, convert, convert_to_list,
};

// ============================================================================
// Coercion Tests
// ============================================================================

/// Test that an atomic counter reads as both a number and its text form.
#[test]
fn test_atomic_integer_coercion() {
    let value = Value::of(AtomicI32::new(5000)).unwrap();
    assert_eq!(value.get::<i32>().unwrap(), 5000);
    assert_eq!(value.get::<String>().unwrap(), "5000");

    let wide = Value::of(&AtomicI64::new(-7)).unwrap();
    assert_eq!(wide.get::<i64>().unwrap(), -7);
}

/// Test that coercion is a pure function of the stored value and target.
#[test]
fn test_get_is_pure() {
    let samples = vec![
        Value::from("12"),
        Value::from(12),
        Value::from(12.75),
        Value::from(true),
        Value::of(json!(["1", 2, 3.5])).unwrap(),
    ];

    for value in &samples {
        let snapshot = value.clone();
        let first = value.get::<String>().ok();
        let second = value.get::<String>().ok();
        assert_eq!(first, second);
        assert_eq!(value.get::<Vec<i64>>(), value.get::<Vec<i64>>());
        assert_eq!(*value, snapshot, "coercion must not mutate the source");
    }
}

/// Test numeric widening and narrowing between numeric kinds.
#[test]
fn test_numeric_widening_and_narrowing() {
    let value = Value::from(200u8);
    assert_eq!(value.get::<i64>().unwrap(), 200);
    assert_eq!(value.get::<f64>().unwrap(), 200.0);
    assert!(matches!(
        value.get::<i8>(),
        Err(CoercionError::OutOfRange { .. })
    ));

    // Narrowing a float to an integer is only done on explicit request
    assert_eq!(Value::from(9.99).get::<i32>().unwrap(), 9);
    assert_eq!(Value::from(9.99).get::<f64>().unwrap(), 9.99);
}

/// Test that a u64 beyond i64::MAX reads back as itself.
#[test]
fn test_wide_u64_round_trip() {
    let value = Value::from(u64::MAX);
    assert_eq!(value.get::<u64>().unwrap(), u64::MAX);
    assert_eq!(value.get::<Vec<u64>>().unwrap(), vec![u64::MAX]);
    assert_eq!(Value::from("18446744073709551615").get::<u64>().unwrap(), u64::MAX);

    assert_eq!(Value::from(42u64).get::<u64>().unwrap(), 42);
    assert!(matches!(
        Value::from(u64::MAX).get::<i64>(),
        Err(CoercionError::OutOfRange { .. })
    ));
    assert!(matches!(
        Value::from(-1).get::<u64>(),
        Err(CoercionError::OutOfRange { .. })
    ));
}

/// Test string to number parsing.
#[test]
fn test_string_number_parsing() {
    assert_eq!(Value::from("-17").get::<i16>().unwrap(), -17);
    assert_eq!(Value::from("3.25").get::<f32>().unwrap(), 3.25);
    assert!(matches!(
        Value::from("3.25").get::<i32>(),
        Err(CoercionError::Parse { .. })
    ));
    assert!(matches!(
        Value::from("abc").get::<f64>(),
        Err(CoercionError::Parse { .. })
    ));
}

/// Test that unsupported pairs report a coercion error.
#[test]
fn test_unsupported_pair() {
    let err = Value::from(true).get::<Uuid>().unwrap_err();
    assert_eq!(
        err,
        CoercionError::Unsupported {
            from: "bool".to_string(),
            to: "uuid".to_string()
        }
    );
}

/// Test temporal and identifier parsing from text.
#[test]
fn test_temporal_and_uuid_from_text() {
    let ts: DateTime<Utc> = Value::from("2024-03-01T12:00:00+02:00").get().unwrap();
    assert_eq!(ts.to_rfc3339(), "2024-03-01T10:00:00+00:00");

    let date: NaiveDate = Value::from("2024-03-01").get().unwrap();
    assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

    let id = Uuid::new_v4();
    let parsed: Uuid = Value::from(id.to_string()).get().unwrap();
    assert_eq!(parsed, id);
}

/// Test structural coercion through a type reference.
#[test]
fn test_type_reference_structural_coercion() {
    let value = Value::of(json!({
        "en": ["hello", "hi"],
        "fr": "bonjour"
    }))
    .unwrap();

    let token = TypeReference::<HashMap<String, Vec<String>>>::new();
    let greetings = value.get_as(&token).unwrap();
    assert_eq!(greetings["en"], vec!["hello", "hi"]);
    assert_eq!(greetings["fr"], vec!["bonjour"]);

    let numbers = Value::of(json!(["3", 1, 2, 3])).unwrap();
    let set: BTreeSet<i32> = numbers.get().unwrap();
    assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
}

/// Test that structure-to-scalar is a shape error.
#[test]
fn test_shape_mismatch() {
    let value = Value::of(json!({"a": 1})).unwrap();
    assert!(matches!(
        value.get::<i32>(),
        Err(CoercionError::Shape { .. })
    ));
    assert!(matches!(
        value.get::<Vec<i32>>(),
        Err(CoercionError::Shape { .. })
    ));
}

/// Test that is_instance_of never errors.
#[test]
fn test_is_instance_of() {
    let value = Value::of(json!(["a", "b"])).unwrap();
    assert!(value.is_instance_of(&TypeRef::Any));
    assert!(value.is::<Vec<String>>());
    assert!(!value.is::<Vec<i32>>());
    assert!(!value.is::<String>());
    assert!(!Value::of(json!(["a", "a"])).unwrap().is::<BTreeSet<String>>());
}

// ============================================================================
// Null Handling Tests
// ============================================================================

/// Test that absent values are rejected at construction.
#[test]
fn test_null_rejection() {
    assert!(matches!(
        Value::of(None::<String>),
        Err(ModelError::NullArgument { .. })
    ));
    assert!(matches!(
        Value::of(json!(null)),
        Err(ModelError::NullArgument { .. })
    ));
    assert!(matches!(
        Value::of(json!([1, null])),
        Err(ModelError::Coercion(CoercionError::NullElement { .. }))
    ));
}

// ============================================================================
// Flattening Tests
// ============================================================================

/// Test the single/many normalization of convert_to_list.
#[test]
fn test_convert_to_list() {
    assert_eq!(convert_to_list(&Value::of("x").unwrap()), vec![json!("x")]);
    assert_eq!(
        convert_to_list(&Value::of(vec!["a", "b", "c"]).unwrap()),
        vec![json!("a"), json!("b"), json!("c")]
    );
    assert!(convert_to_list(&Value::of(Vec::<i32>::new()).unwrap()).is_empty());
    assert_eq!(to_list(&Value::from(1)), vec![Value::from(1)]);
}

/// Test recursive unwrapping into plain data.
#[test]
fn test_convert_recursive() {
    let raw = json!({"name": "Ada", "address": {"city": "London", "zip": ["N1"]}});
    let value = Value::of(raw.clone()).unwrap();
    assert_eq!(convert(&value), raw);
}
