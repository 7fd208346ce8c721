//! Flattening helpers between [`Value`] and plain JSON data.
//!
//! Native clients know nothing about `Value`; adapters hand them the output
//! of [`convert`] or [`convert_to_list`]. Scalars without a JSON counterpart
//! are rendered as strings:
//!
//! | Scalar | JSON |
//! |--------|------|
//! | decimal | normalized decimal string |
//! | bytes | standard base64 string |
//! | timestamp | RFC 3339 string |
//! | date | `YYYY-MM-DD` string |
//! | uuid | hyphenated string |
//! | non-finite float | `"NaN"`, `"inf"`, `"-inf"` |

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rust_decimal::Decimal;
use serde_json::{Map, Number};

use super::Value;
use super::scalar::Scalar;
use crate::error::{CoercionError, ModelError, ModelResult};

/// Recursively unwraps a value into plain JSON data.
pub fn convert(value: &Value) -> serde_json::Value {
    match value {
        Value::Scalar(scalar) => convert_scalar(scalar),
        Value::Sequence(items) => serde_json::Value::Array(items.iter().map(convert).collect()),
        Value::Structure(fields) => serde_json::Value::Object(
            fields
                .iter()
                .map(|(key, field)| (key.clone(), convert(field)))
                .collect::<Map<_, _>>(),
        ),
    }
}

/// Converts a value into a sequence of plain JSON values.
///
/// A sequence yields its elements in order; anything else yields a singleton,
/// so callers never special-case one value versus many.
pub fn convert_to_list(value: &Value) -> Vec<serde_json::Value> {
    match value {
        Value::Sequence(items) => items.iter().map(convert).collect(),
        other => vec![convert(other)],
    }
}

/// Like [`convert_to_list`], but keeps the elements as [`Value`]s.
pub fn to_list(value: &Value) -> Vec<Value> {
    match value {
        Value::Sequence(items) => items.clone(),
        other => vec![other.clone()],
    }
}

/// Converts a single scalar into JSON.
pub fn convert_scalar(scalar: &Scalar) -> serde_json::Value {
    match scalar {
        Scalar::Bool(b) => serde_json::Value::Bool(*b),
        Scalar::Int(i) => serde_json::Value::Number((*i).into()),
        Scalar::Float(v) => Number::from_f64(*v)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| serde_json::Value::String(v.to_string())),
        Scalar::Bytes(bytes) => serde_json::Value::String(STANDARD.encode(bytes)),
        Scalar::Text(s) => serde_json::Value::String(s.clone()),
        other => serde_json::Value::String(other.to_text()),
    }
}

/// Builds a value from JSON data.
///
/// Integers that fit in `i64` become `Int`, larger unsigned integers become
/// `Decimal`, other numbers become `Float`. Strings stay text; no temporal
/// parsing is attempted.
///
/// # Errors
///
/// Top-level `null` is a [`ModelError::NullArgument`]; a nested `null` is a
/// [`CoercionError::NullElement`] naming its index or key.
pub fn from_json(json: serde_json::Value) -> ModelResult<Value> {
    match json {
        serde_json::Value::Null => Err(ModelError::null_argument("value")),
        other => from_json_at(other, "$"),
    }
}

fn from_json_at(json: serde_json::Value, path: &str) -> ModelResult<Value> {
    match json {
        serde_json::Value::Null => Err(CoercionError::NullElement {
            position: path.to_string(),
        }
        .into()),
        serde_json::Value::Bool(b) => Ok(Value::from(b)),
        serde_json::Value::Number(n) => Ok(from_number(&n)),
        serde_json::Value::String(s) => Ok(Value::from(s)),
        serde_json::Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| from_json_at(item, &format!("{}[{}]", path, i)))
            .collect::<ModelResult<Vec<_>>>()
            .map(Value::Sequence),
        serde_json::Value::Object(fields) => fields
            .into_iter()
            .map(|(key, field)| {
                let value = from_json_at(field, &format!("{}.{}", path, key))?;
                Ok((key, value))
            })
            .collect::<ModelResult<_>>()
            .map(Value::Structure),
    }
}

fn from_number(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::from(i)
    } else if let Some(u) = n.as_u64() {
        Value::Scalar(Scalar::Decimal(Decimal::from(u)))
    } else {
        Value::from(n.as_f64().unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_convert_to_list_singleton() {
        assert_eq!(convert_to_list(&Value::from(5)), vec![json!(5)]);
    }

    #[test]
    fn test_convert_to_list_keeps_order() {
        let value = Value::sequence(["a", "b", "c"]);
        assert_eq!(convert_to_list(&value), vec![json!("a"), json!("b"), json!("c")]);
    }

    #[test]
    fn test_convert_nested() {
        let value = Value::of(json!({"name": "Ada", "langs": ["en", "fr"], "age": 10})).unwrap();
        assert_eq!(
            convert(&value),
            json!({"name": "Ada", "langs": ["en", "fr"], "age": 10})
        );
    }

    #[test]
    fn test_convert_non_json_scalars() {
        assert_eq!(convert(&Value::bytes(b"hi".to_vec())), json!("aGk="));
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(convert(&Value::from(date)), json!("2024-02-29"));
        assert_eq!(convert(&Value::from(f64::NAN)), json!("NaN"));
    }

    #[test]
    fn test_from_json_nested_null_names_path() {
        let err = from_json(json!({"tags": ["a", null]})).unwrap_err();
        assert_eq!(
            err,
            ModelError::Coercion(CoercionError::NullElement {
                position: "$.tags[1]".to_string()
            })
        );
    }

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(from_json(json!(3)).unwrap(), Value::from(3));
        assert_eq!(from_json(json!(2.5)).unwrap(), Value::from(2.5));
        assert_eq!(from_json(json!(u64::MAX)).unwrap(), Value::from(u64::MAX));
    }
}
