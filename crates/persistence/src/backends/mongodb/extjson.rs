//! MongoDB Extended JSON (relaxed mode) encoding of model values.
//!
//! Scalars without a JSON counterpart use their Extended JSON wrappers:
//!
//! | Scalar | Extended JSON |
//! |--------|---------------|
//! | decimal | `{"$numberDecimal": "12.50"}` |
//! | bytes | `{"$binary": {"base64": "...", "subType": "00"}}` |
//! | uuid | `{"$binary": {"base64": "...", "subType": "04"}}` |
//! | timestamp | `{"$date": "2024-01-01T00:00:00.000Z"}` |
//! | date | `{"$date": "2024-01-01T00:00:00.000Z"}` (midnight UTC) |
//! | non-finite float | `{"$numberDouble": "NaN"}` |

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, json};
use uuid::Uuid;

use tessera_model::value::convert::convert_scalar;
use tessera_model::{CoercionError, ModelResult, Scalar, Value};

const BINARY_GENERIC: &str = "00";
const BINARY_UUID: &str = "04";

/// Encodes a value as relaxed Extended JSON.
pub fn encode(value: &Value) -> serde_json::Value {
    match value {
        Value::Scalar(scalar) => encode_scalar(scalar),
        Value::Sequence(items) => serde_json::Value::Array(items.iter().map(encode).collect()),
        Value::Structure(fields) => serde_json::Value::Object(
            fields
                .iter()
                .map(|(key, field)| (key.clone(), encode(field)))
                .collect::<Map<_, _>>(),
        ),
    }
}

fn encode_scalar(scalar: &Scalar) -> serde_json::Value {
    match scalar {
        Scalar::Float(v) if v.is_nan() => json!({ "$numberDouble": "NaN" }),
        Scalar::Float(v) if v.is_infinite() => {
            let text = if *v > 0.0 { "Infinity" } else { "-Infinity" };
            json!({ "$numberDouble": text })
        }
        Scalar::Decimal(d) => json!({ "$numberDecimal": d.to_string() }),
        Scalar::Bytes(bytes) => binary(bytes, BINARY_GENERIC),
        Scalar::Uuid(uuid) => binary(uuid.as_bytes(), BINARY_UUID),
        Scalar::Timestamp(ts) => date(ts),
        Scalar::Date(d) => date(&d.and_time(chrono::NaiveTime::MIN).and_utc()),
        other => convert_scalar(other),
    }
}

fn binary(bytes: &[u8], sub_type: &str) -> serde_json::Value {
    json!({ "$binary": { "base64": STANDARD.encode(bytes), "subType": sub_type } })
}

fn date(ts: &DateTime<Utc>) -> serde_json::Value {
    json!({ "$date": ts.to_rfc3339_opts(SecondsFormat::Millis, true) })
}

/// Decodes relaxed or canonical Extended JSON into a value.
///
/// # Errors
///
/// A `null` anywhere is a [`CoercionError::NullElement`]; a malformed wrapper
/// is a [`CoercionError::Parse`].
pub fn decode(json: serde_json::Value) -> ModelResult<Value> {
    decode_at(json, "$")
}

fn decode_at(json: serde_json::Value, path: &str) -> ModelResult<Value> {
    match json {
        serde_json::Value::Null => Err(CoercionError::NullElement {
            position: path.to_string(),
        }
        .into()),
        serde_json::Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| decode_at(item, &format!("{}[{}]", path, i)))
            .collect::<ModelResult<Vec<_>>>()
            .map(Value::Sequence),
        serde_json::Value::Object(fields) => {
            if fields.len() == 1 {
                if let Some((key, inner)) = fields.iter().next() {
                    if let Some(scalar) = decode_wrapper(key, inner)? {
                        return Ok(Value::Scalar(scalar));
                    }
                }
            }
            fields
                .into_iter()
                .map(|(key, field)| {
                    let value = decode_at(field, &format!("{}.{}", path, key))?;
                    Ok((key, value))
                })
                .collect::<ModelResult<BTreeMap<_, _>>>()
                .map(Value::Structure)
        }
        plain => tessera_model::value::convert::from_json(plain),
    }
}

fn decode_wrapper(key: &str, inner: &serde_json::Value) -> Result<Option<Scalar>, CoercionError> {
    let scalar = match (key, inner) {
        ("$date", serde_json::Value::String(s)) => Scalar::Timestamp(
            DateTime::parse_from_rfc3339(s)
                .map_err(|e| parse_error(s, "timestamp", e))?
                .with_timezone(&Utc),
        ),
        ("$date", serde_json::Value::Object(long)) => {
            let millis = match long.get("$numberLong") {
                Some(serde_json::Value::String(s)) => {
                    s.parse::<i64>().map_err(|e| parse_error(s, "timestamp", e))?
                }
                _ => return Ok(None),
            };
            let ts = Utc
                .timestamp_millis_opt(millis)
                .single()
                .ok_or_else(|| CoercionError::OutOfRange {
                    input: millis.to_string(),
                    to: "timestamp".to_string(),
                })?;
            Scalar::Timestamp(ts)
        }
        ("$numberDecimal", serde_json::Value::String(s)) => Scalar::Decimal(
            s.parse::<Decimal>()
                .map_err(|e| parse_error(s, "decimal", e))?,
        ),
        ("$numberLong" | "$numberInt", serde_json::Value::String(s)) => {
            Scalar::Int(s.parse::<i64>().map_err(|e| parse_error(s, "i64", e))?)
        }
        ("$numberDouble", serde_json::Value::String(s)) => Scalar::Float(match s.as_str() {
            "Infinity" => f64::INFINITY,
            "-Infinity" => f64::NEG_INFINITY,
            other => other.parse::<f64>().map_err(|e| parse_error(s, "f64", e))?,
        }),
        ("$oid", serde_json::Value::String(s)) => Scalar::Text(s.clone()),
        ("$uuid", serde_json::Value::String(s)) => {
            Scalar::Uuid(Uuid::parse_str(s).map_err(|e| parse_error(s, "uuid", e))?)
        }
        ("$binary", serde_json::Value::Object(binary)) => {
            let (Some(serde_json::Value::String(data)), Some(serde_json::Value::String(sub_type))) =
                (binary.get("base64"), binary.get("subType"))
            else {
                return Ok(None);
            };
            let bytes = STANDARD
                .decode(data)
                .map_err(|e| parse_error(data, "bytes", e))?;
            if sub_type == BINARY_UUID {
                Scalar::Uuid(Uuid::from_slice(&bytes).map_err(|e| parse_error(data, "uuid", e))?)
            } else {
                Scalar::Bytes(bytes)
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(scalar))
}

fn parse_error(input: &str, to: &str, err: impl ToString) -> CoercionError {
    CoercionError::Parse {
        input: input.to_string(),
        to: to.to_string(),
        message: err.to_string(),
    }
}
