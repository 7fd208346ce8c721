//! The coercion registry.
//!
//! Scalar conversions are registered as plain functions keyed by
//! `(stored kind, target storage kind)` and resolved once, when the registry
//! is built. Structural coercion (lists, sets, maps) is driven by the
//! [`TypeRef`] and applies the scalar readers element-wise.
//!
//! # Standard conversions
//!
//! | From | To |
//! |------|----|
//! | bool | int (0/1), text |
//! | int | bool (non-zero), float (exact below 2^53), decimal, text, timestamp (epoch millis) |
//! | float | int (truncating, explicit narrowing only), decimal, text |
//! | decimal | int (truncating), float, text |
//! | text | bool, int, float, decimal, bytes (UTF-8), timestamp (RFC 3339 or date), date, uuid |
//! | bytes | text (valid UTF-8 only) |
//! | timestamp | int (epoch millis), text, date |
//! | date | text, timestamp (midnight UTC) |
//! | uuid | text, bytes |

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use tracing::trace;
use uuid::Uuid;

use super::Value;
use super::scalar::{Scalar, ScalarKind};
use super::type_ref::{ScalarType, TypeRef};
use crate::error::CoercionError;

/// Largest integer magnitude a `f64` represents exactly.
const F64_SAFE_I64: i64 = 1i64 << 53;

/// A scalar reader: converts a scalar of one kind into another kind.
pub type CoerceFn = fn(&Scalar) -> Result<Scalar, CoercionError>;

static STANDARD: LazyLock<Coercions> = LazyLock::new(Coercions::standard);

/// Returns the process-wide standard registry.
///
/// The registry is immutable once built; callers that need a different
/// conversion table build their own [`Coercions`] and pass it to
/// [`Value::get_with`].
pub fn standard() -> &'static Coercions {
    &STANDARD
}

/// A table of scalar readers keyed by `(from, to)` storage kinds.
#[derive(Debug, Clone, Default)]
pub struct Coercions {
    readers: HashMap<(ScalarKind, ScalarKind), CoerceFn>,
}

impl Coercions {
    /// Creates a registry with no conversions (pass-through only).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry with the standard conversion table.
    pub fn standard() -> Self {
        use ScalarKind::*;

        Self::empty()
            .register(Bool, Int, bool_to_int)
            .register(Bool, Text, to_text)
            .register(Int, Bool, int_to_bool)
            .register(Int, Float, int_to_float)
            .register(Int, Decimal, int_to_decimal)
            .register(Int, Text, to_text)
            .register(Int, Timestamp, int_to_timestamp)
            .register(Float, Int, float_to_int)
            .register(Float, Decimal, float_to_decimal)
            .register(Float, Text, to_text)
            .register(Decimal, Int, decimal_to_int)
            .register(Decimal, Float, decimal_to_float)
            .register(Decimal, Text, to_text)
            .register(Text, Bool, text_to_bool)
            .register(Text, Int, text_to_int)
            .register(Text, Float, text_to_float)
            .register(Text, Decimal, text_to_decimal)
            .register(Text, Bytes, text_to_bytes)
            .register(Text, Timestamp, text_to_timestamp)
            .register(Text, Date, text_to_date)
            .register(Text, Uuid, text_to_uuid)
            .register(Bytes, Text, bytes_to_text)
            .register(Timestamp, Int, timestamp_to_int)
            .register(Timestamp, Text, to_text)
            .register(Timestamp, Date, timestamp_to_date)
            .register(Date, Text, to_text)
            .register(Date, Timestamp, date_to_timestamp)
            .register(Uuid, Text, to_text)
            .register(Uuid, Bytes, uuid_to_bytes)
    }

    /// Registers (or replaces) the reader for a `(from, to)` pair.
    pub fn register(mut self, from: ScalarKind, to: ScalarKind, reader: CoerceFn) -> Self {
        self.readers.insert((from, to), reader);
        self
    }

    /// Returns true if a scalar of kind `from` can be read as kind `to`.
    pub fn supports(&self, from: ScalarKind, to: ScalarKind) -> bool {
        from == to || self.readers.contains_key(&(from, to))
    }

    /// Coerces `value` to the shape described by `target`.
    pub fn coerce(&self, value: &Value, target: &TypeRef) -> Result<Value, CoercionError> {
        match (target, value) {
            (TypeRef::Any, _) => Ok(value.clone()),
            (TypeRef::Scalar(scalar_type), Value::Scalar(scalar)) => self
                .coerce_scalar(scalar, *scalar_type)
                .map(Value::Scalar),
            (TypeRef::List(inner), _) => self.coerce_items(value, inner, target, false),
            (TypeRef::Set(inner), _) => self.coerce_items(value, inner, target, true),
            (TypeRef::Map(inner), Value::Structure(fields)) => fields
                .iter()
                .map(|(key, field)| self.coerce(field, inner).map(|v| (key.clone(), v)))
                .collect::<Result<_, _>>()
                .map(Value::Structure),
            (_, other) => Err(CoercionError::Shape {
                expected: target.to_string(),
                found: other.type_name().to_string(),
            }),
        }
    }

    /// Coerces a single scalar to a scalar target type.
    pub fn coerce_scalar(
        &self,
        scalar: &Scalar,
        target: ScalarType,
    ) -> Result<Scalar, CoercionError> {
        if let Some(wide) = wide_u64(scalar, target) {
            return Ok(Scalar::Decimal(Decimal::from(wide)));
        }
        let storage = target.storage_kind();
        let converted = if scalar.kind() == storage {
            scalar.clone()
        } else {
            let Some(reader) = self.readers.get(&(scalar.kind(), storage)) else {
                trace!(from = %scalar.kind(), to = %target, "No coercion reader registered");
                return Err(CoercionError::unsupported(scalar.kind(), target));
            };
            reader(scalar)?
        };
        narrow(converted, target)
    }

    fn coerce_items(
        &self,
        value: &Value,
        inner: &TypeRef,
        target: &TypeRef,
        distinct: bool,
    ) -> Result<Value, CoercionError> {
        let items: Vec<Value> = match value {
            Value::Sequence(items) => items
                .iter()
                .map(|item| self.coerce(item, inner))
                .collect::<Result<_, _>>()?,
            // A byte string read as a list of u8 yields its bytes
            Value::Scalar(Scalar::Bytes(bytes))
                if *inner == TypeRef::Scalar(ScalarType::U8) =>
            {
                bytes
                    .iter()
                    .map(|b| Value::Scalar(Scalar::Int(i64::from(*b))))
                    .collect()
            }
            // A single scalar is read as a singleton container
            Value::Scalar(_) => vec![self.coerce(value, inner)?],
            Value::Structure(_) => {
                return Err(CoercionError::Shape {
                    expected: target.to_string(),
                    found: value.type_name().to_string(),
                });
            }
        };

        if !distinct {
            return Ok(Value::Sequence(items));
        }

        let mut unique: Vec<Value> = Vec::with_capacity(items.len());
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Ok(Value::Sequence(unique))
    }
}

/// A `u64` above `i64::MAX` has no `Int` form; it stays a decimal.
fn wide_u64(scalar: &Scalar, target: ScalarType) -> Option<u64> {
    if target != ScalarType::U64 {
        return None;
    }
    let wide = match scalar {
        Scalar::Decimal(d) => d.trunc().to_u64()?,
        Scalar::Text(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    (wide > i64::MAX as u64).then_some(wide)
}

/// Applies the range check of narrow numeric targets.
fn narrow(scalar: Scalar, target: ScalarType) -> Result<Scalar, CoercionError> {
    if let (Scalar::Int(i), Some((min, max))) = (&scalar, target.integer_bounds()) {
        if *i < min || *i > max {
            return Err(CoercionError::out_of_range(i, target));
        }
    }
    if let (Scalar::Float(v), ScalarType::F32) = (&scalar, target) {
        if v.is_finite() && v.abs() > f64::from(f32::MAX) {
            return Err(CoercionError::out_of_range(v, target));
        }
    }
    Ok(scalar)
}

fn to_text(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    Ok(Scalar::Text(scalar.to_text()))
}

fn bool_to_int(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Bool(b) => Ok(Scalar::Int(i64::from(*b))),
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Int)),
    }
}

fn int_to_bool(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Int(i) => Ok(Scalar::Bool(*i != 0)),
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Bool)),
    }
}

fn int_to_float(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Int(i) if i.abs() <= F64_SAFE_I64 => Ok(Scalar::Float(*i as f64)),
        Scalar::Int(i) => Err(CoercionError::out_of_range(i, ScalarKind::Float)),
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Float)),
    }
}

fn int_to_decimal(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Int(i) => Ok(Scalar::Decimal(Decimal::from(*i))),
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Decimal)),
    }
}

fn int_to_timestamp(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Int(millis) => Utc
            .timestamp_millis_opt(*millis)
            .single()
            .map(Scalar::Timestamp)
            .ok_or_else(|| CoercionError::out_of_range(millis, ScalarKind::Timestamp)),
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Timestamp)),
    }
}

fn float_to_int(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Float(v) => {
            let truncated = v.trunc();
            if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
                return Err(CoercionError::out_of_range(v, ScalarKind::Int));
            }
            Ok(Scalar::Int(truncated as i64))
        }
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Int)),
    }
}

fn float_to_decimal(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Float(v) => Decimal::from_f64(*v)
            .map(Scalar::Decimal)
            .ok_or_else(|| CoercionError::out_of_range(v, ScalarKind::Decimal)),
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Decimal)),
    }
}

fn decimal_to_int(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Decimal(d) => d
            .trunc()
            .to_i64()
            .map(Scalar::Int)
            .ok_or_else(|| CoercionError::out_of_range(d, ScalarKind::Int)),
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Int)),
    }
}

fn decimal_to_float(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Decimal(d) => d
            .to_f64()
            .map(Scalar::Float)
            .ok_or_else(|| CoercionError::out_of_range(d, ScalarKind::Float)),
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Float)),
    }
}

fn text_to_bool(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Scalar::Bool(true)),
            "false" => Ok(Scalar::Bool(false)),
            _ => Err(CoercionError::parse(s.as_str(), ScalarKind::Bool, "expected true or false")),
        },
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Bool)),
    }
}

fn text_to_int(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Text(s) => s
            .trim()
            .parse::<i64>()
            .map(Scalar::Int)
            .map_err(|e| CoercionError::parse(s.as_str(), ScalarKind::Int, e)),
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Int)),
    }
}

fn text_to_float(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Text(s) => s
            .trim()
            .parse::<f64>()
            .map(Scalar::Float)
            .map_err(|e| CoercionError::parse(s.as_str(), ScalarKind::Float, e)),
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Float)),
    }
}

fn text_to_decimal(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Text(s) => {
            let trimmed = s.trim();
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .map(Scalar::Decimal)
                .map_err(|e| CoercionError::parse(s.as_str(), ScalarKind::Decimal, e))
        }
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Decimal)),
    }
}

fn text_to_bytes(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Text(s) => Ok(Scalar::Bytes(s.as_bytes().to_vec())),
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Bytes)),
    }
}

fn text_to_timestamp(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Text(s) => {
            let trimmed = s.trim();
            if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
                return Ok(Scalar::Timestamp(ts.with_timezone(&Utc)));
            }
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(|date| Scalar::Timestamp(date.and_time(NaiveTime::MIN).and_utc()))
                .map_err(|e| CoercionError::parse(s.as_str(), ScalarKind::Timestamp, e))
        }
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Timestamp)),
    }
}

fn text_to_date(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Text(s) => {
            let trimmed = s.trim();
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
                return Ok(Scalar::Date(date));
            }
            DateTime::parse_from_rfc3339(trimmed)
                .map(|ts| Scalar::Date(ts.with_timezone(&Utc).date_naive()))
                .map_err(|e| CoercionError::parse(s.as_str(), ScalarKind::Date, e))
        }
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Date)),
    }
}

fn text_to_uuid(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Text(s) => Uuid::parse_str(s.trim())
            .map(Scalar::Uuid)
            .map_err(|e| CoercionError::parse(s.as_str(), ScalarKind::Uuid, e)),
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Uuid)),
    }
}

fn bytes_to_text(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Bytes(bytes) => String::from_utf8(bytes.clone())
            .map(Scalar::Text)
            .map_err(|e| {
                CoercionError::parse(format!("<{} bytes>", bytes.len()), ScalarKind::Text, e)
            }),
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Text)),
    }
}

fn timestamp_to_int(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Timestamp(ts) => Ok(Scalar::Int(ts.timestamp_millis())),
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Int)),
    }
}

fn timestamp_to_date(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Timestamp(ts) => Ok(Scalar::Date(ts.date_naive())),
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Date)),
    }
}

fn date_to_timestamp(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Date(date) => Ok(Scalar::Timestamp(date.and_time(NaiveTime::MIN).and_utc())),
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Timestamp)),
    }
}

fn uuid_to_bytes(scalar: &Scalar) -> Result<Scalar, CoercionError> {
    match scalar {
        Scalar::Uuid(uuid) => Ok(Scalar::Bytes(uuid.as_bytes().to_vec())),
        other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(i: i64) -> Scalar {
        Scalar::Int(i)
    }

    fn text(s: &str) -> Scalar {
        Scalar::Text(s.to_string())
    }

    #[test]
    fn test_pass_through_same_kind() {
        let registry = Coercions::empty();
        assert_eq!(
            registry.coerce_scalar(&int(7), ScalarType::I64).unwrap(),
            int(7)
        );
    }

    #[test]
    fn test_empty_registry_rejects_conversions() {
        let registry = Coercions::empty();
        let err = registry.coerce_scalar(&int(7), ScalarType::String).unwrap_err();
        assert_eq!(err.to_string(), "cannot coerce int to string");
    }

    #[test]
    fn test_integer_narrowing_checks_range() {
        let registry = Coercions::standard();
        assert_eq!(
            registry.coerce_scalar(&int(127), ScalarType::I8).unwrap(),
            int(127)
        );
        assert!(matches!(
            registry.coerce_scalar(&int(128), ScalarType::I8),
            Err(CoercionError::OutOfRange { .. })
        ));
        assert!(matches!(
            registry.coerce_scalar(&int(-1), ScalarType::U32),
            Err(CoercionError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_text_number_parsing() {
        let registry = Coercions::standard();
        assert_eq!(
            registry.coerce_scalar(&text(" 42 "), ScalarType::I32).unwrap(),
            int(42)
        );
        assert!(matches!(
            registry.coerce_scalar(&text("forty-two"), ScalarType::I32),
            Err(CoercionError::Parse { .. })
        ));
        assert_eq!(
            registry.coerce_scalar(&text("1e3"), ScalarType::Decimal).unwrap(),
            Scalar::Decimal(Decimal::from(1000))
        );
    }

    #[test]
    fn test_float_to_int_truncates_only_when_requested() {
        let registry = Coercions::standard();
        assert_eq!(
            registry
                .coerce_scalar(&Scalar::Float(3.9), ScalarType::I64)
                .unwrap(),
            int(3)
        );
        assert!(
            registry
                .coerce_scalar(&Scalar::Float(f64::INFINITY), ScalarType::I64)
                .is_err()
        );
    }

    #[test]
    fn test_int_to_float_rejects_inexact() {
        let registry = Coercions::standard();
        assert_eq!(
            registry.coerce_scalar(&int(10), ScalarType::F64).unwrap(),
            Scalar::Float(10.0)
        );
        assert!(
            registry
                .coerce_scalar(&int(F64_SAFE_I64 + 1), ScalarType::F64)
                .is_err()
        );
    }

    #[test]
    fn test_temporal_conversions() {
        let registry = Coercions::standard();
        let ts = registry
            .coerce_scalar(&text("2024-01-15T10:30:00Z"), ScalarType::Timestamp)
            .unwrap();
        let millis = registry.coerce_scalar(&ts, ScalarType::I64).unwrap();
        assert_eq!(millis, int(1_705_314_600_000));

        let date = registry
            .coerce_scalar(&text("2024-01-15"), ScalarType::Date)
            .unwrap();
        assert_eq!(
            registry.coerce_scalar(&date, ScalarType::String).unwrap(),
            text("2024-01-15")
        );
    }

    #[test]
    fn test_set_coercion_removes_duplicates_in_order() {
        let registry = Coercions::standard();
        let value = Value::Sequence(vec![
            Value::from("b"),
            Value::from("a"),
            Value::from("b"),
        ]);
        let set = registry
            .coerce(&value, &TypeRef::set(TypeRef::Scalar(ScalarType::String)))
            .unwrap();
        assert_eq!(
            set,
            Value::Sequence(vec![Value::from("b"), Value::from("a")])
        );
    }

    #[test]
    fn test_structure_to_scalar_is_shape_error() {
        let registry = Coercions::standard();
        let value = Value::Structure(Default::default());
        assert!(matches!(
            registry.coerce(&value, &TypeRef::Scalar(ScalarType::String)),
            Err(CoercionError::Shape { .. })
        ));
    }

    #[test]
    fn test_custom_reader_replaces_standard() {
        fn strict_bool(scalar: &Scalar) -> Result<Scalar, CoercionError> {
            match scalar {
                Scalar::Int(1) => Ok(Scalar::Bool(true)),
                Scalar::Int(0) => Ok(Scalar::Bool(false)),
                other => Err(CoercionError::unsupported(other.kind(), ScalarKind::Bool)),
            }
        }

        let registry = Coercions::standard().register(ScalarKind::Int, ScalarKind::Bool, strict_bool);
        assert!(registry.coerce_scalar(&int(2), ScalarType::Bool).is_err());
        assert_eq!(
            registry.coerce_scalar(&int(1), ScalarType::Bool).unwrap(),
            Scalar::Bool(true)
        );
    }
}
