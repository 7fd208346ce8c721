//! The [`Value`] type and its coercion machinery.
//!
//! A `Value` holds exactly one datum: a [`Scalar`], an ordered sequence of
//! values, or a named structure. It has no null variant; absence is expressed
//! by not having an element at all.
//!
//! Reading a value goes through the coercion registry:
//!
//! ```
//! use std::sync::atomic::AtomicI32;
//! use tessera_model::value::Value;
//!
//! let value = Value::of(AtomicI32::new(5000)).unwrap();
//! assert_eq!(value.get::<i32>().unwrap(), 5000);
//! assert_eq!(value.get::<String>().unwrap(), "5000");
//! ```
//!
//! # Modules
//!
//! - [`scalar`] - scalar payloads and their storage kinds
//! - [`type_ref`] - target descriptors and the [`FromValue`] trait
//! - [`coercion`] - the `(stored kind, target kind)` reader registry
//! - [`raw`] - conversions from raw Rust and JSON data into values
//! - [`convert`] - flattening values into plain JSON data

pub mod coercion;
pub mod convert;
pub mod raw;
pub mod scalar;
pub mod type_ref;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

pub use coercion::Coercions;
pub use raw::IntoValue;
pub use scalar::{Scalar, ScalarKind};
pub use type_ref::{FromValue, ScalarType, TypeRef, TypeReference};

use crate::error::{CoercionError, ModelResult};

/// An immutable, coercible datum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// A single scalar.
    Scalar(Scalar),
    /// An ordered, possibly empty, sequence of values.
    Sequence(Vec<Value>),
    /// A String-keyed structure. Key order is not significant.
    Structure(BTreeMap<String, Value>),
}

impl Value {
    /// Wraps a raw representation.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NullArgument`](crate::error::ModelError::NullArgument)
    /// if `raw` is `None` or JSON `null`, and a
    /// [`CoercionError::NullElement`] if a nested element is null.
    pub fn of(raw: impl IntoValue) -> ModelResult<Value> {
        raw.into_value()
    }

    /// Creates a byte-string value.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Value {
        Value::Scalar(Scalar::Bytes(bytes.into()))
    }

    /// Creates a sequence from anything convertible into values.
    pub fn sequence<I, V>(items: I) -> Value
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Reads the value as `T` using the standard coercion registry.
    pub fn get<T: FromValue>(&self) -> Result<T, CoercionError> {
        self.get_with(coercion::standard())
    }

    /// Reads the value as the type captured by `token`.
    pub fn get_as<T: FromValue>(&self, token: &TypeReference<T>) -> Result<T, CoercionError> {
        let coerced = coercion::standard().coerce(self, &token.descriptor())?;
        T::from_value(coerced)
    }

    /// Reads the value as `T` using a caller-supplied registry.
    pub fn get_with<T: FromValue>(&self, coercions: &Coercions) -> Result<T, CoercionError> {
        let coerced = coercions.coerce(self, &T::type_ref())?;
        T::from_value(coerced)
    }

    /// Coerces the value to a runtime target descriptor.
    pub fn coerce(&self, target: &TypeRef) -> Result<Value, CoercionError> {
        coercion::standard().coerce(self, target)
    }

    /// Returns true if the value already has the shape of `target`, without
    /// any conversion. Never fails.
    pub fn is_instance_of(&self, target: &TypeRef) -> bool {
        match (target, self) {
            (TypeRef::Any, _) => true,
            (TypeRef::Scalar(scalar_type), Value::Scalar(scalar)) => {
                scalar.kind() == scalar_type.storage_kind()
                    && match (scalar, scalar_type.integer_bounds()) {
                        (Scalar::Int(i), Some((min, max))) => *i >= min && *i <= max,
                        _ => true,
                    }
            }
            (TypeRef::List(inner), Value::Sequence(items)) => {
                items.iter().all(|item| item.is_instance_of(inner))
            }
            (TypeRef::Set(inner), Value::Sequence(items)) => items
                .iter()
                .enumerate()
                .all(|(i, item)| item.is_instance_of(inner) && !items[..i].contains(item)),
            (TypeRef::Map(inner), Value::Structure(fields)) => {
                fields.values().all(|field| field.is_instance_of(inner))
            }
            _ => false,
        }
    }

    /// Shorthand for `is_instance_of(&T::type_ref())`.
    pub fn is<T: FromValue>(&self) -> bool {
        self.is_instance_of(&T::type_ref())
    }

    /// Returns a short name of the stored shape, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Scalar(scalar) => match scalar.kind() {
                ScalarKind::Bool => "bool",
                ScalarKind::Int => "int",
                ScalarKind::Float => "float",
                ScalarKind::Decimal => "decimal",
                ScalarKind::Text => "text",
                ScalarKind::Bytes => "bytes",
                ScalarKind::Timestamp => "timestamp",
                ScalarKind::Date => "date",
                ScalarKind::Uuid => "uuid",
            },
            Value::Sequence(_) => "sequence",
            Value::Structure(_) => "structure",
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Scalar(Scalar::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_structure(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Structure(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident $(as $cast:ty)?),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Scalar(Scalar::$variant(v $(as $cast)?))
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool => Bool,
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int,
    u8 => Int as i64,
    u16 => Int as i64,
    u32 => Int as i64,
    f32 => Float as f64,
    f64 => Float,
    Decimal => Decimal,
    String => Text,
    DateTime<Utc> => Timestamp,
    NaiveDate => Date,
    Uuid => Uuid,
);

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Value::Scalar(Scalar::Int(i)),
            // Beyond i64::MAX the exact value is kept as a decimal
            Err(_) => Value::Scalar(Scalar::Decimal(Decimal::from(v))),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Scalar(Scalar::Text(v.to_string()))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Value::Structure(fields)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", convert::convert(self))
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        convert::convert(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        convert::from_json(json).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use std::collections::HashMap;

    #[test]
    fn test_of_rejects_none() {
        let err = Value::of(None::<i32>).unwrap_err();
        assert!(matches!(err, ModelError::NullArgument { .. }));
    }

    #[test]
    fn test_get_is_repeatable() {
        let value = Value::of("42").unwrap();
        assert_eq!(value.get::<i64>().unwrap(), 42);
        assert_eq!(value.get::<i64>().unwrap(), 42);
        assert_eq!(value, Value::from("42"));
    }

    #[test]
    fn test_numeric_to_string() {
        assert_eq!(Value::from(5000).get::<String>().unwrap(), "5000");
        assert_eq!(Value::from(2.5).get::<String>().unwrap(), "2.5");
    }

    #[test]
    fn test_get_list_from_scalar_is_singleton() {
        let tags: Vec<String> = Value::from("a").get().unwrap();
        assert_eq!(tags, vec!["a".to_string()]);
    }

    #[test]
    fn test_get_nested_map() {
        let value = Value::of(serde_json::json!({"scores": [1, "2", 3.0]})).unwrap();
        let token = TypeReference::<HashMap<String, Vec<i32>>>::new();
        let scores = value.get_as(&token).unwrap();
        assert_eq!(scores["scores"], vec![1, 2, 3]);
    }

    #[test]
    fn test_get_with_empty_registry() {
        let value = Value::from(7);
        assert_eq!(value.get_with::<i64>(&Coercions::empty()).unwrap(), 7);
        assert!(value.get_with::<String>(&Coercions::empty()).is_err());
    }

    #[test]
    fn test_is_instance_of_never_converts() {
        let value = Value::from(300);
        assert!(value.is::<i32>());
        assert!(!value.is::<u8>());
        assert!(!value.is::<String>());
        assert!(!value.is::<Vec<i32>>());
        assert!(Value::sequence([1, 2]).is::<Vec<i64>>());
    }

    #[test]
    fn test_large_u64_is_decimal() {
        let value = Value::from(u64::MAX);
        assert_eq!(value.type_name(), "decimal");
        assert_eq!(value.get::<String>().unwrap(), u64::MAX.to_string());
    }

    #[test]
    fn test_serde_round_trip() {
        let value = Value::of(serde_json::json!({"name": "Ada", "tags": ["x"]})).unwrap();
        let json = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
