//! Target type descriptors used to drive coercion.
//!
//! A [`TypeRef`] describes the fully parameterized shape a caller wants to
//! read a [`Value`] as, e.g. "list of i32" or "map of String to list of
//! String". [`TypeReference<T>`] is the typed token that produces the
//! descriptor for a Rust type at the call site.
//!
//! ```
//! use std::collections::HashMap;
//! use tessera_model::value::{TypeRef, TypeReference, Value};
//!
//! let token = TypeReference::<HashMap<String, Vec<String>>>::new();
//! assert_eq!(token.descriptor().to_string(), "map<string, list<string>>");
//!
//! let value = Value::of(serde_json::json!({"tags": ["a", "b"]})).unwrap();
//! let tags = value.get_as(&token).unwrap();
//! assert_eq!(tags["tags"], vec!["a".to_string(), "b".to_string()]);
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use uuid::Uuid;

use super::convert;
use super::scalar::{Scalar, ScalarKind};
use super::Value;
use crate::error::CoercionError;

/// Scalar target types.
///
/// Each target maps onto one storage [`ScalarKind`]; narrower numeric
/// targets add a range check on top of the storage conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Decimal,
    String,
    Bytes,
    Timestamp,
    Date,
    Uuid,
}

impl ScalarType {
    /// Returns the storage kind values of this type are held in.
    pub fn storage_kind(&self) -> ScalarKind {
        match self {
            ScalarType::Bool => ScalarKind::Bool,
            ScalarType::I8
            | ScalarType::I16
            | ScalarType::I32
            | ScalarType::I64
            | ScalarType::U8
            | ScalarType::U16
            | ScalarType::U32
            | ScalarType::U64 => ScalarKind::Int,
            ScalarType::F32 | ScalarType::F64 => ScalarKind::Float,
            ScalarType::Decimal => ScalarKind::Decimal,
            ScalarType::String => ScalarKind::Text,
            ScalarType::Bytes => ScalarKind::Bytes,
            ScalarType::Timestamp => ScalarKind::Timestamp,
            ScalarType::Date => ScalarKind::Date,
            ScalarType::Uuid => ScalarKind::Uuid,
        }
    }

    /// Returns the inclusive integer bounds for integer targets.
    pub(crate) fn integer_bounds(&self) -> Option<(i64, i64)> {
        match self {
            ScalarType::I8 => Some((i8::MIN as i64, i8::MAX as i64)),
            ScalarType::I16 => Some((i16::MIN as i64, i16::MAX as i64)),
            ScalarType::I32 => Some((i32::MIN as i64, i32::MAX as i64)),
            ScalarType::I64 => Some((i64::MIN, i64::MAX)),
            ScalarType::U8 => Some((0, u8::MAX as i64)),
            ScalarType::U16 => Some((0, u16::MAX as i64)),
            ScalarType::U32 => Some((0, u32::MAX as i64)),
            ScalarType::U64 => Some((0, i64::MAX)),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarType::Bool => "bool",
            ScalarType::I8 => "i8",
            ScalarType::I16 => "i16",
            ScalarType::I32 => "i32",
            ScalarType::I64 => "i64",
            ScalarType::U8 => "u8",
            ScalarType::U16 => "u16",
            ScalarType::U32 => "u32",
            ScalarType::U64 => "u64",
            ScalarType::F32 => "f32",
            ScalarType::F64 => "f64",
            ScalarType::Decimal => "decimal",
            ScalarType::String => "string",
            ScalarType::Bytes => "bytes",
            ScalarType::Timestamp => "timestamp",
            ScalarType::Date => "date",
            ScalarType::Uuid => "uuid",
        };
        write!(f, "{}", name)
    }
}

/// A runtime descriptor of a coercion target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Accept the stored value as-is.
    Any,
    /// A scalar of the given type.
    Scalar(ScalarType),
    /// An ordered sequence whose elements coerce to the inner type.
    List(Box<TypeRef>),
    /// A duplicate-free sequence whose elements coerce to the inner type.
    Set(Box<TypeRef>),
    /// A String-keyed structure whose values coerce to the inner type.
    Map(Box<TypeRef>),
}

impl TypeRef {
    /// Shorthand for `TypeRef::List(Box::new(inner))`.
    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    /// Shorthand for `TypeRef::Set(Box::new(inner))`.
    pub fn set(inner: TypeRef) -> Self {
        TypeRef::Set(Box::new(inner))
    }

    /// Shorthand for `TypeRef::Map(Box::new(inner))`.
    pub fn map(inner: TypeRef) -> Self {
        TypeRef::Map(Box::new(inner))
    }

    /// Returns true for list, set and map targets.
    pub fn is_container(&self) -> bool {
        matches!(self, TypeRef::List(_) | TypeRef::Set(_) | TypeRef::Map(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Any => write!(f, "any"),
            TypeRef::Scalar(scalar) => write!(f, "{}", scalar),
            TypeRef::List(inner) => write!(f, "list<{}>", inner),
            TypeRef::Set(inner) => write!(f, "set<{}>", inner),
            TypeRef::Map(inner) => write!(f, "map<string, {}>", inner),
        }
    }
}

/// A typed token carrying the [`TypeRef`] of `T`.
///
/// Construct it inline where a plain turbofish is not convenient, e.g. when
/// the target type is chosen by the caller and passed around as a value.
pub struct TypeReference<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: FromValue> TypeReference<T> {
    /// Creates the token.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// Returns the runtime descriptor of `T`.
    pub fn descriptor(&self) -> TypeRef {
        T::type_ref()
    }
}

impl<T: FromValue> Default for TypeReference<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TypeReference<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypeReference<T> {}

impl<T: FromValue> fmt::Debug for TypeReference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeReference<{}>", T::type_ref())
    }
}

/// Types that can be read out of a [`Value`].
///
/// `from_value` receives a value that has already been coerced to
/// [`FromValue::type_ref`], so implementations only unwrap the expected shape.
pub trait FromValue: Sized {
    /// The coercion target describing `Self`.
    fn type_ref() -> TypeRef;

    /// Extracts `Self` from an already-coerced value.
    fn from_value(value: Value) -> Result<Self, CoercionError>;
}

fn shape_error(expected: &TypeRef, found: &Value) -> CoercionError {
    CoercionError::Shape {
        expected: expected.to_string(),
        found: found.type_name().to_string(),
    }
}

macro_rules! impl_from_value_integer {
    ($($ty:ty => $scalar:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn type_ref() -> TypeRef {
                    TypeRef::Scalar(ScalarType::$scalar)
                }

                fn from_value(value: Value) -> Result<Self, CoercionError> {
                    match value {
                        Value::Scalar(Scalar::Int(i)) => <$ty>::try_from(i)
                            .map_err(|_| CoercionError::out_of_range(i, ScalarType::$scalar)),
                        other => Err(shape_error(&Self::type_ref(), &other)),
                    }
                }
            }
        )*
    };
}

impl_from_value_integer!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
);

impl FromValue for u64 {
    fn type_ref() -> TypeRef {
        TypeRef::Scalar(ScalarType::U64)
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Scalar(Scalar::Int(i)) => {
                u64::try_from(i).map_err(|_| CoercionError::out_of_range(i, ScalarType::U64))
            }
            Value::Scalar(Scalar::Decimal(d)) => d
                .to_u64()
                .ok_or_else(|| CoercionError::out_of_range(d, ScalarType::U64)),
            other => Err(shape_error(&Self::type_ref(), &other)),
        }
    }
}

macro_rules! impl_from_value_scalar {
    ($($ty:ty => $scalar:ident, $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn type_ref() -> TypeRef {
                    TypeRef::Scalar(ScalarType::$scalar)
                }

                fn from_value(value: Value) -> Result<Self, CoercionError> {
                    match value {
                        Value::Scalar(Scalar::$variant(v)) => Ok(v),
                        other => Err(shape_error(&Self::type_ref(), &other)),
                    }
                }
            }
        )*
    };
}

impl_from_value_scalar!(
    bool => Bool, Bool,
    f64 => F64, Float,
    Decimal => Decimal, Decimal,
    String => String, Text,
    DateTime<Utc> => Timestamp, Timestamp,
    NaiveDate => Date, Date,
    Uuid => Uuid, Uuid,
);

impl FromValue for f32 {
    fn type_ref() -> TypeRef {
        TypeRef::Scalar(ScalarType::F32)
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Scalar(Scalar::Float(v)) => Ok(v as f32),
            other => Err(shape_error(&Self::type_ref(), &other)),
        }
    }
}

impl FromValue for Value {
    fn type_ref() -> TypeRef {
        TypeRef::Any
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        Ok(value)
    }
}

impl FromValue for serde_json::Value {
    fn type_ref() -> TypeRef {
        TypeRef::Any
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        Ok(convert::convert(&value))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn type_ref() -> TypeRef {
        T::type_ref()
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        T::from_value(value).map(Some)
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn type_ref() -> TypeRef {
        TypeRef::list(T::type_ref())
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Sequence(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(shape_error(&Self::type_ref(), &other)),
        }
    }
}

impl<T: FromValue + Eq + Hash> FromValue for HashSet<T> {
    fn type_ref() -> TypeRef {
        TypeRef::set(T::type_ref())
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Sequence(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(shape_error(&Self::type_ref(), &other)),
        }
    }
}

impl<T: FromValue + Ord> FromValue for BTreeSet<T> {
    fn type_ref() -> TypeRef {
        TypeRef::set(T::type_ref())
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Sequence(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(shape_error(&Self::type_ref(), &other)),
        }
    }
}

impl<T: FromValue> FromValue for HashMap<String, T> {
    fn type_ref() -> TypeRef {
        TypeRef::map(T::type_ref())
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Structure(fields) => fields
                .into_iter()
                .map(|(key, value)| T::from_value(value).map(|v| (key, v)))
                .collect(),
            other => Err(shape_error(&Self::type_ref(), &other)),
        }
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn type_ref() -> TypeRef {
        TypeRef::map(T::type_ref())
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Structure(fields) => fields
                .into_iter()
                .map(|(key, value)| T::from_value(value).map(|v| (key, v)))
                .collect(),
            other => Err(shape_error(&Self::type_ref(), &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_display() {
        assert_eq!(TypeReference::<i32>::new().descriptor().to_string(), "i32");
        assert_eq!(
            TypeReference::<Vec<Option<String>>>::new()
                .descriptor()
                .to_string(),
            "list<string>"
        );
        assert_eq!(
            TypeReference::<BTreeMap<String, HashSet<i64>>>::new()
                .descriptor()
                .to_string(),
            "map<string, set<i64>>"
        );
    }

    #[test]
    fn test_storage_kinds() {
        assert_eq!(ScalarType::U16.storage_kind(), ScalarKind::Int);
        assert_eq!(ScalarType::F32.storage_kind(), ScalarKind::Float);
        assert_eq!(ScalarType::String.storage_kind(), ScalarKind::Text);
    }

    #[test]
    fn test_from_value_rejects_wrong_shape() {
        let err = <Vec<i32>>::from_value(Value::from(5)).unwrap_err();
        assert!(matches!(err, CoercionError::Shape { .. }));
    }

    #[test]
    fn test_integer_bounds() {
        assert_eq!(ScalarType::U8.integer_bounds(), Some((0, 255)));
        assert_eq!(ScalarType::String.integer_bounds(), None);
    }
}
