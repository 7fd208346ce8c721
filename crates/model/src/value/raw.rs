//! Conversions from raw Rust data into [`Value`].

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicI64, AtomicU32, AtomicU64, Ordering};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::Value;
use super::convert;
use super::scalar::Scalar;
use crate::error::{CoercionError, ModelError, ModelResult};

/// Raw representations accepted by [`Value::of`].
///
/// Conversion fails with [`ModelError::NullArgument`] when the raw value is
/// absent, and with [`CoercionError::NullElement`] when an element nested
/// inside a sequence or structure is absent.
pub trait IntoValue {
    fn into_value(self) -> ModelResult<Value>;
}

impl IntoValue for Value {
    fn into_value(self) -> ModelResult<Value> {
        Ok(self)
    }
}

impl IntoValue for &Value {
    fn into_value(self) -> ModelResult<Value> {
        Ok(self.clone())
    }
}

impl IntoValue for Scalar {
    fn into_value(self) -> ModelResult<Value> {
        Ok(Value::Scalar(self))
    }
}

macro_rules! impl_into_value_via_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> ModelResult<Value> {
                    Ok(Value::from(self))
                }
            }
        )*
    };
}

impl_into_value_via_from!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    Decimal,
    String,
    &str,
    DateTime<Utc>,
    NaiveDate,
    Uuid,
);

impl IntoValue for &String {
    fn into_value(self) -> ModelResult<Value> {
        Ok(Value::from(self.as_str()))
    }
}

macro_rules! impl_into_value_atomic {
    ($($atomic:ty),* $(,)?) => {
        $(
            impl IntoValue for $atomic {
                fn into_value(self) -> ModelResult<Value> {
                    Ok(Value::from(self.into_inner()))
                }
            }

            impl IntoValue for &$atomic {
                fn into_value(self) -> ModelResult<Value> {
                    Ok(Value::from(self.load(Ordering::Acquire)))
                }
            }
        )*
    };
}

impl_into_value_atomic!(AtomicBool, AtomicI32, AtomicI64, AtomicU32, AtomicU64);

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> ModelResult<Value> {
        match self {
            Some(inner) => inner.into_value(),
            None => Err(ModelError::null_argument("value")),
        }
    }
}

/// Converts a nested element, reporting absence by position.
fn nested(raw: impl IntoValue, position: impl ToString) -> ModelResult<Value> {
    raw.into_value().map_err(|err| match err {
        ModelError::NullArgument { .. } => CoercionError::NullElement {
            position: position.to_string(),
        }
        .into(),
        other => other,
    })
}

fn sequence<T: IntoValue>(items: impl IntoIterator<Item = T>) -> ModelResult<Value> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| nested(item, i))
        .collect::<ModelResult<Vec<_>>>()
        .map(Value::Sequence)
}

fn structure<K: Into<String>, T: IntoValue>(
    fields: impl IntoIterator<Item = (K, T)>,
) -> ModelResult<Value> {
    fields
        .into_iter()
        .map(|(key, field)| {
            let key = key.into();
            nested(field, &key).map(|value| (key, value))
        })
        .collect::<ModelResult<BTreeMap<_, _>>>()
        .map(Value::Structure)
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> ModelResult<Value> {
        sequence(self)
    }
}

impl<T: IntoValue + Clone> IntoValue for &[T] {
    fn into_value(self) -> ModelResult<Value> {
        sequence(self.iter().cloned())
    }
}

impl<T: IntoValue, const N: usize> IntoValue for [T; N] {
    fn into_value(self) -> ModelResult<Value> {
        sequence(self)
    }
}

impl<T: IntoValue> IntoValue for HashSet<T> {
    fn into_value(self) -> ModelResult<Value> {
        sequence(self)
    }
}

impl<T: IntoValue> IntoValue for BTreeSet<T> {
    fn into_value(self) -> ModelResult<Value> {
        sequence(self)
    }
}

impl<K: Into<String>, T: IntoValue> IntoValue for HashMap<K, T> {
    fn into_value(self) -> ModelResult<Value> {
        structure(self)
    }
}

impl<K: Into<String>, T: IntoValue> IntoValue for BTreeMap<K, T> {
    fn into_value(self) -> ModelResult<Value> {
        structure(self)
    }
}

impl IntoValue for serde_json::Value {
    fn into_value(self) -> ModelResult<Value> {
        convert::from_json(self)
    }
}
