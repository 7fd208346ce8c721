//! Scalar payloads stored inside a [`Value`](super::Value).

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A single scalar datum.
///
/// Integers of every width are stored as `Int`; `u64` values that do not fit
/// are stored as `Decimal`. Floats compare with `total_cmp` so that `Scalar`
/// can be `Eq` and `Hash` (`NaN` equals itself, `-0.0` differs from `0.0`).
#[derive(Debug, Clone)]
pub enum Scalar {
    /// Boolean value.
    Bool(bool),
    /// Signed 64-bit integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// Exact decimal number.
    Decimal(Decimal),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Instant in UTC.
    Timestamp(DateTime<Utc>),
    /// Calendar date without time zone.
    Date(NaiveDate),
    /// UUID.
    Uuid(Uuid),
}

/// The storage kind of a [`Scalar`], used as the key of the coercion registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
    Decimal,
    Text,
    Bytes,
    Timestamp,
    Date,
    Uuid,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::Decimal => "decimal",
            ScalarKind::Text => "text",
            ScalarKind::Bytes => "bytes",
            ScalarKind::Timestamp => "timestamp",
            ScalarKind::Date => "date",
            ScalarKind::Uuid => "uuid",
        };
        write!(f, "{}", name)
    }
}

impl Scalar {
    /// Returns the storage kind of this scalar.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::Int(_) => ScalarKind::Int,
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::Decimal(_) => ScalarKind::Decimal,
            Scalar::Text(_) => ScalarKind::Text,
            Scalar::Bytes(_) => ScalarKind::Bytes,
            Scalar::Timestamp(_) => ScalarKind::Timestamp,
            Scalar::Date(_) => ScalarKind::Date,
            Scalar::Uuid(_) => ScalarKind::Uuid,
        }
    }

    /// Returns true for `Int`, `Float` and `Decimal`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Int(_) | Scalar::Float(_) | Scalar::Decimal(_))
    }

    /// Renders the scalar as text, the same way `get::<String>()` does.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(v) => v.to_string(),
            Scalar::Decimal(d) => d.normalize().to_string(),
            Scalar::Text(s) => s.clone(),
            Scalar::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Scalar::Timestamp(ts) => ts.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Scalar::Date(date) => date.format("%Y-%m-%d").to_string(),
            Scalar::Uuid(uuid) => uuid.hyphenated().to_string(),
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => a.total_cmp(b) == Ordering::Equal,
            (Scalar::Decimal(a), Scalar::Decimal(b)) => a == b,
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            (Scalar::Bytes(a), Scalar::Bytes(b)) => a == b,
            (Scalar::Timestamp(a), Scalar::Timestamp(b)) => a == b,
            (Scalar::Date(a), Scalar::Date(b)) => a == b,
            (Scalar::Uuid(a), Scalar::Uuid(b)) => a == b,
            // Different kinds are never equal
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Scalar::Bool(b) => b.hash(state),
            Scalar::Int(i) => i.hash(state),
            Scalar::Float(v) => v.to_bits().hash(state),
            Scalar::Decimal(d) => d.hash(state),
            Scalar::Text(s) => s.hash(state),
            Scalar::Bytes(bytes) => bytes.hash(state),
            Scalar::Timestamp(ts) => ts.hash(state),
            Scalar::Date(date) => date.hash(state),
            Scalar::Uuid(uuid) => uuid.hash(state),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => write!(f, "{:?}", s),
            Scalar::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
            other => write!(f, "{}", other.to_text()),
        }
    }
}
