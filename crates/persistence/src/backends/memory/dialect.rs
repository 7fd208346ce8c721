//! Conditions compiled into in-process predicates.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use tessera_model::{Entity, Scalar, Value};

use crate::core::{BackendKind, CompareOp, Dialect, LikePattern, NegationStrategy};
use crate::error::{TranslationError, TranslationResult};

/// A compiled condition.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&Entity) -> bool + Send + Sync>);

impl Predicate {
    fn new(f: impl Fn(&Entity) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Evaluates the predicate against an entity.
    pub fn matches(&self, entity: &Entity) -> bool {
        (self.0)(entity)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}

/// Orders two values.
///
/// Numbers compare across `Int`, `Float` and `Decimal`; other scalars only
/// compare within their own kind. Sequences compare element-wise,
/// structures only for equality. Incomparable values yield `None`.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Scalar(a), Value::Scalar(b)) => compare_scalars(a, b),
        (Value::Sequence(a), Value::Sequence(b)) => {
            for (x, y) in a.iter().zip(b.iter()) {
                match compare_values(x, y)? {
                    Ordering::Equal => continue,
                    other => return Some(other),
                }
            }
            Some(a.len().cmp(&b.len()))
        }
        (Value::Structure(_), Value::Structure(_)) => (a == b).then_some(Ordering::Equal),
        _ => None,
    }
}

fn compare_scalars(a: &Scalar, b: &Scalar) -> Option<Ordering> {
    match (a, b) {
        (Scalar::Int(x), Scalar::Int(y)) => Some(x.cmp(y)),
        (Scalar::Float(_), _) | (_, Scalar::Float(_)) if a.is_numeric() && b.is_numeric() => {
            as_f64(a)?.partial_cmp(&as_f64(b)?)
        }
        _ if a.is_numeric() && b.is_numeric() => Some(as_decimal(a)?.cmp(&as_decimal(b)?)),
        (Scalar::Bool(x), Scalar::Bool(y)) => Some(x.cmp(y)),
        (Scalar::Text(x), Scalar::Text(y)) => Some(x.cmp(y)),
        (Scalar::Bytes(x), Scalar::Bytes(y)) => Some(x.cmp(y)),
        (Scalar::Timestamp(x), Scalar::Timestamp(y)) => Some(x.cmp(y)),
        (Scalar::Date(x), Scalar::Date(y)) => Some(x.cmp(y)),
        (Scalar::Uuid(x), Scalar::Uuid(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn as_f64(scalar: &Scalar) -> Option<f64> {
    match scalar {
        Scalar::Int(i) => Some(*i as f64),
        Scalar::Float(f) => Some(*f),
        Scalar::Decimal(d) => d.to_f64(),
        _ => None,
    }
}

fn as_decimal(scalar: &Scalar) -> Option<Decimal> {
    match scalar {
        Scalar::Int(i) => Some(Decimal::from(*i)),
        Scalar::Decimal(d) => Some(*d),
        _ => None,
    }
}

/// Orders two values for sorting. Unlike [`compare_values`] this is total.
///
/// Numbers sort by magnitude, ties broken by kind and then exact value, with
/// NaN above infinity. Other scalars sort by kind first. Sequences come after
/// scalars and structures last.
pub fn sort_order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Scalar(a), Value::Scalar(b)) => sort_scalars(a, b),
        (Value::Sequence(a), Value::Sequence(b)) => a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| sort_order(x, y))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        (Value::Structure(a), Value::Structure(b)) => a
            .iter()
            .zip(b.iter())
            .map(|((ka, va), (kb, vb))| ka.cmp(kb).then_with(|| sort_order(va, vb)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        _ => shape_rank(a).cmp(&shape_rank(b)),
    }
}

fn shape_rank(value: &Value) -> u8 {
    match value {
        Value::Scalar(_) => 0,
        Value::Sequence(_) => 1,
        Value::Structure(_) => 2,
    }
}

fn sort_scalars(a: &Scalar, b: &Scalar) -> Ordering {
    if a.is_numeric() && b.is_numeric() {
        let magnitude = |s: &Scalar| as_f64(s).unwrap_or(f64::NAN);
        return magnitude(a)
            .total_cmp(&magnitude(b))
            .then_with(|| scalar_rank(a).cmp(&scalar_rank(b)))
            .then_with(|| match (a, b) {
                (Scalar::Int(x), Scalar::Int(y)) => x.cmp(y),
                (Scalar::Float(x), Scalar::Float(y)) => x.total_cmp(y),
                (Scalar::Decimal(x), Scalar::Decimal(y)) => x.cmp(y),
                _ => Ordering::Equal,
            });
    }
    match (a, b) {
        (Scalar::Bool(x), Scalar::Bool(y)) => x.cmp(y),
        (Scalar::Text(x), Scalar::Text(y)) => x.cmp(y),
        (Scalar::Bytes(x), Scalar::Bytes(y)) => x.cmp(y),
        (Scalar::Timestamp(x), Scalar::Timestamp(y)) => x.cmp(y),
        (Scalar::Date(x), Scalar::Date(y)) => x.cmp(y),
        (Scalar::Uuid(x), Scalar::Uuid(y)) => x.cmp(y),
        _ => scalar_rank(a).cmp(&scalar_rank(b)),
    }
}

fn scalar_rank(scalar: &Scalar) -> u8 {
    match scalar {
        Scalar::Int(_) => 0,
        Scalar::Decimal(_) => 1,
        Scalar::Float(_) => 2,
        Scalar::Bool(_) => 3,
        Scalar::Text(_) => 4,
        Scalar::Bytes(_) => 5,
        Scalar::Timestamp(_) => 6,
        Scalar::Date(_) => 7,
        Scalar::Uuid(_) => 8,
    }
}

/// Applies `test` to a stored value, or to each element of a stored
/// sequence when the operand is not itself a sequence.
fn any_stored(stored: &Value, operand_is_sequence: bool, test: &dyn Fn(&Value) -> bool) -> bool {
    match stored {
        Value::Sequence(items) if !operand_is_sequence => items.iter().any(test),
        other => test(other),
    }
}

fn satisfies(op: CompareOp, ordering: Option<Ordering>) -> bool {
    match (op, ordering) {
        (_, None) => false,
        (CompareOp::Eq, Some(o)) => o == Ordering::Equal,
        (CompareOp::Gt, Some(o)) => o == Ordering::Greater,
        (CompareOp::Gte, Some(o)) => o != Ordering::Less,
        (CompareOp::Lt, Some(o)) => o == Ordering::Less,
        (CompareOp::Lte, Some(o)) => o != Ordering::Greater,
    }
}

/// Compiles conditions into closures over stored entities.
///
/// A leaf on a missing element never matches. `NOT` is native, so
/// `NOT (age = 30)` matches entities without an `age`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryDialect;

impl Dialect for MemoryDialect {
    type Filter = Predicate;

    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    fn compare(&self, field: &str, op: CompareOp, value: &Value) -> TranslationResult<Predicate> {
        let field = field.to_string();
        let operand = value.clone();
        Ok(Predicate::new(move |entity| {
            entity.find(&field).is_some_and(|element| {
                any_stored(element.value(), operand.is_sequence(), &|stored| {
                    satisfies(op, compare_values(stored, &operand))
                })
            })
        }))
    }

    fn like(&self, field: &str, pattern: &LikePattern) -> TranslationResult<Predicate> {
        let regex = Regex::new(&pattern.to_regex()).map_err(|e| {
            TranslationError::pattern(BackendKind::Memory, pattern.source(), e.to_string())
        })?;
        let field = field.to_string();
        Ok(Predicate::new(move |entity| {
            entity.find(&field).is_some_and(|element| {
                any_stored(element.value(), false, &|stored| {
                    stored.as_str().is_some_and(|text| regex.is_match(text))
                })
            })
        }))
    }

    fn in_list(&self, field: &str, values: &[Value]) -> TranslationResult<Predicate> {
        let field = field.to_string();
        let candidates = values.to_vec();
        Ok(Predicate::new(move |entity| {
            entity.find(&field).is_some_and(|element| {
                candidates.iter().any(|candidate| {
                    any_stored(element.value(), candidate.is_sequence(), &|stored| {
                        compare_values(stored, candidate) == Some(Ordering::Equal)
                    })
                })
            })
        }))
    }

    fn between(&self, field: &str, low: &Value, high: &Value) -> TranslationResult<Predicate> {
        let field = field.to_string();
        let (low, high) = (low.clone(), high.clone());
        Ok(Predicate::new(move |entity| {
            entity.find(&field).is_some_and(|element| {
                any_stored(element.value(), low.is_sequence(), &|stored| {
                    satisfies(CompareOp::Gte, compare_values(stored, &low))
                        && satisfies(CompareOp::Lte, compare_values(stored, &high))
                })
            })
        }))
    }

    fn and(&self, filters: Vec<Predicate>) -> TranslationResult<Predicate> {
        Ok(Predicate::new(move |entity| {
            filters.iter().all(|filter| filter.matches(entity))
        }))
    }

    fn or(&self, filters: Vec<Predicate>) -> TranslationResult<Predicate> {
        Ok(Predicate::new(move |entity| {
            filters.iter().any(|filter| filter.matches(entity))
        }))
    }

    fn negation(&self) -> NegationStrategy {
        NegationStrategy::Native
    }

    fn not(&self, filter: Predicate) -> TranslationResult<Predicate> {
        Ok(Predicate::new(move |entity| !filter.matches(entity)))
    }
}
