//! The per-backend operator table.
//!
//! A [`Dialect`] supplies one builder per operator family. The generic
//! [`Translator`](super::Translator) owns the recursion over the condition
//! tree and calls into the dialect only to build native nodes, so a new
//! backend only describes how its leaves and combinators look.
//!
//! Every method is required. A dialect that cannot express an operator must
//! return [`TranslationError::UnsupportedCondition`](crate::error::TranslationError::UnsupportedCondition)
//! from that method; there is no default that silently drops a condition.

use std::fmt;

use tessera_model::{Comparator, ConditionOperator, Value};

use super::backend::BackendKind;
use super::pattern::LikePattern;
use crate::error::TranslationResult;

/// Scalar comparison operators passed to [`Dialect::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// Maps a leaf comparator to a scalar comparison, if it is one.
    pub fn from_comparator(comparator: Comparator) -> Option<Self> {
        match comparator {
            Comparator::Equals => Some(CompareOp::Eq),
            Comparator::GreaterThan => Some(CompareOp::Gt),
            Comparator::GreaterEqualsThan => Some(CompareOp::Gte),
            Comparator::LesserThan => Some(CompareOp::Lt),
            Comparator::LesserEqualsThan => Some(CompareOp::Lte),
            Comparator::Like | Comparator::In | Comparator::Between => None,
        }
    }

    /// The condition operator this comparison came from.
    pub fn operator(&self) -> ConditionOperator {
        match self {
            CompareOp::Eq => ConditionOperator::Equals,
            CompareOp::Gt => ConditionOperator::GreaterThan,
            CompareOp::Gte => ConditionOperator::GreaterEqualsThan,
            CompareOp::Lt => ConditionOperator::LesserThan,
            CompareOp::Lte => ConditionOperator::LesserEqualsThan,
        }
    }

    /// The infix symbol used by SQL-like languages.
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// How a dialect handles `NOT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegationStrategy {
    /// The dialect wraps the translated child with [`Dialect::not`].
    Native,
    /// The translator rewrites the child into its complement before
    /// translating it; [`Dialect::not`] is never called.
    Complement,
}

/// A backend's operator table.
pub trait Dialect: Send + Sync {
    /// The native filter node produced by this dialect.
    type Filter: Send;

    /// Returns the backend this dialect renders for.
    fn kind(&self) -> BackendKind;

    /// `field <op> value`
    fn compare(&self, field: &str, op: CompareOp, value: &Value)
    -> TranslationResult<Self::Filter>;

    /// `field LIKE pattern`
    fn like(&self, field: &str, pattern: &LikePattern) -> TranslationResult<Self::Filter>;

    /// `field IN values`. `values` keeps the order the caller gave.
    fn in_list(&self, field: &str, values: &[Value]) -> TranslationResult<Self::Filter>;

    /// `low <= field <= high`
    fn between(&self, field: &str, low: &Value, high: &Value)
    -> TranslationResult<Self::Filter>;

    /// Conjunction of one or more filters, in order.
    fn and(&self, filters: Vec<Self::Filter>) -> TranslationResult<Self::Filter>;

    /// Disjunction of one or more filters, in order.
    fn or(&self, filters: Vec<Self::Filter>) -> TranslationResult<Self::Filter>;

    /// How this dialect negates.
    fn negation(&self) -> NegationStrategy;

    /// Native negation of a translated filter.
    fn not(&self, filter: Self::Filter) -> TranslationResult<Self::Filter>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_op_mapping() {
        assert_eq!(
            CompareOp::from_comparator(Comparator::GreaterEqualsThan),
            Some(CompareOp::Gte)
        );
        assert_eq!(CompareOp::from_comparator(Comparator::Like), None);
        assert_eq!(CompareOp::Lte.to_string(), "<=");
        assert_eq!(CompareOp::Gt.operator(), ConditionOperator::GreaterThan);
    }
}
