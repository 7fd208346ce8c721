//! CQL `WHERE` fragments.

use serde::Serialize;

use tessera_model::{ConditionOperator, Value};

use crate::core::{BackendKind, CompareOp, Dialect, LikePattern, NegationStrategy, PatternShape};
use crate::error::{TranslationError, TranslationResult};

/// A rendered CQL fragment with its positional `?` parameters, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CqlFragment {
    pub cql: String,
    pub params: Vec<Value>,
}

impl CqlFragment {
    fn new(cql: String, params: Vec<Value>) -> Self {
        Self { cql, params }
    }
}

/// Quotes a CQL identifier, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Renders conditions as CQL restrictions.
///
/// CQL has no `OR` and no `NOT`: disjunctions fail, and negations are
/// pushed down into complementary ranges before translation. LIKE is
/// limited to what SASI indexes accept: prefix, suffix and contains.
#[derive(Debug, Clone, Copy, Default)]
pub struct CqlDialect;

impl Dialect for CqlDialect {
    type Filter = CqlFragment;

    fn kind(&self) -> BackendKind {
        BackendKind::Cassandra
    }

    fn compare(&self, field: &str, op: CompareOp, value: &Value) -> TranslationResult<CqlFragment> {
        Ok(CqlFragment::new(
            format!("{} {} ?", quote_identifier(field), op.symbol()),
            vec![value.clone()],
        ))
    }

    fn like(&self, field: &str, pattern: &LikePattern) -> TranslationResult<CqlFragment> {
        let (text, rendered) = match pattern.shape() {
            PatternShape::Exact(literal) => {
                return self.compare(field, CompareOp::Eq, &Value::from(literal));
            }
            PatternShape::Prefix(s) => (s.clone(), format!("{}%", s)),
            PatternShape::Suffix(s) => (s.clone(), format!("%{}", s)),
            PatternShape::Contains(s) => (s.clone(), format!("%{}%", s)),
            PatternShape::Any => {
                return Err(TranslationError::pattern(
                    BackendKind::Cassandra,
                    pattern.source(),
                    "a match-everything pattern has no CQL restriction",
                ));
            }
            PatternShape::Complex => {
                return Err(TranslationError::pattern(
                    BackendKind::Cassandra,
                    pattern.source(),
                    "only prefix, suffix and contains patterns are supported",
                ));
            }
        };
        // SASI has no escape character
        if text.contains('%') {
            return Err(TranslationError::pattern(
                BackendKind::Cassandra,
                pattern.source(),
                "a literal '%' cannot be escaped",
            ));
        }
        Ok(CqlFragment::new(
            format!("{} LIKE ?", quote_identifier(field)),
            vec![Value::from(rendered)],
        ))
    }

    fn in_list(&self, field: &str, values: &[Value]) -> TranslationResult<CqlFragment> {
        let placeholders = vec!["?"; values.len()].join(", ");
        Ok(CqlFragment::new(
            format!("{} IN ({})", quote_identifier(field), placeholders),
            values.to_vec(),
        ))
    }

    fn between(&self, field: &str, low: &Value, high: &Value) -> TranslationResult<CqlFragment> {
        let column = quote_identifier(field);
        Ok(CqlFragment::new(
            format!("{} >= ? AND {} <= ?", column, column),
            vec![low.clone(), high.clone()],
        ))
    }

    // CQL restrictions cannot be parenthesized, so nested conjunctions flatten.
    fn and(&self, filters: Vec<CqlFragment>) -> TranslationResult<CqlFragment> {
        let mut clauses = Vec::with_capacity(filters.len());
        let mut params = Vec::new();
        for filter in filters {
            clauses.push(filter.cql);
            params.extend(filter.params);
        }
        Ok(CqlFragment::new(clauses.join(" AND "), params))
    }

    fn or(&self, _filters: Vec<CqlFragment>) -> TranslationResult<CqlFragment> {
        Err(TranslationError::unsupported(
            BackendKind::Cassandra,
            ConditionOperator::Or,
            "CQL has no disjunction",
        ))
    }

    fn negation(&self) -> NegationStrategy {
        NegationStrategy::Complement
    }

    fn not(&self, _filter: CqlFragment) -> TranslationResult<CqlFragment> {
        Err(TranslationError::unsupported(
            BackendKind::Cassandra,
            ConditionOperator::Not,
            "CQL has no negation",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Translator;
    use tessera_model::{Condition, Element};

    fn translate(condition: &Condition) -> TranslationResult<CqlFragment> {
        Translator::new(CqlDialect).translate(condition)
    }

    fn age(value: i64) -> Element {
        Element::new("age", value).unwrap()
    }

    #[test]
    fn test_conjunction_flattens_params_in_order() {
        let condition = Condition::and([
            Condition::gte(age(18)),
            Condition::in_list(Element::new("city", Value::sequence(["Oslo", "Lima"])).unwrap()),
        ])
        .unwrap();
        let fragment = translate(&condition).unwrap();
        assert_eq!(fragment.cql, "\"age\" >= ? AND \"city\" IN (?, ?)");
        assert_eq!(
            fragment.params,
            vec![Value::from(18), Value::from("Oslo"), Value::from("Lima")]
        );
    }

    #[test]
    fn test_or_is_rejected() {
        let condition = Condition::or([Condition::lt(age(18)), Condition::gt(age(65))]).unwrap();
        let err = translate(&condition).unwrap_err();
        assert!(matches!(
            err,
            TranslationError::UnsupportedCondition {
                operator: ConditionOperator::Or,
                ..
            }
        ));
    }

    #[test]
    fn test_negated_range_is_complemented() {
        let fragment = translate(&Condition::gt(age(30)).negate()).unwrap();
        assert_eq!(fragment.cql, "\"age\" <= ?");
    }

    #[test]
    fn test_negated_conjunction_needs_disjunction() {
        let condition = Condition::and([Condition::gt(age(18)), Condition::lt(age(65))])
            .unwrap()
            .negate();
        assert!(translate(&condition).is_err());
    }

    #[test]
    fn test_like_shapes() {
        let prefix = CqlDialect.like("name", &LikePattern::parse("Ad%")).unwrap();
        assert_eq!(prefix.cql, "\"name\" LIKE ?");
        assert_eq!(prefix.params, vec![Value::from("Ad%")]);

        let exact = CqlDialect.like("name", &LikePattern::parse("Ada")).unwrap();
        assert_eq!(exact.cql, "\"name\" = ?");

        let complex = CqlDialect.like("name", &LikePattern::parse("A_a"));
        assert!(matches!(
            complex,
            Err(TranslationError::UnsupportedPattern { .. })
        ));
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
