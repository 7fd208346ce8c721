//! N1QL `WHERE` expressions.

use tessera_model::Value;

use super::config::CouchbaseConfig;
use crate::core::{BackendKind, CompareOp, Dialect, LikePattern, NegationStrategy};
use crate::error::TranslationResult;

/// Alias of the queried collection in every statement.
pub const ALIAS: &str = "d";

/// Quotes a N1QL identifier, doubling embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Param(Value),
}

/// An expression with its parameters kept in place, numbered only when the
/// statement is rendered so that composition never renumbers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct N1qlFragment {
    segments: Vec<Segment>,
}

impl N1qlFragment {
    fn text(mut self, text: impl Into<String>) -> Self {
        self.segments.push(Segment::Text(text.into()));
        self
    }

    fn param(mut self, value: Value) -> Self {
        self.segments.push(Segment::Param(value));
        self
    }

    fn append(mut self, other: N1qlFragment) -> Self {
        self.segments.extend(other.segments);
        self
    }

    fn join(fragments: Vec<N1qlFragment>, separator: &str) -> Self {
        let mut joined = N1qlFragment::default().text("(");
        for (i, fragment) in fragments.into_iter().enumerate() {
            if i > 0 {
                joined = joined.text(separator);
            }
            joined = joined.append(fragment);
        }
        joined.text(")")
    }

    /// Renders the expression with `$1`, `$2`, ... placeholders, numbering
    /// from `first`.
    pub fn render(self, first: usize) -> (String, Vec<Value>) {
        let mut text = String::new();
        let mut params = Vec::new();
        for segment in self.segments {
            match segment {
                Segment::Text(s) => text.push_str(&s),
                Segment::Param(value) => {
                    params.push(value);
                    text.push_str(&format!("${}", first + params.len() - 1));
                }
            }
        }
        (text, params)
    }
}

/// Renders conditions as N1QL predicates over the `d` alias.
///
/// N1QL has the full operator set, including `LIKE` with `\` escapes,
/// `BETWEEN` and `NOT`. `IN` binds the whole list as one array parameter.
#[derive(Debug, Clone, Default)]
pub struct N1qlDialect {
    config: CouchbaseConfig,
}

impl N1qlDialect {
    pub fn new(config: CouchbaseConfig) -> Self {
        Self { config }
    }

    /// The path of an entity element; the id element is the document key.
    pub fn path(&self, field: &str) -> String {
        if field == self.config.id_field {
            format!("META({}).id", ALIAS)
        } else {
            format!("{}.{}", ALIAS, quote_identifier(field))
        }
    }
}

impl Dialect for N1qlDialect {
    type Filter = N1qlFragment;

    fn kind(&self) -> BackendKind {
        BackendKind::Couchbase
    }

    fn compare(&self, field: &str, op: CompareOp, value: &Value) -> TranslationResult<N1qlFragment> {
        Ok(N1qlFragment::default()
            .text(format!("{} {} ", self.path(field), op.symbol()))
            .param(value.clone()))
    }

    fn like(&self, field: &str, pattern: &LikePattern) -> TranslationResult<N1qlFragment> {
        Ok(N1qlFragment::default()
            .text(format!("{} LIKE ", self.path(field)))
            .param(Value::from(pattern.to_sql_like())))
    }

    fn in_list(&self, field: &str, values: &[Value]) -> TranslationResult<N1qlFragment> {
        Ok(N1qlFragment::default()
            .text(format!("{} IN ", self.path(field)))
            .param(Value::Sequence(values.to_vec())))
    }

    fn between(&self, field: &str, low: &Value, high: &Value) -> TranslationResult<N1qlFragment> {
        Ok(N1qlFragment::default()
            .text(format!("{} BETWEEN ", self.path(field)))
            .param(low.clone())
            .text(" AND ")
            .param(high.clone()))
    }

    fn and(&self, filters: Vec<N1qlFragment>) -> TranslationResult<N1qlFragment> {
        Ok(N1qlFragment::join(filters, " AND "))
    }

    fn or(&self, filters: Vec<N1qlFragment>) -> TranslationResult<N1qlFragment> {
        Ok(N1qlFragment::join(filters, " OR "))
    }

    fn negation(&self) -> NegationStrategy {
        NegationStrategy::Native
    }

    fn not(&self, filter: N1qlFragment) -> TranslationResult<N1qlFragment> {
        Ok(N1qlFragment::default().text("NOT (").append(filter).text(")"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Translator;
    use tessera_model::{Condition, Element};

    fn render(condition: &Condition) -> (String, Vec<Value>) {
        Translator::new(N1qlDialect::default())
            .translate(condition)
            .unwrap()
            .render(1)
    }

    #[test]
    fn test_parameters_numbered_in_order() {
        let condition = Condition::or([
            Condition::eq(Element::new("id", "p-1").unwrap()),
            Condition::between(Element::new("age", Value::sequence([18, 65])).unwrap()).unwrap(),
        ])
        .unwrap();
        let (text, params) = render(&condition);
        assert_eq!(text, "(META(d).id = $1 OR d.`age` BETWEEN $2 AND $3)");
        assert_eq!(
            params,
            vec![Value::from("p-1"), Value::from(18), Value::from(65)]
        );
    }

    #[test]
    fn test_like_keeps_sql_syntax() {
        let condition = Condition::like(Element::new("code", r"10\%_").unwrap()).unwrap();
        let (text, params) = render(&condition);
        assert_eq!(text, "d.`code` LIKE $1");
        assert_eq!(params, vec![Value::from(r"10\%_")]);
    }

    #[test]
    fn test_in_binds_array() {
        let condition =
            Condition::in_list(Element::new("tag", Value::sequence(["a", "b"])).unwrap()).negate();
        let (text, params) = render(&condition);
        assert_eq!(text, "NOT (d.`tag` IN $1)");
        assert_eq!(params, vec![Value::sequence(["a", "b"])]);
    }
}
