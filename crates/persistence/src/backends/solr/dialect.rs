//! Lucene query strings.

use tessera_model::{Scalar, Value};

use crate::core::pattern::escape_chars;
use crate::core::{BackendKind, CompareOp, Dialect, LikePattern, NegationStrategy, PatternShape};
use crate::error::TranslationResult;

/// Characters with meaning in the standard query parser.
const SPECIAL: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\',
    '/', ' ',
];

/// Matches no document.
const MATCH_NONE: &str = "(*:* -*:*)";

/// Escapes a field name or unquoted term.
pub fn escape_term(s: &str) -> String {
    escape_chars(s, SPECIAL)
}

/// Renders a value as a query term: numbers and booleans bare, everything
/// else as a quoted phrase.
fn term(value: &Value) -> String {
    match value {
        Value::Scalar(Scalar::Int(i)) => i.to_string(),
        Value::Scalar(Scalar::Float(f)) if f.is_finite() => f.to_string(),
        Value::Scalar(Scalar::Decimal(d)) => d.to_string(),
        Value::Scalar(Scalar::Bool(b)) => b.to_string(),
        Value::Scalar(scalar) => quote(&scalar.to_text()),
        other => quote(&tessera_model::convert(other).to_string()),
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", escape_chars(s, &['"', '\\']))
}

/// Renders conditions with the standard Lucene query parser syntax.
///
/// | Condition | Query |
/// |-----------|-------|
/// | `name = "Ada"` | `name:"Ada"` |
/// | `age > 18` | `age:{18 TO *]` |
/// | `age BETWEEN 18 AND 65` | `age:[18 TO 65]` |
/// | `name LIKE "A%"` | `name:A*` |
/// | `tag IN [a, b]` | `tag:("a" OR "b")` |
/// | `NOT x` | `(*:* -x)` |
#[derive(Debug, Clone, Copy, Default)]
pub struct SolrDialect;

impl Dialect for SolrDialect {
    type Filter = String;

    fn kind(&self) -> BackendKind {
        BackendKind::Solr
    }

    fn compare(&self, field: &str, op: CompareOp, value: &Value) -> TranslationResult<String> {
        let field = escape_term(field);
        let value = term(value);
        let query = match op {
            CompareOp::Eq => format!("{}:{}", field, value),
            CompareOp::Gt => format!("{}:{{{} TO *]", field, value),
            CompareOp::Gte => format!("{}:[{} TO *]", field, value),
            CompareOp::Lt => format!("{}:[* TO {}}}", field, value),
            CompareOp::Lte => format!("{}:[* TO {}]", field, value),
        };
        Ok(query)
    }

    fn like(&self, field: &str, pattern: &LikePattern) -> TranslationResult<String> {
        match pattern.shape() {
            PatternShape::Exact(literal) => self.compare(field, CompareOp::Eq, &Value::from(literal)),
            _ => Ok(format!(
                "{}:{}",
                escape_term(field),
                pattern.to_wildcard(escape_term)
            )),
        }
    }

    fn in_list(&self, field: &str, values: &[Value]) -> TranslationResult<String> {
        if values.is_empty() {
            return Ok(MATCH_NONE.to_string());
        }
        let terms: Vec<String> = values.iter().map(term).collect();
        Ok(format!("{}:({})", escape_term(field), terms.join(" OR ")))
    }

    fn between(&self, field: &str, low: &Value, high: &Value) -> TranslationResult<String> {
        Ok(format!("{}:[{} TO {}]", escape_term(field), term(low), term(high)))
    }

    fn and(&self, filters: Vec<String>) -> TranslationResult<String> {
        Ok(format!("({})", filters.join(" AND ")))
    }

    fn or(&self, filters: Vec<String>) -> TranslationResult<String> {
        Ok(format!("({})", filters.join(" OR ")))
    }

    fn negation(&self) -> NegationStrategy {
        NegationStrategy::Native
    }

    // A purely negative clause matches nothing unless anchored to `*:*`.
    fn not(&self, filter: String) -> TranslationResult<String> {
        Ok(format!("(*:* -{})", filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Translator;
    use tessera_model::{Condition, Element};

    #[test]
    fn test_ranges() {
        let d = SolrDialect;
        let age = Value::from(18);
        assert_eq!(d.compare("age", CompareOp::Gt, &age).unwrap(), "age:{18 TO *]");
        assert_eq!(d.compare("age", CompareOp::Gte, &age).unwrap(), "age:[18 TO *]");
        assert_eq!(d.compare("age", CompareOp::Lt, &age).unwrap(), "age:[* TO 18}");
        assert_eq!(d.compare("age", CompareOp::Lte, &age).unwrap(), "age:[* TO 18]");
    }

    #[test]
    fn test_text_is_quoted_and_escaped() {
        let query = SolrDialect
            .compare("title", CompareOp::Eq, &Value::from("say \"hi\""))
            .unwrap();
        assert_eq!(query, r#"title:"say \"hi\"""#);
    }

    #[test]
    fn test_like_escapes_literals() {
        let query = SolrDialect
            .like("path", &LikePattern::parse("/usr/%"))
            .unwrap();
        assert_eq!(query, r"path:\/usr\/*");
    }

    #[test]
    fn test_in_list() {
        let d = SolrDialect;
        assert_eq!(
            d.in_list("tag", &[Value::from("a"), Value::from("b")]).unwrap(),
            r#"tag:("a" OR "b")"#
        );
        assert_eq!(d.in_list("tag", &[]).unwrap(), "(*:* -*:*)");
    }

    #[test]
    fn test_negated_compound() {
        let condition = Condition::or([
            Condition::eq(Element::new("a", 1).unwrap()),
            Condition::eq(Element::new("b", 2).unwrap()),
        ])
        .unwrap()
        .negate();
        assert_eq!(
            Translator::new(SolrDialect).translate(&condition).unwrap(),
            "(*:* -(a:1 OR b:2))"
        );
    }
}
