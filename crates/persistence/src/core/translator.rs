//! The generic condition interpreter.

use tracing::debug;

use tessera_model::value::convert::to_list;
use tessera_model::{Comparator, Condition, ConditionOperator, ModelError};

use super::dialect::{CompareOp, Dialect, NegationStrategy};
use super::negation;
use super::pattern::LikePattern;
use crate::error::{TranslationError, TranslationResult};

/// Translates condition trees into a dialect's native filters.
///
/// The recursion is the same for every backend: leaves map onto the
/// dialect's builders, `AND`/`OR` translate their children in order and
/// combine them, and `NOT` either wraps the translated child natively or
/// translates its complement, depending on [`Dialect::negation`].
///
/// Translators hold no mutable state and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Translator<D> {
    dialect: D,
}

impl<D: Dialect> Translator<D> {
    /// Creates a translator over the given dialect.
    pub fn new(dialect: D) -> Self {
        Self { dialect }
    }

    /// Returns the dialect.
    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Translates a condition tree.
    pub fn translate(&self, condition: &Condition) -> TranslationResult<D::Filter> {
        match condition {
            Condition::Compare(comparison) => {
                let field = comparison.field();
                let value = comparison.value();
                match comparison.comparator() {
                    Comparator::Like => {
                        let text = value.as_str().ok_or_else(|| {
                            ModelError::configuration(format!(
                                "LIKE on '{}' requires a text pattern",
                                field
                            ))
                        })?;
                        self.dialect.like(field, &LikePattern::parse(text))
                    }
                    Comparator::In => self.dialect.in_list(field, &to_list(value)),
                    Comparator::Between => {
                        let (low, high) = comparison.bounds().ok_or_else(|| {
                            ModelError::configuration(format!(
                                "BETWEEN on '{}' requires a [low, high] pair",
                                field
                            ))
                        })?;
                        self.dialect.between(field, low, high)
                    }
                    comparator => {
                        let op = CompareOp::from_comparator(comparator).ok_or_else(|| {
                            TranslationError::unsupported(
                                self.dialect.kind(),
                                comparator.into(),
                                "not a scalar comparison",
                            )
                        })?;
                        self.dialect.compare(field, op, value)
                    }
                }
            }
            Condition::And(children) => {
                let filters = self.translate_all(children)?;
                self.dialect.and(filters)
            }
            Condition::Or(children) => {
                let filters = self.translate_all(children)?;
                self.dialect.or(filters)
            }
            Condition::Not(inner) => match self.dialect.negation() {
                NegationStrategy::Native => {
                    let filter = self.translate(inner)?;
                    self.dialect.not(filter)
                }
                NegationStrategy::Complement => match negation::complement(inner) {
                    Some(complement) => self.translate(&complement),
                    None => {
                        debug!(
                            backend = %self.dialect.kind(),
                            condition = %inner,
                            "Negation has no complement"
                        );
                        Err(TranslationError::unsupported(
                            self.dialect.kind(),
                            ConditionOperator::Not,
                            format!("cannot negate {} without native negation", inner),
                        ))
                    }
                },
            },
        }
    }

    fn translate_all(&self, children: &[Condition]) -> TranslationResult<Vec<D::Filter>> {
        children.iter().map(|child| self.translate(child)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BackendKind;
    use tessera_model::{Element, Value};

    /// Renders conditions as plain text, with configurable negation.
    struct TextDialect {
        negation: NegationStrategy,
    }

    impl Dialect for TextDialect {
        type Filter = String;

        fn kind(&self) -> BackendKind {
            BackendKind::Custom("text")
        }

        fn compare(&self, field: &str, op: CompareOp, value: &Value) -> TranslationResult<String> {
            Ok(format!("{} {} {}", field, op, value))
        }

        fn like(&self, field: &str, pattern: &LikePattern) -> TranslationResult<String> {
            Ok(format!("{} ~ {}", field, pattern.to_regex()))
        }

        fn in_list(&self, field: &str, values: &[Value]) -> TranslationResult<String> {
            let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            Ok(format!("{} in [{}]", field, rendered.join(",")))
        }

        fn between(&self, field: &str, low: &Value, high: &Value) -> TranslationResult<String> {
            Ok(format!("{} in {}..={}", field, low, high))
        }

        fn and(&self, filters: Vec<String>) -> TranslationResult<String> {
            Ok(format!("all({})", filters.join(", ")))
        }

        fn or(&self, filters: Vec<String>) -> TranslationResult<String> {
            Ok(format!("any({})", filters.join(", ")))
        }

        fn negation(&self) -> NegationStrategy {
            self.negation
        }

        fn not(&self, filter: String) -> TranslationResult<String> {
            match self.negation {
                NegationStrategy::Native => Ok(format!("!{}", filter)),
                NegationStrategy::Complement => panic!("not() called on a complement dialect"),
            }
        }
    }

    fn translator(negation: NegationStrategy) -> Translator<TextDialect> {
        Translator::new(TextDialect { negation })
    }

    fn age(value: i64) -> Element {
        Element::new("age", value).unwrap()
    }

    #[test]
    fn test_children_keep_order() {
        let condition = Condition::or([
            Condition::gt(age(65)),
            Condition::lt(age(18)),
            Condition::in_list(Element::new("tag", Value::sequence(["c", "a", "b"])).unwrap()),
        ])
        .unwrap();
        assert_eq!(
            translator(NegationStrategy::Native).translate(&condition).unwrap(),
            r#"any(age > 65, age < 18, tag in ["c","a","b"])"#
        );
    }

    #[test]
    fn test_in_with_scalar_is_singleton() {
        let condition = Condition::in_list(Element::new("tag", "a").unwrap());
        assert_eq!(
            translator(NegationStrategy::Native).translate(&condition).unwrap(),
            r#"tag in ["a"]"#
        );
    }

    #[test]
    fn test_native_negation_wraps_compound() {
        let condition = Condition::and([Condition::gt(age(18)), Condition::lt(age(65))])
            .unwrap()
            .negate();
        assert_eq!(
            translator(NegationStrategy::Native).translate(&condition).unwrap(),
            "!all(age > 18, age < 65)"
        );
    }

    #[test]
    fn test_complement_negation_pushes_down() {
        let condition = Condition::and([Condition::gt(age(18)), Condition::lt(age(65))])
            .unwrap()
            .negate();
        assert_eq!(
            translator(NegationStrategy::Complement).translate(&condition).unwrap(),
            "any(age <= 18, age >= 65)"
        );

        let double = Condition::eq(age(30)).negate().negate();
        assert_eq!(
            translator(NegationStrategy::Complement).translate(&double).unwrap(),
            "age = 30"
        );
    }

    #[test]
    fn test_complement_negation_rejects_equality() {
        let condition = Condition::eq(age(30)).negate();
        let err = translator(NegationStrategy::Complement)
            .translate(&condition)
            .unwrap_err();
        assert!(matches!(
            err,
            TranslationError::UnsupportedCondition {
                operator: ConditionOperator::Not,
                ..
            }
        ));
    }

    #[test]
    fn test_deep_tree() {
        let mut condition = Condition::eq(age(0));
        for depth in 1..100 {
            condition = Condition::and([condition, Condition::eq(age(depth))]).unwrap();
        }
        let rendered = translator(NegationStrategy::Native).translate(&condition).unwrap();
        assert_eq!(rendered.matches("all(").count(), 99);
    }
}
