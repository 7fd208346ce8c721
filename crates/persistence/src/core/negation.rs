//! Complement push-down for backends without native negation.
//!
//! [`complement`] rewrites `NOT c` into an equivalent condition containing no
//! `NOT` node at its root, using:
//!
//! - `NOT (a > x)` is `a <= x` (and the other range flips)
//! - `NOT (a BETWEEN x AND y)` is `a < x OR a > y`
//! - `NOT NOT c` is `c`
//! - `NOT (c1 AND c2)` is `NOT c1 OR NOT c2`, and dually for `OR`
//!
//! `EQUALS`, `LIKE` and `IN` have no complement in this algebra; for them
//! (and any compound containing them) `complement` returns `None` and the
//! translator reports the negation as unsupported.

use tessera_model::{Comparator, Condition, Element};

/// Returns the logical complement of `condition`, or `None` if it cannot be
/// expressed without a `NOT` node.
pub fn complement(condition: &Condition) -> Option<Condition> {
    match condition {
        Condition::Compare(comparison) => {
            let element = comparison.element().clone();
            match comparison.comparator() {
                Comparator::GreaterThan => Some(Condition::lte(element)),
                Comparator::GreaterEqualsThan => Some(Condition::lt(element)),
                Comparator::LesserThan => Some(Condition::gte(element)),
                Comparator::LesserEqualsThan => Some(Condition::gt(element)),
                Comparator::Between => {
                    let (low, high) = comparison.bounds()?;
                    let field = comparison.field();
                    Condition::or([
                        Condition::lt(Element::new(field, low.clone()).ok()?),
                        Condition::gt(Element::new(field, high.clone()).ok()?),
                    ])
                    .ok()
                }
                Comparator::Equals | Comparator::Like | Comparator::In => None,
            }
        }
        Condition::Not(inner) => Some((**inner).clone()),
        Condition::And(children) => children
            .iter()
            .map(complement)
            .collect::<Option<Vec<_>>>()
            .and_then(|negated| Condition::or(negated).ok()),
        Condition::Or(children) => children
            .iter()
            .map(complement)
            .collect::<Option<Vec<_>>>()
            .and_then(|negated| Condition::and(negated).ok()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_model::Value;

    fn age(value: i64) -> Element {
        Element::new("age", value).unwrap()
    }

    #[test]
    fn test_range_complements() {
        assert_eq!(complement(&Condition::gt(age(5))), Some(Condition::lte(age(5))));
        assert_eq!(complement(&Condition::gte(age(5))), Some(Condition::lt(age(5))));
        assert_eq!(complement(&Condition::lt(age(5))), Some(Condition::gte(age(5))));
        assert_eq!(complement(&Condition::lte(age(5))), Some(Condition::gt(age(5))));
    }

    #[test]
    fn test_equality_has_no_complement() {
        assert_eq!(complement(&Condition::eq(age(5))), None);
        let mixed = Condition::and([Condition::gt(age(1)), Condition::eq(age(5))]).unwrap();
        assert_eq!(complement(&mixed), None);
    }

    #[test]
    fn test_double_negation() {
        let inner = Condition::eq(age(30));
        let double = inner.negate();
        assert_eq!(complement(&double), Some(inner));
    }

    #[test]
    fn test_de_morgan() {
        let range = Condition::and([Condition::gt(age(18)), Condition::lt(age(65))]).unwrap();
        let expected = Condition::or([Condition::lte(age(18)), Condition::gte(age(65))]).unwrap();
        assert_eq!(complement(&range), Some(expected));

        let either = Condition::or([Condition::gt(age(65)), Condition::lt(age(18))]).unwrap();
        let expected = Condition::and([Condition::lte(age(65)), Condition::gte(age(18))]).unwrap();
        assert_eq!(complement(&either), Some(expected));
    }

    #[test]
    fn test_between_complement() {
        let between = Condition::between(Element::new("age", Value::sequence([18, 65])).unwrap()).unwrap();
        let expected = Condition::or([Condition::lt(age(18)), Condition::gt(age(65))]).unwrap();
        assert_eq!(complement(&between), Some(expected));
    }
}
