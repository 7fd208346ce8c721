//! The condition algebra.
//!
//! A [`Condition`] is an immutable boolean expression tree over
//! [`Element`]s. Leaves compare one element against a stored field;
//! `AND`/`OR` combine one or more children; `NOT` wraps exactly one.
//!
//! Conditions are only built through the factory functions, which validate
//! arity and operands up front:
//!
//! - `and`/`or` with no children fail with [`ModelError::Configuration`]
//! - `not(None)` fails with [`ModelError::NullArgument`]
//! - `like` requires a text pattern and `between` a `[low, high]` pair
//!
//! Subtrees are shared through [`Arc`], so cloning and negating a condition
//! never copies the tree.
//!
//! # Examples
//!
//! ```
//! use tessera_model::condition::{Condition, ConditionOperator};
//! use tessera_model::entity::Element;
//!
//! let adult = Condition::gte(Element::new("age", 18).unwrap());
//! let senior = Condition::gte(Element::new("age", 65).unwrap());
//! let working_age = Condition::and([adult, senior.negate()]).unwrap();
//!
//! assert_eq!(working_age.operator(), ConditionOperator::And);
//! assert_eq!(working_age.to_string(), "(age >= 18 AND NOT (age >= 65))");
//! ```
//!
//! # JSON form
//!
//! Conditions serialize as nested single-key objects:
//!
//! ```json
//! {"and": [
//!   {"gt": {"name": "age", "value": 18}},
//!   {"not": {"in": {"name": "status", "value": ["banned", "deleted"]}}}
//! ]}
//! ```

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::entity::Element;
use crate::error::{ModelError, ModelResult};
use crate::value::{Scalar, Value};

/// Leaf comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    Equals,
    GreaterThan,
    GreaterEqualsThan,
    LesserThan,
    LesserEqualsThan,
    Like,
    In,
    Between,
}

/// Every operator a condition node can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionOperator {
    Equals,
    GreaterThan,
    GreaterEqualsThan,
    LesserThan,
    LesserEqualsThan,
    Like,
    In,
    Between,
    And,
    Or,
    Not,
}

impl From<Comparator> for ConditionOperator {
    fn from(comparator: Comparator) -> Self {
        match comparator {
            Comparator::Equals => ConditionOperator::Equals,
            Comparator::GreaterThan => ConditionOperator::GreaterThan,
            Comparator::GreaterEqualsThan => ConditionOperator::GreaterEqualsThan,
            Comparator::LesserThan => ConditionOperator::LesserThan,
            Comparator::LesserEqualsThan => ConditionOperator::LesserEqualsThan,
            Comparator::Like => ConditionOperator::Like,
            Comparator::In => ConditionOperator::In,
            Comparator::Between => ConditionOperator::Between,
        }
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConditionOperator::Equals => "EQUALS",
            ConditionOperator::GreaterThan => "GREATER_THAN",
            ConditionOperator::GreaterEqualsThan => "GREATER_EQUALS_THAN",
            ConditionOperator::LesserThan => "LESSER_THAN",
            ConditionOperator::LesserEqualsThan => "LESSER_EQUALS_THAN",
            ConditionOperator::Like => "LIKE",
            ConditionOperator::In => "IN",
            ConditionOperator::Between => "BETWEEN",
            ConditionOperator::And => "AND",
            ConditionOperator::Or => "OR",
            ConditionOperator::Not => "NOT",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ConditionOperator::from(*self).fmt(f)
    }
}

/// A leaf: one comparator applied to one element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comparison {
    comparator: Comparator,
    element: Element,
}

impl Comparison {
    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    /// The field name being compared.
    pub fn field(&self) -> &str {
        self.element.name()
    }

    /// The operand.
    pub fn value(&self) -> &Value {
        self.element.value()
    }

    /// Returns the `[low, high]` bounds of a `BETWEEN` leaf.
    pub fn bounds(&self) -> Option<(&Value, &Value)> {
        match (self.comparator, self.element.value()) {
            (Comparator::Between, Value::Sequence(items)) if items.len() == 2 => {
                Some((&items[0], &items[1]))
            }
            _ => None,
        }
    }
}

/// The non-empty children of an `AND` or `OR` node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operands(Arc<[Condition]>);

impl Operands {
    fn new(children: Vec<Condition>, operator: ConditionOperator) -> ModelResult<Self> {
        if children.is_empty() {
            return Err(ModelError::configuration(format!(
                "{} requires at least one condition",
                operator
            )));
        }
        Ok(Self(children.into()))
    }
}

impl Deref for Operands {
    type Target = [Condition];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A boolean condition tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ConditionDocument", into = "ConditionDocument")]
pub enum Condition {
    /// A leaf comparison.
    Compare(Comparison),
    /// Matches when every child matches.
    And(Operands),
    /// Matches when any child matches.
    Or(Operands),
    /// Matches when the child does not.
    Not(Arc<Condition>),
}

impl Condition {
    fn compare(comparator: Comparator, element: Element) -> Condition {
        Condition::Compare(Comparison {
            comparator,
            element,
        })
    }

    /// `field == value`
    pub fn eq(element: Element) -> Condition {
        Self::compare(Comparator::Equals, element)
    }

    /// `field > value`
    pub fn gt(element: Element) -> Condition {
        Self::compare(Comparator::GreaterThan, element)
    }

    /// `field >= value`
    pub fn gte(element: Element) -> Condition {
        Self::compare(Comparator::GreaterEqualsThan, element)
    }

    /// `field < value`
    pub fn lt(element: Element) -> Condition {
        Self::compare(Comparator::LesserThan, element)
    }

    /// `field <= value`
    pub fn lte(element: Element) -> Condition {
        Self::compare(Comparator::LesserEqualsThan, element)
    }

    /// Pattern match. `%` matches any run of characters, `_` exactly one,
    /// and `\` escapes the next character.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Configuration`] if the value is not text.
    pub fn like(element: Element) -> ModelResult<Condition> {
        match element.value() {
            Value::Scalar(Scalar::Text(_)) => Ok(Self::compare(Comparator::Like, element)),
            other => Err(ModelError::configuration(format!(
                "LIKE on '{}' requires a text pattern, found {}",
                element.name(),
                other.type_name()
            ))),
        }
    }

    /// Membership: matches when the field equals any element of the value.
    /// A scalar value is treated as a one-element sequence.
    pub fn in_list(element: Element) -> Condition {
        Self::compare(Comparator::In, element)
    }

    /// Inclusive range over a `[low, high]` sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Configuration`] if the value is not a
    /// two-element sequence.
    pub fn between(element: Element) -> ModelResult<Condition> {
        match element.value() {
            Value::Sequence(items) if items.len() == 2 => {
                Ok(Self::compare(Comparator::Between, element))
            }
            other => Err(ModelError::configuration(format!(
                "BETWEEN on '{}' requires a [low, high] pair, found {}",
                element.name(),
                describe_shape(other)
            ))),
        }
    }

    /// Conjunction of one or more conditions.
    pub fn and(conditions: impl IntoIterator<Item = Condition>) -> ModelResult<Condition> {
        Operands::new(conditions.into_iter().collect(), ConditionOperator::And).map(Condition::And)
    }

    /// Disjunction of one or more conditions.
    pub fn or(conditions: impl IntoIterator<Item = Condition>) -> ModelResult<Condition> {
        Operands::new(conditions.into_iter().collect(), ConditionOperator::Or).map(Condition::Or)
    }

    /// Negation of exactly one condition.
    pub fn not(condition: impl Into<Option<Condition>>) -> ModelResult<Condition> {
        condition
            .into()
            .map(|inner| Condition::Not(Arc::new(inner)))
            .ok_or_else(|| ModelError::null_argument("condition"))
    }

    /// Returns `NOT self`. The receiver is left untouched and shared.
    pub fn negate(&self) -> Condition {
        Condition::Not(Arc::new(self.clone()))
    }

    /// Conjoins `other`, appending to `self` if it is already an `AND`.
    pub fn and_with(self, other: Condition) -> Condition {
        Condition::And(Operands(Self::flatten(self, other, ConditionOperator::And)))
    }

    /// Disjoins `other`, appending to `self` if it is already an `OR`.
    pub fn or_with(self, other: Condition) -> Condition {
        Condition::Or(Operands(Self::flatten(self, other, ConditionOperator::Or)))
    }

    fn flatten(first: Condition, other: Condition, operator: ConditionOperator) -> Arc<[Condition]> {
        let mut children = match (first, operator) {
            (Condition::And(operands), ConditionOperator::And)
            | (Condition::Or(operands), ConditionOperator::Or) => operands.to_vec(),
            (first, _) => vec![first],
        };
        children.push(other);
        children.into()
    }

    /// Returns the operator tag of this node.
    pub fn operator(&self) -> ConditionOperator {
        match self {
            Condition::Compare(comparison) => comparison.comparator.into(),
            Condition::And(_) => ConditionOperator::And,
            Condition::Or(_) => ConditionOperator::Or,
            Condition::Not(_) => ConditionOperator::Not,
        }
    }

    /// Returns every leaf element, depth-first, left to right.
    pub fn elements(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_elements(&mut out);
        out
    }

    fn collect_elements<'a>(&'a self, out: &mut Vec<&'a Element>) {
        match self {
            Condition::Compare(comparison) => out.push(&comparison.element),
            Condition::And(children) | Condition::Or(children) => {
                for child in children.iter() {
                    child.collect_elements(out);
                }
            }
            Condition::Not(inner) => inner.collect_elements(out),
        }
    }

    pub fn as_comparison(&self) -> Option<&Comparison> {
        match self {
            Condition::Compare(comparison) => Some(comparison),
            _ => None,
        }
    }
}

fn describe_shape(value: &Value) -> String {
    match value {
        Value::Sequence(items) => format!("a sequence of {}", items.len()),
        other => other.type_name().to_string(),
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Compare(comparison) => {
                let field = comparison.field();
                let value = comparison.value();
                match comparison.comparator {
                    Comparator::Equals => write!(f, "{} = {}", field, value),
                    Comparator::GreaterThan => write!(f, "{} > {}", field, value),
                    Comparator::GreaterEqualsThan => write!(f, "{} >= {}", field, value),
                    Comparator::LesserThan => write!(f, "{} < {}", field, value),
                    Comparator::LesserEqualsThan => write!(f, "{} <= {}", field, value),
                    Comparator::Like => write!(f, "{} LIKE {}", field, value),
                    Comparator::In => write!(f, "{} IN {}", field, value),
                    Comparator::Between => match comparison.bounds() {
                        Some((low, high)) => write!(f, "{} BETWEEN {} AND {}", field, low, high),
                        None => write!(f, "{} BETWEEN {}", field, value),
                    },
                }
            }
            Condition::And(children) => write_joined(f, children, " AND "),
            Condition::Or(children) => write_joined(f, children, " OR "),
            Condition::Not(inner) => write!(f, "NOT ({})", inner),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Condition], separator: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", separator)?;
        }
        write!(f, "{}", child)?;
    }
    write!(f, ")")
}

/// Serialized form of a condition.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ConditionDocument {
    Eq(Element),
    Gt(Element),
    Gte(Element),
    Lt(Element),
    Lte(Element),
    Like(Element),
    In(Element),
    Between(Element),
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

impl TryFrom<ConditionDocument> for Condition {
    type Error = ModelError;

    fn try_from(document: ConditionDocument) -> Result<Self, Self::Error> {
        match document {
            ConditionDocument::Eq(element) => Ok(Condition::eq(element)),
            ConditionDocument::Gt(element) => Ok(Condition::gt(element)),
            ConditionDocument::Gte(element) => Ok(Condition::gte(element)),
            ConditionDocument::Lt(element) => Ok(Condition::lt(element)),
            ConditionDocument::Lte(element) => Ok(Condition::lte(element)),
            ConditionDocument::Like(element) => Condition::like(element),
            ConditionDocument::In(element) => Ok(Condition::in_list(element)),
            ConditionDocument::Between(element) => Condition::between(element),
            ConditionDocument::And(children) => Condition::and(children),
            ConditionDocument::Or(children) => Condition::or(children),
            ConditionDocument::Not(inner) => Condition::not(*inner),
        }
    }
}

impl From<Condition> for ConditionDocument {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::Compare(Comparison {
                comparator,
                element,
            }) => match comparator {
                Comparator::Equals => ConditionDocument::Eq(element),
                Comparator::GreaterThan => ConditionDocument::Gt(element),
                Comparator::GreaterEqualsThan => ConditionDocument::Gte(element),
                Comparator::LesserThan => ConditionDocument::Lt(element),
                Comparator::LesserEqualsThan => ConditionDocument::Lte(element),
                Comparator::Like => ConditionDocument::Like(element),
                Comparator::In => ConditionDocument::In(element),
                Comparator::Between => ConditionDocument::Between(element),
            },
            Condition::And(children) => ConditionDocument::And(children.to_vec()),
            Condition::Or(children) => ConditionDocument::Or(children.to_vec()),
            Condition::Not(inner) => ConditionDocument::Not(Box::new((*inner).clone())),
        }
    }
}
