//! Select and delete queries.
//!
//! Queries are built once per call with the `with_*` builders and then handed
//! to a single translator. `limit == 0` means unbounded.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::error::{ModelError, ModelResult};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Ascending,
    /// Descending order.
    Descending,
}

/// A sort on one field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Parses a sort directive (e.g., "-age" for descending).
    pub fn parse(s: &str) -> Self {
        match s.strip_prefix('-') {
            Some(stripped) => Self::desc(stripped),
            None => Self::asc(s.strip_prefix('+').unwrap_or(s)),
        }
    }

    pub fn is_descending(&self) -> bool {
        self.direction == SortDirection::Descending
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Ascending => write!(f, "{}", self.field),
            SortDirection::Descending => write!(f, "-{}", self.field),
        }
    }
}

fn require_target(target: String) -> ModelResult<String> {
    if target.is_empty() {
        return Err(ModelError::null_argument("target"));
    }
    Ok(target)
}

/// A query selecting entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSelectQuery")]
pub struct SelectQuery {
    target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    condition: Option<Condition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sorts: Vec<Sort>,
    #[serde(skip_serializing_if = "is_zero")]
    limit: u64,
    #[serde(skip_serializing_if = "is_zero")]
    skip: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    projection: Vec<String>,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

#[derive(Deserialize)]
struct RawSelectQuery {
    target: String,
    #[serde(default)]
    condition: Option<Condition>,
    #[serde(default)]
    sorts: Vec<Sort>,
    #[serde(default)]
    limit: u64,
    #[serde(default)]
    skip: u64,
    #[serde(default)]
    projection: Vec<String>,
}

impl TryFrom<RawSelectQuery> for SelectQuery {
    type Error = ModelError;

    fn try_from(raw: RawSelectQuery) -> Result<Self, Self::Error> {
        let mut query = SelectQuery::new(raw.target)?
            .with_limit(raw.limit)
            .with_skip(raw.skip)
            .with_projection(raw.projection);
        query.condition = raw.condition;
        query.sorts = raw.sorts;
        Ok(query)
    }
}

impl SelectQuery {
    /// Creates a query selecting every entity named `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NullArgument`] if `target` is empty.
    pub fn new(target: impl Into<String>) -> ModelResult<Self> {
        Ok(Self {
            target: require_target(target.into())?,
            condition: None,
            sorts: Vec::new(),
            limit: 0,
            skip: 0,
            projection: Vec::new(),
        })
    }

    /// Sets the root condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Adds a sort. Sorts apply in the order they were added.
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sorts.push(sort);
        self
    }

    /// Sets the maximum number of results. Zero means unbounded.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the number of leading results to skip.
    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    /// Restricts the returned fields. Duplicates are dropped, first
    /// occurrence wins. An empty projection returns every field.
    pub fn with_projection<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields {
            let field = field.into();
            if !self.projection.contains(&field) {
                self.projection.push(field);
            }
        }
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    pub fn sorts(&self) -> &[Sort] {
        &self.sorts
    }

    /// The limit, `None` when unbounded.
    pub fn limit(&self) -> Option<u64> {
        (self.limit > 0).then_some(self.limit)
    }

    pub fn skip(&self) -> u64 {
        self.skip
    }

    pub fn projection(&self) -> &[String] {
        &self.projection
    }
}

/// A query deleting entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDeleteQuery")]
pub struct DeleteQuery {
    target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    condition: Option<Condition>,
}

#[derive(Deserialize)]
struct RawDeleteQuery {
    target: String,
    #[serde(default)]
    condition: Option<Condition>,
}

impl TryFrom<RawDeleteQuery> for DeleteQuery {
    type Error = ModelError;

    fn try_from(raw: RawDeleteQuery) -> Result<Self, Self::Error> {
        let query = DeleteQuery::new(raw.target)?;
        Ok(match raw.condition {
            Some(condition) => query.with_condition(condition),
            None => query,
        })
    }
}

impl DeleteQuery {
    /// Creates a query deleting every entity named `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NullArgument`] if `target` is empty.
    pub fn new(target: impl Into<String>) -> ModelResult<Self> {
        Ok(Self {
            target: require_target(target.into())?,
            condition: None,
        })
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }
}
