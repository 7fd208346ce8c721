//! CQL statement builder.

use serde::Serialize;
use tracing::debug;

use tessera_model::{DeleteQuery, SelectQuery, Value};

use super::config::CassandraConfig;
use super::dialect::{CqlDialect, CqlFragment, quote_identifier};
use crate::core::{BackendKind, QueryTranslator, Translator};
use crate::error::{TranslationError, TranslationResult};

/// A CQL statement with positional parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CqlStatement {
    pub cql: String,
    pub params: Vec<Value>,
}

/// Builds CQL statements from model queries.
#[derive(Debug, Clone, Default)]
pub struct CqlQueryBuilder {
    config: CassandraConfig,
    translator: Translator<CqlDialect>,
}

impl CqlQueryBuilder {
    /// Creates a new query builder.
    pub fn new(config: CassandraConfig) -> Self {
        Self {
            config,
            translator: Translator::new(CqlDialect),
        }
    }

    fn table(&self, entity_name: &str) -> String {
        match &self.config.keyspace {
            Some(keyspace) => format!(
                "{}.{}",
                quote_identifier(keyspace),
                quote_identifier(entity_name)
            ),
            None => quote_identifier(entity_name),
        }
    }
}

impl QueryTranslator for CqlQueryBuilder {
    type Request = CqlStatement;
    type DeleteRequest = CqlStatement;

    fn kind(&self) -> BackendKind {
        BackendKind::Cassandra
    }

    fn select(&self, query: &SelectQuery) -> TranslationResult<CqlStatement> {
        if query.skip() > 0 {
            return Err(TranslationError::feature(BackendKind::Cassandra, "skip"));
        }

        let columns = if query.projection().is_empty() {
            "*".to_string()
        } else {
            query
                .projection()
                .iter()
                .map(|field| quote_identifier(field))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mut cql = format!("SELECT {} FROM {}", columns, self.table(query.target()));
        let mut params = Vec::new();

        if let Some(condition) = query.condition() {
            let CqlFragment {
                cql: restriction,
                params: bound,
            } = self.translator.translate(condition)?;
            cql.push_str(" WHERE ");
            cql.push_str(&restriction);
            params = bound;
        }

        if !query.sorts().is_empty() {
            let order: Vec<String> = query
                .sorts()
                .iter()
                .map(|sort| {
                    let direction = if sort.is_descending() { "DESC" } else { "ASC" };
                    format!("{} {}", quote_identifier(&sort.field), direction)
                })
                .collect();
            cql.push_str(" ORDER BY ");
            cql.push_str(&order.join(", "));
        }

        if let Some(limit) = query.limit() {
            cql.push_str(&format!(" LIMIT {}", limit));
        }

        if self.config.allow_filtering && query.condition().is_some() {
            cql.push_str(" ALLOW FILTERING");
        }

        debug!(cql = %cql, params = params.len(), "Built CQL select");
        Ok(CqlStatement { cql, params })
    }

    fn delete(&self, query: &DeleteQuery) -> TranslationResult<CqlStatement> {
        let table = self.table(query.target());
        let statement = match query.condition() {
            Some(condition) => {
                let fragment = self.translator.translate(condition)?;
                CqlStatement {
                    cql: format!("DELETE FROM {} WHERE {}", table, fragment.cql),
                    params: fragment.params,
                }
            }
            None => CqlStatement {
                cql: format!("TRUNCATE {}", table),
                params: Vec::new(),
            },
        };
        debug!(cql = %statement.cql, "Built CQL delete");
        Ok(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_model::{Condition, Element, Sort};

    fn builder() -> CqlQueryBuilder {
        CqlQueryBuilder::new(CassandraConfig {
            keyspace: Some("app".to_string()),
            allow_filtering: true,
        })
    }

    #[test]
    fn test_select_full_statement() {
        let query = SelectQuery::new("person")
            .unwrap()
            .with_condition(
                Condition::between(Element::new("age", Value::sequence([18, 65])).unwrap())
                    .unwrap(),
            )
            .with_sort(Sort::asc("age"))
            .with_limit(10)
            .with_projection(["name", "age"]);
        let statement = builder().select(&query).unwrap();
        assert_eq!(
            statement.cql,
            "SELECT \"name\", \"age\" FROM \"app\".\"person\" WHERE \"age\" >= ? AND \"age\" <= ? \
             ORDER BY \"age\" ASC LIMIT 10 ALLOW FILTERING"
        );
        assert_eq!(statement.params, vec![Value::from(18), Value::from(65)]);
    }

    #[test]
    fn test_skip_is_unsupported() {
        let query = SelectQuery::new("person").unwrap().with_skip(5);
        let err = builder().select(&query).unwrap_err();
        assert_eq!(
            err,
            TranslationError::feature(BackendKind::Cassandra, "skip")
        );
    }

    #[test]
    fn test_delete_without_condition_truncates() {
        let query = DeleteQuery::new("person").unwrap();
        let statement = CqlQueryBuilder::default().delete(&query).unwrap();
        assert_eq!(statement.cql, "TRUNCATE \"person\"");
        assert!(statement.params.is_empty());
    }
}
