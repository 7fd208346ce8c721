//! N1QL statement builder.

use serde::Serialize;
use tracing::debug;

use tessera_model::{Condition, DeleteQuery, SelectQuery, Value};

use super::config::CouchbaseConfig;
use super::dialect::{ALIAS, N1qlDialect, quote_identifier};
use crate::core::{BackendKind, QueryTranslator, Translator};
use crate::error::TranslationResult;

/// A N1QL request body for the query service: the statement and its
/// positional arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct N1qlStatement {
    pub statement: String,
    pub args: Vec<Value>,
}

/// Builds N1QL statements from model queries.
#[derive(Debug, Clone)]
pub struct N1qlQueryBuilder {
    config: CouchbaseConfig,
    translator: Translator<N1qlDialect>,
}

impl Default for N1qlQueryBuilder {
    fn default() -> Self {
        Self::new(CouchbaseConfig::default())
    }
}

impl N1qlQueryBuilder {
    /// Creates a new query builder.
    pub fn new(config: CouchbaseConfig) -> Self {
        Self {
            translator: Translator::new(N1qlDialect::new(config.clone())),
            config,
        }
    }

    fn keyspace(&self, entity_name: &str) -> String {
        format!(
            "{}.{}.{} AS {}",
            quote_identifier(&self.config.bucket),
            quote_identifier(&self.config.scope),
            quote_identifier(entity_name),
            ALIAS
        )
    }

    fn where_clause(&self, condition: Option<&Condition>) -> TranslationResult<(String, Vec<Value>)> {
        match condition {
            Some(condition) => {
                let (text, args) = self.translator.translate(condition)?.render(1);
                Ok((format!(" WHERE {}", text), args))
            }
            None => Ok((String::new(), Vec::new())),
        }
    }
}

impl QueryTranslator for N1qlQueryBuilder {
    type Request = N1qlStatement;
    type DeleteRequest = N1qlStatement;

    fn kind(&self) -> BackendKind {
        BackendKind::Couchbase
    }

    fn select(&self, query: &SelectQuery) -> TranslationResult<N1qlStatement> {
        let dialect = self.translator.dialect();
        let id_column = format!("META({}).id AS {}", ALIAS, quote_identifier(&self.config.id_field));
        let columns = if query.projection().is_empty() {
            format!("{}, {}.*", id_column, ALIAS)
        } else {
            query
                .projection()
                .iter()
                .map(|field| {
                    if *field == self.config.id_field {
                        id_column.clone()
                    } else {
                        dialect.path(field)
                    }
                })
                .collect::<Vec<_>>()
                .join(", ")
        };

        let (filter, args) = self.where_clause(query.condition())?;
        let mut statement = format!(
            "SELECT {} FROM {}{}",
            columns,
            self.keyspace(query.target()),
            filter
        );

        if !query.sorts().is_empty() {
            let order: Vec<String> = query
                .sorts()
                .iter()
                .map(|sort| {
                    let direction = if sort.is_descending() { "DESC" } else { "ASC" };
                    format!("{} {}", dialect.path(&sort.field), direction)
                })
                .collect();
            statement.push_str(" ORDER BY ");
            statement.push_str(&order.join(", "));
        }
        if let Some(limit) = query.limit() {
            statement.push_str(&format!(" LIMIT {}", limit));
        }
        if query.skip() > 0 {
            statement.push_str(&format!(" OFFSET {}", query.skip()));
        }

        debug!(statement = %statement, args = args.len(), "Built N1QL select");
        Ok(N1qlStatement { statement, args })
    }

    fn delete(&self, query: &DeleteQuery) -> TranslationResult<N1qlStatement> {
        let (filter, args) = self.where_clause(query.condition())?;
        let statement = format!("DELETE FROM {}{}", self.keyspace(query.target()), filter);
        debug!(statement = %statement, args = args.len(), "Built N1QL delete");
        Ok(N1qlStatement { statement, args })
    }
}
