//! Key lookups.

use serde::Serialize;

use tessera_model::{ConditionOperator, Value};

use super::config::KeyValueConfig;
use crate::core::{BackendKind, CompareOp, Dialect, LikePattern, NegationStrategy};
use crate::error::{TranslationError, TranslationResult};

/// The keys a condition selects, in first-seen order without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeySet {
    pub keys: Vec<String>,
}

impl KeySet {
    fn new(keys: impl IntoIterator<Item = String>) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for key in keys {
            if !unique.contains(&key) {
                unique.push(key);
            }
        }
        Self { keys: unique }
    }
}

/// Renders conditions as sets of keys to fetch.
///
/// Only equality and membership on the key element are expressible. `AND`
/// intersects key sets and `OR` unions them; every other operator fails.
#[derive(Debug, Clone, Default)]
pub struct KeyValueDialect {
    config: KeyValueConfig,
}

impl KeyValueDialect {
    pub fn new(config: KeyValueConfig) -> Self {
        Self { config }
    }

    fn check_key(&self, field: &str, operator: ConditionOperator) -> TranslationResult<()> {
        if field == self.config.key_field {
            Ok(())
        } else {
            Err(TranslationError::unsupported(
                BackendKind::KeyValue,
                operator,
                format!(
                    "only the key element '{}' can be queried, not '{}'",
                    self.config.key_field, field
                ),
            ))
        }
    }
}

fn unsupported(operator: ConditionOperator) -> TranslationError {
    TranslationError::unsupported(
        BackendKind::KeyValue,
        operator,
        "key-value stores only look up keys",
    )
}

impl Dialect for KeyValueDialect {
    type Filter = KeySet;

    fn kind(&self) -> BackendKind {
        BackendKind::KeyValue
    }

    fn compare(&self, field: &str, op: CompareOp, value: &Value) -> TranslationResult<KeySet> {
        if op != CompareOp::Eq {
            return Err(unsupported(op.operator()));
        }
        self.check_key(field, ConditionOperator::Equals)?;
        Ok(KeySet::new([value.get::<String>()?]))
    }

    fn like(&self, _field: &str, _pattern: &LikePattern) -> TranslationResult<KeySet> {
        Err(unsupported(ConditionOperator::Like))
    }

    fn in_list(&self, field: &str, values: &[Value]) -> TranslationResult<KeySet> {
        self.check_key(field, ConditionOperator::In)?;
        let keys = values
            .iter()
            .map(|value| value.get::<String>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(KeySet::new(keys))
    }

    fn between(&self, _field: &str, _low: &Value, _high: &Value) -> TranslationResult<KeySet> {
        Err(unsupported(ConditionOperator::Between))
    }

    fn and(&self, filters: Vec<KeySet>) -> TranslationResult<KeySet> {
        let mut filters = filters.into_iter();
        let first = filters.next().unwrap_or_else(|| KeySet::new([]));
        let keys = filters.fold(first.keys, |keys, other| {
            keys.into_iter().filter(|key| other.keys.contains(key)).collect()
        });
        Ok(KeySet { keys })
    }

    fn or(&self, filters: Vec<KeySet>) -> TranslationResult<KeySet> {
        Ok(KeySet::new(filters.into_iter().flat_map(|set| set.keys)))
    }

    fn negation(&self) -> NegationStrategy {
        NegationStrategy::Native
    }

    fn not(&self, _filter: KeySet) -> TranslationResult<KeySet> {
        Err(TranslationError::unsupported(
            BackendKind::KeyValue,
            ConditionOperator::Not,
            "the complement of a key set requires a full scan",
        ))
    }
}
