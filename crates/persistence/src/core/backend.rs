//! Backend identification and capabilities.
//!
//! [`BackendKind`] names a backend technology; [`BackendCapability`] lists the
//! condition and query features its translator can express natively. The
//! capability table is informational: translators still fail explicitly on
//! anything they cannot render.

use std::fmt;
use std::str::FromStr;

/// Identifies the type of database backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// MongoDB (document store).
    MongoDB,
    /// Couchbase (document store queried with N1QL).
    Couchbase,
    /// Apache Cassandra (wide-column store).
    Cassandra,
    /// Elasticsearch (search engine).
    Elasticsearch,
    /// Apache Solr (search engine).
    Solr,
    /// Generic key-value store.
    KeyValue,
    /// In-process reference store.
    Memory,
    /// Custom or unknown backend.
    Custom(&'static str),
}

/// Broad storage families sharing a query model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendFamily {
    Document,
    ColumnFamily,
    SearchEngine,
    KeyValue,
    Reference,
}

impl BackendKind {
    /// All built-in backends.
    pub const BUILTIN: [BackendKind; 7] = [
        BackendKind::MongoDB,
        BackendKind::Couchbase,
        BackendKind::Cassandra,
        BackendKind::Elasticsearch,
        BackendKind::Solr,
        BackendKind::KeyValue,
        BackendKind::Memory,
    ];

    /// Returns the storage family of this backend.
    pub fn family(&self) -> BackendFamily {
        match self {
            BackendKind::MongoDB | BackendKind::Couchbase => BackendFamily::Document,
            BackendKind::Cassandra => BackendFamily::ColumnFamily,
            BackendKind::Elasticsearch | BackendKind::Solr => BackendFamily::SearchEngine,
            BackendKind::KeyValue => BackendFamily::KeyValue,
            BackendKind::Memory | BackendKind::Custom(_) => BackendFamily::Reference,
        }
    }

    /// Returns the features this backend's translator renders natively.
    pub fn capabilities(&self) -> &'static [BackendCapability] {
        use BackendCapability::*;

        match self {
            BackendKind::MongoDB
            | BackendKind::Couchbase
            | BackendKind::Elasticsearch
            | BackendKind::Solr
            | BackendKind::Memory => &[
                Equality,
                Range,
                Pattern,
                Membership,
                Between,
                Conjunction,
                Disjunction,
                NativeNegation,
                Sorting,
                Skip,
                Limit,
                Projection,
            ],
            BackendKind::Cassandra => &[
                Equality,
                Range,
                Membership,
                Between,
                Conjunction,
                Sorting,
                Limit,
                Projection,
            ],
            BackendKind::KeyValue => &[Equality, Membership, Conjunction, Disjunction],
            BackendKind::Custom(_) => &[],
        }
    }

    /// Checks if this backend supports the given capability.
    pub fn supports(&self, capability: BackendCapability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::MongoDB => write!(f, "mongodb"),
            BackendKind::Couchbase => write!(f, "couchbase"),
            BackendKind::Cassandra => write!(f, "cassandra"),
            BackendKind::Elasticsearch => write!(f, "elasticsearch"),
            BackendKind::Solr => write!(f, "solr"),
            BackendKind::KeyValue => write!(f, "keyvalue"),
            BackendKind::Memory => write!(f, "memory"),
            BackendKind::Custom(name) => write!(f, "{}", name),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(BackendKind::MongoDB),
            "couchbase" => Ok(BackendKind::Couchbase),
            "cassandra" => Ok(BackendKind::Cassandra),
            "elasticsearch" | "es" => Ok(BackendKind::Elasticsearch),
            "solr" => Ok(BackendKind::Solr),
            "keyvalue" | "key-value" | "kv" => Ok(BackendKind::KeyValue),
            "memory" => Ok(BackendKind::Memory),
            _ => Err(format!("unknown backend: {}", s)),
        }
    }
}

impl fmt::Display for BackendFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendFamily::Document => "document",
            BackendFamily::ColumnFamily => "column-family",
            BackendFamily::SearchEngine => "search-engine",
            BackendFamily::KeyValue => "key-value",
            BackendFamily::Reference => "reference",
        };
        write!(f, "{}", name)
    }
}

/// Query features a backend may render natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendCapability {
    /// EQUALS leaves.
    Equality,
    /// GREATER/LESSER leaves.
    Range,
    /// LIKE leaves with arbitrary wildcards.
    Pattern,
    /// IN leaves.
    Membership,
    /// BETWEEN leaves.
    Between,
    /// AND nodes.
    Conjunction,
    /// OR nodes.
    Disjunction,
    /// NOT nodes without complement push-down.
    NativeNegation,
    /// Result ordering.
    Sorting,
    /// Offset pagination.
    Skip,
    /// Result count limit.
    Limit,
    /// Field projection.
    Projection,
}

impl fmt::Display for BackendCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendCapability::Equality => "equality",
            BackendCapability::Range => "range",
            BackendCapability::Pattern => "pattern",
            BackendCapability::Membership => "membership",
            BackendCapability::Between => "between",
            BackendCapability::Conjunction => "conjunction",
            BackendCapability::Disjunction => "disjunction",
            BackendCapability::NativeNegation => "native-negation",
            BackendCapability::Sorting => "sorting",
            BackendCapability::Skip => "skip",
            BackendCapability::Limit => "limit",
            BackendCapability::Projection => "projection",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_display() {
        assert_eq!(BackendKind::MongoDB.to_string(), "mongodb");
        assert_eq!(BackendKind::KeyValue.to_string(), "keyvalue");
        assert_eq!(BackendKind::Custom("custom-db").to_string(), "custom-db");
    }

    #[test]
    fn test_backend_kind_from_str() {
        assert_eq!("Mongo".parse::<BackendKind>(), Ok(BackendKind::MongoDB));
        assert_eq!("es".parse::<BackendKind>(), Ok(BackendKind::Elasticsearch));
        assert!("neo4j".parse::<BackendKind>().is_err());
        for kind in BackendKind::BUILTIN {
            assert_eq!(kind.to_string().parse::<BackendKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_backend_family() {
        assert_eq!(BackendKind::Solr.family(), BackendFamily::SearchEngine);
        assert_eq!(BackendKind::Cassandra.family().to_string(), "column-family");
    }

    #[test]
    fn test_capabilities() {
        assert!(BackendKind::MongoDB.supports(BackendCapability::NativeNegation));
        assert!(!BackendKind::Cassandra.supports(BackendCapability::Disjunction));
        assert!(!BackendKind::Cassandra.supports(BackendCapability::Skip));
        assert!(!BackendKind::KeyValue.supports(BackendCapability::Sorting));
    }
}
