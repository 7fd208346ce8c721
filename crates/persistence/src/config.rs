//! Persistence configuration.
//!
//! One section per backend, all optional in the JSON document:
//!
//! ```json
//! {
//!   "mongodb": { "id_field": "id", "case_insensitive_like": true },
//!   "elasticsearch": { "index_prefix": "app_", "default_size": 50 },
//!   "cassandra": { "keyspace": "app", "allow_filtering": true }
//! }
//! ```

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::BackendKind;
use crate::error::{BackendError, StorageError, StorageResult};

#[cfg(feature = "cassandra")]
use crate::backends::cassandra::CassandraConfig;
#[cfg(feature = "couchbase")]
use crate::backends::couchbase::CouchbaseConfig;
#[cfg(feature = "elasticsearch")]
use crate::backends::elasticsearch::ElasticsearchConfig;
#[cfg(feature = "keyvalue")]
use crate::backends::keyvalue::KeyValueConfig;
#[cfg(feature = "memory")]
use crate::backends::memory::MemoryConfig;
#[cfg(feature = "mongodb")]
use crate::backends::mongodb::MongoConfig;
#[cfg(feature = "solr")]
use crate::backends::solr::SolrConfig;

/// Settings for every compiled-in backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PersistenceConfig {
    #[cfg(feature = "mongodb")]
    pub mongodb: MongoConfig,
    #[cfg(feature = "couchbase")]
    pub couchbase: CouchbaseConfig,
    #[cfg(feature = "cassandra")]
    pub cassandra: CassandraConfig,
    #[cfg(feature = "elasticsearch")]
    pub elasticsearch: ElasticsearchConfig,
    #[cfg(feature = "solr")]
    pub solr: SolrConfig,
    #[cfg(feature = "keyvalue")]
    pub keyvalue: KeyValueConfig,
    #[cfg(feature = "memory")]
    pub memory: MemoryConfig,
}

impl PersistenceConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> StorageResult<Self> {
        let config: PersistenceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration document.
    pub fn from_reader(reader: impl Read) -> StorageResult<Self> {
        let config: PersistenceConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading persistence configuration");
        let file = std::fs::File::open(path).map_err(BackendError::from)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Validates every backend section.
    pub fn validate(&self) -> StorageResult<()> {
        #[cfg(feature = "mongodb")]
        self.mongodb.validate()?;
        #[cfg(feature = "couchbase")]
        self.couchbase.validate()?;
        #[cfg(feature = "cassandra")]
        self.cassandra.validate()?;
        #[cfg(feature = "elasticsearch")]
        self.elasticsearch.validate()?;
        #[cfg(feature = "solr")]
        self.solr.validate()?;
        #[cfg(feature = "keyvalue")]
        self.keyvalue.validate()?;
        #[cfg(feature = "memory")]
        self.memory.validate()?;
        Ok(())
    }
}

/// Builds the error returned by `validate()` implementations.
pub(crate) fn invalid_config(backend: BackendKind, message: impl Into<String>) -> StorageError {
    StorageError::Backend(BackendError::InvalidConfiguration {
        backend_name: backend.to_string(),
        message: message.into(),
    })
}
