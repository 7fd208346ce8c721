//! Command-line configuration.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tessera_persistence::{BackendKind, PersistenceConfig};

/// Tessera query tool.
#[derive(Parser, Debug)]
#[command(name = "tessera", version)]
#[command(about = "Render Tessera queries into native backend requests")]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, env = "TESSERA_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the native request a backend would receive for a query document.
    Explain {
        /// Target backend (mongodb, couchbase, cassandra, elasticsearch, solr, keyvalue, memory).
        #[arg(short, long, env = "TESSERA_BACKEND")]
        backend: BackendKind,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Execute a query document against entities loaded into the memory backend.
    Run {
        /// JSON file mapping entity names to arrays of flat objects.
        #[arg(short, long)]
        data: PathBuf,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// List the built-in backends and what they can render.
    Backends,

    /// Validate a persistence configuration file.
    CheckConfig {
        /// Configuration file.
        #[arg(short, long, env = "TESSERA_CONFIG")]
        config: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Query document (`{"select": {...}}` or `{"delete": {...}}`).
    #[arg(short, long)]
    pub query: PathBuf,

    /// Persistence configuration file; defaults apply when omitted.
    #[arg(short, long, env = "TESSERA_CONFIG")]
    pub config: Option<PathBuf>,
}

impl QueryArgs {
    /// Loads the configuration file, or the defaults.
    pub fn persistence_config(&self) -> anyhow::Result<PersistenceConfig> {
        load_config(self.config.as_deref())
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<PersistenceConfig> {
    match path {
        Some(path) => PersistenceConfig::load(path)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e)),
        None => Ok(PersistenceConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_explain() {
        let cli = Cli::try_parse_from([
            "tessera",
            "explain",
            "--backend",
            "es",
            "--query",
            "q.json",
        ])
        .unwrap();
        match cli.command {
            Command::Explain { backend, query } => {
                assert_eq!(backend, BackendKind::Elasticsearch);
                assert_eq!(query.query, PathBuf::from("q.json"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let err = Cli::try_parse_from([
            "tessera",
            "explain",
            "--backend",
            "oracle",
            "--query",
            "q.json",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("unknown backend: oracle"));
    }

    #[test]
    fn test_missing_config_is_default() {
        assert_eq!(load_config(None).unwrap(), PersistenceConfig::default());
    }
}
