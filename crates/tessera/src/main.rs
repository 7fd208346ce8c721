//! Tessera command-line tool.
//!
//! Loads JSON query documents and prints the native request each backend
//! would receive, or executes them against the in-memory backend.

mod commands;
mod config;

use clap::Parser;
use serde_json::Value as Json;
use tracing::info;

use config::{Cli, Command, load_config};

/// Initializes the tracing subscriber. `RUST_LOG` overrides `level`.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "tessera={level},tessera_persistence={level},tessera_model={level}"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn print(output: &Json) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Command::Explain { backend, query } => {
            let config = query.persistence_config()?;
            let document = commands::read_query(&query.query)?;
            print(&commands::explain_query(backend, &config, &document)?)
        }
        Command::Run { data, query } => {
            let config = query.persistence_config()?;
            let document = commands::read_query(&query.query)?;
            let entities = commands::read_entities(&data)?;
            print(&commands::run_query(&config, entities, &document).await?)
        }
        Command::Backends => print(&commands::list_backends()),
        Command::CheckConfig { config } => {
            load_config(Some(&config))?;
            info!(path = %config.display(), "Configuration is valid");
            println!("{}: ok", config.display());
            Ok(())
        }
    }
}
