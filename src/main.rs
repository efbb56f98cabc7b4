// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Command-line front-end for the revzone engine.
//!
//! Operates on serialized data sets: `apply` runs a batch of mutations
//! against a data set and writes the reconciled result, `check` verifies
//! the derived-record graph of an existing data set, and `completions`
//! emits shell completion scripts.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::{debug, info};

use revzone::config::EngineConfig;
use revzone::engine::{Engine, Mutation};
use revzone::store::Store;

#[derive(Parser)]
#[command(
    name = "revzone",
    version,
    about = "Consistency engine for authoritative DNS data"
)]
struct Cli {
    /// Path to the engine configuration file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a batch of mutations to a data set and write the result
    Apply {
        /// Input data set (JSON)
        #[arg(long)]
        dataset: PathBuf,

        /// Mutation batch to apply (JSON array)
        #[arg(long)]
        mutations: PathBuf,

        /// Where to write the reconciled data set; stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Verify the derived-record graph of a data set
    Check {
        /// Data set to verify (JSON)
        #[arg(long)]
        dataset: PathBuf,
    },

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Apply {
            dataset,
            mutations,
            output,
        } => apply(&config, &dataset, &mutations, output.as_deref()),
        Command::Check { dataset } => check(&dataset),
        Command::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "revzone",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}

/// Initialize logging.
///
/// Respects RUST_LOG for the filter (default: info) and RUST_LOG_FORMAT
/// for the output format (text or json).
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .compact()
                .init();
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading engine configuration");
            EngineConfig::from_yaml_file(path)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn load_store(path: &Path) -> Result<Store> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data set {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse data set {}", path.display()))
}

fn apply(
    config: &EngineConfig,
    dataset: &Path,
    mutations: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let store = load_store(dataset)?;
    let raw = std::fs::read_to_string(mutations)
        .with_context(|| format!("Failed to read mutation batch {}", mutations.display()))?;
    let batch: Vec<Mutation> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse mutation batch {}", mutations.display()))?;

    let mut engine = Engine::with_store(config.clone(), store);
    let count = batch.len();
    engine
        .apply_all(batch)
        .context("Mutation batch rejected; data set left unchanged")?;
    info!(mutations = count, "Applied mutation batch");

    let result = engine.into_store();
    let rendered = serde_json::to_string_pretty(&result).context("Failed to serialize data set")?;
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write data set {}", path.display()))?;
            info!(path = %path.display(), "Wrote reconciled data set");
        }
        None => {
            let mut stdout = std::io::stdout();
            stdout.write_all(rendered.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn check(dataset: &Path) -> Result<()> {
    let store = load_store(dataset)?;
    store
        .check_consistency()
        .context("Data set failed the consistency check")?;
    println!(
        "ok: {} view(s), {} zone(s), {} record(s)",
        store.view_count(),
        store.zone_count(),
        store.record_count()
    );
    Ok(())
}
