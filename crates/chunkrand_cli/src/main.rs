//! chunkrand CLI - chunked reproducible random arrays from the command line
//!
//! # Commands
//!
//! - `chunkrand list` - Print the distribution catalogue
//! - `chunkrand plan --size 10,10 --chunks 4` - Show a chunk plan and its sub-seeds
//! - `chunkrand generate normal --size 1000 --chunks 100` - Materialise an array
//! - `chunkrand seeds --seed 42 --count 8` - Derive sub-seeds from a parent seed
//!
//! # Configuration
//!
//! Defaults are read from `chunkrand.toml` (see [`config`]), then
//! `CHUNKRAND_LOG_LEVEL` / `CHUNKRAND_SEED`, then command-line flags.
//! `RUST_LOG` overrides the log filter entirely.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chunkrand_graph::EngineKind;

mod commands;
mod config;

use commands::generate::{GenerateFormat, GenerateRequest};
use commands::OutputFormat;
use config::{build_config, parse_engine, CliOverrides};

/// Chunked reproducible random arrays
#[derive(Parser)]
#[command(name = "chunkrand")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "chunkrand.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered distributions with their parameters and element types
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show how a shape is chunked and which sub-seed each chunk receives
    Plan {
        /// Array shape, e.g. `100,100`
        #[arg(short, long)]
        size: String,

        /// Chunk specification, e.g. `25`, `25,50` or `30+30+40,100`
        #[arg(short = 'k', long)]
        chunks: String,

        /// Parent seed
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Build and materialise a chunked random array
    Generate {
        /// Distribution name (see `chunkrand list`)
        distribution: String,

        /// Positional parameter value, repeatable
        #[arg(short, long = "param", allow_hyphen_values = true)]
        params: Vec<String>,

        /// Keyword parameter `name=value`, repeatable
        #[arg(short = 'w', long = "kwarg", allow_hyphen_values = true)]
        kwargs: Vec<String>,

        /// Array shape, e.g. `100,100`
        #[arg(short, long)]
        size: String,

        /// Chunk specification (defaults to the configured chunk size)
        #[arg(short = 'k', long)]
        chunks: Option<String>,

        /// Parent seed
        #[arg(long)]
        seed: Option<u64>,

        /// Execution engine (serial, rayon)
        #[arg(short, long, value_parser = parse_engine)]
        engine: Option<EngineKind>,

        /// Worker threads for the rayon engine
        #[arg(short, long)]
        threads: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = GenerateFormat::Summary)]
        format: GenerateFormat,
    },

    /// Derive sub-seeds from a parent seed
    Seeds {
        /// Parent seed
        #[arg(long)]
        seed: Option<u64>,

        /// Number of sub-seeds
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        count: i64,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides {
            verbose: self.verbose,
            ..CliOverrides::default()
        };
        match &self.command {
            Commands::Generate {
                seed,
                engine,
                threads,
                ..
            } => {
                overrides.seed = *seed;
                overrides.engine = *engine;
                overrides.threads = *threads;
            }
            Commands::Plan { seed, .. } | Commands::Seeds { seed, .. } => {
                overrides.seed = *seed;
            }
            Commands::List { .. } => {}
        }
        overrides
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = build_config(Path::new(&cli.config), &cli.overrides())?;

    init_tracing(&config.log_level.to_string());
    debug!(config = ?config, "configuration loaded");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::List { format } => commands::list::run(format, &mut out)?,
        Commands::Plan {
            size,
            chunks,
            format,
            ..
        } => commands::plan::run(&size, &chunks, config.generation.seed, format, &mut out)?,
        Commands::Generate {
            distribution,
            params,
            kwargs,
            size,
            chunks,
            format,
            ..
        } => {
            let request = GenerateRequest {
                distribution,
                params,
                kwargs,
                size,
                chunks,
                format,
            };
            commands::generate::run(&request, &config, &mut out)?
        }
        Commands::Seeds { count, format, .. } => {
            let seed = config
                .generation
                .seed
                .ok_or_else(|| anyhow!("seeds requires --seed or CHUNKRAND_SEED"))?;
            commands::seeds::run(seed, count, format, &mut out)?
        }
    }

    out.flush()?;
    Ok(())
}
