//! CLI configuration
//!
//! Generation defaults come from `chunkrand.toml`, then the `CHUNKRAND_*`
//! environment variables, then command-line flags.

use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

use chunkrand_graph::engine::{EngineConfig, EngineError, EngineKind};

/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "CHUNKRAND_LOG_LEVEL";

/// Environment variable overriding the default seed.
pub const ENV_SEED: &str = "CHUNKRAND_SEED";

const DEFAULT_CHUNK_SIZE: usize = 1_000_000;

/// Configuration failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{var}={0} is not a log level", var = ENV_LOG_LEVEL)]
    LogLevel(String),

    #[error("{var}={0} is not an unsigned integer", var = ENV_SEED)]
    Seed(String),

    #[error("generation.chunk_size must be positive")]
    ChunkSize,

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// `[generation]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Parent seed used when `--seed` is not given (entropy if absent)
    pub seed: Option<u64>,
    /// Uniform chunk size used when `--chunks` is not given
    pub chunk_size: usize,
    /// Worker threads for the rayon engine (global pool if absent)
    pub threads: Option<usize>,
    /// Engine name
    #[serde(deserialize_with = "engine_from_str")]
    pub engine: EngineKind,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            threads: None,
            engine: EngineKind::Rayon,
        }
    }
}

/// Contents of `chunkrand.toml`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Default tracing level; `RUST_LOG` still takes precedence
    #[serde(deserialize_with = "level_from_str")]
    pub log_level: LevelFilter,
    /// Generation defaults
    pub generation: GenerationConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::WARN,
            generation: GenerationConfig::default(),
        }
    }
}

fn level_from_str<'de, D: Deserializer<'de>>(deserializer: D) -> Result<LevelFilter, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

fn engine_from_str<'de, D: Deserializer<'de>>(deserializer: D) -> Result<EngineKind, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_engine(&s).map_err(serde::de::Error::custom)
}

/// Parses an engine name (`serial`, `rayon` or `parallel`).
pub fn parse_engine(s: &str) -> Result<EngineKind, EngineError> {
    s.parse()
}

impl CliConfig {
    /// Parses TOML text and validates it
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: CliConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, or the defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Checks the chunk size and the engine settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.chunk_size == 0 {
            return Err(ConfigError::ChunkSize);
        }
        self.engine_config()?;
        Ok(())
    }

    fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            self.log_level = level.parse().map_err(|_| ConfigError::LogLevel(level.clone()))?;
        }
        if let Ok(seed) = std::env::var(ENV_SEED) {
            let parsed = seed.trim().parse().map_err(|_| ConfigError::Seed(seed.clone()))?;
            self.generation.seed = Some(parsed);
        }
        Ok(())
    }

    /// Applies command-line flags
    pub fn merge_with_cli(&mut self, cli: &CliOverrides) {
        if cli.verbose {
            self.log_level = LevelFilter::DEBUG;
        }
        if let Some(seed) = cli.seed {
            self.generation.seed = Some(seed);
        }
        if let Some(engine) = cli.engine {
            self.generation.engine = engine;
        }
        if let Some(threads) = cli.threads {
            self.generation.threads = Some(threads);
        }
    }

    /// Engine settings of the `[generation]` table
    pub fn engine_config(&self) -> Result<EngineConfig, EngineError> {
        EngineConfig::builder()
            .kind(self.generation.engine)
            .maybe_threads(self.generation.threads)
            .build()
    }
}

/// Values taken from command-line flags
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub verbose: bool,
    pub seed: Option<u64>,
    pub engine: Option<EngineKind>,
    pub threads: Option<usize>,
}

/// Resolves the configuration: flags over environment over file over
/// defaults.
pub fn build_config(path: &Path, cli: &CliOverrides) -> Result<CliConfig, ConfigError> {
    let mut config = CliConfig::load_or_default(path)?;
    config.merge_with_env()?;
    config.merge_with_cli(cli);
    config.validate()?;
    Ok(config)
}
