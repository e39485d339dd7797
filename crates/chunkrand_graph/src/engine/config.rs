//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::{ExecutionEngine, RayonEngine, SerialEngine};

/// Maximum number of worker threads accepted by [`EngineConfig`].
pub const MAX_THREADS: usize = 1024;

/// Engine configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Thread count out of range.
    #[error("Invalid thread count: {0} (must be in [1, {max}])", max = MAX_THREADS)]
    InvalidThreads(usize),

    /// Unknown engine name.
    #[error("Unknown engine: {0} (expected 'serial' or 'rayon')")]
    UnknownEngine(String),

    /// The thread pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

/// Which engine executes a graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// One node after another on the calling thread.
    Serial,
    /// Nodes spread over a rayon thread pool.
    #[default]
    Rayon,
}

impl EngineKind {
    /// Lower-case name.
    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::Serial => "serial",
            EngineKind::Rayon => "rayon",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for EngineKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serial" => Ok(EngineKind::Serial),
            "rayon" | "parallel" => Ok(EngineKind::Rayon),
            other => Err(EngineError::UnknownEngine(other.to_string())),
        }
    }
}

/// Execution engine configuration.
///
/// Use [`EngineConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use chunkrand_graph::engine::{EngineConfig, EngineKind};
///
/// let config = EngineConfig::builder()
///     .kind(EngineKind::Rayon)
///     .threads(4)
///     .build()
///     .unwrap();
/// assert_eq!(config.threads(), Some(4));
///
/// assert!(EngineConfig::builder().threads(0).build().is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineConfig {
    kind: EngineKind,
    threads: Option<usize>,
}

impl EngineConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Engine kind.
    #[inline]
    pub fn kind(&self) -> EngineKind {
        self.kind
    }

    /// Worker threads; `None` uses the global rayon pool.
    #[inline]
    pub fn threads(&self) -> Option<usize> {
        self.threads
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// `InvalidThreads` if `threads` is 0 or above [`MAX_THREADS`].
    pub fn validate(&self) -> Result<(), EngineError> {
        match self.threads {
            Some(n) if n == 0 || n > MAX_THREADS => Err(EngineError::InvalidThreads(n)),
            _ => Ok(()),
        }
    }

    /// Creates the configured engine.
    ///
    /// # Errors
    ///
    /// `ThreadPool` if a dedicated pool cannot be created.
    pub fn build_engine(&self) -> Result<Box<dyn ExecutionEngine>, EngineError> {
        match self.kind {
            EngineKind::Serial => Ok(Box::new(SerialEngine::new())),
            EngineKind::Rayon => Ok(Box::new(RayonEngine::from_config(self)?)),
        }
    }
}

/// Builder for [`EngineConfig`].
#[derive(Clone, Debug, Default)]
pub struct EngineConfigBuilder {
    kind: EngineKind,
    threads: Option<usize>,
}

impl EngineConfigBuilder {
    /// Sets the engine kind.
    #[inline]
    pub fn kind(mut self, kind: EngineKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the number of worker threads.
    #[inline]
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Sets the number of worker threads, or clears it.
    #[inline]
    pub fn maybe_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// See [`EngineConfig::validate`].
    pub fn build(self) -> Result<EngineConfig, EngineError> {
        let config = EngineConfig {
            kind: self.kind,
            threads: self.threads,
        };
        config.validate()?;
        Ok(config)
    }
}
