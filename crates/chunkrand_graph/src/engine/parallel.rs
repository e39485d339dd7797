//! Parallel execution on rayon.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::fmt;
use tracing::debug;

use super::{EngineConfig, EngineError, ExecutionEngine};
use crate::graph::{GraphNode, RandomGraph};
use chunkrand_core::types::{Result, SampleArray};

/// Runs nodes in parallel with rayon.
///
/// Without a thread count the global rayon pool is used; otherwise the
/// engine owns a dedicated pool of that size.
///
/// # Examples
///
/// ```rust
/// use chunkrand_graph::engine::{EngineConfig, ExecutionEngine, RayonEngine};
///
/// let config = EngineConfig::builder().threads(2).build().unwrap();
/// let engine = RayonEngine::from_config(&config).unwrap();
/// assert_eq!(engine.threads(), 2);
/// ```
#[derive(Default)]
pub struct RayonEngine {
    pool: Option<ThreadPool>,
}

impl RayonEngine {
    /// Engine on the global rayon pool.
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// Engine with a dedicated pool of `threads` workers.
    ///
    /// # Errors
    ///
    /// `InvalidThreads` for 0, `ThreadPool` if the pool cannot be built.
    pub fn with_threads(threads: usize) -> std::result::Result<Self, EngineError> {
        let config = EngineConfig::builder().threads(threads).build()?;
        Self::from_config(&config)
    }

    /// Engine following `config`'s thread setting.
    ///
    /// # Errors
    ///
    /// `ThreadPool` if the pool cannot be built.
    pub fn from_config(config: &EngineConfig) -> std::result::Result<Self, EngineError> {
        config.validate()?;
        let pool = match config.threads() {
            Some(threads) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("chunkrand-worker-{i}"))
                    .build()
                    .map_err(|e| EngineError::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };
        Ok(Self { pool })
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    // Every node runs to completion so the reported failure is the one
    // with the lowest plan position, independent of scheduling.
    fn run(graph: &RandomGraph) -> Result<Vec<SampleArray>> {
        let nodes: Vec<&GraphNode> = graph.nodes().collect();
        let results: Vec<Result<SampleArray>> = nodes
            .par_iter()
            .map(|node| graph.execute_node(node))
            .collect();
        results.into_iter().collect()
    }
}

impl ExecutionEngine for RayonEngine {
    fn name(&self) -> &str {
        "rayon"
    }

    fn execute(&self, graph: &RandomGraph) -> Result<Vec<SampleArray>> {
        debug!(
            graph = graph.name(),
            nodes = graph.len(),
            threads = self.threads(),
            "parallel execution"
        );
        match &self.pool {
            Some(pool) => pool.install(|| Self::run(graph)),
            None => Self::run(graph),
        }
    }
}

impl fmt::Debug for RayonEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RayonEngine")
            .field("dedicated_pool", &self.pool.is_some())
            .field("threads", &self.threads())
            .finish()
    }
}
