//! # Execution Engines
//!
//! An [`ExecutionEngine`] runs every node of a [`RandomGraph`] and returns
//! the chunk results in row-major plan order. Assembly into one array is
//! left to the [`LazyArray`](crate::LazyArray) handle.
//!
//! - [`SerialEngine`]: calling thread, plan order
//! - [`RayonEngine`]: rayon work stealing, optionally on a dedicated pool
//!
//! Because every node owns its sub-seed, both engines produce identical
//! chunks.

mod config;
mod parallel;
mod serial;

pub use config::{EngineConfig, EngineConfigBuilder, EngineError, EngineKind, MAX_THREADS};
pub use parallel::RayonEngine;
pub use serial::SerialEngine;

use crate::graph::RandomGraph;
use chunkrand_core::types::{Result, SampleArray};

/// Executes lazy graphs.
pub trait ExecutionEngine: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &str;

    /// Runs every node of `graph`, returning results in plan order.
    ///
    /// # Errors
    ///
    /// The error of the failing node that comes first in plan order (see
    /// [`RandomGraph::execute_node`]), whatever order nodes ran in.
    fn execute(&self, graph: &RandomGraph) -> Result<Vec<SampleArray>>;
}
