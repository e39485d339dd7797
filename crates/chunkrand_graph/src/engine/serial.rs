//! Single-threaded execution.

use tracing::debug;

use super::ExecutionEngine;
use crate::graph::RandomGraph;
use chunkrand_core::types::{Result, SampleArray};

/// Runs nodes one after another on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialEngine;

impl SerialEngine {
    /// Creates a serial engine.
    pub fn new() -> Self {
        Self
    }
}

impl ExecutionEngine for SerialEngine {
    fn name(&self) -> &str {
        "serial"
    }

    fn execute(&self, graph: &RandomGraph) -> Result<Vec<SampleArray>> {
        debug!(graph = graph.name(), nodes = graph.len(), "serial execution");
        graph.nodes().map(|node| graph.execute_node(node)).collect()
    }
}
