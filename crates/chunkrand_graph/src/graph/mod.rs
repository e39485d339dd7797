//! # Lazy Chunk Graphs
//!
//! A [`RandomGraph`] maps node identities `(graph name, chunk index)` to
//! deferred sampling tasks. Nothing is sampled until an engine executes it.
//!
//! ## Module Structure
//!
//! - `node`: [`NodeKey`], [`SampleTask`] and [`GraphNode`]
//! - `builder`: [`GraphBuilder`], plan → probe → seeds → token → nodes
//! - `token`: SHA-256 content tokens and graph names
//!
//! ## Independence
//!
//! Nodes share only read-only data (the sampler and the bound parameters).
//! Each owns its sub-seed, so nodes may run in any order, on any thread,
//! any number of times, with identical results.

mod builder;
mod node;
pub mod token;

pub use builder::{build_graph, GraphBuilder};
pub use node::{GraphNode, NodeKey, SampleTask};
pub use token::{content_token, graph_name};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::sampler::Sampler;
use chunkrand_core::types::{CapabilityError, ChunkRandError, ElementType, Result, SampleArray};

/// Lazily evaluable graph of per-chunk sampling tasks.
#[derive(Clone)]
pub struct RandomGraph {
    name: Arc<str>,
    token: String,
    sampler: Arc<dyn Sampler>,
    dtype: ElementType,
    nodes: BTreeMap<Vec<usize>, GraphNode>,
}

impl RandomGraph {
    pub(crate) fn new(
        name: Arc<str>,
        token: String,
        sampler: Arc<dyn Sampler>,
        dtype: ElementType,
        nodes: Vec<GraphNode>,
    ) -> Self {
        let nodes = nodes
            .into_iter()
            .map(|node| (node.index().to_vec(), node))
            .collect();
        Self {
            name,
            token,
            sampler,
            dtype,
            nodes,
        }
    }

    /// Graph name, `random.<distribution>-<token prefix>`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full content token (64 hex digits).
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Element type every node must produce.
    pub fn dtype(&self) -> ElementType {
        self.dtype
    }

    /// Sampler the nodes run on.
    pub fn sampler(&self) -> &dyn Sampler {
        self.sampler.as_ref()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes. Never the case for built
    /// graphs: even empty arrays have one (empty) chunk.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at chunk `index`.
    pub fn node(&self, index: &[usize]) -> Option<&GraphNode> {
        self.nodes.get(index)
    }

    /// Nodes in row-major chunk order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// Node identities in row-major chunk order.
    pub fn keys(&self) -> impl Iterator<Item = &NodeKey> {
        self.nodes.values().map(GraphNode::key)
    }

    /// Runs one node and checks its result.
    ///
    /// # Errors
    ///
    /// `Capability` tagged with the node's chunk index when the sampler
    /// fails, or when the result has the wrong shape or element type.
    pub fn execute_node(&self, node: &GraphNode) -> Result<SampleArray> {
        trace!(node = %node.key(), seed = %node.task().seed(), "executing node");
        let task = node.task();
        let fail = |message: String| {
            ChunkRandError::in_chunk(
                node.index(),
                CapabilityError::new(task.distribution().name(), message),
            )
        };

        let sample = task
            .run(self.sampler.as_ref())
            .map_err(|e| ChunkRandError::in_chunk(node.index(), e))?;

        if sample.shape() != task.shape() || !sample.is_consistent() {
            return Err(fail(format!(
                "chunk produced shape {} with {} elements, expected {}",
                sample.shape(),
                sample.len(),
                task.shape()
            )));
        }
        if sample.element_type() != self.dtype {
            return Err(fail(format!(
                "chunk produced {} values, expected {}",
                sample.element_type(),
                self.dtype
            )));
        }
        Ok(sample)
    }
}

impl fmt::Debug for RandomGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomGraph")
            .field("name", &self.name)
            .field("sampler", &self.sampler.name())
            .field("dtype", &self.dtype)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Distribution;
    use chunkrand_core::seed::{GeneratorState, SubSeed};
    use chunkrand_core::types::{Params, Shape};
    use rand::RngCore;

    /// Returns float data regardless of the requested distribution.
    struct AlwaysFloat;

    impl Sampler for AlwaysFloat {
        fn name(&self) -> &str {
            "always_float"
        }

        fn sample(
            &self,
            _distribution: Distribution,
            _params: &Params,
            _rng: &mut dyn RngCore,
            size: &Shape,
        ) -> std::result::Result<SampleArray, CapabilityError> {
            Ok(SampleArray::from_f64(size.clone(), vec![0.5; size.size()]))
        }
    }

    fn manual_graph(dtype: ElementType) -> RandomGraph {
        let name: Arc<str> = Arc::from("random.test-0");
        let task = SampleTask::new(
            Distribution::Tomaxint,
            Arc::new(Params::new()),
            Shape::from(3_usize),
            SubSeed::new(1),
        );
        let node = GraphNode::new(NodeKey::new(name.clone(), vec![0]), vec![0], task);
        RandomGraph::new(name, "0".repeat(64), Arc::new(AlwaysFloat), dtype, vec![node])
    }

    #[test]
    fn test_execute_node_checks_dtype() {
        let graph = manual_graph(ElementType::Int64);
        let node = graph.node(&[0]).unwrap();
        let err = graph.execute_node(node).unwrap_err();
        match err {
            ChunkRandError::Capability { chunk, .. } => assert_eq!(chunk, Some(vec![0])),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_execute_node_passes_matching_dtype() {
        let graph = manual_graph(ElementType::Float64);
        let node = graph.node(&[0]).unwrap();
        assert_eq!(graph.execute_node(node).unwrap().len(), 3);
    }

    #[test]
    fn test_nodes_in_row_major_order() {
        let mut state = GeneratorState::from_seed(3);
        let (graph, plan, _) = build_graph(
            Arc::new(crate::sampler::RandDistrSampler::new()),
            Distribution::StandardNormal,
            Params::new(),
            [5_usize, 5],
            2_usize,
            &mut state,
        )
        .unwrap();
        let from_graph: Vec<Vec<usize>> = graph.nodes().map(|n| n.index().to_vec()).collect();
        let from_plan: Vec<Vec<usize>> = plan.iter().map(|c| c.index).collect();
        assert_eq!(from_graph, from_plan);
        assert!(graph.keys().all(|k| k.name() == graph.name()));
    }
}
