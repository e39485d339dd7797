//! Graph construction.

use std::sync::Arc;

use tracing::{debug, warn};

use super::node::{GraphNode, NodeKey, SampleTask};
use super::token::{content_token, graph_name};
use super::RandomGraph;
use crate::probe::probe_element_type;
use crate::registry::Distribution;
use crate::sampler::Sampler;
use chunkrand_core::chunks::{ChunkPlan, ChunkSpec};
use chunkrand_core::seed::GeneratorState;
use chunkrand_core::types::{ElementType, Params, Result, Shape};

/// Builds lazy graphs on one sampler.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use chunkrand_core::seed::GeneratorState;
/// use chunkrand_core::types::Params;
/// use chunkrand_graph::graph::GraphBuilder;
/// use chunkrand_graph::registry::Distribution;
/// use chunkrand_graph::sampler::RandDistrSampler;
///
/// let builder = GraphBuilder::new(Arc::new(RandDistrSampler::new()));
/// let mut state = GeneratorState::from_seed(42);
/// let (graph, plan, _dtype) = builder
///     .build(Distribution::StandardNormal, Params::new(), 10_usize, 4_usize, &mut state)
///     .unwrap();
///
/// assert_eq!(graph.len(), plan.num_chunks());
/// assert!(graph.name().starts_with("random.standard_normal-"));
/// ```
#[derive(Clone)]
pub struct GraphBuilder {
    sampler: Arc<dyn Sampler>,
}

impl GraphBuilder {
    /// Creates a builder on `sampler`.
    pub fn new(sampler: Arc<dyn Sampler>) -> Self {
        Self { sampler }
    }

    /// Sampler used for probing and by the built graphs.
    pub fn sampler(&self) -> &Arc<dyn Sampler> {
        &self.sampler
    }

    /// Plans, probes, derives seeds and emits one node per chunk.
    ///
    /// The plan and the probe run before any sub-seed is drawn, so a
    /// failing request leaves `seed_source` untouched.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` / `ShapeMismatch` from planning
    /// - `Capability` from the probe
    pub fn build(
        &self,
        distribution: Distribution,
        params: Params,
        shape: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
        seed_source: &mut GeneratorState,
    ) -> Result<(RandomGraph, ChunkPlan, ElementType)> {
        let shape = shape.into();
        let plan = ChunkPlan::new(shape.clone(), chunks)?;
        debug!(
            distribution = distribution.name(),
            shape = %shape,
            grid = ?plan.grid_shape(),
            chunks = plan.num_chunks(),
            "planned chunks"
        );

        let dtype = probe_element_type(self.sampler.as_ref(), distribution, &params, shape.ndim())?;
        if dtype != distribution.element_type() {
            warn!(
                distribution = distribution.name(),
                declared = distribution.element_type().name(),
                probed = dtype.name(),
                "sampler element type differs from the registry"
            );
        }

        let seeds = seed_source.derive_seeds(plan.num_chunks());
        let token = content_token(&seeds, &shape, &plan, distribution, &params);
        let name: Arc<str> = Arc::from(graph_name(distribution, &token));

        let params = Arc::new(params);
        let nodes: Vec<GraphNode> = plan
            .iter()
            .zip(seeds)
            .map(|(chunk, seed)| {
                let task = SampleTask::new(distribution, Arc::clone(&params), chunk.shape, seed);
                GraphNode::new(NodeKey::new(Arc::clone(&name), chunk.index), chunk.offset, task)
            })
            .collect();

        debug!(
            graph = %name,
            nodes = nodes.len(),
            dtype = dtype.name(),
            "built lazy graph"
        );

        let graph = RandomGraph::new(name, token, Arc::clone(&self.sampler), dtype, nodes);
        Ok((graph, plan, dtype))
    }
}

/// Free-function form of [`GraphBuilder::build`].
pub fn build_graph(
    sampler: Arc<dyn Sampler>,
    distribution: Distribution,
    params: Params,
    shape: impl Into<Shape>,
    chunks: impl Into<ChunkSpec>,
    seed_source: &mut GeneratorState,
) -> Result<(RandomGraph, ChunkPlan, ElementType)> {
    GraphBuilder::new(sampler).build(distribution, params, shape, chunks, seed_source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::RandDistrSampler;
    use chunkrand_core::types::{ChunkRandError, ParamValue};

    fn builder() -> GraphBuilder {
        GraphBuilder::new(Arc::new(RandDistrSampler::new()))
    }

    #[test]
    fn test_same_seed_same_graph() {
        let params = Params::from_args(vec![ParamValue::Float(0.0), ParamValue::Float(1.0)]);
        let mut a = GeneratorState::from_seed(99);
        let mut b = GeneratorState::from_seed(99);
        let (ga, _, _) = builder()
            .build(Distribution::Normal, params.clone(), [6_usize, 4], 3_usize, &mut a)
            .unwrap();
        let (gb, _, _) = builder()
            .build(Distribution::Normal, params, [6_usize, 4], 3_usize, &mut b)
            .unwrap();
        assert_eq!(ga.name(), gb.name());
        let seeds_a: Vec<_> = ga.nodes().map(|n| n.task().seed()).collect();
        let seeds_b: Vec<_> = gb.nodes().map(|n| n.task().seed()).collect();
        assert_eq!(seeds_a, seeds_b);
    }

    #[test]
    fn test_successive_builds_differ() {
        let mut state = GeneratorState::from_seed(5);
        let (first, _, _) = builder()
            .build(Distribution::StandardNormal, Params::new(), 10_usize, 5_usize, &mut state)
            .unwrap();
        let (second, _, _) = builder()
            .build(Distribution::StandardNormal, Params::new(), 10_usize, 5_usize, &mut state)
            .unwrap();
        assert_ne!(first.name(), second.name());
        assert_eq!(state.issued(), 4);
    }

    #[test]
    fn test_plan_error_leaves_state_untouched() {
        let mut state = GeneratorState::from_seed(5);
        let err = builder()
            .build(
                Distribution::StandardNormal,
                Params::new(),
                10_usize,
                ChunkSpec::explicit(vec![vec![3, 3, 3]]),
                &mut state,
            )
            .unwrap_err();
        assert!(matches!(err, ChunkRandError::ShapeMismatch(_)));
        assert_eq!(state.issued(), 0);
    }

    #[test]
    fn test_probe_error_leaves_state_untouched() {
        let mut state = GeneratorState::from_seed(5);
        let params = Params::from_args(vec![ParamValue::Float(0.0), ParamValue::Float(-2.0)]);
        let err = builder()
            .build(Distribution::Normal, params, 10_usize, 5_usize, &mut state)
            .unwrap_err();
        assert!(matches!(err, ChunkRandError::Capability { chunk: None, .. }));
        assert_eq!(state.issued(), 0);
    }

    #[test]
    fn test_node_shapes_follow_plan() {
        let mut state = GeneratorState::from_seed(1);
        let (graph, plan, dtype) = builder()
            .build(Distribution::Tomaxint, Params::new(), [7_usize, 3], [4_usize, 2], &mut state)
            .unwrap();
        assert_eq!(dtype, ElementType::Int64);
        for chunk in plan.iter() {
            let node = graph.node(&chunk.index).unwrap();
            assert_eq!(node.task().shape(), &chunk.shape);
            assert_eq!(node.offset(), chunk.offset.as_slice());
        }
    }
}
