//! The lazy array handle.

use tracing::debug;

use crate::engine::{ExecutionEngine, RayonEngine};
use crate::graph::RandomGraph;
use chunkrand_core::chunks::ChunkPlan;
use chunkrand_core::types::{ChunkRandError, ElementType, Result, SampleArray, Shape};

/// A named, typed, chunk-planned reference to a not-yet-computed array.
///
/// # Examples
///
/// ```rust
/// use chunkrand_graph::RandomState;
///
/// let mut rs = RandomState::new(42);
/// let lazy = rs.normal(0.0, 1.0, [6_usize, 4], 3_usize).unwrap();
/// assert_eq!(lazy.num_chunks(), 4);
///
/// let values = lazy.compute().unwrap();
/// assert_eq!(values.len(), 24);
/// ```
#[derive(Clone, Debug)]
pub struct LazyArray {
    graph: RandomGraph,
    plan: ChunkPlan,
    dtype: ElementType,
}

impl LazyArray {
    /// Wraps a built graph.
    pub fn new(graph: RandomGraph, plan: ChunkPlan, dtype: ElementType) -> Self {
        Self { graph, plan, dtype }
    }

    /// Graph name.
    pub fn name(&self) -> &str {
        self.graph.name()
    }

    /// Overall shape: the sum of chunk sizes along each axis.
    pub fn shape(&self) -> Shape {
        self.plan.reconstructed_shape()
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.plan.ndim()
    }

    /// Total number of elements.
    pub fn size(&self) -> usize {
        self.plan.shape().size()
    }

    /// Element type of the materialised array.
    pub fn dtype(&self) -> ElementType {
        self.dtype
    }

    /// Chunk plan.
    pub fn plan(&self) -> &ChunkPlan {
        &self.plan
    }

    /// Chunk sizes per axis.
    pub fn chunks(&self) -> &[Vec<usize>] {
        self.plan.chunks()
    }

    /// Number of chunks.
    pub fn num_chunks(&self) -> usize {
        self.plan.num_chunks()
    }

    /// The underlying graph.
    pub fn graph(&self) -> &RandomGraph {
        &self.graph
    }

    /// Consumes the handle, returning its parts.
    pub fn into_parts(self) -> (RandomGraph, ChunkPlan, ElementType) {
        (self.graph, self.plan, self.dtype)
    }

    /// Materialises the whole array on the global rayon pool.
    ///
    /// # Errors
    ///
    /// `Capability` tagged with the index of the failing chunk that comes
    /// first in plan order.
    pub fn compute(&self) -> Result<SampleArray> {
        self.compute_with(&RayonEngine::new())
    }

    /// Materialises the whole array with `engine`.
    ///
    /// # Errors
    ///
    /// Any error of the engine; `ShapeMismatch` if it returns the wrong
    /// number of chunks.
    pub fn compute_with(&self, engine: &dyn ExecutionEngine) -> Result<SampleArray> {
        let blocks = engine.execute(&self.graph)?;
        if blocks.len() != self.plan.num_chunks() {
            return Err(ChunkRandError::ShapeMismatch(format!(
                "engine {} returned {} chunks, plan has {}",
                engine.name(),
                blocks.len(),
                self.plan.num_chunks()
            )));
        }

        let mut out = SampleArray::zeros(self.dtype, self.shape());
        for (chunk, block) in self.plan.iter().zip(&blocks) {
            out.insert_block(&chunk.offset, block)?;
        }
        debug!(
            graph = self.name(),
            engine = engine.name(),
            elements = out.len(),
            "materialised lazy array"
        );
        Ok(out)
    }

    /// Materialises one chunk.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an index outside the chunk grid; otherwise as
    /// [`RandomGraph::execute_node`].
    pub fn compute_chunk(&self, index: &[usize]) -> Result<SampleArray> {
        let node = self.graph.node(index).ok_or_else(|| {
            ChunkRandError::InvalidArgument(format!(
                "chunk index {:?} outside grid {:?}",
                index,
                self.plan.grid_shape()
            ))
        })?;
        self.graph.execute_node(node)
    }
}
