//! Graph nodes: one deferred sampling task per chunk.

use std::fmt;
use std::sync::Arc;

use crate::registry::Distribution;
use crate::sampler::Sampler;
use chunkrand_core::seed::SubSeed;
use chunkrand_core::types::{CapabilityError, Params, SampleArray, Shape};

/// Identity of a node: graph name plus chunk multi-index.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    name: Arc<str>,
    index: Vec<usize>,
}

impl NodeKey {
    /// Creates a key.
    pub fn new(name: Arc<str>, index: Vec<usize>) -> Self {
        Self { name, index }
    }

    /// Graph name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Chunk multi-index.
    pub fn index(&self) -> &[usize] {
        &self.index
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {:?})", self.name, self.index)
    }
}

/// "Sample `shape` values of `distribution` with `params`, using a generator
/// freshly initialised from `seed`."
#[derive(Clone, Debug)]
pub struct SampleTask {
    distribution: Distribution,
    params: Arc<Params>,
    shape: Shape,
    seed: SubSeed,
}

impl SampleTask {
    /// Creates a task.
    pub fn new(distribution: Distribution, params: Arc<Params>, shape: Shape, seed: SubSeed) -> Self {
        Self {
            distribution,
            params,
            shape,
            seed,
        }
    }

    /// Distribution sampled by the task.
    pub fn distribution(&self) -> Distribution {
        self.distribution
    }

    /// Bound parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Requested local shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Sub-seed of the chunk generator.
    pub fn seed(&self) -> SubSeed {
        self.seed
    }

    /// Runs the task. Re-running yields identical values.
    pub fn run(&self, sampler: &dyn Sampler) -> Result<SampleArray, CapabilityError> {
        let mut rng = self.seed.generator();
        sampler.sample(self.distribution, &self.params, &mut rng, &self.shape)
    }
}

/// A node of a [`RandomGraph`](super::RandomGraph).
#[derive(Clone, Debug)]
pub struct GraphNode {
    key: NodeKey,
    offset: Vec<usize>,
    task: SampleTask,
}

impl GraphNode {
    pub(crate) fn new(key: NodeKey, offset: Vec<usize>, task: SampleTask) -> Self {
        Self { key, offset, task }
    }

    /// Node identity.
    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    /// Chunk multi-index.
    pub fn index(&self) -> &[usize] {
        self.key.index()
    }

    /// Element offset of the chunk in the full array.
    pub fn offset(&self) -> &[usize] {
        &self.offset
    }

    /// Deferred computation.
    pub fn task(&self) -> &SampleTask {
        &self.task
    }
}
