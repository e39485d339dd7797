//! # chunkrand_core: Foundation for Chunked Random Arrays
//!
//! ## Layer 1 (Foundation) Role
//!
//! chunkrand_core is the bottom layer of the workspace, providing:
//! - Array shapes and element types (`types`)
//! - Chunk specifications and row-major chunk plans (`chunks`)
//! - Caller-owned generator state and sub-seed derivation (`seed`)
//! - Distribution parameter values (`types::params`)
//! - Error types: `ChunkRandError`, `CapabilityError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other chunkrand_* crates and performs no
//! sampling. Its only randomness is the parent generator used to draw
//! sub-seeds.
//!
//! ## Usage Examples
//!
//! ```rust
//! use chunkrand_core::chunks::ChunkPlan;
//! use chunkrand_core::seed::GeneratorState;
//! use chunkrand_core::types::Shape;
//!
//! // Partition a 10 x 6 array into 4 x 3 chunks
//! let plan = ChunkPlan::new(Shape::from([10_usize, 6]), [4_usize, 3]).unwrap();
//! assert_eq!(plan.grid_shape(), vec![3, 2]);
//!
//! // One independent seed per chunk
//! let mut state = GeneratorState::from_seed(42);
//! let seeds = state.derive_seeds(plan.num_chunks());
//! assert_eq!(seeds.len(), 6);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod chunks;
pub mod seed;
pub mod types;

pub use chunks::{AxisChunks, ChunkDescriptor, ChunkPlan, ChunkSpec};
pub use seed::{GeneratorState, SubSeed};
pub use types::{
    ArrayData, CapabilityError, ChunkRandError, ElementType, ParamValue, Params, Result,
    SampleArray, Shape,
};
