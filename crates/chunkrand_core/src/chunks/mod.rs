//! # Chunk Planning
//!
//! Partitions an array shape into rectangular chunks.
//!
//! ## Module Structure
//!
//! - [`spec`]: [`ChunkSpec`] requests and their per-axis normalisation
//! - [`plan`]: [`ChunkPlan`], the row-major chunk grid
//!
//! ## Usage Example
//!
//! ```rust
//! use chunkrand_core::chunks::{ChunkPlan, ChunkSpec};
//!
//! let spec: ChunkSpec = "3+3+4,5".parse().unwrap();
//! let plan = ChunkPlan::new(vec![10_usize, 12], spec).unwrap();
//!
//! assert_eq!(plan.grid_shape(), vec![3, 3]);
//! assert_eq!(plan.chunks()[1], vec![5, 5, 2]);
//! assert_eq!(plan.reconstructed_shape(), *plan.shape());
//! ```

pub mod plan;
pub mod spec;

pub use plan::{plan, ChunkDescriptor, ChunkIter, ChunkPlan};
pub use spec::{AxisChunks, ChunkSpec};
