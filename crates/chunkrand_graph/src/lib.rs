//! # chunkrand_graph: Lazy Chunked Random Arrays
//!
//! ## Layer 2 (Engine) Role
//!
//! chunkrand_graph builds on chunkrand_core and provides:
//! - The closed distribution catalogue (`registry`)
//! - The sampling capability seam and its default `rand_distr` implementation (`sampler`)
//! - Element type probing with zero-size requests (`probe`)
//! - Lazy per-chunk graphs with content-derived names (`graph`)
//! - Serial and rayon execution engines (`engine`)
//! - The [`LazyArray`] handle and the caller-owned [`RandomState`]
//!
//! ## Data Flow
//!
//! ```text
//! RandomState::normal(..)
//!   -> registry: resolve + bind defaults
//!   -> ChunkPlan (shape x chunks)
//!   -> probe element type (zero-size sample)
//!   -> derive one sub-seed per chunk
//!   -> SHA-256 token, graph name
//!   -> one SampleTask node per chunk
//!   -> LazyArray (nothing sampled yet)
//! ```
//!
//! ## Usage Examples
//!
//! ```rust
//! use chunkrand_graph::engine::SerialEngine;
//! use chunkrand_graph::RandomState;
//!
//! let mut rs = RandomState::new(42);
//! let lazy = rs.standard_normal([1000_usize, 10], [250_usize, 10]).unwrap();
//! assert_eq!(lazy.num_chunks(), 4);
//!
//! // Serial and parallel execution agree bit for bit
//! let parallel = lazy.compute().unwrap();
//! let serial = lazy.compute_with(&SerialEngine::new()).unwrap();
//! assert_eq!(parallel, serial);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod engine;
pub mod graph;
pub mod handle;
pub mod probe;
pub mod registry;
pub mod sampler;
pub mod state;

pub use engine::{EngineConfig, EngineKind, ExecutionEngine, RayonEngine, SerialEngine};
pub use graph::{GraphBuilder, RandomGraph};
pub use handle::LazyArray;
pub use probe::probe_element_type;
pub use registry::{Distribution, DistributionRegistry, DistributionSpec};
pub use sampler::{RandDistrSampler, Sampler};
pub use state::RandomState;
