//! # Seed Derivation
//!
//! Turns one caller-owned parent generator into an ordered sequence of
//! independent per-chunk seeds.
//!
//! ## Design
//!
//! - **Reproducibility**: equal parent seeds derive equal sub-seed sequences
//! - **Uniqueness**: no sub-seed repeats within one derivation
//! - **Disjointness**: derivation advances the parent, so successive requests
//!   on one state never share seeds
//! - **No global state**: the parent is an explicit value borrowed mutably
//!   for the duration of a derivation
//!
//! Chunk generators are `rand::rngs::StdRng` seeded via
//! `SeedableRng::seed_from_u64`.
//!
//! ## Usage Example
//!
//! ```rust
//! use chunkrand_core::seed::{derive_seeds, GeneratorState};
//! use rand::Rng;
//!
//! let mut parent = GeneratorState::from_seed(42);
//! let seeds = derive_seeds(&mut parent, 4);
//! assert_eq!(seeds.len(), 4);
//!
//! // Each chunk gets its own generator
//! let mut rng = seeds[0].generator();
//! let _value: f64 = rng.gen();
//! ```

mod state;

pub use state::{derive_seeds, try_derive_seeds, GeneratorState, SubSeed};
