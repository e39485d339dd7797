//! Caller-owned generator state and sub-seed derivation.
//!
//! This module provides [`GeneratorState`], the parent generator from which
//! per-chunk [`SubSeed`]s are drawn, and [`derive_seeds`], the sequencer
//! that draws them.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::types::{ChunkRandError, Result};

/// Seed of one chunk's generator.
///
/// Every chunk is sampled with a generator freshly initialised from its
/// sub-seed, so the chunk's values depend on nothing else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubSeed(u64);

impl SubSeed {
    /// Wraps a raw seed value.
    #[inline]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw seed value.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Creates a fresh chunk generator initialised from this seed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chunkrand_core::seed::SubSeed;
    /// use rand::Rng;
    ///
    /// let mut a = SubSeed::new(7).generator();
    /// let mut b = SubSeed::new(7).generator();
    /// assert_eq!(a.gen::<u64>(), b.gen::<u64>());
    /// ```
    #[inline]
    pub fn generator(&self) -> StdRng {
        StdRng::seed_from_u64(self.0)
    }
}

impl fmt::Display for SubSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Parent generator state for sub-seed derivation.
///
/// Each public request borrows the state mutably while it derives its
/// sub-seeds, advancing the state so that the next request draws a
/// disjoint sequence.
///
/// # Examples
///
/// ```rust
/// use chunkrand_core::seed::GeneratorState;
///
/// let mut a = GeneratorState::from_seed(1234);
/// let mut b = GeneratorState::from_seed(1234);
///
/// // Same seed, same sub-seeds
/// assert_eq!(a.derive_seeds(8), b.derive_seeds(8));
///
/// // The state advanced: the next derivation differs
/// let again = a.derive_seeds(8);
/// assert_ne!(again, GeneratorState::from_seed(1234).derive_seeds(8));
/// ```
pub struct GeneratorState {
    inner: StdRng,
    seed: Option<u64>,
    issued: u64,
}

impl GeneratorState {
    /// Creates a state initialised from a 64-bit seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed: Some(seed),
            issued: 0,
        }
    }

    /// Creates a state from a vector of 32-bit words.
    ///
    /// The words (and their count) are folded into a 64-bit seed with a
    /// SplitMix64 mixer, so `[1]` and `[1, 0]` give different states.
    pub fn from_seed_words(words: &[u32]) -> Self {
        let folded = words.iter().fold(
            splitmix64(words.len() as u64),
            |acc, &w| splitmix64(acc ^ u64::from(w)),
        );
        Self::from_seed(folded)
    }

    /// Creates a state seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
            seed: None,
            issued: 0,
        }
    }

    /// Re-initialises the state; `None` draws fresh entropy.
    pub fn reseed(&mut self, seed: Option<u64>) {
        *self = match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        };
    }

    /// The seed this state was initialised from (`None` for entropy).
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Number of sub-seeds issued since initialisation.
    #[inline]
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Draws `count` distinct sub-seeds.
    ///
    /// See [`derive_seeds`].
    pub fn derive_seeds(&mut self, count: usize) -> Vec<SubSeed> {
        derive_seeds(self, count)
    }
}

impl fmt::Debug for GeneratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorState")
            .field("seed", &self.seed)
            .field("issued", &self.issued)
            .finish_non_exhaustive()
    }
}

/// Draws `count` distinct sub-seeds from `parent`.
///
/// Seeds are taken from the parent's stream in order; a value already drawn
/// in this call is discarded and redrawn, so the result never holds
/// duplicates. The parent advances by at least `count` draws.
pub fn derive_seeds(parent: &mut GeneratorState, count: usize) -> Vec<SubSeed> {
    let mut seen = HashSet::with_capacity(count);
    let mut seeds = Vec::with_capacity(count);
    while seeds.len() < count {
        let value = parent.inner.next_u64();
        if seen.insert(value) {
            seeds.push(SubSeed(value));
        }
    }
    parent.issued += count as u64;
    seeds
}

/// Signed-count form of [`derive_seeds`] for untyped input.
///
/// # Errors
///
/// `InvalidArgument` if `count` is negative.
pub fn try_derive_seeds(parent: &mut GeneratorState, count: i64) -> Result<Vec<SubSeed>> {
    let count = usize::try_from(count).map_err(|_| {
        ChunkRandError::InvalidArgument(format!("seed count must be non-negative, got {}", count))
    })?;
    Ok(derive_seeds(parent, count))
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
