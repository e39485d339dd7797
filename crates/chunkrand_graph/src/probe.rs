//! Output element type discovery.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::registry::Distribution;
use crate::sampler::Sampler;
use chunkrand_core::types::{ChunkRandError, ElementType, Params, Result, Shape};

/// Asks `sampler` for an empty sample and reports its element type.
///
/// Every output dimension is set to 0 and a throwaway generator is used, so
/// no caller state is touched. A zero-dimensional request is probed with
/// one zero-length axis instead, since `()` holds one element.
///
/// # Errors
///
/// `Capability` (without a chunk index) when the sampler rejects the request.
pub fn probe_element_type(
    sampler: &dyn Sampler,
    distribution: Distribution,
    params: &Params,
    ndim: usize,
) -> Result<ElementType> {
    let mut rng = StdRng::seed_from_u64(0);
    let empty = Shape::zeros(ndim.max(1));
    let sample = sampler
        .sample(distribution, params, &mut rng, &empty)
        .map_err(ChunkRandError::probe)?;
    let dtype = sample.element_type();
    debug!(
        distribution = distribution.name(),
        sampler = sampler.name(),
        dtype = dtype.name(),
        "probed element type"
    );
    Ok(dtype)
}
