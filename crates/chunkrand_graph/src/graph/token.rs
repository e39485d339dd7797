//! Content-derived graph tokens.

use sha2::{Digest, Sha256};

use crate::registry::Distribution;
use chunkrand_core::chunks::ChunkPlan;
use chunkrand_core::seed::SubSeed;
use chunkrand_core::types::{Params, Shape};

const DOMAIN: &[u8] = b"chunkrand/graph/v1";

/// Number of hex digits of the token kept in graph names.
pub const NAME_TOKEN_LEN: usize = 32;

/// SHA-256 (lower-case hex) over the canonical encoding of a request.
///
/// Equal inputs always give equal tokens. The token identifies a graph; it
/// never feeds into sampled values.
pub fn content_token(
    seeds: &[SubSeed],
    shape: &Shape,
    plan: &ChunkPlan,
    distribution: Distribution,
    params: &Params,
) -> String {
    let mut bytes = Vec::with_capacity(DOMAIN.len() + 8 * (seeds.len() + 16));
    bytes.extend_from_slice(DOMAIN);

    put_len(&mut bytes, seeds.len());
    for seed in seeds {
        bytes.extend_from_slice(&seed.value().to_le_bytes());
    }

    put_len(&mut bytes, shape.ndim());
    for &dim in shape.dims() {
        put_len(&mut bytes, dim);
    }

    put_len(&mut bytes, plan.ndim());
    for sizes in plan.chunks() {
        put_len(&mut bytes, sizes.len());
        for &size in sizes {
            put_len(&mut bytes, size);
        }
    }

    let name = distribution.name().as_bytes();
    put_len(&mut bytes, name.len());
    bytes.extend_from_slice(name);

    params.encode_into(&mut bytes);

    format!("{:x}", Sha256::digest(&bytes))
}

/// Graph name for a token: `random.<distribution>-<token prefix>`.
pub fn graph_name(distribution: Distribution, token: &str) -> String {
    let prefix = token.get(..NAME_TOKEN_LEN).unwrap_or(token);
    format!("random.{}-{}", distribution.name(), prefix)
}

#[inline]
fn put_len(bytes: &mut Vec<u8>, value: usize) {
    bytes.extend_from_slice(&(value as u64).to_le_bytes());
}
