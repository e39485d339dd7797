//! Chunk specifications and their per-axis normalisation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::shape::parse_len;
use crate::types::{ChunkRandError, Result};

/// Chunking of a single axis.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisChunks {
    /// Uniform chunk size; the final chunk holds the remainder.
    Size(usize),
    /// Explicit ordered chunk sizes; must sum to the axis length.
    Explicit(Vec<usize>),
}

/// Requested chunking of an array.
///
/// # Examples
///
/// ```
/// use chunkrand_core::chunks::{AxisChunks, ChunkSpec};
///
/// // Same chunk size on every axis
/// let uniform = ChunkSpec::from(4_usize);
///
/// // Per-axis sizes
/// let per_axis = ChunkSpec::from(vec![4_usize, 5]);
///
/// // Explicit chunks on the first axis, uniform on the second
/// let mixed = ChunkSpec::PerAxis(vec![
///     AxisChunks::Explicit(vec![3, 3, 4]),
///     AxisChunks::Size(5),
/// ]);
/// assert_eq!(mixed.to_string(), "3+3+4,5");
/// # let _ = (uniform, per_axis);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChunkSpec {
    /// One chunk size applied to every axis.
    Uniform(usize),
    /// One entry per axis.
    PerAxis(Vec<AxisChunks>),
}

impl ChunkSpec {
    /// Per-axis explicit chunk sizes.
    pub fn explicit(axes: Vec<Vec<usize>>) -> Self {
        ChunkSpec::PerAxis(axes.into_iter().map(AxisChunks::Explicit).collect())
    }

    /// Normalises the specification against `dims`.
    ///
    /// Every returned axis is an ordered list of positive sizes summing to
    /// the axis length, except that a zero-length axis becomes `[0]`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for zero chunk sizes
    /// - `ShapeMismatch` for rank disagreement or explicit sizes that do not
    ///   sum to the axis length (including sums that overflow `usize`)
    pub fn normalize(&self, dims: &[usize]) -> Result<Vec<Vec<usize>>> {
        match self {
            ChunkSpec::Uniform(size) => dims
                .iter()
                .enumerate()
                .map(|(axis, &len)| normalize_axis(axis, len, &AxisChunks::Size(*size)))
                .collect(),
            ChunkSpec::PerAxis(axes) => {
                if axes.len() != dims.len() {
                    return Err(ChunkRandError::ShapeMismatch(format!(
                        "chunk specification has {} axes but shape has {}",
                        axes.len(),
                        dims.len()
                    )));
                }
                dims.iter()
                    .zip(axes)
                    .enumerate()
                    .map(|(axis, (&len, chunks))| normalize_axis(axis, len, chunks))
                    .collect()
            }
        }
    }
}

fn normalize_axis(axis: usize, len: usize, chunks: &AxisChunks) -> Result<Vec<usize>> {
    match chunks {
        AxisChunks::Size(0) => Err(ChunkRandError::InvalidArgument(format!(
            "chunk size on axis {} must be positive",
            axis
        ))),
        AxisChunks::Size(_) if len == 0 => Ok(vec![0]),
        AxisChunks::Size(size) => {
            let mut sizes = vec![*size; len / size];
            if len % size != 0 {
                sizes.push(len % size);
            }
            Ok(sizes)
        }
        AxisChunks::Explicit(sizes) => {
            if len == 0 && sizes.iter().all(|&s| s == 0) {
                return Ok(vec![0]);
            }
            if sizes.iter().any(|&s| s == 0) {
                return Err(ChunkRandError::InvalidArgument(format!(
                    "explicit chunk sizes on axis {} must be positive, got {:?}",
                    axis, sizes
                )));
            }
            let total = sizes.iter().try_fold(0_usize, |acc, &s| acc.checked_add(s));
            match total {
                Some(total) if total == len => {}
                Some(total) => {
                    return Err(ChunkRandError::ShapeMismatch(format!(
                        "chunks {:?} on axis {} sum to {}, expected {}",
                        sizes, axis, total, len
                    )));
                }
                None => {
                    return Err(ChunkRandError::ShapeMismatch(format!(
                        "chunks {:?} on axis {} overflow, expected a total of {}",
                        sizes, axis, len
                    )));
                }
            }
            Ok(sizes.clone())
        }
    }
}

impl From<usize> for ChunkSpec {
    fn from(size: usize) -> Self {
        ChunkSpec::Uniform(size)
    }
}

impl From<Vec<usize>> for ChunkSpec {
    fn from(sizes: Vec<usize>) -> Self {
        ChunkSpec::PerAxis(sizes.into_iter().map(AxisChunks::Size).collect())
    }
}

impl<const N: usize> From<[usize; N]> for ChunkSpec {
    fn from(sizes: [usize; N]) -> Self {
        ChunkSpec::from(sizes.to_vec())
    }
}

impl From<Vec<Vec<usize>>> for ChunkSpec {
    fn from(axes: Vec<Vec<usize>>) -> Self {
        ChunkSpec::explicit(axes)
    }
}

impl From<Vec<AxisChunks>> for ChunkSpec {
    fn from(axes: Vec<AxisChunks>) -> Self {
        ChunkSpec::PerAxis(axes)
    }
}

impl fmt::Display for AxisChunks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisChunks::Size(size) => write!(f, "{}", size),
            AxisChunks::Explicit(sizes) => {
                let parts: Vec<String> = sizes.iter().map(|s| s.to_string()).collect();
                write!(f, "{}", parts.join("+"))
            }
        }
    }
}

impl fmt::Display for ChunkSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkSpec::Uniform(size) => write!(f, "{}", size),
            ChunkSpec::PerAxis(axes) => {
                let parts: Vec<String> = axes.iter().map(|a| a.to_string()).collect();
                write!(f, "{}", parts.join(","))
            }
        }
    }
}

impl FromStr for ChunkSpec {
    type Err = ChunkRandError;

    /// Parses `"4"` (uniform), `"4,5"` (per axis) and `"3+3+4,5"`
    /// (explicit sizes joined by `+`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ChunkRandError::InvalidArgument(
                "empty chunk specification".to_string(),
            ));
        }
        if !s.contains(',') && !s.contains('+') {
            return parse_len(s, "chunk size").map(ChunkSpec::Uniform);
        }
        s.split(',')
            .map(|axis| {
                if axis.contains('+') {
                    axis.split('+')
                        .map(|t| parse_len(t, "chunk size"))
                        .collect::<Result<Vec<_>>>()
                        .map(AxisChunks::Explicit)
                } else {
                    parse_len(axis, "chunk size").map(AxisChunks::Size)
                }
            })
            .collect::<Result<Vec<_>>>()
            .map(ChunkSpec::PerAxis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_overflowing_total() {
        let spec = ChunkSpec::explicit(vec![vec![usize::MAX, 1]]);
        let err = spec.normalize(&[5]).unwrap_err();
        assert!(matches!(err, ChunkRandError::ShapeMismatch(_)));
        assert!(err.to_string().contains("overflow"));
    }

    #[test]
    fn test_uniform_with_remainder() {
        let spec = ChunkSpec::from(4_usize);
        assert_eq!(spec.normalize(&[10]).unwrap(), vec![vec![4, 4, 2]]);
    }

    #[test]
    fn test_uniform_evenly_divisible() {
        let spec = ChunkSpec::from(5_usize);
        assert_eq!(spec.normalize(&[10]).unwrap(), vec![vec![5, 5]]);
    }

    #[test]
    fn test_chunk_larger_than_axis() {
        let spec = ChunkSpec::from(100_usize);
        assert_eq!(spec.normalize(&[7, 3]).unwrap(), vec![vec![7], vec![3]]);
    }

    #[test]
    fn test_zero_length_axis() {
        let spec = ChunkSpec::from(4_usize);
        assert_eq!(spec.normalize(&[0]).unwrap(), vec![vec![0]]);

        let explicit = ChunkSpec::explicit(vec![vec![]]);
        assert_eq!(explicit.normalize(&[0]).unwrap(), vec![vec![0]]);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let err = ChunkSpec::from(0_usize).normalize(&[10]).unwrap_err();
        assert!(matches!(err, ChunkRandError::InvalidArgument(_)));

        // Even on an empty axis
        let err = ChunkSpec::from(0_usize).normalize(&[0]).unwrap_err();
        assert!(matches!(err, ChunkRandError::InvalidArgument(_)));
    }

    #[test]
    fn test_explicit_must_sum_to_axis() {
        let err = ChunkSpec::explicit(vec![vec![3, 3, 3]])
            .normalize(&[10])
            .unwrap_err();
        assert!(matches!(err, ChunkRandError::ShapeMismatch(_)));
    }

    #[test]
    fn test_explicit_zero_entry_rejected() {
        let err = ChunkSpec::explicit(vec![vec![5, 0, 5]])
            .normalize(&[10])
            .unwrap_err();
        assert!(matches!(err, ChunkRandError::InvalidArgument(_)));
    }

    #[test]
    fn test_rank_mismatch() {
        let err = ChunkSpec::from(vec![2_usize, 2]).normalize(&[10]).unwrap_err();
        assert!(matches!(err, ChunkRandError::ShapeMismatch(_)));
    }

    #[test]
    fn test_uniform_on_scalar_shape() {
        assert!(ChunkSpec::from(3_usize).normalize(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_parse() {
        assert_eq!("4".parse::<ChunkSpec>().unwrap(), ChunkSpec::Uniform(4));
        assert_eq!("4,5".parse::<ChunkSpec>().unwrap(), ChunkSpec::from(vec![4_usize, 5]));
        assert_eq!(
            "3+3+4,5".parse::<ChunkSpec>().unwrap(),
            ChunkSpec::PerAxis(vec![AxisChunks::Explicit(vec![3, 3, 4]), AxisChunks::Size(5)])
        );
        assert!("-4".parse::<ChunkSpec>().is_err());
        assert!("".parse::<ChunkSpec>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let spec = ChunkSpec::PerAxis(vec![AxisChunks::Explicit(vec![1, 2]), AxisChunks::Size(3)]);
        assert_eq!(spec.to_string().parse::<ChunkSpec>().unwrap(), spec);
    }
}
