//! Error types for structured error handling.
//!
//! This module provides:
//! - `ChunkRandError`: Errors raised while planning or materialising a chunked array
//! - `CapabilityError`: Failures reported by a sampling capability

use thiserror::Error;

/// Failure reported by a sampling capability.
///
/// The core never inspects or retries these; they are carried unchanged
/// inside [`ChunkRandError::Capability`].
///
/// # Examples
/// ```
/// use chunkrand_core::types::CapabilityError;
///
/// let err = CapabilityError::new("normal", "standard deviation must be finite");
/// assert_eq!(
///     format!("{}", err),
///     "normal: standard deviation must be finite"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{distribution}: {message}")]
pub struct CapabilityError {
    /// Distribution the capability was asked to sample.
    pub distribution: String,
    /// Description of the failure.
    pub message: String,
}

impl CapabilityError {
    /// Creates a capability error for the named distribution.
    pub fn new(distribution: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            distribution: distribution.into(),
            message: message.into(),
        }
    }
}

/// Categorised errors for chunked random array construction.
///
/// Every variant is raised synchronously to the immediate caller. Planning
/// either succeeds completely or fails before any graph node exists.
///
/// # Variants
/// - `InvalidArgument`: Malformed shapes, non-positive chunk sizes, bad parameters
/// - `ShapeMismatch`: Chunk specification does not partition the shape
/// - `UnknownDistribution`: Name not present in the distribution registry
/// - `Capability`: The sampling capability failed (probe or chunk)
///
/// # Examples
/// ```
/// use chunkrand_core::types::ChunkRandError;
///
/// let err = ChunkRandError::ShapeMismatch("chunks sum to 9, expected 10".to_string());
/// assert_eq!(format!("{}", err), "Shape mismatch: chunks sum to 9, expected 10");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkRandError {
    /// Invalid argument (chunk size, shape, count or parameter).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Chunk specification disagrees with the target shape.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Distribution name is not registered.
    #[error("Unknown distribution: {0}")]
    UnknownDistribution(String),

    /// The sampling capability failed.
    ///
    /// `chunk` is `None` for the dtype probe and the chunk multi-index for a
    /// failed materialisation.
    #[error("Capability error{}: {source}", fmt_chunk(.chunk))]
    Capability {
        /// Multi-index of the failing chunk, if any.
        chunk: Option<Vec<usize>>,
        /// Underlying capability failure.
        #[source]
        source: CapabilityError,
    },
}

fn fmt_chunk(chunk: &Option<Vec<usize>>) -> String {
    match chunk {
        Some(index) => format!(" in chunk {:?}", index),
        None => String::new(),
    }
}

impl ChunkRandError {
    /// Wraps a probe failure (no chunk index).
    pub fn probe(source: CapabilityError) -> Self {
        Self::Capability {
            chunk: None,
            source,
        }
    }

    /// Wraps a failure of the chunk at `index`.
    pub fn in_chunk(index: &[usize], source: CapabilityError) -> Self {
        Self::Capability {
            chunk: Some(index.to_vec()),
            source,
        }
    }

    /// Returns `true` for errors caused by the caller's input rather than
    /// the sampling capability.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::Capability { .. })
    }
}

/// Result alias used throughout the chunkrand crates.
pub type Result<T> = std::result::Result<T, ChunkRandError>;
