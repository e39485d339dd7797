//! Array shapes.
//!
//! A [`Shape`] is the ordered list of dimension lengths of an array. Lengths
//! are `usize`, so the "every dimension is non-negative" invariant holds by
//! construction; textual shapes are validated by [`Shape::from_str`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ChunkRandError;

/// Ordered dimension lengths of an array.
///
/// # Examples
///
/// ```
/// use chunkrand_core::types::Shape;
///
/// let shape = Shape::from(vec![10_usize, 4]);
/// assert_eq!(shape.ndim(), 2);
/// assert_eq!(shape.size(), 40);
/// assert_eq!(shape.to_string(), "(10, 4)");
///
/// // A scalar size is a one-dimensional shape
/// assert_eq!(Shape::from(7_usize), Shape::from(vec![7]));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape(Vec<usize>);

impl Shape {
    /// Creates a shape from dimension lengths.
    #[inline]
    pub fn new(dims: Vec<usize>) -> Self {
        Self(dims)
    }

    /// Creates a shape of `ndim` zero-length dimensions.
    ///
    /// Used to request an empty sample from a capability.
    #[inline]
    pub fn zeros(ndim: usize) -> Self {
        Self(vec![0; ndim])
    }

    /// Returns the dimension lengths.
    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Returns the number of dimensions.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Returns the total number of elements.
    ///
    /// A zero-dimensional shape holds exactly one element. Shapes accepted by
    /// [`ChunkPlan::new`](crate::chunks::ChunkPlan::new), and every chunk of
    /// their plans, are known to fit. For other shapes the count saturates
    /// at `usize::MAX`; use [`Shape::checked_size`] to detect that.
    #[inline]
    pub fn size(&self) -> usize {
        self.checked_size().unwrap_or(usize::MAX)
    }

    /// Returns the total number of elements, or `None` if it overflows
    /// `usize`. Any zero-length dimension makes the count zero.
    #[inline]
    pub fn checked_size(&self) -> Option<usize> {
        if self.is_empty() {
            return Some(0);
        }
        self.0.iter().try_fold(1_usize, |acc, &d| acc.checked_mul(d))
    }

    /// Returns `true` when any dimension has length zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.iter().any(|&d| d == 0)
    }

    /// Row-major element strides for this shape.
    pub fn strides(&self) -> Vec<usize> {
        let mut strides = vec![1_usize; self.0.len()];
        for axis in (0..self.0.len().saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1].saturating_mul(self.0[axis + 1]);
        }
        strides
    }
}

impl From<usize> for Shape {
    fn from(len: usize) -> Self {
        Self(vec![len])
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self(dims.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Self(dims.to_vec())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [single] => write!(f, "({},)", single),
            dims => {
                write!(f, "(")?;
                for (i, d) in dims.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", d)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Parses a dimension length, rejecting negative and non-integer input.
pub(crate) fn parse_len(token: &str, what: &str) -> Result<usize, ChunkRandError> {
    let token = token.trim();
    if token.starts_with('-') {
        return Err(ChunkRandError::InvalidArgument(format!(
            "{} must be non-negative, got {}",
            what, token
        )));
    }
    token.parse::<usize>().map_err(|_| {
        ChunkRandError::InvalidArgument(format!("{} is not an integer: '{}'", what, token))
    })
}

impl FromStr for Shape {
    type Err = ChunkRandError;

    /// Parses `"10"`, `"10,20"` or `"(10, 20)"`. An empty string or `"()"`
    /// is the zero-dimensional shape.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.trim().trim_start_matches('(').trim_end_matches(')').trim();
        if body.is_empty() {
            return Ok(Self::default());
        }
        body.split(',')
            .filter(|t| !t.trim().is_empty())
            .map(|t| parse_len(t, "dimension"))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}
