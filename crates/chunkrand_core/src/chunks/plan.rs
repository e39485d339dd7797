//! Chunk plans: the row-major grid of chunks covering a shape.

use serde::{Deserialize, Serialize};

use super::spec::ChunkSpec;
use crate::types::{ChunkRandError, Result, Shape};

/// One chunk of a [`ChunkPlan`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkDescriptor {
    /// Position in the chunk grid.
    pub index: Vec<usize>,
    /// Local shape of the chunk.
    pub shape: Shape,
    /// Element offset of the chunk's first element in the full array.
    pub offset: Vec<usize>,
}

/// Partition of a shape into rectangular chunks.
///
/// Enumeration order is row-major over the chunk grid (first axis
/// outermost) and is identical on every call, which is what makes seed
/// assignment reproducible.
///
/// # Examples
///
/// ```
/// use chunkrand_core::chunks::ChunkPlan;
/// use chunkrand_core::types::Shape;
///
/// let plan = ChunkPlan::new(Shape::from(10_usize), 4_usize).unwrap();
/// let shapes: Vec<Shape> = plan.iter().map(|c| c.shape).collect();
/// assert_eq!(shapes, vec![Shape::from(4_usize), Shape::from(4_usize), Shape::from(2_usize)]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ChunkPlan {
    shape: Shape,
    chunks: Vec<Vec<usize>>,
    #[serde(skip)]
    offsets: Vec<Vec<usize>>,
}

impl ChunkPlan {
    /// Plans `shape` according to `spec`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the element count or the chunk count
    ///   overflows `usize`
    /// - otherwise see [`ChunkSpec::normalize`]
    pub fn new(shape: impl Into<Shape>, spec: impl Into<ChunkSpec>) -> Result<Self> {
        let shape = shape.into();
        if shape.checked_size().is_none() {
            return Err(ChunkRandError::InvalidArgument(format!(
                "shape {} has more elements than fit in usize",
                shape
            )));
        }
        let chunks = spec.into().normalize(shape.dims())?;
        let count = chunks
            .iter()
            .try_fold(1_usize, |acc, sizes| acc.checked_mul(sizes.len()));
        if count.is_none() {
            return Err(ChunkRandError::InvalidArgument(format!(
                "chunking of shape {} has more chunks than fit in usize",
                shape
            )));
        }
        Ok(Self::from_normalized(shape, chunks))
    }

    fn from_normalized(shape: Shape, chunks: Vec<Vec<usize>>) -> Self {
        let offsets = chunks
            .iter()
            .map(|sizes| {
                sizes
                    .iter()
                    .scan(0, |acc, &s| {
                        let start = *acc;
                        *acc += s;
                        Some(start)
                    })
                    .collect()
            })
            .collect();
        Self {
            shape,
            chunks,
            offsets,
        }
    }

    /// Overall shape covered by the plan.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Normalised chunk sizes, one list per axis.
    pub fn chunks(&self) -> &[Vec<usize>] {
        &self.chunks
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.chunks.len()
    }

    /// Number of chunks along each axis.
    pub fn grid_shape(&self) -> Vec<usize> {
        self.chunks.iter().map(Vec::len).collect()
    }

    /// Total number of chunks. A zero-dimensional plan has one chunk.
    pub fn num_chunks(&self) -> usize {
        self.chunks.iter().map(Vec::len).product()
    }

    /// Shape recovered by summing chunk sizes along each axis.
    ///
    /// Planning checked every axis total, so the sums cannot overflow.
    pub fn reconstructed_shape(&self) -> Shape {
        Shape::new(
            self.chunks
                .iter()
                .map(|s| s.iter().fold(0_usize, |acc, &c| acc.saturating_add(c)))
                .collect(),
        )
    }

    /// Row-major position of `index`, or `None` if it is outside the grid.
    pub fn linear_index(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.chunks.len() {
            return None;
        }
        let mut linear = 0;
        for (axis, &i) in index.iter().enumerate() {
            let extent = self.chunks[axis].len();
            if i >= extent {
                return None;
            }
            linear = linear * extent + i;
        }
        Some(linear)
    }

    /// Descriptor of the chunk at `index`.
    pub fn descriptor(&self, index: &[usize]) -> Option<ChunkDescriptor> {
        self.linear_index(index)?;
        Some(ChunkDescriptor {
            index: index.to_vec(),
            shape: Shape::new(
                index
                    .iter()
                    .enumerate()
                    .map(|(axis, &i)| self.chunks[axis][i])
                    .collect(),
            ),
            offset: index
                .iter()
                .enumerate()
                .map(|(axis, &i)| self.offsets[axis][i])
                .collect(),
        })
    }

    /// Iterates chunks in row-major grid order.
    pub fn iter(&self) -> ChunkIter<'_> {
        ChunkIter {
            plan: self,
            next: 0,
            total: self.num_chunks(),
        }
    }
}

impl<'a> IntoIterator for &'a ChunkPlan {
    type Item = ChunkDescriptor;
    type IntoIter = ChunkIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Row-major iterator over the chunks of a plan.
pub struct ChunkIter<'a> {
    plan: &'a ChunkPlan,
    next: usize,
    total: usize,
}

impl Iterator for ChunkIter<'_> {
    type Item = ChunkDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total {
            return None;
        }
        let mut rem = self.next;
        let mut index = vec![0; self.plan.ndim()];
        for axis in (0..self.plan.ndim()).rev() {
            let extent = self.plan.chunks[axis].len();
            index[axis] = rem % extent;
            rem /= extent;
        }
        self.next += 1;
        self.plan.descriptor(&index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChunkIter<'_> {}

/// Plans `shape` according to `spec`.
///
/// Free-function form of [`ChunkPlan::new`].
pub fn plan(shape: impl Into<Shape>, spec: impl Into<ChunkSpec>) -> Result<ChunkPlan> {
    ChunkPlan::new(shape, spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunks::AxisChunks;

    #[test]
    fn test_ten_by_four() {
        let plan = ChunkPlan::new(10_usize, 4_usize).unwrap();
        assert_eq!(plan.num_chunks(), 3);
        let chunks: Vec<_> = plan.iter().collect();
        assert_eq!(chunks[0].shape, Shape::from(4_usize));
        assert_eq!(chunks[1].shape, Shape::from(4_usize));
        assert_eq!(chunks[2].shape, Shape::from(2_usize));
        assert_eq!(chunks[2].offset, vec![8]);
        assert_eq!(chunks[2].index, vec![2]);
    }

    #[test]
    fn test_row_major_order() {
        let plan = ChunkPlan::new([4_usize, 6], [2_usize, 3]).unwrap();
        let indices: Vec<Vec<usize>> = plan.iter().map(|c| c.index).collect();
        assert_eq!(
            indices,
            vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]
        );
    }

    #[test]
    fn test_offsets_and_shapes_2d() {
        let spec = ChunkSpec::PerAxis(vec![AxisChunks::Explicit(vec![1, 3]), AxisChunks::Size(4)]);
        let plan = ChunkPlan::new([4_usize, 5], spec).unwrap();
        let last = plan.descriptor(&[1, 1]).unwrap();
        assert_eq!(last.shape, Shape::from([3_usize, 1]));
        assert_eq!(last.offset, vec![1, 4]);
        assert_eq!(plan.grid_shape(), vec![2, 2]);
    }

    #[test]
    fn test_empty_shape_single_chunk() {
        let plan = ChunkPlan::new(0_usize, 5_usize).unwrap();
        assert_eq!(plan.num_chunks(), 1);
        let only = plan.iter().next().unwrap();
        assert_eq!(only.shape, Shape::from(0_usize));
    }

    #[test]
    fn test_scalar_shape_single_chunk() {
        let plan = ChunkPlan::new(Shape::default(), 3_usize).unwrap();
        assert_eq!(plan.num_chunks(), 1);
        let only: Vec<_> = plan.iter().collect();
        assert_eq!(only.len(), 1);
        assert!(only[0].index.is_empty());
        assert_eq!(only[0].shape, Shape::default());
    }

    #[test]
    fn test_iteration_is_stable() {
        let plan = ChunkPlan::new([7_usize, 5, 3], [2_usize, 2, 2]).unwrap();
        let first: Vec<_> = plan.iter().collect();
        let second: Vec<_> = plan.iter().collect();
        assert_eq!(first, second);
        assert_eq!(plan.iter().len(), plan.num_chunks());
    }

    #[test]
    fn test_linear_index() {
        let plan = ChunkPlan::new([4_usize, 6], [2_usize, 2]).unwrap();
        assert_eq!(plan.linear_index(&[1, 2]), Some(5));
        assert_eq!(plan.linear_index(&[2, 0]), None);
        assert_eq!(plan.linear_index(&[0]), None);
    }

    #[test]
    fn test_reconstructed_shape() {
        let plan = ChunkPlan::new([9_usize, 4], 4_usize).unwrap();
        assert_eq!(plan.reconstructed_shape(), *plan.shape());
    }

    #[test]
    fn test_error_before_plan() {
        let err = ChunkPlan::new(10_usize, ChunkSpec::explicit(vec![vec![3, 3, 3]])).unwrap_err();
        assert!(matches!(err, ChunkRandError::ShapeMismatch(_)));
    }

    #[test]
    fn test_element_count_overflow() {
        let err = ChunkPlan::new([usize::MAX, 2], usize::MAX).unwrap_err();
        assert!(matches!(err, ChunkRandError::InvalidArgument(_)));
    }

    #[test]
    fn test_chunk_count_overflow() {
        // Zero elements, but one chunk per unit of the two long axes
        let err = ChunkPlan::new([0, usize::MAX, usize::MAX], 1_usize).unwrap_err();
        assert!(matches!(err, ChunkRandError::InvalidArgument(_)));
    }

    #[test]
    fn test_empty_axis_with_long_axes() {
        let plan = ChunkPlan::new([usize::MAX, 0], usize::MAX).unwrap();
        assert_eq!(plan.num_chunks(), 1);
        assert_eq!(plan.shape().size(), 0);
        assert_eq!(plan.reconstructed_shape(), *plan.shape());
    }
}
