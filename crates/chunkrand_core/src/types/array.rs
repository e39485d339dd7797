//! Dense sampled arrays.
//!
//! [`SampleArray`] is what a sampling capability returns for one chunk and
//! what an assembled lazy array materialises into. Storage is row-major.

use serde::Serialize;

use super::dtype::ElementType;
use super::error::ChunkRandError;
use super::shape::Shape;

/// Typed row-major storage.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayData {
    /// Floating point values.
    Float64(Vec<f64>),
    /// Integer values.
    Int64(Vec<i64>),
}

impl ArrayData {
    /// Zero-filled storage of `len` elements.
    pub fn zeros(dtype: ElementType, len: usize) -> Self {
        match dtype {
            ElementType::Float64 => ArrayData::Float64(vec![0.0; len]),
            ElementType::Int64 => ArrayData::Int64(vec![0; len]),
        }
    }

    /// Element type of the storage.
    pub fn element_type(&self) -> ElementType {
        match self {
            ArrayData::Float64(_) => ElementType::Float64,
            ArrayData::Int64(_) => ElementType::Int64,
        }
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Float64(v) => v.len(),
            ArrayData::Int64(v) => v.len(),
        }
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies `len` elements from `src[src_start..]` to `self[dst_start..]`.
    fn copy_run(&mut self, dst_start: usize, src: &ArrayData, src_start: usize, len: usize) {
        match (self, src) {
            (ArrayData::Float64(dst), ArrayData::Float64(src)) => {
                dst[dst_start..dst_start + len].copy_from_slice(&src[src_start..src_start + len]);
            }
            (ArrayData::Int64(dst), ArrayData::Int64(src)) => {
                dst[dst_start..dst_start + len].copy_from_slice(&src[src_start..src_start + len]);
            }
            // Callers check element types before copying.
            _ => unreachable!("element types checked by insert_block"),
        }
    }
}

/// A dense, typed, row-major array with a shape.
///
/// # Examples
///
/// ```
/// use chunkrand_core::types::{ElementType, SampleArray, Shape};
///
/// let block = SampleArray::from_f64(Shape::from([1, 2]), vec![1.0, 2.0]);
/// let mut full = SampleArray::zeros(ElementType::Float64, Shape::from([2, 2]));
/// full.insert_block(&[1, 0], &block).unwrap();
/// assert_eq!(full.as_f64(), Some(&[0.0, 0.0, 1.0, 2.0][..]));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SampleArray {
    shape: Shape,
    data: ArrayData,
}

impl SampleArray {
    /// Creates an array from a shape and storage.
    ///
    /// The storage length is not checked here; see [`SampleArray::is_consistent`].
    pub fn new(shape: Shape, data: ArrayData) -> Self {
        Self { shape, data }
    }

    /// Creates a floating point array.
    pub fn from_f64(shape: Shape, values: Vec<f64>) -> Self {
        Self::new(shape, ArrayData::Float64(values))
    }

    /// Creates an integer array.
    pub fn from_i64(shape: Shape, values: Vec<i64>) -> Self {
        Self::new(shape, ArrayData::Int64(values))
    }

    /// Zero-filled array.
    pub fn zeros(dtype: ElementType, shape: Shape) -> Self {
        let len = shape.size();
        Self::new(shape, ArrayData::zeros(dtype, len))
    }

    /// Shape of the array.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Element type of the array.
    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    /// Underlying storage.
    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    /// Consumes the array, returning its storage.
    pub fn into_data(self) -> ArrayData {
        self.data
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` when the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` when the storage length matches the shape.
    pub fn is_consistent(&self) -> bool {
        self.data.len() == self.shape.size()
    }

    /// Floating point values, if the array holds `float64`.
    pub fn as_f64(&self) -> Option<&[f64]> {
        match &self.data {
            ArrayData::Float64(v) => Some(v),
            ArrayData::Int64(_) => None,
        }
    }

    /// Integer values, if the array holds `int64`.
    pub fn as_i64(&self) -> Option<&[i64]> {
        match &self.data {
            ArrayData::Int64(v) => Some(v),
            ArrayData::Float64(_) => None,
        }
    }

    /// All values widened to `f64`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match &self.data {
            ArrayData::Float64(v) => v.clone(),
            ArrayData::Int64(v) => v.iter().map(|&x| x as f64).collect(),
        }
    }

    /// Writes `block` into this array with its first element at `offset`.
    ///
    /// # Errors
    ///
    /// - `ShapeMismatch` if ranks differ or the block does not fit
    /// - `InvalidArgument` if element types differ or `block` is inconsistent
    pub fn insert_block(&mut self, offset: &[usize], block: &SampleArray) -> Result<(), ChunkRandError> {
        let ndim = self.shape.ndim();
        if block.shape.ndim() != ndim || offset.len() != ndim {
            return Err(ChunkRandError::ShapeMismatch(format!(
                "block {} at offset {:?} does not match rank of {}",
                block.shape, offset, self.shape
            )));
        }
        let fits = (0..ndim).all(|a| offset[a] + block.shape.dims()[a] <= self.shape.dims()[a]);
        if !fits {
            return Err(ChunkRandError::ShapeMismatch(format!(
                "block {} at offset {:?} exceeds {}",
                block.shape, offset, self.shape
            )));
        }
        if block.element_type() != self.element_type() {
            return Err(ChunkRandError::InvalidArgument(format!(
                "cannot insert {} block into {} array",
                block.element_type(),
                self.element_type()
            )));
        }
        if !block.is_consistent() {
            return Err(ChunkRandError::InvalidArgument(format!(
                "block holds {} elements but shape {} needs {}",
                block.len(),
                block.shape,
                block.shape.size()
            )));
        }
        if block.is_empty() {
            return Ok(());
        }
        if ndim == 0 {
            self.data.copy_run(0, &block.data, 0, 1);
            return Ok(());
        }

        // Copy one contiguous run per row of the last axis.
        let full_strides = self.shape.strides();
        let row_len = block.shape.dims()[ndim - 1];
        let outer = Shape::from(&block.shape.dims()[..ndim - 1]);
        let outer_strides = outer.strides();
        for row in 0..outer.size() {
            let mut rem = row;
            let mut start = offset[ndim - 1];
            for axis in 0..ndim - 1 {
                let i = rem / outer_strides[axis];
                rem %= outer_strides[axis];
                start += (offset[axis] + i) * full_strides[axis];
            }
            self.data.copy_run(start, &block.data, row * row_len, row_len);
        }
        Ok(())
    }
}
