//! Core array, parameter and error types.
//!
//! This module provides:
//! - `shape`: [`Shape`], the dimension lengths of an array
//! - `dtype`: [`ElementType`], the element type of sampled data
//! - `array`: [`SampleArray`] dense row-major storage
//! - `params`: [`ParamValue`] and [`Params`] for distribution parameters
//! - `error`: [`ChunkRandError`] and [`CapabilityError`]

pub mod array;
pub mod dtype;
pub mod error;
pub mod params;
pub mod shape;

pub use array::{ArrayData, SampleArray};
pub use dtype::ElementType;
pub use error::{CapabilityError, ChunkRandError, Result};
pub use params::{ParamValue, Params};
pub use shape::Shape;
