//! # Sampling Capabilities
//!
//! The [`Sampler`] trait is the seam between chunk planning and the actual
//! sampling routines. The graph never samples by itself; each node asks a
//! sampler for `size` values of one distribution using a generator freshly
//! initialised from the node's sub-seed.
//!
//! ## Module Structure
//!
//! - [`standard`]: [`RandDistrSampler`], the default capability built on
//!   `rand` / `rand_distr`
//! - [`special`]: distributions without a `rand_distr` counterpart
//!   (Laplace, logistic, log-series, von Mises, noncentral chi-square, ...)
//!
//! ## Contract
//!
//! Implementations must:
//! - accept all-zero sizes and return an empty, correctly typed array
//! - be a pure function of `(generator state, params, size)`
//! - never share mutable state between calls

use rand::RngCore;

use crate::registry::Distribution;
use chunkrand_core::types::{CapabilityError, ParamValue, Params, SampleArray, Shape};

pub mod special;
pub mod standard;

pub use standard::RandDistrSampler;

/// A sampling capability: "sample N values of distribution D with
/// parameters P from generator G".
pub trait Sampler: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &str;

    /// Draws `size` values of `distribution` from `rng`.
    ///
    /// # Errors
    ///
    /// `CapabilityError` when the parameters are invalid for the
    /// distribution or the distribution is unsupported.
    fn sample(
        &self,
        distribution: Distribution,
        params: &Params,
        rng: &mut dyn RngCore,
        size: &Shape,
    ) -> Result<SampleArray, CapabilityError>;
}

/// Typed access to bound parameters, producing capability errors.
pub(crate) struct ParamReader<'a> {
    distribution: Distribution,
    params: &'a Params,
}

impl<'a> ParamReader<'a> {
    pub(crate) fn new(distribution: Distribution, params: &'a Params) -> Self {
        Self {
            distribution,
            params,
        }
    }

    pub(crate) fn fail(&self, message: impl std::fmt::Display) -> CapabilityError {
        CapabilityError::new(self.distribution.name(), message.to_string())
    }

    fn value(&self, index: usize) -> Result<&'a ParamValue, CapabilityError> {
        self.params
            .arg(index)
            .ok_or_else(|| self.fail(format!("missing parameter {}", self.param_name(index))))
    }

    fn param_name(&self, index: usize) -> &'static str {
        self.distribution
            .spec()
            .params
            .get(index)
            .map_or("?", |p| p.name)
    }

    pub(crate) fn f64(&self, index: usize) -> Result<f64, CapabilityError> {
        let value = self.value(index)?;
        value.as_f64().ok_or_else(|| {
            self.fail(format!(
                "parameter {} must be a number, got {}",
                self.param_name(index),
                value
            ))
        })
    }

    pub(crate) fn i64(&self, index: usize) -> Result<i64, CapabilityError> {
        let value = self.value(index)?;
        value.as_i64().ok_or_else(|| {
            self.fail(format!(
                "parameter {} must be an integer, got {}",
                self.param_name(index),
                value
            ))
        })
    }

    pub(crate) fn u64(&self, index: usize) -> Result<u64, CapabilityError> {
        let value = self.value(index)?;
        value.as_u64().ok_or_else(|| {
            self.fail(format!(
                "parameter {} must be a non-negative integer, got {}",
                self.param_name(index),
                value
            ))
        })
    }

    pub(crate) fn opt_i64(&self, index: usize) -> Result<Option<i64>, CapabilityError> {
        match self.params.arg(index) {
            None | Some(ParamValue::None) => Ok(None),
            Some(_) => self.i64(index).map(Some),
        }
    }

    pub(crate) fn bool(&self, index: usize) -> Result<bool, CapabilityError> {
        let value = self.value(index)?;
        value.as_bool().ok_or_else(|| {
            self.fail(format!(
                "parameter {} must be a boolean, got {}",
                self.param_name(index),
                value
            ))
        })
    }

    pub(crate) fn opt_weights(&self, index: usize) -> Result<Option<&'a [f64]>, CapabilityError> {
        match self.params.arg(index) {
            None | Some(ParamValue::None) => Ok(None),
            Some(value) => value.as_slice().map(Some).ok_or_else(|| {
                self.fail(format!(
                    "parameter {} must be a list of probabilities, got {}",
                    self.param_name(index),
                    value
                ))
            }),
        }
    }
}
