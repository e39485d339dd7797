//! Default sampling capability built on `rand` and `rand_distr`.

use rand::distributions::{Standard, Uniform, WeightedIndex};
use rand::RngCore;
use rand_distr::{
    Beta, Binomial, Cauchy, ChiSquared, Distribution as RandDistribution, Exp1, FisherF, Gamma,
    Geometric, Gumbel, Hypergeometric, InverseGaussian, LogNormal, Normal, Poisson,
    StandardNormal, StudentT, Triangular, Weibull, Zeta,
};
use std::fmt;

use super::special;
use super::{ParamReader, Sampler};
use crate::registry::Distribution;
use chunkrand_core::types::{ArrayData, CapabilityError, Params, SampleArray, Shape};

/// The default [`Sampler`].
///
/// Every distribution is constructed (and its parameters validated) before
/// any value is drawn, so a zero-size request still reports invalid
/// parameters.
///
/// # Examples
///
/// ```rust
/// use chunkrand_core::seed::SubSeed;
/// use chunkrand_core::types::{ElementType, Params, Shape};
/// use chunkrand_graph::registry::Distribution;
/// use chunkrand_graph::sampler::{RandDistrSampler, Sampler};
///
/// let sampler = RandDistrSampler::new();
/// let params = Params::new().with_arg(0.0).with_arg(1.0);
/// let mut rng = SubSeed::new(42).generator();
///
/// let out = sampler
///     .sample(Distribution::Normal, &params, &mut rng, &Shape::from(5_usize))
///     .unwrap();
/// assert_eq!(out.len(), 5);
/// assert_eq!(out.element_type(), ElementType::Float64);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct RandDistrSampler;

impl RandDistrSampler {
    /// Creates the default sampler.
    pub fn new() -> Self {
        Self
    }
}

impl Sampler for RandDistrSampler {
    fn name(&self) -> &str {
        "rand_distr"
    }

    fn sample(
        &self,
        distribution: Distribution,
        params: &Params,
        rng: &mut dyn RngCore,
        size: &Shape,
    ) -> Result<SampleArray, CapabilityError> {
        let args = ParamReader::new(distribution, params);
        let n = size.size();

        let data = match distribution {
            Distribution::Beta => {
                let dist = Beta::new(args.f64(0)?, args.f64(1)?).map_err(|e| invalid(&args, e))?;
                floats(&dist, rng, n)
            }
            Distribution::Binomial => {
                let dist =
                    Binomial::new(args.u64(0)?, args.f64(1)?).map_err(|e| invalid(&args, e))?;
                counts(&dist, rng, n)
            }
            Distribution::Chisquare => {
                let dist = ChiSquared::new(args.f64(0)?).map_err(|e| invalid(&args, e))?;
                floats(&dist, rng, n)
            }
            Distribution::Choice => choice(&args, rng, n)?,
            Distribution::Exponential => {
                let scale = non_negative(&args, 0, "scale")?;
                ArrayData::Float64(fill(rng, n, |r| {
                    let e: f64 = Exp1.sample(r);
                    scale * e
                }))
            }
            Distribution::F => {
                let dist = FisherF::new(args.f64(0)?, args.f64(1)?).map_err(|e| invalid(&args, e))?;
                floats(&dist, rng, n)
            }
            Distribution::Gamma => {
                let dist = Gamma::new(args.f64(0)?, args.f64(1)?).map_err(|e| invalid(&args, e))?;
                floats(&dist, rng, n)
            }
            Distribution::Geometric => {
                let p = args.f64(0)?;
                if !(p > 0.0 && p <= 1.0) {
                    return Err(args.fail(format!("p must be in (0, 1], got {}", p)));
                }
                let dist = Geometric::new(p).map_err(|e| invalid(&args, e))?;
                // Number of trials up to and including the first success
                ArrayData::Int64(fill(rng, n, |r| {
                    let failures: u64 = dist.sample(r);
                    to_i64(failures).saturating_add(1)
                }))
            }
            Distribution::Gumbel => {
                let dist = Gumbel::new(args.f64(0)?, args.f64(1)?).map_err(|e| invalid(&args, e))?;
                floats(&dist, rng, n)
            }
            Distribution::Hypergeometric => {
                let (good, bad, nsample) = (args.u64(0)?, args.u64(1)?, args.u64(2)?);
                let total = good
                    .checked_add(bad)
                    .ok_or_else(|| args.fail("ngood + nbad overflows"))?;
                let dist =
                    Hypergeometric::new(total, good, nsample).map_err(|e| invalid(&args, e))?;
                counts(&dist, rng, n)
            }
            Distribution::Laplace => {
                let dist =
                    special::Laplace::new(args.f64(0)?, args.f64(1)?).map_err(|m| args.fail(m))?;
                floats(&dist, rng, n)
            }
            Distribution::Logistic => {
                let dist =
                    special::Logistic::new(args.f64(0)?, args.f64(1)?).map_err(|m| args.fail(m))?;
                floats(&dist, rng, n)
            }
            Distribution::Lognormal => {
                let dist =
                    LogNormal::new(args.f64(0)?, args.f64(1)?).map_err(|e| invalid(&args, e))?;
                floats(&dist, rng, n)
            }
            Distribution::Logseries => {
                let dist = special::LogSeries::new(args.f64(0)?).map_err(|m| args.fail(m))?;
                ints(&dist, rng, n)
            }
            Distribution::NegativeBinomial => {
                let dist = special::NegativeBinomial::new(args.f64(0)?, args.f64(1)?)
                    .map_err(|m| args.fail(m))?;
                ArrayData::Int64(try_fill(&args, rng, n, |r| dist.try_sample(r))?)
            }
            Distribution::NoncentralChisquare => {
                let dist = special::NoncentralChiSquared::new(args.f64(0)?, args.f64(1)?)
                    .map_err(|m| args.fail(m))?;
                ArrayData::Float64(try_fill(&args, rng, n, |r| dist.try_sample(r))?)
            }
            Distribution::NoncentralF => {
                let dist = special::NoncentralF::new(args.f64(0)?, args.f64(1)?, args.f64(2)?)
                    .map_err(|m| args.fail(m))?;
                ArrayData::Float64(try_fill(&args, rng, n, |r| dist.try_sample(r))?)
            }
            Distribution::Normal => {
                let dist = Normal::new(args.f64(0)?, args.f64(1)?).map_err(|e| invalid(&args, e))?;
                floats(&dist, rng, n)
            }
            Distribution::Pareto => {
                let dist = special::Lomax::new(args.f64(0)?).map_err(|m| args.fail(m))?;
                floats(&dist, rng, n)
            }
            Distribution::Poisson => {
                let lam = non_negative(&args, 0, "lam")?;
                if lam == 0.0 {
                    ArrayData::Int64(vec![0; n])
                } else {
                    let dist = Poisson::new(lam).map_err(|e| invalid(&args, e))?;
                    ArrayData::Int64(fill(rng, n, |r| {
                        let k: f64 = dist.sample(r);
                        k as i64
                    }))
                }
            }
            Distribution::Power => {
                let dist = special::Power::new(args.f64(0)?).map_err(|m| args.fail(m))?;
                floats(&dist, rng, n)
            }
            Distribution::Randint => {
                let (low, high) = match args.opt_i64(1)? {
                    Some(high) => (args.i64(0)?, high),
                    None => (0, args.i64(0)?),
                };
                if low >= high {
                    return Err(args.fail(format!("low >= high ({} >= {})", low, high)));
                }
                ints(&Uniform::new(low, high), rng, n)
            }
            Distribution::RandomIntegers => {
                let (low, high) = match args.opt_i64(1)? {
                    Some(high) => (args.i64(0)?, high),
                    None => (1, args.i64(0)?),
                };
                if low > high {
                    return Err(args.fail(format!("low > high ({} > {})", low, high)));
                }
                ints(&Uniform::new_inclusive(low, high), rng, n)
            }
            Distribution::RandomSample => floats(&Standard, rng, n),
            Distribution::Rayleigh => {
                let dist = special::Rayleigh::new(args.f64(0)?).map_err(|m| args.fail(m))?;
                floats(&dist, rng, n)
            }
            Distribution::StandardCauchy => {
                let dist = Cauchy::<f64>::new(0.0, 1.0).map_err(|e| invalid(&args, e))?;
                floats(&dist, rng, n)
            }
            Distribution::StandardExponential => floats(&Exp1, rng, n),
            Distribution::StandardGamma => {
                let dist = Gamma::new(args.f64(0)?, 1.0).map_err(|e| invalid(&args, e))?;
                floats(&dist, rng, n)
            }
            Distribution::StandardNormal => floats(&StandardNormal, rng, n),
            Distribution::StandardT => {
                let dist = StudentT::new(args.f64(0)?).map_err(|e| invalid(&args, e))?;
                floats(&dist, rng, n)
            }
            Distribution::Tomaxint => ints(&Uniform::new_inclusive(0, i64::MAX), rng, n),
            Distribution::Triangular => {
                let (left, mode, right) = (args.f64(0)?, args.f64(1)?, args.f64(2)?);
                let dist = Triangular::new(left, right, mode).map_err(|e| invalid(&args, e))?;
                floats(&dist, rng, n)
            }
            Distribution::Uniform => {
                let (low, high) = (args.f64(0)?, args.f64(1)?);
                if !(low.is_finite() && high.is_finite()) {
                    return Err(args.fail(format!("bounds must be finite, got [{}, {})", low, high)));
                }
                let width = high - low;
                ArrayData::Float64(fill(rng, n, |r| {
                    let u: f64 = Standard.sample(r);
                    low + width * u
                }))
            }
            Distribution::Vonmises => {
                let dist =
                    special::VonMises::new(args.f64(0)?, args.f64(1)?).map_err(|m| args.fail(m))?;
                floats(&dist, rng, n)
            }
            Distribution::Wald => {
                let dist = InverseGaussian::new(args.f64(0)?, args.f64(1)?)
                    .map_err(|e| invalid(&args, e))?;
                floats(&dist, rng, n)
            }
            Distribution::Weibull => {
                let dist = Weibull::new(1.0, args.f64(0)?).map_err(|e| invalid(&args, e))?;
                floats(&dist, rng, n)
            }
            Distribution::Zipf => {
                let dist = Zeta::new(args.f64(0)?).map_err(|e| invalid(&args, e))?;
                ArrayData::Int64(fill(rng, n, |r| {
                    let k: f64 = dist.sample(r);
                    k as i64
                }))
            }
        };

        Ok(SampleArray::new(size.clone(), data))
    }
}

fn choice(
    args: &ParamReader<'_>,
    rng: &mut dyn RngCore,
    n: usize,
) -> Result<ArrayData, CapabilityError> {
    let population = args.i64(0)?;
    if population <= 0 {
        return Err(args.fail(format!("a must be positive, got {}", population)));
    }
    if !args.bool(1)? {
        return Err(args.fail("sampling without replacement is not supported"));
    }
    match args.opt_weights(2)? {
        Some(weights) => {
            if weights.len() as i64 != population {
                return Err(args.fail(format!(
                    "p has {} entries but a is {}",
                    weights.len(),
                    population
                )));
            }
            let dist = WeightedIndex::new(weights).map_err(|e| invalid(args, e))?;
            Ok(ArrayData::Int64(fill(rng, n, |r| {
                let index: usize = dist.sample(r);
                index as i64
            })))
        }
        None => Ok(ints(&Uniform::new(0, population), rng, n)),
    }
}

fn non_negative(args: &ParamReader<'_>, index: usize, name: &str) -> Result<f64, CapabilityError> {
    let value = args.f64(index)?;
    if value >= 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(args.fail(format!("{} must be non-negative, got {}", name, value)))
    }
}

fn invalid(args: &ParamReader<'_>, err: impl fmt::Debug) -> CapabilityError {
    args.fail(format!("invalid parameters: {:?}", err))
}

fn fill<T>(rng: &mut dyn RngCore, n: usize, mut draw: impl FnMut(&mut dyn RngCore) -> T) -> Vec<T> {
    (0..n).map(|_| draw(&mut *rng)).collect()
}

fn try_fill<T>(
    args: &ParamReader<'_>,
    rng: &mut dyn RngCore,
    n: usize,
    mut draw: impl FnMut(&mut dyn RngCore) -> Result<T, String>,
) -> Result<Vec<T>, CapabilityError> {
    (0..n).map(|_| draw(&mut *rng).map_err(|m| args.fail(m))).collect()
}

fn floats<D: RandDistribution<f64>>(dist: &D, rng: &mut dyn RngCore, n: usize) -> ArrayData {
    ArrayData::Float64(fill(rng, n, |r| dist.sample(r)))
}

fn ints<D: RandDistribution<i64>>(dist: &D, rng: &mut dyn RngCore, n: usize) -> ArrayData {
    ArrayData::Int64(fill(rng, n, |r| dist.sample(r)))
}

fn counts<D: RandDistribution<u64>>(dist: &D, rng: &mut dyn RngCore, n: usize) -> ArrayData {
    ArrayData::Int64(fill(rng, n, |r| to_i64(dist.sample(r))))
}

#[inline]
fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
