//! Caller-owned random state and distribution entry points.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::graph::GraphBuilder;
use crate::handle::LazyArray;
use crate::registry::{Distribution, DistributionRegistry};
use crate::sampler::{RandDistrSampler, Sampler};
use chunkrand_core::chunks::ChunkSpec;
use chunkrand_core::seed::GeneratorState;
use chunkrand_core::types::{ParamValue, Result, Shape};

/// A caller-owned generator that produces lazy chunked arrays.
///
/// Every request borrows the state mutably: it derives one sub-seed per
/// chunk and advances the state, so two requests never share a seed.
/// Requests with the same seed and arguments build identical graphs.
///
/// # Examples
///
/// ```rust
/// use chunkrand_graph::RandomState;
///
/// let a = RandomState::new(7).gamma(2.0, 1.5, 1000_usize, 128_usize).unwrap();
/// let b = RandomState::new(7).gamma(2.0, 1.5, 1000_usize, 128_usize).unwrap();
/// assert_eq!(a.name(), b.name());
/// assert_eq!(a.compute().unwrap(), b.compute().unwrap());
/// ```
pub struct RandomState {
    state: GeneratorState,
    builder: GraphBuilder,
    registry: DistributionRegistry,
}

impl RandomState {
    /// State seeded with `seed`, sampling with [`RandDistrSampler`].
    pub fn new(seed: u64) -> Self {
        Self::from_generator(GeneratorState::from_seed(seed))
    }

    /// State seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self::from_generator(GeneratorState::from_entropy())
    }

    /// State seeded from a vector of 32-bit words.
    pub fn from_seed_words(words: &[u32]) -> Self {
        Self::from_generator(GeneratorState::from_seed_words(words))
    }

    /// Wraps an existing generator state.
    pub fn from_generator(state: GeneratorState) -> Self {
        Self {
            state,
            builder: GraphBuilder::new(Arc::new(RandDistrSampler::new())),
            registry: DistributionRegistry::new(),
        }
    }

    /// Replaces the sampling capability.
    pub fn with_sampler(mut self, sampler: Arc<dyn Sampler>) -> Self {
        self.builder = GraphBuilder::new(sampler);
        self
    }

    /// Re-initialises the generator; `None` draws fresh entropy.
    pub fn seed(&mut self, seed: Option<u64>) {
        self.state.reseed(seed);
    }

    /// Parent generator state.
    pub fn generator(&self) -> &GeneratorState {
        &self.state
    }

    /// Sampling capability in use.
    pub fn sampler(&self) -> &dyn Sampler {
        self.builder.sampler().as_ref()
    }

    /// Generic entry point: resolves `name`, binds the arguments with
    /// registry defaults and builds the lazy array.
    ///
    /// # Errors
    ///
    /// - `UnknownDistribution` for unregistered names
    /// - `InvalidArgument` for binding failures, bad shapes or chunks
    /// - `ShapeMismatch` when `chunks` does not partition `size`
    /// - `Capability` when the sampler rejects the parameters
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use chunkrand_core::types::ParamValue;
    /// use chunkrand_graph::RandomState;
    ///
    /// let mut kwargs = BTreeMap::new();
    /// kwargs.insert("scale".to_string(), ParamValue::Float(2.0));
    ///
    /// let mut rs = RandomState::new(3);
    /// let lazy = rs.sample("normal", vec![], kwargs, 8_usize, 4_usize).unwrap();
    /// assert_eq!(lazy.num_chunks(), 2);
    /// ```
    pub fn sample(
        &mut self,
        name: &str,
        args: Vec<ParamValue>,
        kwargs: BTreeMap<String, ParamValue>,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        let spec = self.registry.resolve(name)?;
        let params = spec.bind(args, kwargs)?;
        let (graph, plan, dtype) =
            self.builder
                .build(spec.distribution, params, size, chunks, &mut self.state)?;
        Ok(LazyArray::new(graph, plan, dtype))
    }

    /// Like [`sample`](Self::sample) with a resolved distribution and
    /// positional arguments only.
    pub fn draw(
        &mut self,
        distribution: Distribution,
        args: Vec<ParamValue>,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.sample(distribution.name(), args, BTreeMap::new(), size, chunks)
    }

    /// Beta distribution.
    pub fn beta(
        &mut self,
        a: f64,
        b: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Beta, vec![a.into(), b.into()], size, chunks)
    }

    /// Binomial distribution.
    pub fn binomial(
        &mut self,
        n: u64,
        p: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Binomial, vec![n.into(), p.into()], size, chunks)
    }

    /// Chi-square distribution.
    pub fn chisquare(
        &mut self,
        df: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Chisquare, vec![df.into()], size, chunks)
    }

    /// Indices drawn with replacement from `0..a`, optionally weighted.
    pub fn choice(
        &mut self,
        a: i64,
        p: Option<Vec<f64>>,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(
            Distribution::Choice,
            vec![a.into(), true.into(), p.into()],
            size,
            chunks,
        )
    }

    /// Exponential distribution.
    pub fn exponential(
        &mut self,
        scale: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Exponential, vec![scale.into()], size, chunks)
    }

    /// F distribution.
    pub fn f(
        &mut self,
        dfnum: f64,
        dfden: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::F, vec![dfnum.into(), dfden.into()], size, chunks)
    }

    /// Gamma distribution with shape parameter `shape` (not the output
    /// size) and `scale`.
    pub fn gamma(
        &mut self,
        shape: f64,
        scale: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Gamma, vec![shape.into(), scale.into()], size, chunks)
    }

    /// Geometric distribution (trials until the first success).
    pub fn geometric(
        &mut self,
        p: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Geometric, vec![p.into()], size, chunks)
    }

    /// Gumbel distribution.
    pub fn gumbel(
        &mut self,
        loc: f64,
        scale: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Gumbel, vec![loc.into(), scale.into()], size, chunks)
    }

    /// Hypergeometric distribution.
    pub fn hypergeometric(
        &mut self,
        ngood: u64,
        nbad: u64,
        nsample: u64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(
            Distribution::Hypergeometric,
            vec![ngood.into(), nbad.into(), nsample.into()],
            size,
            chunks,
        )
    }

    /// Laplace distribution.
    pub fn laplace(
        &mut self,
        loc: f64,
        scale: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Laplace, vec![loc.into(), scale.into()], size, chunks)
    }

    /// Logistic distribution.
    pub fn logistic(
        &mut self,
        loc: f64,
        scale: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Logistic, vec![loc.into(), scale.into()], size, chunks)
    }

    /// Log-normal distribution.
    pub fn lognormal(
        &mut self,
        mean: f64,
        sigma: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Lognormal, vec![mean.into(), sigma.into()], size, chunks)
    }

    /// Logarithmic series distribution.
    pub fn logseries(
        &mut self,
        p: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Logseries, vec![p.into()], size, chunks)
    }

    /// Negative binomial distribution.
    pub fn negative_binomial(
        &mut self,
        n: f64,
        p: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::NegativeBinomial, vec![n.into(), p.into()], size, chunks)
    }

    /// Noncentral chi-square distribution.
    pub fn noncentral_chisquare(
        &mut self,
        df: f64,
        nonc: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(
            Distribution::NoncentralChisquare,
            vec![df.into(), nonc.into()],
            size,
            chunks,
        )
    }

    /// Noncentral F distribution.
    pub fn noncentral_f(
        &mut self,
        dfnum: f64,
        dfden: f64,
        nonc: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(
            Distribution::NoncentralF,
            vec![dfnum.into(), dfden.into(), nonc.into()],
            size,
            chunks,
        )
    }

    /// Normal distribution.
    pub fn normal(
        &mut self,
        loc: f64,
        scale: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Normal, vec![loc.into(), scale.into()], size, chunks)
    }

    /// Pareto II (Lomax) distribution.
    pub fn pareto(
        &mut self,
        a: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Pareto, vec![a.into()], size, chunks)
    }

    /// Poisson distribution.
    pub fn poisson(
        &mut self,
        lam: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Poisson, vec![lam.into()], size, chunks)
    }

    /// Power distribution.
    pub fn power(
        &mut self,
        a: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Power, vec![a.into()], size, chunks)
    }

    /// Integers in `[low, high)`; `[0, low)` when `high` is `None`.
    pub fn randint(
        &mut self,
        low: i64,
        high: Option<i64>,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Randint, vec![low.into(), high.into()], size, chunks)
    }

    /// Integers in `[low, high]`; `[1, low]` when `high` is `None`.
    pub fn random_integers(
        &mut self,
        low: i64,
        high: Option<i64>,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(
            Distribution::RandomIntegers,
            vec![low.into(), high.into()],
            size,
            chunks,
        )
    }

    /// Floats in `[0, 1)`.
    pub fn random_sample(
        &mut self,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::RandomSample, vec![], size, chunks)
    }

    /// Alias of [`random_sample`](Self::random_sample).
    pub fn random(
        &mut self,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.random_sample(size, chunks)
    }

    /// Rayleigh distribution.
    pub fn rayleigh(
        &mut self,
        scale: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Rayleigh, vec![scale.into()], size, chunks)
    }

    /// Standard Cauchy distribution.
    pub fn standard_cauchy(
        &mut self,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::StandardCauchy, vec![], size, chunks)
    }

    /// Standard exponential distribution.
    pub fn standard_exponential(
        &mut self,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::StandardExponential, vec![], size, chunks)
    }

    /// Standard gamma distribution.
    pub fn standard_gamma(
        &mut self,
        shape: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::StandardGamma, vec![shape.into()], size, chunks)
    }

    /// Standard normal distribution.
    pub fn standard_normal(
        &mut self,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::StandardNormal, vec![], size, chunks)
    }

    /// Student's t distribution.
    pub fn standard_t(
        &mut self,
        df: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::StandardT, vec![df.into()], size, chunks)
    }

    /// Integers in `[0, i64::MAX]`.
    pub fn tomaxint(
        &mut self,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Tomaxint, vec![], size, chunks)
    }

    /// Triangular distribution.
    pub fn triangular(
        &mut self,
        left: f64,
        mode: f64,
        right: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(
            Distribution::Triangular,
            vec![left.into(), mode.into(), right.into()],
            size,
            chunks,
        )
    }

    /// Uniform distribution on `[low, high)`.
    pub fn uniform(
        &mut self,
        low: f64,
        high: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Uniform, vec![low.into(), high.into()], size, chunks)
    }

    /// Von Mises distribution.
    pub fn vonmises(
        &mut self,
        mu: f64,
        kappa: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Vonmises, vec![mu.into(), kappa.into()], size, chunks)
    }

    /// Wald (inverse Gaussian) distribution.
    pub fn wald(
        &mut self,
        mean: f64,
        scale: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Wald, vec![mean.into(), scale.into()], size, chunks)
    }

    /// Weibull distribution.
    pub fn weibull(
        &mut self,
        a: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Weibull, vec![a.into()], size, chunks)
    }

    /// Zipf distribution.
    pub fn zipf(
        &mut self,
        a: f64,
        size: impl Into<Shape>,
        chunks: impl Into<ChunkSpec>,
    ) -> Result<LazyArray> {
        self.draw(Distribution::Zipf, vec![a.into()], size, chunks)
    }
}

impl fmt::Debug for RandomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomState")
            .field("state", &self.state)
            .field("sampler", &self.sampler().name())
            .finish()
    }
}
