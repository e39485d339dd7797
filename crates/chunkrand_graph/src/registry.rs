//! Distribution registry.
//!
//! A closed catalogue mapping distribution names to their capability
//! identifier ([`Distribution`]), parameter schema with defaults, and
//! declared element type. Every public entry point binds its arguments here
//! and then follows one shared path into the graph builder.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chunkrand_core::types::{ChunkRandError, ElementType, ParamValue, Params, Result};

/// Capability identifier of a distribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Distribution {
    Beta,
    Binomial,
    Chisquare,
    Choice,
    Exponential,
    F,
    Gamma,
    Geometric,
    Gumbel,
    Hypergeometric,
    Laplace,
    Logistic,
    Lognormal,
    Logseries,
    NegativeBinomial,
    NoncentralChisquare,
    NoncentralF,
    Normal,
    Pareto,
    Poisson,
    Power,
    Randint,
    RandomIntegers,
    RandomSample,
    Rayleigh,
    StandardCauchy,
    StandardExponential,
    StandardGamma,
    StandardNormal,
    StandardT,
    Tomaxint,
    Triangular,
    Uniform,
    Vonmises,
    Wald,
    Weibull,
    Zipf,
}

impl Distribution {
    /// Registry entry of this distribution.
    pub fn spec(&self) -> &'static DistributionSpec {
        CATALOGUE
            .iter()
            .find(|spec| spec.distribution == *self)
            .unwrap_or_else(|| unreachable!("every distribution has a catalogue entry"))
    }

    /// Canonical name (e.g. `"negative_binomial"`).
    pub fn name(&self) -> &'static str {
        self.spec().name
    }

    /// Element type the distribution is declared to produce.
    pub fn element_type(&self) -> ElementType {
        self.spec().dtype
    }

    /// All distributions in catalogue order.
    pub fn all() -> impl Iterator<Item = Distribution> {
        CATALOGUE.iter().map(|spec| spec.distribution)
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Distribution {
    type Err = ChunkRandError;

    fn from_str(s: &str) -> Result<Self> {
        DistributionRegistry::new().resolve(s).map(|spec| spec.distribution)
    }
}

/// Default of a declared parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamDefault {
    /// The caller must supply the parameter.
    Required,
    /// Defaults to absent.
    None,
    /// Defaults to a boolean.
    Bool(bool),
    /// Defaults to an integer.
    Int(i64),
    /// Defaults to a float.
    Float(f64),
}

impl ParamDefault {
    fn value(&self) -> Option<ParamValue> {
        match self {
            ParamDefault::Required => None,
            ParamDefault::None => Some(ParamValue::None),
            ParamDefault::Bool(b) => Some(ParamValue::Bool(*b)),
            ParamDefault::Int(v) => Some(ParamValue::Int(*v)),
            ParamDefault::Float(v) => Some(ParamValue::Float(*v)),
        }
    }
}

/// One declared parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSpec {
    /// Parameter name.
    pub name: &'static str,
    /// Default value.
    pub default: ParamDefault,
}

impl fmt::Display for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.default.value() {
            Some(v) => write!(f, "{}={}", self.name, v),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Registry entry of one distribution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistributionSpec {
    /// Canonical name.
    pub name: &'static str,
    /// Capability identifier.
    pub distribution: Distribution,
    /// Parameters in positional order.
    pub params: &'static [ParamSpec],
    /// Declared element type.
    pub dtype: ElementType,
}

impl DistributionSpec {
    /// Binds positional and keyword arguments to this distribution's schema.
    ///
    /// The result holds every declared parameter positionally, in
    /// declaration order, with defaults filled in.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for surplus positionals, unknown or duplicated
    /// keywords, missing required parameters, and `choice` without
    /// replacement.
    pub fn bind(
        &self,
        args: Vec<ParamValue>,
        mut kwargs: BTreeMap<String, ParamValue>,
    ) -> Result<Params> {
        if args.len() > self.params.len() {
            return Err(ChunkRandError::InvalidArgument(format!(
                "{} takes at most {} parameters, got {}",
                self.name,
                self.params.len(),
                args.len()
            )));
        }

        let mut bound = Vec::with_capacity(self.params.len());
        let mut positional = args.into_iter();
        for param in self.params {
            let value = match (positional.next(), kwargs.remove(param.name)) {
                (Some(_), Some(_)) => {
                    return Err(ChunkRandError::InvalidArgument(format!(
                        "{} got multiple values for '{}'",
                        self.name, param.name
                    )));
                }
                (Some(v), None) | (None, Some(v)) => v,
                (None, None) => param.default.value().ok_or_else(|| {
                    ChunkRandError::InvalidArgument(format!(
                        "{} is missing required parameter '{}'",
                        self.name, param.name
                    ))
                })?,
            };
            bound.push(value);
        }

        if let Some(unknown) = kwargs.keys().next() {
            return Err(ChunkRandError::InvalidArgument(format!(
                "{} got an unexpected parameter '{}'",
                self.name, unknown
            )));
        }

        if self.distribution == Distribution::Choice && bound[1] == ParamValue::Bool(false) {
            return Err(ChunkRandError::InvalidArgument(
                "choice without replacement cannot be sampled chunk by chunk".to_string(),
            ));
        }

        Ok(Params::from_args(bound))
    }

    /// Signature string, e.g. `normal(loc=0.0, scale=1.0) -> float64`.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        format!("{}({}) -> {}", self.name, params.join(", "), self.dtype)
    }
}

/// The closed distribution catalogue.
///
/// # Examples
///
/// ```rust
/// use chunkrand_graph::registry::{Distribution, DistributionRegistry};
///
/// let registry = DistributionRegistry::new();
/// let spec = registry.resolve("normal").unwrap();
/// assert_eq!(spec.distribution, Distribution::Normal);
/// assert_eq!(spec.signature(), "normal(loc=0.0, scale=1.0) -> float64");
///
/// assert!(registry.resolve("not-a-distribution").is_err());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct DistributionRegistry;

impl DistributionRegistry {
    /// Creates a registry over the built-in catalogue.
    pub fn new() -> Self {
        Self
    }

    /// Looks up a distribution by name. `random` is accepted as an alias of
    /// `random_sample`.
    ///
    /// # Errors
    ///
    /// `UnknownDistribution` for unregistered names.
    pub fn resolve(&self, name: &str) -> Result<&'static DistributionSpec> {
        let canonical = match name.trim() {
            "random" => "random_sample",
            other => other,
        };
        CATALOGUE
            .iter()
            .find(|spec| spec.name == canonical)
            .ok_or_else(|| ChunkRandError::UnknownDistribution(name.to_string()))
    }

    /// All entries in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = &'static DistributionSpec> {
        CATALOGUE.iter()
    }

    /// Number of registered distributions.
    pub fn len(&self) -> usize {
        CATALOGUE.len()
    }

    /// Always `false`; the catalogue is fixed and non-empty.
    pub fn is_empty(&self) -> bool {
        CATALOGUE.is_empty()
    }
}

macro_rules! param {
    ($name:literal) => {
        ParamSpec {
            name: $name,
            default: ParamDefault::Required,
        }
    };
    ($name:literal = $default:expr) => {
        ParamSpec {
            name: $name,
            default: $default,
        }
    };
}

const fn entry(
    name: &'static str,
    distribution: Distribution,
    params: &'static [ParamSpec],
    dtype: ElementType,
) -> DistributionSpec {
    DistributionSpec {
        name,
        distribution,
        params,
        dtype,
    }
}

use ElementType::{Float64 as F64, Int64 as I64};
use ParamDefault::{Float as DefF, None as DefNone};

static CATALOGUE: [DistributionSpec; 37] = [
    entry("beta", Distribution::Beta, &[param!("a"), param!("b")], F64),
    entry("binomial", Distribution::Binomial, &[param!("n"), param!("p")], I64),
    entry("chisquare", Distribution::Chisquare, &[param!("df")], F64),
    entry(
        "choice",
        Distribution::Choice,
        &[param!("a"), param!("replace" = ParamDefault::Bool(true)), param!("p" = DefNone)],
        I64,
    ),
    entry("exponential", Distribution::Exponential, &[param!("scale" = DefF(1.0))], F64),
    entry("f", Distribution::F, &[param!("dfnum"), param!("dfden")], F64),
    entry("gamma", Distribution::Gamma, &[param!("shape"), param!("scale" = DefF(1.0))], F64),
    entry("geometric", Distribution::Geometric, &[param!("p")], I64),
    entry(
        "gumbel",
        Distribution::Gumbel,
        &[param!("loc" = DefF(0.0)), param!("scale" = DefF(1.0))],
        F64,
    ),
    entry(
        "hypergeometric",
        Distribution::Hypergeometric,
        &[param!("ngood"), param!("nbad"), param!("nsample")],
        I64,
    ),
    entry(
        "laplace",
        Distribution::Laplace,
        &[param!("loc" = DefF(0.0)), param!("scale" = DefF(1.0))],
        F64,
    ),
    entry(
        "logistic",
        Distribution::Logistic,
        &[param!("loc" = DefF(0.0)), param!("scale" = DefF(1.0))],
        F64,
    ),
    entry(
        "lognormal",
        Distribution::Lognormal,
        &[param!("mean" = DefF(0.0)), param!("sigma" = DefF(1.0))],
        F64,
    ),
    entry("logseries", Distribution::Logseries, &[param!("p")], I64),
    entry(
        "negative_binomial",
        Distribution::NegativeBinomial,
        &[param!("n"), param!("p")],
        I64,
    ),
    entry(
        "noncentral_chisquare",
        Distribution::NoncentralChisquare,
        &[param!("df"), param!("nonc")],
        F64,
    ),
    entry(
        "noncentral_f",
        Distribution::NoncentralF,
        &[param!("dfnum"), param!("dfden"), param!("nonc")],
        F64,
    ),
    entry(
        "normal",
        Distribution::Normal,
        &[param!("loc" = DefF(0.0)), param!("scale" = DefF(1.0))],
        F64,
    ),
    entry("pareto", Distribution::Pareto, &[param!("a")], F64),
    entry("poisson", Distribution::Poisson, &[param!("lam" = DefF(1.0))], I64),
    entry("power", Distribution::Power, &[param!("a")], F64),
    entry(
        "randint",
        Distribution::Randint,
        &[param!("low"), param!("high" = DefNone)],
        I64,
    ),
    entry(
        "random_integers",
        Distribution::RandomIntegers,
        &[param!("low"), param!("high" = DefNone)],
        I64,
    ),
    entry("random_sample", Distribution::RandomSample, &[], F64),
    entry("rayleigh", Distribution::Rayleigh, &[param!("scale" = DefF(1.0))], F64),
    entry("standard_cauchy", Distribution::StandardCauchy, &[], F64),
    entry("standard_exponential", Distribution::StandardExponential, &[], F64),
    entry("standard_gamma", Distribution::StandardGamma, &[param!("shape")], F64),
    entry("standard_normal", Distribution::StandardNormal, &[], F64),
    entry("standard_t", Distribution::StandardT, &[param!("df")], F64),
    entry("tomaxint", Distribution::Tomaxint, &[], I64),
    entry(
        "triangular",
        Distribution::Triangular,
        &[param!("left"), param!("mode"), param!("right")],
        F64,
    ),
    entry(
        "uniform",
        Distribution::Uniform,
        &[param!("low" = DefF(0.0)), param!("high" = DefF(1.0))],
        F64,
    ),
    entry("vonmises", Distribution::Vonmises, &[param!("mu"), param!("kappa")], F64),
    entry("wald", Distribution::Wald, &[param!("mean"), param!("scale")], F64),
    entry("weibull", Distribution::Weibull, &[param!("a")], F64),
    entry("zipf", Distribution::Zipf, &[param!("a")], I64),
];
