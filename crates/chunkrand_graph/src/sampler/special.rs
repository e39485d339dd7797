//! Distributions without a `rand_distr` counterpart.
//!
//! Each type validates its parameters in `new`. Single-stage distributions
//! implement `rand_distr::Distribution`, so the default sampler treats them
//! like the library distributions. The mixtures (negative binomial and the
//! noncentral family) build an inner distribution per draw and expose a
//! fallible `try_sample` instead.

use rand::distributions::{Open01, Standard};
use rand::Rng;
use rand_distr::{ChiSquared, Distribution, Exp1, Gamma, Poisson, StandardNormal};
use std::f64::consts::PI;

/// Laplace (double exponential) distribution.
#[derive(Clone, Copy, Debug)]
pub struct Laplace {
    loc: f64,
    scale: f64,
}

impl Laplace {
    /// Requires `scale >= 0`.
    pub fn new(loc: f64, scale: f64) -> Result<Self, String> {
        if !(scale >= 0.0) {
            return Err(format!("scale must be non-negative, got {}", scale));
        }
        Ok(Self { loc, scale })
    }
}

impl Distribution<f64> for Laplace {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = Open01.sample(rng);
        if u >= 0.5 {
            self.loc - self.scale * (2.0 - 2.0 * u).ln()
        } else {
            self.loc + self.scale * (2.0 * u).ln()
        }
    }
}

/// Logistic distribution.
#[derive(Clone, Copy, Debug)]
pub struct Logistic {
    loc: f64,
    scale: f64,
}

impl Logistic {
    /// Requires `scale >= 0`.
    pub fn new(loc: f64, scale: f64) -> Result<Self, String> {
        if !(scale >= 0.0) {
            return Err(format!("scale must be non-negative, got {}", scale));
        }
        Ok(Self { loc, scale })
    }
}

impl Distribution<f64> for Logistic {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = Open01.sample(rng);
        self.loc + self.scale * (u / (1.0 - u)).ln()
    }
}

/// Rayleigh distribution.
#[derive(Clone, Copy, Debug)]
pub struct Rayleigh {
    scale: f64,
}

impl Rayleigh {
    /// Requires `scale >= 0`.
    pub fn new(scale: f64) -> Result<Self, String> {
        if !(scale >= 0.0) {
            return Err(format!("scale must be non-negative, got {}", scale));
        }
        Ok(Self { scale })
    }
}

impl Distribution<f64> for Rayleigh {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let e: f64 = Exp1.sample(rng);
        self.scale * (2.0 * e).sqrt()
    }
}

/// Power distribution on `[0, 1]` with exponent `a - 1`.
#[derive(Clone, Copy, Debug)]
pub struct Power {
    inv_a: f64,
}

impl Power {
    /// Requires `a > 0`.
    pub fn new(a: f64) -> Result<Self, String> {
        if !(a > 0.0) {
            return Err(format!("a must be positive, got {}", a));
        }
        Ok(Self { inv_a: 1.0 / a })
    }
}

impl Distribution<f64> for Power {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let e: f64 = Exp1.sample(rng);
        (-(-e).exp_m1()).powf(self.inv_a)
    }
}

/// Lomax (Pareto II) distribution with unit scale.
#[derive(Clone, Copy, Debug)]
pub struct Lomax {
    inv_a: f64,
}

impl Lomax {
    /// Requires `a > 0`.
    pub fn new(a: f64) -> Result<Self, String> {
        if !(a > 0.0) {
            return Err(format!("a must be positive, got {}", a));
        }
        Ok(Self { inv_a: 1.0 / a })
    }
}

impl Distribution<f64> for Lomax {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let e: f64 = Exp1.sample(rng);
        (e * self.inv_a).exp_m1()
    }
}

/// Logarithmic series distribution (Kemp's algorithm).
#[derive(Clone, Copy, Debug)]
pub struct LogSeries {
    p: f64,
    r: f64,
}

impl LogSeries {
    /// Requires `0 < p < 1`.
    pub fn new(p: f64) -> Result<Self, String> {
        if !(p > 0.0 && p < 1.0) {
            return Err(format!("p must be in (0, 1), got {}", p));
        }
        Ok(Self {
            p,
            r: (-p).ln_1p(),
        })
    }
}

impl Distribution<i64> for LogSeries {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        loop {
            let v: f64 = Standard.sample(rng);
            if v >= self.p {
                return 1;
            }
            let u: f64 = Standard.sample(rng);
            let q = -(self.r * u).exp_m1();
            if v <= q * q {
                let result = (1.0 + v.ln() / q.ln()).floor();
                if result < 1.0 || v == 0.0 {
                    continue;
                }
                return result as i64;
            }
            if v >= q {
                return 1;
            }
            return 2;
        }
    }
}

/// Von Mises distribution on `[-pi, pi)` (Best-Fisher rejection).
#[derive(Clone, Copy, Debug)]
pub struct VonMises {
    mu: f64,
    kappa: f64,
    s: f64,
}

impl VonMises {
    /// Requires `kappa >= 0`.
    pub fn new(mu: f64, kappa: f64) -> Result<Self, String> {
        if !(kappa >= 0.0) || !mu.is_finite() {
            return Err(format!(
                "kappa must be non-negative and mu finite, got mu={}, kappa={}",
                mu, kappa
            ));
        }
        let s = if kappa < 1e-5 {
            1.0 / kappa + kappa
        } else {
            let r = 1.0 + (1.0 + 4.0 * kappa * kappa).sqrt();
            let rho = (r - (2.0 * r).sqrt()) / (2.0 * kappa);
            (1.0 + rho * rho) / (2.0 * rho)
        };
        Ok(Self { mu, kappa, s })
    }
}

impl Distribution<f64> for VonMises {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.kappa < 1e-8 {
            let u: f64 = Standard.sample(rng);
            return PI * (2.0 * u - 1.0);
        }

        let w = loop {
            let u: f64 = Standard.sample(rng);
            let z = (PI * u).cos();
            let w = (1.0 + self.s * z) / (self.s + z);
            let y = self.kappa * (self.s - w);
            let v: f64 = Standard.sample(rng);
            if y * (2.0 - y) - v >= 0.0 || (y / v).ln() + 1.0 - y >= 0.0 {
                break w;
            }
        };

        let u: f64 = Standard.sample(rng);
        let mut result = w.acos();
        if u < 0.5 {
            result = -result;
        }
        result += self.mu;

        // Wrap into [-pi, pi)
        let negative = result < 0.0;
        let wrapped = ((result.abs() + PI) % (2.0 * PI)) - PI;
        if negative {
            -wrapped
        } else {
            wrapped
        }
    }
}

/// Negative binomial distribution as a gamma-Poisson mixture.
#[derive(Clone, Copy, Debug)]
pub struct NegativeBinomial {
    gamma: Option<Gamma<f64>>,
}

impl NegativeBinomial {
    /// Requires `n > 0` and `0 < p <= 1`.
    pub fn new(n: f64, p: f64) -> Result<Self, String> {
        if !(n > 0.0) {
            return Err(format!("n must be positive, got {}", n));
        }
        if !(p > 0.0 && p <= 1.0) {
            return Err(format!("p must be in (0, 1], got {}", p));
        }
        let gamma = if p == 1.0 {
            None
        } else {
            Some(Gamma::new(n, (1.0 - p) / p).map_err(|e| format!("{:?}", e))?)
        };
        Ok(Self { gamma })
    }

    /// Draws one value.
    ///
    /// Fails when the gamma mixing draw leaves the Poisson domain, e.g. an
    /// infinite rate for extreme `n` and `p`.
    pub fn try_sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<i64, String> {
        let Some(gamma) = self.gamma else {
            return Ok(0);
        };
        let lambda = gamma.sample(rng);
        poisson_draw(lambda, rng)
    }
}

/// Noncentral chi-square distribution.
#[derive(Clone, Copy, Debug)]
pub struct NoncentralChiSquared {
    df: f64,
    nonc: f64,
}

impl NoncentralChiSquared {
    /// Requires `df > 0` and `nonc >= 0`.
    pub fn new(df: f64, nonc: f64) -> Result<Self, String> {
        if !(df > 0.0) {
            return Err(format!("df must be positive, got {}", df));
        }
        if !(nonc >= 0.0) {
            return Err(format!("nonc must be non-negative, got {}", nonc));
        }
        Ok(Self { df, nonc })
    }
}

impl NoncentralChiSquared {
    /// Draws one value.
    pub fn try_sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, String> {
        if self.nonc == 0.0 {
            return chi_squared_draw(self.df, rng);
        }
        if self.df > 1.0 {
            let chi2 = chi_squared_draw(self.df - 1.0, rng)?;
            let n: f64 = StandardNormal.sample(rng);
            let shifted = n + self.nonc.sqrt();
            Ok(chi2 + shifted * shifted)
        } else {
            let i = poisson_draw(self.nonc / 2.0, rng)?;
            chi_squared_draw(self.df + 2.0 * i as f64, rng)
        }
    }
}

/// Noncentral F distribution.
#[derive(Clone, Copy, Debug)]
pub struct NoncentralF {
    numerator: NoncentralChiSquared,
    dfnum: f64,
    dfden: f64,
}

impl NoncentralF {
    /// Requires `dfnum > 0`, `dfden > 0` and `nonc >= 0`.
    pub fn new(dfnum: f64, dfden: f64, nonc: f64) -> Result<Self, String> {
        if !(dfden > 0.0) {
            return Err(format!("dfden must be positive, got {}", dfden));
        }
        Ok(Self {
            numerator: NoncentralChiSquared::new(dfnum, nonc)?,
            dfnum,
            dfden,
        })
    }
}

impl NoncentralF {
    /// Draws one value.
    pub fn try_sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, String> {
        let t = self.numerator.try_sample(rng)? * self.dfden;
        Ok(t / (chi_squared_draw(self.dfden, rng)? * self.dfnum))
    }
}

fn chi_squared_draw<R: Rng + ?Sized>(df: f64, rng: &mut R) -> Result<f64, String> {
    let chi2 = ChiSquared::new(df).map_err(|e| format!("chi-square with df {}: {:?}", df, e))?;
    Ok(chi2.sample(rng))
}

fn poisson_draw<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> Result<i64, String> {
    if lambda == 0.0 {
        return Ok(0);
    }
    if !lambda.is_finite() {
        return Err(format!("poisson rate must be finite, got {}", lambda));
    }
    let poisson = Poisson::new(lambda).map_err(|e| format!("poisson with rate {}: {:?}", lambda, e))?;
    let draw: f64 = poisson.sample(rng);
    Ok(draw as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mean_of<D: Distribution<f64>>(dist: D, n: usize) -> f64 {
        let mut rng = StdRng::seed_from_u64(17);
        (0..n).map(|_| dist.sample(&mut rng)).sum::<f64>() / n as f64
    }

    fn int_mean_of<D: Distribution<i64>>(dist: D, n: usize) -> f64 {
        let mut rng = StdRng::seed_from_u64(17);
        (0..n).map(|_| dist.sample(&mut rng) as f64).sum::<f64>() / n as f64
    }

    fn try_mean_of<T: Into<f64>>(
        mut draw: impl FnMut(&mut StdRng) -> Result<T, String>,
        n: usize,
    ) -> f64 {
        let mut rng = StdRng::seed_from_u64(17);
        (0..n).map(|_| draw(&mut rng).unwrap().into()).sum::<f64>() / n as f64
    }

    #[test]
    fn test_laplace_mean() {
        let mean = mean_of(Laplace::new(3.0, 1.0).unwrap(), 100_000);
        assert!((mean - 3.0).abs() < 0.05, "mean {}", mean);
    }

    #[test]
    fn test_logistic_mean() {
        let mean = mean_of(Logistic::new(-1.0, 0.5).unwrap(), 100_000);
        assert!((mean + 1.0).abs() < 0.05, "mean {}", mean);
    }

    #[test]
    fn test_rayleigh_mean() {
        // E[X] = scale * sqrt(pi / 2)
        let mean = mean_of(Rayleigh::new(2.0).unwrap(), 100_000);
        assert!((mean - 2.0 * (PI / 2.0).sqrt()).abs() < 0.03, "mean {}", mean);
    }

    #[test]
    fn test_power_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(3);
        let dist = Power::new(2.5).unwrap();
        for _ in 0..10_000 {
            let x = dist.sample(&mut rng);
            assert!((0.0..=1.0).contains(&x));
        }
        // E[X] = a / (a + 1)
        let mean = mean_of(dist, 100_000);
        assert!((mean - 2.5 / 3.5).abs() < 0.01, "mean {}", mean);
    }

    #[test]
    fn test_lomax_mean() {
        // E[X] = 1 / (a - 1) for a > 1
        let mean = mean_of(Lomax::new(5.0).unwrap(), 200_000);
        assert!((mean - 0.25).abs() < 0.02, "mean {}", mean);
    }

    #[test]
    fn test_logseries_support_and_mean() {
        let p: f64 = 0.6;
        let mut rng = StdRng::seed_from_u64(5);
        let dist = LogSeries::new(p).unwrap();
        for _ in 0..10_000 {
            assert!(dist.sample(&mut rng) >= 1);
        }
        // E[X] = -p / ((1 - p) ln(1 - p))
        let expected = -p / ((1.0 - p) * (1.0 - p).ln());
        let mean = int_mean_of(dist, 200_000);
        assert!((mean - expected).abs() < 0.03, "mean {} expected {}", mean, expected);
    }

    #[test]
    fn test_vonmises_range_and_mean() {
        let mut rng = StdRng::seed_from_u64(9);
        let dist = VonMises::new(1.0, 4.0).unwrap();
        for _ in 0..10_000 {
            let x = dist.sample(&mut rng);
            assert!((-PI..=PI).contains(&x));
        }
        let mean = mean_of(dist, 100_000);
        assert!((mean - 1.0).abs() < 0.02, "mean {}", mean);
    }

    #[test]
    fn test_vonmises_zero_kappa_is_uniform() {
        let mean = mean_of(VonMises::new(0.0, 0.0).unwrap(), 100_000);
        assert!(mean.abs() < 0.05);
    }

    #[test]
    fn test_negative_binomial_mean() {
        // E[X] = n (1 - p) / p
        let dist = NegativeBinomial::new(5.0, 0.5).unwrap();
        let mean = try_mean_of(|r| dist.try_sample(r).map(|k| k as f64), 100_000);
        assert!((mean - 5.0).abs() < 0.1, "mean {}", mean);
        let degenerate = NegativeBinomial::new(5.0, 1.0).unwrap();
        assert_eq!(try_mean_of(|r| degenerate.try_sample(r).map(|k| k as f64), 10), 0.0);
    }

    #[test]
    fn test_noncentral_chisquare_mean() {
        // E[X] = df + nonc
        for (df, nonc) in [(3.0, 2.0), (0.5, 1.5), (4.0, 0.0)] {
            let dist = NoncentralChiSquared::new(df, nonc).unwrap();
            let mean = try_mean_of(|r| dist.try_sample(r), 200_000);
            assert!((mean - (df + nonc)).abs() < 0.1, "df {} nonc {} mean {}", df, nonc, mean);
        }
    }

    #[test]
    fn test_noncentral_f_positive() {
        let mut rng = StdRng::seed_from_u64(1);
        let dist = NoncentralF::new(3.0, 20.0, 3.0).unwrap();
        for _ in 0..1_000 {
            assert!(dist.try_sample(&mut rng).unwrap() >= 0.0);
        }
    }

    #[test]
    fn test_inner_draw_failures_are_reported() {
        let mut rng = StdRng::seed_from_u64(2);
        assert!(poisson_draw(f64::NAN, &mut rng).is_err());
        assert!(poisson_draw(f64::INFINITY, &mut rng).is_err());
        assert_eq!(poisson_draw(0.0, &mut rng), Ok(0));
        assert!(chi_squared_draw(f64::NAN, &mut rng).is_err());

        // The gamma mixing rate overflows to infinity
        let dist = NegativeBinomial::new(1e300, 1e-300).unwrap();
        let err = dist.try_sample(&mut rng).unwrap_err();
        assert!(err.contains("finite"), "{}", err);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(Laplace::new(0.0, -1.0).is_err());
        assert!(Power::new(0.0).is_err());
        assert!(LogSeries::new(1.0).is_err());
        assert!(VonMises::new(0.0, -1.0).is_err());
        assert!(NegativeBinomial::new(0.0, 0.5).is_err());
        assert!(NoncentralChiSquared::new(1.0, -0.5).is_err());
        assert!(NoncentralF::new(1.0, 0.0, 1.0).is_err());
        assert!(Rayleigh::new(f64::NAN).is_err());
    }
}
