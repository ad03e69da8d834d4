//! Density models: composites that evaluate a probability density.
//!
//! Each model is a [`CompositeStatistic`] whose fields are the sufficient
//! statistics of one distribution family. The family's parameters are read
//! off the current field values, so a model merged from shards evaluates
//! exactly like one built from the concatenated data.
//!
//! | Model | Fields | Query | pdf |
//! |---|---|---|---|
//! | [`Normal`] | mean, variance | `f64` | (2π·σ²)^(−1/2) · exp(−(x−μ)²/(2σ²)) |
//! | [`Poisson`] | mean (λ) | `u64` | λ^k · e^(−λ) / k! |
//! | [`Bernoulli`] | mean (μ) | `u64` ∈ {0, 1} | μ^x · (1−μ)^(1−x) |
//! | [`Binomial`] | mean (μ) | `(n, k)` | C(n,k) · μ^k · (1−μ)^(n−k) |
//! | [`Exponential`] | mean (1/λ) | `f64` | λ · exp(−λ·x) |
//! | [`Categorical`] | mean (probability vector) | one-hot vector | ⟨query, mean⟩ |
//!
//! # Preconditions
//!
//! Densities are only defined for aggregates materialized from real
//! samples. Evaluating the identity, an inverted intermediate, or a Normal
//! built from a single sample fails with
//! [`StatsError::DegenerateAggregate`]. An estimated parameter outside the
//! family's domain (zero variance, a non-positive exponential mean, a
//! success probability outside `[0, 1]`) fails with
//! [`StatsError::InvalidParameter`].

use log::debug;
use nalgebra::SVector;

use crate::composite::{composite_statistic, CompositeStatistic};
use crate::error::{StatsError, StatsResult};
use crate::mean::Mean;
use crate::special::{ln_binomial_coefficient, ln_factorial, xlogy, LN_SQRT_2PI};
use crate::variance::Variance;

/// A composite statistic that evaluates a probability density (or mass).
pub trait DensityModel: CompositeStatistic {
    /// A point of the sample space, plus any query-time parameters.
    type Query: Copy;

    /// Density (or probability mass) at `x`.
    fn pdf(&self, x: Self::Query) -> StatsResult<f64>;

    /// Natural log of [`pdf`](DensityModel::pdf); `−∞` where the density is 0.
    fn log_pdf(&self, x: Self::Query) -> StatsResult<f64>;

    /// Density up to a factor that does not depend on `x`.
    fn unnormalized_pdf(&self, x: Self::Query) -> StatsResult<f64> {
        self.pdf(x)
    }
}

fn rejected(err: StatsError) -> StatsError {
    debug!("density query rejected: {err}");
    err
}

/// Reads the mean of a materialized aggregate.
fn materialized_mean(mean: &Mean<f64>, context: &'static str) -> StatsResult<f64> {
    mean.require_count(1, context).map_err(rejected)?;
    Ok(*mean.mean())
}

/// Reads a mean that must be a probability.
fn probability(mean: &Mean<f64>, context: &'static str) -> StatsResult<f64> {
    let mu = materialized_mean(mean, context)?;
    if !(0.0..=1.0).contains(&mu) {
        return Err(rejected(StatsError::InvalidParameter {
            name: "probability",
            value: mu,
            reason: "must lie in [0, 1]",
        }));
    }
    Ok(mu)
}

// ============================================================================
// Normal
// ============================================================================

composite_statistic! {
    /// Gaussian model from the sample mean and sample variance.
    ///
    /// # Examples
    /// ```
    /// use u_sufstat::{AlgebraicStatistic, DensityModel, Normal};
    /// let model = Normal::from_samples(&[-1.0, 1.0]);
    /// // μ = 0, σ² = 2
    /// let expected = 1.0 / (2.0 * std::f64::consts::PI * 2.0).sqrt();
    /// assert!((model.pdf(0.0).unwrap() - expected).abs() < 1e-12);
    /// ```
    pub struct Normal for f64 {
        /// Location statistic.
        mean: Mean<f64>,
        /// Spread statistic.
        variance: Variance,
    }
}

impl Normal {
    /// Estimated `(μ, σ²)`, using the unbiased sample variance.
    ///
    /// # Errors
    /// - [`StatsError::DegenerateAggregate`] if fewer than 2 samples back
    ///   the variance, or none back the mean.
    /// - [`StatsError::InvalidParameter`] if the variance is not positive.
    pub fn parameters(&self) -> StatsResult<(f64, f64)> {
        let mu = materialized_mean(&self.mean, "Normal::pdf")?;
        let var = self
            .variance
            .mean()
            .require_count(2, "Normal::pdf")
            .and_then(|()| self.variance.sample_variance())
            .map_err(rejected)?;
        if var <= 0.0 || !var.is_finite() {
            return Err(rejected(StatsError::InvalidParameter {
                name: "variance",
                value: var,
                reason: "must be positive and finite",
            }));
        }
        Ok((mu, var))
    }
}

impl DensityModel for Normal {
    type Query = f64;

    fn pdf(&self, x: f64) -> StatsResult<f64> {
        self.log_pdf(x).map(f64::exp)
    }

    fn log_pdf(&self, x: f64) -> StatsResult<f64> {
        let (mu, var) = self.parameters()?;
        let d = x - mu;
        Ok(-LN_SQRT_2PI - 0.5 * var.ln() - d * d / (2.0 * var))
    }

    /// The Gaussian kernel `exp(−(x−μ)²/(2σ²))`.
    fn unnormalized_pdf(&self, x: f64) -> StatsResult<f64> {
        let (mu, var) = self.parameters()?;
        let d = x - mu;
        Ok((-d * d / (2.0 * var)).exp())
    }
}

// ============================================================================
// Poisson
// ============================================================================

composite_statistic! {
    /// Poisson model; the sample mean estimates the rate λ.
    pub struct Poisson for f64 {
        /// Rate statistic.
        mean: Mean<f64>,
    }
}

impl Poisson {
    /// Estimated rate λ.
    ///
    /// # Errors
    /// [`StatsError::DegenerateAggregate`] on an empty or inverted aggregate;
    /// [`StatsError::InvalidParameter`] if `λ < 0`.
    pub fn rate(&self) -> StatsResult<f64> {
        let lambda = materialized_mean(&self.mean, "Poisson::pdf")?;
        if lambda < 0.0 {
            return Err(rejected(StatsError::InvalidParameter {
                name: "rate",
                value: lambda,
                reason: "must be non-negative",
            }));
        }
        Ok(lambda)
    }
}

impl DensityModel for Poisson {
    type Query = u64;

    fn pdf(&self, k: u64) -> StatsResult<f64> {
        self.log_pdf(k).map(f64::exp)
    }

    fn log_pdf(&self, k: u64) -> StatsResult<f64> {
        let lambda = self.rate()?;
        Ok(xlogy(k as f64, lambda) - lambda - ln_factorial(k))
    }

    /// `λ^k`, dropping the `e^(−λ) / k!` factor.
    fn unnormalized_pdf(&self, k: u64) -> StatsResult<f64> {
        let lambda = self.rate()?;
        Ok(lambda.powf(k as f64))
    }
}

// ============================================================================
// Bernoulli
// ============================================================================

composite_statistic! {
    /// Bernoulli model over 0/1 outcomes.
    ///
    /// # Examples
    /// ```
    /// use u_sufstat::{AlgebraicStatistic, Bernoulli, DensityModel};
    /// let model = Bernoulli::from_samples(&[1.0, 0.0, 1.0, 1.0]);
    /// assert!((model.pdf(1).unwrap() - 0.75).abs() < 1e-12);
    /// assert!((model.pdf(0).unwrap() - 0.25).abs() < 1e-12);
    /// ```
    pub struct Bernoulli for f64 {
        /// Success-rate statistic.
        mean: Mean<f64>,
    }
}

impl Bernoulli {
    /// Estimated success probability μ.
    pub fn success_probability(&self) -> StatsResult<f64> {
        probability(&self.mean, "Bernoulli::pdf")
    }
}

impl DensityModel for Bernoulli {
    type Query = u64;

    fn pdf(&self, x: u64) -> StatsResult<f64> {
        let mu = self.success_probability()?;
        match x {
            0 => Ok(1.0 - mu),
            1 => Ok(mu),
            _ => Err(rejected(StatsError::OutOfSupport {
                value: x as f64,
                support: "{0, 1}",
            })),
        }
    }

    fn log_pdf(&self, x: u64) -> StatsResult<f64> {
        self.pdf(x).map(f64::ln)
    }
}

// ============================================================================
// Binomial
// ============================================================================

composite_statistic! {
    /// Binomial model; the per-trial success rate comes from 0/1 samples,
    /// the number of trials from the query.
    pub struct Binomial for f64 {
        /// Success-rate statistic.
        mean: Mean<f64>,
    }
}

impl Binomial {
    /// Estimated per-trial success probability μ.
    pub fn success_probability(&self) -> StatsResult<f64> {
        probability(&self.mean, "Binomial::pdf")
    }
}

impl DensityModel for Binomial {
    /// `(trials, successes)`.
    type Query = (u64, u64);

    fn pdf(&self, query: (u64, u64)) -> StatsResult<f64> {
        self.log_pdf(query).map(f64::exp)
    }

    fn log_pdf(&self, (trials, successes): (u64, u64)) -> StatsResult<f64> {
        let mu = self.success_probability()?;
        if successes > trials {
            return Ok(f64::NEG_INFINITY);
        }
        let failures = trials - successes;
        Ok(ln_binomial_coefficient(trials, successes)
            + xlogy(successes as f64, mu)
            + xlogy(failures as f64, 1.0 - mu))
    }
}

// ============================================================================
// Exponential
// ============================================================================

composite_statistic! {
    /// Exponential model; the sample mean estimates 1/λ.
    pub struct Exponential for f64 {
        /// Scale statistic.
        mean: Mean<f64>,
    }
}

impl Exponential {
    /// Estimated rate `λ = 1 / mean`.
    ///
    /// # Errors
    /// [`StatsError::DegenerateAggregate`] on an empty or inverted aggregate;
    /// [`StatsError::InvalidParameter`] if the mean is not positive.
    pub fn rate(&self) -> StatsResult<f64> {
        let mean = materialized_mean(&self.mean, "Exponential::pdf")?;
        if mean <= 0.0 {
            return Err(rejected(StatsError::InvalidParameter {
                name: "mean",
                value: mean,
                reason: "must be positive",
            }));
        }
        Ok(1.0 / mean)
    }
}

impl DensityModel for Exponential {
    type Query = f64;

    fn pdf(&self, x: f64) -> StatsResult<f64> {
        self.log_pdf(x).map(f64::exp)
    }

    fn log_pdf(&self, x: f64) -> StatsResult<f64> {
        let lambda = self.rate()?;
        if x < 0.0 {
            return Ok(f64::NEG_INFINITY);
        }
        Ok(lambda.ln() - lambda * x)
    }
}

// ============================================================================
// Categorical
// ============================================================================

composite_statistic! {
    /// Categorical model over `K` categories, built from one-hot samples.
    ///
    /// The mean of the one-hot vectors is the vector of category
    /// probabilities.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::Vector3;
    /// use u_sufstat::{AlgebraicStatistic, Categorical, DensityModel};
    /// let samples = [
    ///     Vector3::new(1.0, 0.0, 0.0),
    ///     Vector3::new(0.0, 0.0, 1.0),
    ///     Vector3::new(0.0, 0.0, 1.0),
    ///     Vector3::new(0.0, 0.0, 1.0),
    /// ];
    /// let model = Categorical::from_samples(&samples);
    /// assert!((model.pdf(Vector3::new(0.0, 0.0, 1.0)).unwrap() - 0.75).abs() < 1e-12);
    /// assert_eq!(model.category_probability(1).unwrap(), 0.0);
    /// ```
    pub struct Categorical<const K: usize> for SVector<f64, K> {
        /// Probability-vector statistic.
        mean: Mean<SVector<f64, K>>,
    }
}

impl<const K: usize> Categorical<K> {
    /// Estimated category probabilities.
    ///
    /// # Errors
    /// [`StatsError::DegenerateAggregate`] on an empty or inverted aggregate;
    /// [`StatsError::InvalidParameter`] if an entry lies outside `[0, 1]`.
    pub fn probabilities(&self) -> StatsResult<SVector<f64, K>> {
        self.mean
            .require_count(1, "Categorical::pdf")
            .map_err(rejected)?;
        let p = *self.mean.mean();
        if let Some(&bad) = p.iter().find(|v| !(0.0..=1.0).contains(*v)) {
            return Err(rejected(StatsError::InvalidParameter {
                name: "probability",
                value: bad,
                reason: "must lie in [0, 1]",
            }));
        }
        Ok(p)
    }

    /// Probability of the category at `index`.
    ///
    /// # Errors
    /// [`StatsError::OutOfSupport`] if `index >= K`, plus the errors of
    /// [`probabilities`](Categorical::probabilities).
    pub fn category_probability(&self, index: usize) -> StatsResult<f64> {
        let p = self.probabilities()?;
        if index >= K {
            return Err(rejected(StatsError::OutOfSupport {
                value: index as f64,
                support: "category index < K",
            }));
        }
        Ok(p[index])
    }
}

impl<const K: usize> DensityModel for Categorical<K> {
    type Query = SVector<f64, K>;

    fn pdf(&self, x: SVector<f64, K>) -> StatsResult<f64> {
        Ok(x.dot(&self.probabilities()?))
    }

    fn log_pdf(&self, x: SVector<f64, K>) -> StatsResult<f64> {
        self.pdf(x).map(f64::ln)
    }
}

// ============================================================================
// Tests
// ============================================================================
