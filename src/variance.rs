//! Sample variance as a group statistic.
//!
//! # Algorithm
//! Construction is two-pass: the mean first, then the compensated sum of
//! squared deviations from it. Partial results combine with Chan's
//! parallel formula, in its delta form:
//!
//! ```text
//! n   = n₁ + n₂
//! δ   = x̄₂ − x̄₁
//! M₂  = M₂,₁ + M₂,₂ + δ² · n₁·n₂ / n
//! ```
//!
//! This equals `M₂,₁ + n₁x̄₁² + M₂,₂ + n₂x̄₂² − n·x̄²` for every non-zero
//! `n`, including the negative counts produced by inversion, without the
//! cancellation between the large `n·x̄²` terms.
//!
//! Reference: Chan, Golub & LeVeque (1979), "Updating Formulae and a
//! Pairwise Algorithm for Computing Sample Variances".

use approx::{AbsDiffEq, RelativeEq};
use log::trace;

use crate::algebra::{impl_group_ops, AlgebraicStatistic, GroupStatistic};
use crate::error::StatsResult;
use crate::mean::Mean;
use crate::value::compensated_sum;

/// Count, mean and sum of squared deviations (M₂) of scalar samples.
///
/// # Examples
/// ```
/// use u_sufstat::{AlgebraicStatistic, Variance};
/// let left = Variance::from_samples(&[2.0, 4.0, 4.0, 4.0]);
/// let right = Variance::from_samples(&[5.0, 5.0, 7.0, 9.0]);
/// let merged = left + right;
/// assert!((merged.sample_variance().unwrap() - 4.571428571428571).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variance {
    mean: Mean<f64>,
    sum_square_distance: f64,
}

impl Variance {
    /// Number of samples (negative for inverted intermediates).
    pub fn count(&self) -> i64 {
        self.mean.count()
    }

    /// The embedded mean statistic.
    pub fn mean(&self) -> &Mean<f64> {
        &self.mean
    }

    /// Sum of squared deviations from the mean (M₂).
    pub fn sum_square_distance(&self) -> f64 {
        self.sum_square_distance
    }

    /// Unbiased sample variance `M₂ / (n − 1)`.
    ///
    /// # Errors
    /// [`StatsError::DegenerateAggregate`](crate::StatsError::DegenerateAggregate)
    /// if `n ≤ 1`.
    pub fn sample_variance(&self) -> StatsResult<f64> {
        self.mean.require_count(2, "Variance::sample_variance")?;
        Ok(self.sum_square_distance / (self.count() - 1) as f64)
    }

    /// Population variance `M₂ / n`.
    ///
    /// # Errors
    /// [`StatsError::DegenerateAggregate`](crate::StatsError::DegenerateAggregate)
    /// if `n < 1`.
    pub fn population_variance(&self) -> StatsResult<f64> {
        self.mean.require_count(1, "Variance::population_variance")?;
        Ok(self.sum_square_distance / self.count() as f64)
    }

    /// Sample standard deviation, `sqrt(sample_variance)`.
    pub fn sample_std_dev(&self) -> StatsResult<f64> {
        self.sample_variance().map(f64::sqrt)
    }
}

impl AlgebraicStatistic for Variance {
    type Sample = f64;

    fn identity() -> Self {
        Self {
            mean: Mean::identity(),
            sum_square_distance: 0.0,
        }
    }

    fn from_samples(samples: &[f64]) -> Self {
        let mean = Mean::from_samples(samples);
        let m = *mean.mean();
        let sum_square_distance = compensated_sum(samples.iter().map(|&x| {
            let d = x - m;
            d * d
        }));
        Self {
            mean,
            sum_square_distance,
        }
    }

    fn merge(&self, other: &Self) -> Self {
        if other.is_identity() {
            return self.clone();
        }
        if self.is_identity() {
            return other.clone();
        }
        let (na, nb) = (self.count(), other.count());
        let total = na + nb;
        if total == 0 {
            trace!("Variance merge: total count is zero, normalizing to identity");
            return Self::identity();
        }
        let delta = other.mean.mean() - self.mean.mean();
        let cross = delta * delta * (na as f64 * nb as f64 / total as f64);
        Self {
            mean: self.mean.merge(&other.mean),
            sum_square_distance: self.sum_square_distance + other.sum_square_distance + cross,
        }
    }

    fn is_identity(&self) -> bool {
        self.mean.is_identity()
    }
}

impl GroupStatistic for Variance {
    fn invert(&self) -> Self {
        Self {
            mean: self.mean.invert(),
            sum_square_distance: -self.sum_square_distance,
        }
    }
}

impl Default for Variance {
    fn default() -> Self {
        Self::identity()
    }
}

impl_group_ops!([] Variance);

impl AbsDiffEq for Variance {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.mean.abs_diff_eq(&other.mean, epsilon)
            && self
                .sum_square_distance
                .abs_diff_eq(&other.sum_square_distance, epsilon)
    }
}

impl RelativeEq for Variance {
    fn default_max_relative() -> f64 {
        f64::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.mean.relative_eq(&other.mean, epsilon, max_relative)
            && self.sum_square_distance.relative_eq(
                &other.sum_square_distance,
                epsilon,
                max_relative,
            )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod proptests {
    use super::*;
    use approx::relative_eq;
    use proptest::prelude::*;

    fn finite_vec(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(-100.0_f64..100.0, min_len..=max_len)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn merge_is_commutative(a in finite_vec(0, 30), b in finite_vec(0, 30)) {
            let (va, vb) = (Variance::from_samples(&a), Variance::from_samples(&b));
            prop_assert_eq!(va.merge(&vb), vb.merge(&va));
        }

        #[test]
        fn merge_is_associative(
            a in finite_vec(1, 30),
            b in finite_vec(1, 30),
            c in finite_vec(1, 30),
        ) {
            let (va, vb, vc) = (
                Variance::from_samples(&a),
                Variance::from_samples(&b),
                Variance::from_samples(&c),
            );
            let left = va.merge(&vb).merge(&vc);
            let right = va.merge(&vb.merge(&vc));
            prop_assert!(relative_eq!(left, right, epsilon = 1e-6, max_relative = 1e-9));
        }

        #[test]
        fn identity_is_neutral(a in finite_vec(0, 30)) {
            let v = Variance::from_samples(&a);
            prop_assert_eq!(v.merge(&Variance::identity()), v.clone());
            prop_assert_eq!(Variance::identity().merge(&v), v);
        }

        #[test]
        fn inverse_cancels(a in finite_vec(1, 30), b in finite_vec(1, 30)) {
            let va = Variance::from_samples(&a);
            let vb = Variance::from_samples(&b);
            prop_assert_eq!(va.merge(&va.invert()), Variance::identity());
            let back = va.merge(&vb).merge(&vb.invert());
            prop_assert!(relative_eq!(back, va, epsilon = 1e-6, max_relative = 1e-6));
        }

        #[test]
        fn merge_equals_batch(data in finite_vec(2, 80), split in 0.0_f64..1.0) {
            let cut = (split * data.len() as f64) as usize;
            let merged = Variance::from_samples(&data[..cut]).merge(&Variance::from_samples(&data[cut..]));
            let batch = Variance::from_samples(&data);
            prop_assert!(relative_eq!(merged, batch, epsilon = 1e-6, max_relative = 1e-6));
        }

        #[test]
        fn variance_non_negative(data in finite_vec(2, 100)) {
            let v = Variance::from_samples(&data).sample_variance().unwrap();
            prop_assert!(v >= 0.0);
        }
    }
}
