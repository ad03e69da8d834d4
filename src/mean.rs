//! Arithmetic mean as a group statistic.
//!
//! # Algorithm
//! Two partial means combine as a count-weighted average:
//!
//! ```text
//! n = n₁ + n₂
//! x̄ = (n₁·x̄₁ + n₂·x̄₂) / n
//! ```
//!
//! The inverse negates the count and keeps the mean, so
//! `(n, x̄) + (−n, x̄) = (0, ·)`. A merged count of zero is always
//! normalized to the identity `(0, 0)` instead of dividing by zero.

use approx::{AbsDiffEq, RelativeEq};
use log::trace;

use crate::algebra::{impl_group_ops, AlgebraicStatistic, GroupStatistic};
use crate::error::{StatsError, StatsResult};
use crate::value::MeanValue;

/// Sample count and arithmetic mean.
///
/// The count is signed: a negative count only arises from
/// [`invert`](GroupStatistic::invert) and marks an algebraic intermediate,
/// never a real dataset. Ratio queries reject such values through
/// [`require_count`](Mean::require_count).
///
/// # Examples
/// ```
/// use u_sufstat::{AlgebraicStatistic, Mean};
/// let left = Mean::from_samples(&[1.0, 3.0, 4.0]);
/// let right = Mean::from_samples(&[-10.0, 2334.0, 3.0, 100.0]);
/// let merged = left + right;
/// assert_eq!(merged.count(), 7);
/// assert!((merged.mean() - 2435.0 / 7.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mean<V = f64> {
    n: i64,
    mean: V,
}

impl<V: MeanValue> Mean<V> {
    /// Number of samples (negative for inverted intermediates).
    pub fn count(&self) -> i64 {
        self.n
    }

    /// The mean value; zero for the identity.
    pub fn mean(&self) -> &V {
        &self.mean
    }

    /// Returns `true` if the statistic describes at least one real sample.
    pub fn is_materialized(&self) -> bool {
        self.n >= 1
    }

    /// Checks that the statistic holds at least `required` samples.
    ///
    /// # Errors
    /// Returns [`StatsError::DegenerateAggregate`] otherwise, which covers
    /// the identity and every negative-count intermediate.
    pub fn require_count(&self, required: i64, context: &'static str) -> StatsResult<()> {
        if self.n < required {
            return Err(StatsError::DegenerateAggregate {
                context,
                required,
                got: self.n,
            });
        }
        Ok(())
    }
}

impl<V: MeanValue> AlgebraicStatistic for Mean<V> {
    type Sample = V;

    fn identity() -> Self {
        Self {
            n: 0,
            mean: V::zero(),
        }
    }

    fn from_samples(samples: &[V]) -> Self {
        if samples.is_empty() {
            return Self::identity();
        }
        let n = samples.len() as i64;
        Self {
            n,
            mean: V::total(samples) / n as f64,
        }
    }

    fn merge(&self, other: &Self) -> Self {
        if other.is_identity() {
            return self.clone();
        }
        if self.is_identity() {
            return other.clone();
        }
        let n = self.n + other.n;
        if n == 0 {
            trace!("Mean merge: total count is zero, normalizing to identity");
            return Self::identity();
        }
        let weighted = self.mean.clone() * self.n as f64 + other.mean.clone() * other.n as f64;
        Self {
            n,
            mean: weighted / n as f64,
        }
    }

    fn is_identity(&self) -> bool {
        self.n == 0
    }
}

impl<V: MeanValue> GroupStatistic for Mean<V> {
    fn invert(&self) -> Self {
        Self {
            n: -self.n,
            mean: self.mean.clone(),
        }
    }
}

impl<V: MeanValue> Default for Mean<V> {
    fn default() -> Self {
        Self::identity()
    }
}

impl_group_ops!([V: MeanValue] Mean<V>);

impl<V> AbsDiffEq for Mean<V>
where
    V: MeanValue + AbsDiffEq<Epsilon = f64>,
{
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.n == other.n && self.mean.abs_diff_eq(&other.mean, epsilon)
    }
}

impl<V> RelativeEq for Mean<V>
where
    V: MeanValue + RelativeEq<Epsilon = f64>,
{
    fn default_max_relative() -> f64 {
        f64::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.n == other.n && self.mean.relative_eq(&other.mean, epsilon, max_relative)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    const D1: [f64; 3] = [1.0, 3.0, 4.0];
    const D2: [f64; 4] = [-10.0, 2334.0, 3.0, 100.0];
    const D3: [f64; 6] = [-10.0, 20.0, 2200.0, 3.0, 3.0, 4.0];

    fn concat(parts: &[&[f64]]) -> Vec<f64> {
        parts.iter().flat_map(|p| p.iter().copied()).collect()
    }

    #[test]
    fn test_mean_from_samples() {
        let data = concat(&[&D1, &D2]);
        let m = Mean::from_samples(&data);
        assert_eq!(m.count(), 7);
        assert_relative_eq!(*m.mean(), 2435.0 / 7.0, max_relative = 1e-15);
    }

    #[test]
    fn test_mean_empty_is_identity() {
        let m = Mean::<f64>::from_samples(&[]);
        assert!(m.is_identity());
        assert_eq!(m, Mean::identity());
        assert_eq!(*m.mean(), 0.0);
    }

    #[test]
    fn test_mean_merge_matches_batch() {
        let merged = Mean::from_samples(&D1).merge(&Mean::from_samples(&D2));
        let batch = Mean::from_samples(&concat(&[&D1, &D2]));
        assert_eq!(merged.count(), 7);
        assert_relative_eq!(merged, batch, max_relative = 1e-12);
        assert_relative_eq!(*merged.mean(), 2435.0 / 7.0, max_relative = 1e-12);
    }

    #[test]
    fn test_mean_eq() {
        assert_eq!(Mean::from_samples(&D1), Mean::from_samples(&D1));
        assert_ne!(Mean::from_samples(&D1), Mean::from_samples(&D2));
    }

    #[test]
    fn test_mean_inverse_recovers_operand() {
        let m1 = Mean::from_samples(&D1);
        let m2 = Mean::from_samples(&D2);
        let back = m1.merge(&m2).merge(&m2.invert());
        assert_eq!(back.count(), m1.count());
        assert_relative_eq!(back, m1, max_relative = 1e-12);

        let sub = (m1.clone() + m2.clone()) - m2;
        assert_relative_eq!(sub, m1, max_relative = 1e-12);
    }

    #[test]
    fn test_mean_minus_self_is_identity() {
        let m = Mean::from_samples(&concat(&[&D1, &D2]));
        let zero = m.subtract(&m);
        assert!(zero.is_identity());
        assert_eq!(zero, Mean::identity());
    }

    #[test]
    fn test_mean_zero_total_count_normalizes() {
        // Not exact inverses, but the counts cancel.
        let a = Mean::from_samples(&[1.0, 2.0]);
        let b = Mean::from_samples(&[50.0, 70.0]).invert();
        assert_eq!(a.merge(&b), Mean::identity());
    }

    #[test]
    fn test_mean_identity() {
        let m = Mean::from_samples(&concat(&[&D1, &D2]));
        assert_eq!(m.merge(&Mean::identity()), m);
        assert_eq!(Mean::identity().merge(&m), m);
    }

    #[test]
    fn test_mean_associativity() {
        let (m1, m2, m3) = (
            Mean::from_samples(&D1),
            Mean::from_samples(&D2),
            Mean::from_samples(&D3),
        );
        let left = m1.merge(&m2).merge(&m3);
        let right = m1.merge(&m2.merge(&m3));
        assert_relative_eq!(left, right, max_relative = 1e-12);
    }

    #[test]
    fn test_mean_vector_samples() {
        let a = [Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0)];
        let b = [Vector3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, 1.0)];
        let merged = Mean::from_samples(&a).merge(&Mean::from_samples(&b));
        let batch = Mean::from_samples(&[a[0], a[1], b[0], b[1]]);
        assert_eq!(merged.count(), 4);
        assert_relative_eq!(merged, batch, max_relative = 1e-12);
        assert_relative_eq!(*merged.mean(), Vector3::new(0.25, 0.25, 0.5), max_relative = 1e-12);
        assert_eq!(*Mean::<Vector3<f64>>::identity().mean(), Vector3::zeros());
    }

    #[test]
    fn test_require_count() {
        let m = Mean::from_samples(&D1);
        assert!(m.require_count(1, "test").is_ok());
        assert!(m.is_materialized());
        assert!(!m.invert().is_materialized());
        assert_eq!(
            m.invert().require_count(1, "test"),
            Err(StatsError::DegenerateAggregate {
                context: "test",
                required: 1,
                got: -3,
            })
        );
        assert!(Mean::<f64>::identity().require_count(1, "test").is_err());
    }
}
