//! Seeded random generation for reproducible sample streams.
//!
//! Provides seeded RNG construction, Fisher-Yates shuffling, weighted
//! index selection, and samplers for the families the density models
//! describe. Tests and benchmarks use these to produce datasets whose
//! sufficient statistics are known in advance.
//!
//! # Reproducibility
//!
//! Use [`create_rng`] with a fixed seed. The underlying algorithm
//! (SmallRng) is deterministic for a given seed on the same platform.

use nalgebra::SVector;
use rand::Rng;

/// Creates a fast, seeded random number generator.
///
/// # Examples
/// ```
/// use u_sufstat::random::create_rng;
/// use rand::Rng;
/// let mut rng = create_rng(42);
/// let x: f64 = rng.random();
/// assert!(x >= 0.0 && x < 1.0);
/// ```
pub fn create_rng(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}

/// Fisher-Yates (Durstenfeld) in-place shuffle.
///
/// Reference: Knuth (1997), *TAOCP* Vol. 2, §3.4.2, Algorithm P.
///
/// # Examples
/// ```
/// use u_sufstat::random::{create_rng, shuffle};
/// let mut v = vec![1, 2, 3, 4, 5];
/// let mut rng = create_rng(42);
/// shuffle(&mut v, &mut rng);
/// v.sort();
/// assert_eq!(v, vec![1, 2, 3, 4, 5]);
/// ```
pub fn shuffle<T, R: Rng>(slice: &mut [T], rng: &mut R) {
    let n = slice.len();
    if n <= 1 {
        return;
    }
    for i in (1..n).rev() {
        let j = rng.random_range(0..=i);
        slice.swap(i, j);
    }
}

/// Returns a shuffled index permutation of `[0, n)`.
///
/// Handy for cutting a dataset into random shards without reordering it.
pub fn shuffled_indices<R: Rng>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    shuffle(&mut indices, rng);
    indices
}

/// Selects a random index weighted by the given weights.
///
/// Non-positive weights are never chosen.
///
/// # Returns
/// - `None` if `weights` is empty or no weight is positive.
///
/// # Examples
/// ```
/// use u_sufstat::random::{create_rng, weighted_choose};
/// let mut rng = create_rng(42);
/// let idx = weighted_choose(&[0.0, 2.0, 0.0], &mut rng);
/// assert_eq!(idx, Some(1));
/// ```
pub fn weighted_choose<R: Rng>(weights: &[f64], rng: &mut R) -> Option<usize> {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if total <= 0.0 {
        return None;
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (i, &w) in weights.iter().enumerate() {
        if w > 0.0 {
            cumulative += w;
            last_positive = Some(i);
            if cumulative > threshold {
                return Some(i);
            }
        }
    }

    // Rounding left the threshold past the last cumulative value.
    last_positive
}

// ============================================================================
// Family samplers
// ============================================================================

/// Draws from N(mu, sigma²) via the Box–Muller transform.
///
/// # Examples
/// ```
/// use u_sufstat::random::{create_rng, sample_normal};
/// let mut rng = create_rng(7);
/// assert!(sample_normal(0.0, 0.0, &mut rng) == 0.0);
/// ```
pub fn sample_normal<R: Rng>(mu: f64, sigma: f64, rng: &mut R) -> f64 {
    // u1 ∈ (0, 1] keeps ln(u1) finite.
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mu + sigma * z
}

/// Draws a 0/1 outcome with success probability `p`, as a float.
pub fn sample_bernoulli<R: Rng>(p: f64, rng: &mut R) -> f64 {
    if rng.random::<f64>() < p {
        1.0
    } else {
        0.0
    }
}

/// Draws from Exp(lambda) by inversion.
pub fn sample_exponential<R: Rng>(lambda: f64, rng: &mut R) -> f64 {
    let u: f64 = 1.0 - rng.random::<f64>();
    -u.ln() / lambda
}

/// Draws from Poisson(lambda) with Knuth's multiplication method.
///
/// Runs in O(lambda) time and is intended for small rates; `exp(-lambda)`
/// underflows past roughly 700. Non-positive rates always yield 0.
pub fn sample_poisson<R: Rng>(lambda: f64, rng: &mut R) -> u64 {
    if lambda <= 0.0 {
        return 0;
    }
    let limit = (-lambda).exp();
    let mut k = 0;
    let mut p: f64 = rng.random();
    while p > limit {
        k += 1;
        p *= rng.random::<f64>();
    }
    k
}

/// Draws a one-hot vector whose hot index follows `weights`.
///
/// Returns `None` under the same conditions as [`weighted_choose`].
pub fn sample_one_hot<R: Rng, const K: usize>(
    weights: &SVector<f64, K>,
    rng: &mut R,
) -> Option<SVector<f64, K>> {
    let index = weighted_choose(weights.as_slice(), rng)?;
    let mut hot = SVector::<f64, K>::zeros();
    hot[index] = 1.0;
    Some(hot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(42);
        for _ in 0..100 {
            let a: f64 = rng1.random();
            let b: f64 = rng2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_shuffle_small() {
        let mut rng = create_rng(42);
        let mut empty: Vec<i32> = vec![];
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut single = vec![7];
        shuffle(&mut single, &mut rng);
        assert_eq!(single, vec![7]);
    }

    #[test]
    fn test_shuffled_indices_is_permutation() {
        let mut rng = create_rng(3);
        let mut idx = shuffled_indices(20, &mut rng);
        idx.sort_unstable();
        assert_eq!(idx, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_weighted_choose_degenerate() {
        let mut rng = create_rng(42);
        assert_eq!(weighted_choose(&[], &mut rng), None);
        assert_eq!(weighted_choose(&[0.0, -1.0], &mut rng), None);
        for _ in 0..100 {
            assert_eq!(weighted_choose(&[0.0, 0.0, 5.0, -2.0], &mut rng), Some(2));
        }
    }

    #[test]
    fn test_weighted_choose_distribution() {
        let mut rng = create_rng(42);
        let weights = [1.0, 3.0];
        let mut counts = [0u32; 2];
        for _ in 0..10_000 {
            if let Some(idx) = weighted_choose(&weights, &mut rng) {
                counts[idx] += 1;
            }
        }
        let ratio = counts[1] as f64 / counts[0] as f64;
        assert!((ratio - 3.0).abs() < 0.5, "expected ratio ~3.0, got {ratio}");
    }

    #[test]
    fn test_sample_normal_moments() {
        let mut rng = create_rng(11);
        let n = 50_000;
        let xs: Vec<f64> = (0..n).map(|_| sample_normal(2.0, 3.0, &mut rng)).collect();
        let mean = xs.iter().sum::<f64>() / n as f64;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        assert!((mean - 2.0).abs() < 0.1, "mean {mean}");
        assert!((var - 9.0).abs() < 0.3, "var {var}");
    }

    #[test]
    fn test_sample_bernoulli_rate() {
        let mut rng = create_rng(5);
        let n = 50_000;
        let hits: f64 = (0..n).map(|_| sample_bernoulli(0.3, &mut rng)).sum();
        assert!((hits / n as f64 - 0.3).abs() < 0.01);
        assert_eq!(sample_bernoulli(0.0, &mut rng), 0.0);
        assert_eq!(sample_bernoulli(1.0, &mut rng), 1.0);
    }

    #[test]
    fn test_sample_exponential_mean() {
        let mut rng = create_rng(9);
        let n = 50_000;
        let xs: Vec<f64> = (0..n).map(|_| sample_exponential(2.0, &mut rng)).collect();
        assert!(xs.iter().all(|&x| x >= 0.0 && x.is_finite()));
        let mean = xs.iter().sum::<f64>() / n as f64;
        assert!((mean - 0.5).abs() < 0.02, "mean {mean}");
    }

    #[test]
    fn test_sample_poisson_mean() {
        let mut rng = create_rng(13);
        let n = 50_000;
        let total: u64 = (0..n).map(|_| sample_poisson(1.2, &mut rng)).sum();
        let mean = total as f64 / n as f64;
        assert!((mean - 1.2).abs() < 0.03, "mean {mean}");
        assert_eq!(sample_poisson(0.0, &mut rng), 0);
    }

    #[test]
    fn test_sample_one_hot() {
        let mut rng = create_rng(1);
        let weights = SVector::<f64, 3>::new(0.0, 1.0, 0.0);
        let hot = sample_one_hot(&weights, &mut rng);
        assert_eq!(hot, Some(SVector::<f64, 3>::new(0.0, 1.0, 0.0)));
        assert!(sample_one_hot(&SVector::<f64, 3>::zeros(), &mut rng).is_none());
    }
}
