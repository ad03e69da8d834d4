//! Token counts (a multiset) as a group statistic.
//!
//! Merging adds counts key by key over the union of keys. Entries whose
//! merged count is zero or negative are dropped, so the identity is the
//! empty map and never a map of zeros.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use approx::{AbsDiffEq, RelativeEq};
use log::trace;

use crate::algebra::{impl_group_ops, AlgebraicStatistic, GroupStatistic};

/// Occurrence counts per distinct token.
///
/// # Examples
/// ```
/// use u_sufstat::{AlgebraicStatistic, Frequency};
/// let f = Frequency::from_samples(&[0, 1, 0, 1, 1]) + Frequency::from_samples(&[1, 1]);
/// assert_eq!(f.get_frequency(&0), 2);
/// assert_eq!(f.get_frequency(&1), 5);
/// assert_eq!(f.get_frequency(&7), 0);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "K: serde::Serialize",
        deserialize = "K: Eq + Hash + serde::Deserialize<'de>"
    ))
)]
pub struct Frequency<K> {
    counts: HashMap<K, i64>,
}

impl<K: Eq + Hash> PartialEq for Frequency<K> {
    fn eq(&self, other: &Self) -> bool {
        self.counts == other.counts
    }
}

impl<K: Eq + Hash> Eq for Frequency<K> {}

impl<K> Frequency<K>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Count stored for `token`; 0 for tokens never seen.
    pub fn get_frequency(&self, token: &K) -> i64 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// The underlying token → count map.
    pub fn counts(&self) -> &HashMap<K, i64> {
        &self.counts
    }

    /// Iterates over `(token, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, i64)> + '_ {
        self.counts.iter().map(|(k, &c)| (k, c))
    }

    /// Number of distinct stored tokens.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Sum of all stored counts.
    pub fn total(&self) -> i64 {
        self.counts.values().sum()
    }
}

impl<K> AlgebraicStatistic for Frequency<K>
where
    K: Eq + Hash + Clone + Debug,
{
    type Sample = K;

    fn identity() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    fn from_samples(samples: &[K]) -> Self {
        let mut counts = HashMap::new();
        for token in samples {
            *counts.entry(token.clone()).or_insert(0) += 1;
        }
        Self { counts }
    }

    fn merge(&self, other: &Self) -> Self {
        let mut counts = self.counts.clone();
        for (token, &c) in &other.counts {
            *counts.entry(token.clone()).or_insert(0) += c;
        }
        let before = counts.len();
        counts.retain(|_, c| *c > 0);
        if counts.len() < before {
            trace!(
                "Frequency merge: pruned {} non-positive entries",
                before - counts.len()
            );
        }
        Self { counts }
    }

    fn is_identity(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<K> GroupStatistic for Frequency<K>
where
    K: Eq + Hash + Clone + Debug,
{
    fn invert(&self) -> Self {
        Self {
            counts: self.counts.iter().map(|(k, &c)| (k.clone(), -c)).collect(),
        }
    }
}

impl<K> Default for Frequency<K>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::identity()
    }
}

impl_group_ops!([K: Eq + Hash + Clone + Debug] Frequency<K>);

// Counts are integers, so tolerance comparisons reduce to equality.
impl<K: Eq + Hash> AbsDiffEq for Frequency<K> {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, _epsilon: f64) -> bool {
        self == other
    }
}

impl<K: Eq + Hash> RelativeEq for Frequency<K> {
    fn default_max_relative() -> f64 {
        f64::EPSILON
    }

    fn relative_eq(&self, other: &Self, _epsilon: f64, _max_relative: f64) -> bool {
        self == other
    }
}
