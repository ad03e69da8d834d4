//! # u-sufstat
//!
//! Mergeable, invertible sufficient statistics.
//!
//! Every statistic in this crate is computed from a batch of samples, then
//! combined with other partial statistics of the same type as if the data
//! had been concatenated. Merging is associative and commutative with an
//! identity element, so shards can be reduced in any order on any number of
//! threads. Most statistics also carry an inverse, which allows removing a
//! shard that was merged earlier.
//!
//! ## Modules
//!
//! - [`algebra`] — Monoid and group contracts, operator sugar
//! - [`mean`] — Arithmetic mean over scalars or fixed-size vectors
//! - [`variance`] — Sum of squared deviations (Chan et al. pairwise merge)
//! - [`frequency`] — Token counts
//! - [`composite`] — Named bundles of statistics merged field by field
//! - [`density`] — Composites that evaluate a probability density
//! - [`special`] — Gamma, factorial and binomial helpers
//! - [`random`] — Seeded RNG and family samplers
//!
//! ## Design Philosophy
//!
//! - **Statistics are values**: construction, merge and inversion never fail
//!   and never mutate their operands
//! - **Fail loudly on degenerate queries**: a ratio or density asked of an
//!   aggregate that cannot supply it returns [`StatsError`]
//! - **Numerical stability first**: compensated summation for batches,
//!   pairwise update for variance merges
//! - **Property-based testing**: the algebraic laws are verified via proptest
//!
//! ## Example
//!
//! ```
//! use u_sufstat::{AlgebraicStatistic, Variance};
//!
//! let shards = [vec![1.0, 3.0, 4.0], vec![-10.0, 2334.0, 3.0, 100.0]];
//! let total: Variance = shards.iter().map(|s| Variance::from_samples(s)).sum();
//! assert_eq!(total.count(), 7);
//!
//! // Remove the second shard again.
//! let first = total - Variance::from_samples(&shards[1]);
//! assert_eq!(first.count(), 3);
//! ```

pub mod algebra;
pub mod composite;
pub mod density;
pub mod error;
pub mod frequency;
pub mod mean;
pub mod random;
pub mod special;
pub mod value;
pub mod variance;

pub use algebra::{AlgebraicStatistic, GroupStatistic};
pub use composite::{AsStatisticRef, CompositeStatistic, StatisticRef};
pub use density::{Bernoulli, Binomial, Categorical, DensityModel, Exponential, Normal, Poisson};
pub use error::{StatsError, StatsResult};
pub use frequency::Frequency;
pub use mean::Mean;
pub use value::{kahan_sum, MeanValue};
pub use variance::Variance;
