//! Algebraic contracts shared by every statistic.
//!
//! A statistic is a **monoid** under [`merge`](AlgebraicStatistic::merge):
//! merging is associative and has a two-sided identity (the statistic of
//! no data). Every statistic in this crate is also commutative, so shards
//! can be reduced in any order. [`GroupStatistic`] adds an inverse, which
//! makes decremental updates ("un-merging" a shard) possible.
//!
//! # Operators
//!
//! Each statistic also implements the standard operators:
//!
//! | Expression | Meaning |
//! |---|---|
//! | `a + b` | `a.merge(&b)` |
//! | `-a` | `a.invert()` |
//! | `a - b` | `a.subtract(&b)` |
//! | `iter.sum()` | `S::merge_all(iter)` |

use std::fmt::Debug;

/// A statistic that can be computed from samples and merged.
///
/// # Laws
/// For all `a`, `b`, `c` of the same type:
/// - `a.merge(&b).merge(&c) == a.merge(&b.merge(&c))` (up to rounding)
/// - `a.merge(&b) == b.merge(&a)`
/// - `a.merge(&Self::identity()) == a`
/// - `Self::from_samples(&[]) == Self::identity()`
pub trait AlgebraicStatistic: Clone + PartialEq + Debug {
    /// The type of a single observation.
    type Sample;

    /// The statistic of an empty dataset.
    fn identity() -> Self;

    /// Computes the statistic over `samples` in one pass.
    fn from_samples(samples: &[Self::Sample]) -> Self;

    /// Combines two statistics into the statistic of the union of their data.
    fn merge(&self, other: &Self) -> Self;

    /// Returns `true` if this is the identity element.
    fn is_identity(&self) -> bool;

    /// Reduces any number of partial statistics into one.
    ///
    /// An empty iterator yields the identity.
    fn merge_all<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        parts
            .into_iter()
            .fold(Self::identity(), |acc, part| acc.merge(&part))
    }
}

/// A statistic with an inverse under merge.
///
/// # Laws
/// - `a.merge(&a.invert()) == Self::identity()`
/// - `a.merge(&b).merge(&b.invert()) == a` (up to rounding)
pub trait GroupStatistic: AlgebraicStatistic {
    /// Returns the inverse element.
    fn invert(&self) -> Self;

    /// Removes the contribution of `other`: `self.merge(&other.invert())`.
    fn subtract(&self, other: &Self) -> Self {
        self.merge(&other.invert())
    }
}

/// Implements `Add`, `Sub`, `Neg` and `Sum` in terms of the group operations.
///
/// The bracketed prefix holds the impl generics, e.g.
/// `impl_group_ops!([V: MeanValue] Mean<V>)` or `impl_group_ops!([] Variance)`.
macro_rules! impl_group_ops {
    ([$($gen:tt)*] $ty:ty) => {
        impl<$($gen)*> ::std::ops::Add for $ty {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                $crate::algebra::AlgebraicStatistic::merge(&self, &rhs)
            }
        }

        impl<'a, $($gen)*> ::std::ops::Add<&'a $ty> for &'a $ty {
            type Output = $ty;

            fn add(self, rhs: &'a $ty) -> $ty {
                $crate::algebra::AlgebraicStatistic::merge(self, rhs)
            }
        }

        impl<$($gen)*> ::std::ops::Sub for $ty {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                $crate::algebra::GroupStatistic::subtract(&self, &rhs)
            }
        }

        impl<'a, $($gen)*> ::std::ops::Sub<&'a $ty> for &'a $ty {
            type Output = $ty;

            fn sub(self, rhs: &'a $ty) -> $ty {
                $crate::algebra::GroupStatistic::subtract(self, rhs)
            }
        }

        impl<$($gen)*> ::std::ops::Neg for $ty {
            type Output = Self;

            fn neg(self) -> Self {
                $crate::algebra::GroupStatistic::invert(&self)
            }
        }

        impl<'a, $($gen)*> ::std::ops::Neg for &'a $ty {
            type Output = $ty;

            fn neg(self) -> $ty {
                $crate::algebra::GroupStatistic::invert(self)
            }
        }

        impl<$($gen)*> ::std::iter::Sum for $ty {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                <$ty as $crate::algebra::AlgebraicStatistic>::merge_all(iter)
            }
        }
    };
}

pub(crate) use impl_group_ops;
