//! Value types a [`Mean`](crate::Mean) can average.
//!
//! The merge formula only needs addition, scaling by the sample count and
//! a zero element, so scalars and fixed-dimension vectors are handled
//! uniformly.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul};

use nalgebra::SVector;
use num_traits::Zero;

/// A value that can be summed and scaled by a count.
pub trait MeanValue:
    Clone + PartialEq + Debug + Zero + Add<Output = Self> + Mul<f64, Output = Self> + Div<f64, Output = Self>
{
    /// Sums a slice of values.
    fn total(values: &[Self]) -> Self {
        values
            .iter()
            .cloned()
            .fold(Self::zero(), |acc, v| acc + v)
    }
}

impl MeanValue for f64 {
    fn total(values: &[f64]) -> f64 {
        kahan_sum(values)
    }
}

impl<const D: usize> MeanValue for SVector<f64, D> {}

/// Neumaier compensated summation for O(ε) error independent of `n`.
///
/// An improved Kahan summation that also handles an addend larger in
/// magnitude than the running sum.
///
/// Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
/// zur Summation endlicher Summen", *ZAMM* 54(1), pp. 39–51.
///
/// # Complexity
/// Time: O(n), Space: O(1)
pub fn kahan_sum(data: &[f64]) -> f64 {
    compensated_sum(data.iter().copied())
}

/// Neumaier summation over an iterator.
pub(crate) fn compensated_sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for x in values {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}
