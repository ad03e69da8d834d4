//! Composite statistics: a fixed, named bundle of statistics.
//!
//! A composite is declared once, at the type level, as an ordered list of
//! `(field name, statistic type)` pairs sharing one sample type. The
//! declaration expands to a plain struct whose merge, inverse, identity and
//! equality all operate field by field. Since both operands of a merge are
//! the same struct, two composites with different field sets can never be
//! combined.
//!
//! ```ignore
//! composite_statistic! {
//!     /// Normal distribution state.
//!     pub struct Normal for f64 {
//!         mean: Mean<f64>,
//!         variance: Variance,
//!     }
//! }
//! ```

use std::fmt::{self, Debug};
use std::hash::Hash;

use crate::algebra::GroupStatistic;
use crate::frequency::Frequency;
use crate::mean::Mean;
use crate::variance::Variance;

/// Borrowed view of one field of a composite, returned by
/// [`CompositeStatistic::field`].
#[derive(Debug)]
pub enum StatisticRef<'a, V = f64> {
    Mean(&'a Mean<V>),
    Variance(&'a Variance),
    Frequency(&'a Frequency<V>),
}

impl<V> Clone for StatisticRef<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for StatisticRef<'_, V> {}

impl<'a, V> StatisticRef<'a, V> {
    /// The field as a [`Mean`], if it is one.
    pub fn as_mean(&self) -> Option<&'a Mean<V>> {
        match *self {
            StatisticRef::Mean(m) => Some(m),
            _ => None,
        }
    }

    /// The field as a [`Variance`], if it is one.
    pub fn as_variance(&self) -> Option<&'a Variance> {
        match *self {
            StatisticRef::Variance(v) => Some(v),
            _ => None,
        }
    }

    /// The field as a [`Frequency`], if it is one.
    pub fn as_frequency(&self) -> Option<&'a Frequency<V>> {
        match *self {
            StatisticRef::Frequency(f) => Some(f),
            _ => None,
        }
    }

    /// Name of the statistic kind.
    pub fn kind(&self) -> &'static str {
        match self {
            StatisticRef::Mean(_) => "mean",
            StatisticRef::Variance(_) => "variance",
            StatisticRef::Frequency(_) => "frequency",
        }
    }
}

impl<V> fmt::Display for StatisticRef<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// Statistics that may appear as a composite field.
pub trait AsStatisticRef<V> {
    fn as_statistic_ref(&self) -> StatisticRef<'_, V>;
}

impl<V> AsStatisticRef<V> for Mean<V> {
    fn as_statistic_ref(&self) -> StatisticRef<'_, V> {
        StatisticRef::Mean(self)
    }
}

impl AsStatisticRef<f64> for Variance {
    fn as_statistic_ref(&self) -> StatisticRef<'_, f64> {
        StatisticRef::Variance(self)
    }
}

impl<K> AsStatisticRef<K> for Frequency<K>
where
    K: Eq + Hash + Clone + Debug,
{
    fn as_statistic_ref(&self) -> StatisticRef<'_, K> {
        StatisticRef::Frequency(self)
    }
}

/// A group statistic made of named fields.
pub trait CompositeStatistic: GroupStatistic {
    /// Field names in declaration order.
    const FIELD_NAMES: &'static [&'static str];

    /// Looks a field up by name; `None` if the composite has no such field.
    fn field(&self, name: &str) -> Option<StatisticRef<'_, Self::Sample>>;
}

/// Declares a composite statistic struct.
///
/// Every field type must be a [`GroupStatistic`] whose `Sample` is the
/// composite's sample type and that implements [`AsStatisticRef`]. Generates
/// `from_fields`, one accessor per field, the algebraic traits, the
/// operators and the `approx` comparisons.
macro_rules! composite_statistic {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(<const $k:ident : usize>)? for $sample:ty {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $fty:ty
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name $(<const $k: usize>)? {
            $( $field: $fty, )+
        }

        impl $(<const $k: usize>)? $name $(<$k>)? {
            /// Builds the composite from already-computed field statistics.
            pub fn from_fields($($field: $fty),+) -> Self {
                Self { $($field),+ }
            }

            $(
                $(#[$fmeta])*
                pub fn $field(&self) -> &$fty {
                    &self.$field
                }
            )+
        }

        impl $(<const $k: usize>)? $crate::algebra::AlgebraicStatistic for $name $(<$k>)? {
            type Sample = $sample;

            fn identity() -> Self {
                Self {
                    $($field: <$fty as $crate::algebra::AlgebraicStatistic>::identity()),+
                }
            }

            fn from_samples(samples: &[$sample]) -> Self {
                Self {
                    $($field: <$fty as $crate::algebra::AlgebraicStatistic>::from_samples(samples)),+
                }
            }

            fn merge(&self, other: &Self) -> Self {
                Self {
                    $($field: $crate::algebra::AlgebraicStatistic::merge(&self.$field, &other.$field)),+
                }
            }

            fn is_identity(&self) -> bool {
                $($crate::algebra::AlgebraicStatistic::is_identity(&self.$field))&&+
            }
        }

        impl $(<const $k: usize>)? $crate::algebra::GroupStatistic for $name $(<$k>)? {
            fn invert(&self) -> Self {
                Self {
                    $($field: $crate::algebra::GroupStatistic::invert(&self.$field)),+
                }
            }
        }

        impl $(<const $k: usize>)? $crate::composite::CompositeStatistic for $name $(<$k>)? {
            const FIELD_NAMES: &'static [&'static str] = &[$(stringify!($field)),+];

            fn field(&self, name: &str) -> Option<$crate::composite::StatisticRef<'_, $sample>> {
                match name {
                    $(
                        stringify!($field) => Some(
                            $crate::composite::AsStatisticRef::as_statistic_ref(&self.$field),
                        ),
                    )+
                    _ => None,
                }
            }
        }

        impl $(<const $k: usize>)? Default for $name $(<$k>)? {
            fn default() -> Self {
                <Self as $crate::algebra::AlgebraicStatistic>::identity()
            }
        }

        $crate::algebra::impl_group_ops!([$(const $k: usize)?] $name $(<$k>)?);

        impl $(<const $k: usize>)? ::approx::AbsDiffEq for $name $(<$k>)? {
            type Epsilon = f64;

            fn default_epsilon() -> f64 {
                f64::EPSILON
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
                $(::approx::AbsDiffEq::abs_diff_eq(&self.$field, &other.$field, epsilon))&&+
            }
        }

        impl $(<const $k: usize>)? ::approx::RelativeEq for $name $(<$k>)? {
            fn default_max_relative() -> f64 {
                f64::EPSILON
            }

            fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
                $(::approx::RelativeEq::relative_eq(&self.$field, &other.$field, epsilon, max_relative))&&+
            }
        }
    };
}

pub(crate) use composite_statistic;


#[cfg(test)]
mod proptests {
    use super::tests::Moments;
    use crate::algebra::{AlgebraicStatistic, GroupStatistic};
    use approx::relative_eq;
    use proptest::prelude::*;

    fn finite_vec(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(-100.0_f64..100.0, min_len..=max_len)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn merge_is_commutative(a in finite_vec(0, 30), b in finite_vec(0, 30)) {
            let (ma, mb) = (Moments::from_samples(&a), Moments::from_samples(&b));
            prop_assert_eq!(ma.merge(&mb), mb.merge(&ma));
        }

        #[test]
        fn merge_is_associative(
            a in finite_vec(1, 30),
            b in finite_vec(1, 30),
            c in finite_vec(1, 30),
        ) {
            let (ma, mb, mc) = (
                Moments::from_samples(&a),
                Moments::from_samples(&b),
                Moments::from_samples(&c),
            );
            let left = ma.merge(&mb).merge(&mc);
            let right = ma.merge(&mb.merge(&mc));
            prop_assert!(relative_eq!(left, right, epsilon = 1e-6, max_relative = 1e-9));
        }

        #[test]
        fn identity_is_neutral(a in finite_vec(0, 30)) {
            let m = Moments::from_samples(&a);
            prop_assert_eq!(m.merge(&Moments::identity()), m.clone());
            prop_assert_eq!(Moments::identity().merge(&m), m);
        }

        #[test]
        fn inverse_cancels(a in finite_vec(1, 30), b in finite_vec(1, 30)) {
            let ma = Moments::from_samples(&a);
            let mb = Moments::from_samples(&b);
            prop_assert_eq!(ma.merge(&ma.invert()), Moments::identity());
            let back = ma.merge(&mb).merge(&mb.invert());
            prop_assert!(relative_eq!(back, ma, epsilon = 1e-6, max_relative = 1e-6));
        }

        #[test]
        fn merge_equals_batch(data in finite_vec(2, 80), split in 0.0_f64..1.0) {
            let cut = (split * data.len() as f64) as usize;
            let merged = Moments::from_samples(&data[..cut]) + Moments::from_samples(&data[cut..]);
            let batch = Moments::from_samples(&data);
            prop_assert!(relative_eq!(merged, batch, epsilon = 1e-6, max_relative = 1e-6));
        }
    }
}
