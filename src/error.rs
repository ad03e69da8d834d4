//! Error types for statistic queries.
//!
//! Construction, merge and inversion never fail. Errors only arise when a
//! caller asks an aggregate for a quantity it cannot supply: a sample
//! variance from fewer than two samples, a density from an algebraic
//! intermediate with a negative count, and so on.

/// Result type for statistic queries.
pub type StatsResult<T> = Result<T, StatsError>;

/// Errors raised by ratio and density queries on an aggregate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    /// The aggregate does not hold enough samples for the query.
    ///
    /// Also raised for negative-count intermediates produced by
    /// [`invert`](crate::GroupStatistic::invert) or
    /// [`subtract`](crate::GroupStatistic::subtract).
    #[error("degenerate aggregate in {context}: need n >= {required}, got n = {got}")]
    DegenerateAggregate {
        context: &'static str,
        required: i64,
        got: i64,
    },

    /// An estimated parameter lies outside the distribution's domain.
    #[error("invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The query value is not part of the distribution's support.
    #[error("value {value} is outside support {support}")]
    OutOfSupport { value: f64, support: &'static str },
}
