//! Indicator trait.
//!
//! Indicators are pure functions: bar history in, series of optional values
//! out. A `None` entry means "not computable yet" (warm-up) or
//! "mathematically undefined" (e.g. a zero-range division). It is never
//! replaced by a numeric placeholder.

use crate::domain::Bar;

/// Trait for indicators.
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on price data from bar t+1 or later.
/// Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_9", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading bars that are always `None`.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    ///
    /// Returns a `Vec` of the same length as `bars`.
    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>>;
}
