//! Concrete indicator implementations.
//!
//! Every indicator implements the `Indicator` trait and is computed once per
//! series by the engine, which assembles the results into an `IndicatorFrame`.
//!
//! Multi-series indicators (Bollinger, MACD, Stochastic) are exposed as
//! separate named instances per line, keeping the single-series `Indicator`
//! trait unchanged.

pub mod bollinger;
pub mod ema;
pub mod indicator;
pub mod macd;
pub mod rolling;
pub mod rsi;
pub mod stochastic;
pub mod volume_ma;

pub use bollinger::{Bollinger, BollingerBand};
pub use ema::Ema;
pub use indicator::Indicator;
pub use macd::{Macd, MacdSeries};
pub use rolling::{RollingExtreme, RollingWindow};
pub use rsi::Rsi;
pub use stochastic::{Stochastic, StochasticLine};
pub use volume_ma::VolumeMa;

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLCV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0,
/// volume = 1000 + 100 * index.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar::new(
                base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
            )
            .with_volume(1000.0 + 100.0 * i as f64)
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
