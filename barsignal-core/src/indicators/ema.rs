//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1)
//! Seed: EMA[0] = close[0]. No simple-average seed, so the series is defined
//! from the first bar.
//! Lookback: 0.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_of_series(&closes, self.period)
            .into_iter()
            .map(Some)
            .collect()
    }
}

/// Smoothing factor for an EMA of the given period.
pub fn alpha(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Compute raw EMA values from a pre-extracted f64 slice.
/// Used by composed indicators (MACD) that need the EMA of a derived series.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut result = Vec::with_capacity(values.len());
    let Some(&first) = values.first() else {
        return result;
    };

    let alpha = alpha(period.max(1));
    let mut prev = first;
    result.push(first);
    for &v in &values[1..] {
        let ema = prev + alpha * (v - prev);
        result.push(ema);
        prev = ema;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn ema_period_1_equals_close() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        let result = Ema::new(1).compute(&bars);
        assert_approx(result[0].unwrap(), 100.0, DEFAULT_EPSILON);
        assert_approx(result[1].unwrap(), 200.0, DEFAULT_EPSILON);
        assert_approx(result[2].unwrap(), 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // Closes: 10, 11, 12, 13
        // alpha = 2/(3+1) = 0.5
        // EMA[0] = 10
        // EMA[1] = 0.5*11 + 0.5*10 = 10.5
        // EMA[2] = 0.5*12 + 0.5*10.5 = 11.25
        // EMA[3] = 0.5*13 + 0.5*11.25 = 12.125
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0]);
        let result = Ema::new(3).compute(&bars);

        assert_approx(result[0].unwrap(), 10.0, DEFAULT_EPSILON);
        assert_approx(result[1].unwrap(), 10.5, DEFAULT_EPSILON);
        assert_approx(result[2].unwrap(), 11.25, DEFAULT_EPSILON);
        assert_approx(result[3].unwrap(), 12.125, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_defined_from_first_bar_on_short_series() {
        let bars = make_bars(&[50.0, 51.0]);
        let result = Ema::new(21).compute(&bars);
        assert!(result.iter().all(|v| v.is_some()));
    }

    #[test]
    fn ema_constant_series_is_constant() {
        let bars = make_bars(&[100.0; 30]);
        for period in [1, 9, 21, 50] {
            let result = Ema::new(period).compute(&bars);
            for v in result {
                assert_approx(v.unwrap(), 100.0, DEFAULT_EPSILON);
            }
        }
    }

    #[test]
    fn ema_empty_series() {
        assert!(Ema::new(9).compute(&[]).is_empty());
        assert!(ema_of_series(&[], 9).is_empty());
    }

    #[test]
    fn ema_lookback_is_zero() {
        assert_eq!(Ema::new(20).lookback(), 0);
        assert_eq!(Ema::new(20).name(), "ema_20");
    }

    #[test]
    fn ema_of_series_matches_indicator() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let indicator_result = Ema::new(3).compute(&bars);
        let series_result = ema_of_series(&closes, 3);
        for i in 0..6 {
            assert_approx(indicator_result[i].unwrap(), series_result[i], DEFAULT_EPSILON);
        }
    }

    #[test]
    #[should_panic(expected = "EMA period must be >= 1")]
    fn rejects_zero_period() {
        Ema::new(0);
    }
}
