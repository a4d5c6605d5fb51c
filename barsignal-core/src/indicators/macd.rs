//! MACD: Moving Average Convergence/Divergence.
//!
//! Three series (separate Indicator instances):
//! - Line: EMA(close, fast) - EMA(close, slow)
//! - Signal: EMA(line, signal)
//! - Histogram: line - signal
//!
//! All EMAs use the close[0] seed, so every series is defined from bar 0.
//! Lookback: 0.

use super::ema::ema_of_series;
use super::Indicator;
use crate::domain::Bar;

/// Which MACD series to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdSeries {
    Line,
    Signal,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    series: MacdSeries,
    name: String,
}

impl Macd {
    fn build(fast: usize, slow: usize, signal: usize, series: MacdSeries, label: &str) -> Self {
        assert!(fast >= 1, "MACD fast period must be >= 1");
        assert!(slow > fast, "MACD slow period must be > fast period");
        assert!(signal >= 1, "MACD signal period must be >= 1");
        Self {
            fast,
            slow,
            signal,
            series,
            name: format!("macd_{label}_{fast}_{slow}_{signal}"),
        }
    }

    pub fn line(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdSeries::Line, "line")
    }

    pub fn signal(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdSeries::Signal, "signal")
    }

    pub fn histogram(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdSeries::Histogram, "histogram")
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let fast = ema_of_series(&closes, self.fast);
        let slow = ema_of_series(&closes, self.slow);
        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();

        let values = match self.series {
            MacdSeries::Line => line,
            MacdSeries::Signal => ema_of_series(&line, self.signal),
            MacdSeries::Histogram => {
                let signal = ema_of_series(&line, self.signal);
                line.iter().zip(&signal).map(|(l, s)| l - s).collect()
            }
        };

        values.into_iter().map(Some).collect()
    }
}
