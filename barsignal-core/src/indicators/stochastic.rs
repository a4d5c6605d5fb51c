//! Stochastic Oscillator (%K / %D).
//!
//! %K[t] = 100 * (close[t] - lowest_low) / (highest_high - lowest_low)
//! over the trailing `period` bars. Undefined when the range is zero.
//! %D[t] = SMA(%K, smoothing); undefined when any %K in the window is.
//!
//! Lookback: %K period - 1, %D period - 1 + smoothing - 1.

use super::rolling::{RollingExtreme, RollingWindow};
use super::Indicator;
use crate::domain::Bar;

/// Which stochastic line to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StochasticLine {
    K,
    D,
}

#[derive(Debug, Clone)]
pub struct Stochastic {
    period: usize,
    smoothing: usize,
    line: StochasticLine,
    name: String,
}

impl Stochastic {
    fn build(period: usize, smoothing: usize, line: StochasticLine, label: &str) -> Self {
        assert!(period >= 1, "Stochastic period must be >= 1");
        assert!(smoothing >= 1, "Stochastic smoothing must be >= 1");
        Self {
            period,
            smoothing,
            line,
            name: format!("stoch_{label}_{period}_{smoothing}"),
        }
    }

    pub fn k(period: usize, smoothing: usize) -> Self {
        Self::build(period, smoothing, StochasticLine::K, "k")
    }

    pub fn d(period: usize, smoothing: usize) -> Self {
        Self::build(period, smoothing, StochasticLine::D, "d")
    }
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            StochasticLine::K => self.period - 1,
            StochasticLine::D => self.period - 1 + self.smoothing - 1,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let percent_k = percent_k(bars, self.period);
        match self.line {
            StochasticLine::K => percent_k,
            StochasticLine::D => {
                let mut window = RollingWindow::new(self.smoothing);
                percent_k
                    .into_iter()
                    .map(|k| {
                        window.push(k);
                        window.mean()
                    })
                    .collect()
            }
        }
    }
}

fn percent_k(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    let mut highest = RollingExtreme::max(period);
    let mut lowest = RollingExtreme::min(period);

    bars.iter()
        .map(|bar| {
            let high = highest.push(bar.high);
            let low = lowest.push(bar.low);
            let (high, low) = (high?, low?);
            let range = high - low;
            if range <= 0.0 {
                return None; // flat range
            }
            Some((100.0 * (bar.close - low) / range).clamp(0.0, 100.0))
        })
        .collect()
}
