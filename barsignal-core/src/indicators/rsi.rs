//! Relative Strength Index (RSI).
//!
//! delta[t] = close[t] - close[t-1], gain = max(delta, 0), loss = max(-delta, 0).
//! avg_gain / avg_loss are simple rolling means over the last `period` deltas
//! (not Wilder smoothing).
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period (the first value needs `period` deltas).
//! Edge cases: avg_loss == 0 and avg_gain > 0 → 100; both zero → undefined.

use super::rolling::RollingWindow;
use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let mut result = Vec::with_capacity(bars.len());
        if bars.is_empty() {
            return result;
        }

        let mut gains = RollingWindow::new(self.period);
        let mut losses = RollingWindow::new(self.period);

        // No delta exists for the first bar.
        result.push(None);

        for pair in bars.windows(2) {
            let delta = pair[1].close - pair[0].close;
            gains.push(Some(delta.max(0.0)));
            losses.push(Some((-delta).max(0.0)));

            let value = match (gains.mean(), losses.mean()) {
                (Some(avg_gain), Some(avg_loss)) => compute_rsi(avg_gain, avg_loss),
                _ => None,
            };
            result.push(value);
        }

        result
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_gain == 0.0 && avg_loss == 0.0 {
        None // flat window, no directional movement
    } else if avg_loss == 0.0 {
        Some(100.0)
    } else {
        // Rolling sums can leave a tiny negative average gain.
        let rsi = 100.0 - 100.0 / (1.0 + avg_gain.max(0.0) / avg_loss);
        Some(rsi.clamp(0.0, 100.0))
    }
}
