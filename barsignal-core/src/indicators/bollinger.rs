//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! Three bands (separate Indicator instances):
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//!
//! Uses sample stddev (divide by N - 1), so the period must be at least 2.
//! Lookback: period - 1.

use super::rolling::RollingWindow;
use super::Indicator;
use crate::domain::Bar;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    fn build(period: usize, multiplier: f64, band: BollingerBand, label: &str) -> Self {
        assert!(period >= 2, "Bollinger period must be >= 2");
        assert!(
            multiplier.is_finite() && multiplier >= 0.0,
            "Bollinger multiplier must be finite and >= 0"
        );
        Self {
            period,
            multiplier,
            band,
            name: format!("bollinger_{label}_{period}_{multiplier}"),
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::build(period, multiplier, BollingerBand::Upper, "upper")
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::build(period, multiplier, BollingerBand::Middle, "middle")
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::build(period, multiplier, BollingerBand::Lower, "lower")
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let mut window = RollingWindow::new(self.period);

        bars.iter()
            .map(|bar| {
                window.push(Some(bar.close));
                let mean = window.mean()?;
                if self.band == BollingerBand::Middle {
                    return Some(mean);
                }
                let width = self.multiplier * window.sample_std()?;
                Some(match self.band {
                    BollingerBand::Upper => mean + width,
                    BollingerBand::Lower => mean - width,
                    BollingerBand::Middle => mean,
                })
            })
            .collect()
    }
}
