//! Volume moving average.
//!
//! Rolling mean of volume. A window containing a bar without volume is
//! undefined, so a series with no volume produces no values at all.
//! Lookback: period - 1.

use super::rolling::RollingWindow;
use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct VolumeMa {
    period: usize,
    name: String,
}

impl VolumeMa {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "volume MA period must be >= 1");
        Self {
            period,
            name: format!("volume_ma_{period}"),
        }
    }
}

impl Indicator for VolumeMa {
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
                window.push(bar.volume);
                window.mean()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn volume_ma_basic() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0]);
        // make_bars volumes: 1000, 1100, 1200, 1300
        let result = VolumeMa::new(2).compute(&bars);
        assert!(result[0].is_none());
        assert_approx(result[1].unwrap(), 1050.0, DEFAULT_EPSILON);
        assert_approx(result[3].unwrap(), 1250.0, DEFAULT_EPSILON);
    }

    #[test]
    fn missing_volume_is_undefined_not_zero() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        bars[1].volume = None;
        let result = VolumeMa::new(2).compute(&bars);
        assert!(result[1].is_none());
        assert!(result[2].is_none());
        assert_approx(result[3].unwrap(), 1250.0, DEFAULT_EPSILON);
    }

    #[test]
    fn series_without_volume_has_no_values() {
        let mut bars = make_bars(&[10.0; 30]);
        for bar in &mut bars {
            bar.volume = None;
        }
        let result = VolumeMa::new(20).compute(&bars);
        assert!(result.iter().all(|v| v.is_none()));
    }

    #[test]
    fn zero_volume_is_a_real_observation() {
        let mut bars = make_bars(&[10.0, 11.0]);
        bars[0].volume = Some(0.0);
        bars[1].volume = Some(0.0);
        let result = VolumeMa::new(2).compute(&bars);
        assert_eq!(result[1], Some(0.0));
    }
}
