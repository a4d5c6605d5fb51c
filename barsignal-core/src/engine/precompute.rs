//! Indicator precomputation.
//!
//! Every configured indicator is computed once over the whole series and the
//! results are scattered into an `IndicatorFrame`, one row per bar.

use tracing::{debug, warn};

use super::frame::{Column, IndicatorFrame, IndicatorRow};
use crate::config::IndicatorConfig;
use crate::domain::PriceSeries;
use crate::indicators::{Bollinger, Ema, Indicator, Macd, Rsi, Stochastic, VolumeMa};

/// The indicators a configuration enables, paired with the frame column each fills.
///
/// The configuration must already be validated; indicator constructors panic
/// on impossible periods.
pub fn indicator_set(config: &IndicatorConfig) -> Vec<(Column, Box<dyn Indicator>)> {
    let mut set: Vec<(Column, Box<dyn Indicator>)> = vec![
        (Column::EmaShort, Box::new(Ema::new(config.ema_short))),
        (Column::EmaLong, Box::new(Ema::new(config.ema_long))),
        (Column::Rsi, Box::new(Rsi::new(config.rsi_period))),
        (
            Column::BbMiddle,
            Box::new(Bollinger::middle(
                config.bollinger_period,
                config.bollinger_multiplier,
            )),
        ),
        (
            Column::BbUpper,
            Box::new(Bollinger::upper(
                config.bollinger_period,
                config.bollinger_multiplier,
            )),
        ),
        (
            Column::BbLower,
            Box::new(Bollinger::lower(
                config.bollinger_period,
                config.bollinger_multiplier,
            )),
        ),
    ];

    if let Some(macd) = &config.macd {
        set.push((
            Column::Macd,
            Box::new(Macd::line(macd.fast, macd.slow, macd.signal)),
        ));
        set.push((
            Column::MacdSignal,
            Box::new(Macd::signal(macd.fast, macd.slow, macd.signal)),
        ));
        set.push((
            Column::MacdHistogram,
            Box::new(Macd::histogram(macd.fast, macd.slow, macd.signal)),
        ));
    }

    if let Some(stoch) = &config.stochastic {
        set.push((
            Column::StochK,
            Box::new(Stochastic::k(stoch.period, stoch.smoothing)),
        ));
        set.push((
            Column::StochD,
            Box::new(Stochastic::d(stoch.period, stoch.smoothing)),
        ));
    }

    if let Some(period) = config.volume_ma {
        set.push((Column::VolumeMa, Box::new(VolumeMa::new(period))));
    }

    set
}

/// Compute the warmup length from a set of indicators.
///
/// The warmup is the maximum lookback across all indicators.
pub fn compute_warmup(indicators: &[(Column, Box<dyn Indicator>)]) -> usize {
    indicators
        .iter()
        .map(|(_, i)| i.lookback())
        .max()
        .unwrap_or(0)
}

/// Compute every enabled indicator over `series` and assemble the frame.
pub fn compute_frame(series: &PriceSeries, config: &IndicatorConfig) -> IndicatorFrame {
    let bars = series.bars();
    let mut frame =
        IndicatorFrame::from_rows(bars.iter().map(IndicatorRow::from_bar).collect());
    if bars.is_empty() {
        return frame;
    }

    let indicators = indicator_set(config);
    let warmup = compute_warmup(&indicators);
    if bars.len() <= warmup {
        warn!(
            bars = bars.len(),
            warmup,
            "series is shorter than the longest indicator warm-up"
        );
    }

    for (column, indicator) in &indicators {
        let values = indicator.compute(bars);
        debug_assert_eq!(
            values.len(),
            bars.len(),
            "indicator '{}' produced {} values for {} bars",
            indicator.name(),
            values.len(),
            bars.len()
        );
        let defined = values.iter().filter(|v| v.is_some()).count();
        debug!(
            indicator = indicator.name(),
            lookback = indicator.lookback(),
            defined,
            "computed indicator"
        );
        for (row, value) in frame.rows_mut().iter_mut().zip(values) {
            row.set(*column, value);
        }
    }

    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IndicatorConfig, MacdConfig, StochasticConfig};
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::new(make_bars(closes)).unwrap()
    }

    #[test]
    fn classic_set_has_core_columns_only() {
        let set = indicator_set(&IndicatorConfig::classic());
        let columns: Vec<Column> = set.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            columns,
            vec![
                Column::EmaShort,
                Column::EmaLong,
                Column::Rsi,
                Column::BbMiddle,
                Column::BbUpper,
                Column::BbLower,
            ]
        );
    }

    #[test]
    fn extended_set_adds_optional_columns() {
        let set = indicator_set(&IndicatorConfig::extended());
        assert_eq!(set.len(), 12);
        assert!(set.iter().any(|(c, _)| *c == Column::StochD));
        assert!(set.iter().any(|(c, _)| *c == Column::VolumeMa));
    }

    #[test]
    fn warmup_is_max_lookback() {
        // classic: rsi 14, bollinger 20 -> 19
        assert_eq!(compute_warmup(&indicator_set(&IndicatorConfig::classic())), 19);

        let mut config = IndicatorConfig::classic();
        config.stochastic = Some(StochasticConfig {
            period: 30,
            smoothing: 5,
        });
        assert_eq!(compute_warmup(&indicator_set(&config)), 33);
    }

    #[test]
    fn empty_series_gives_empty_frame() {
        let frame = compute_frame(&PriceSeries::empty(), &IndicatorConfig::classic());
        assert!(frame.is_empty());
    }

    #[test]
    fn short_series_keeps_ema_but_not_windows() {
        let closes: Vec<f64> = (0..5).map(|i| 100.0 + i as f64).collect();
        let frame = compute_frame(&series(&closes), &IndicatorConfig::classic());
        assert_eq!(frame.len(), 5);
        for row in frame.rows() {
            assert!(row.ema_short.is_some());
            assert!(row.ema_long.is_some());
            assert!(row.bb_middle.is_none());
            assert!(row.bb_upper.is_none());
            assert!(row.rsi.is_none());
        }
    }

    #[test]
    fn frame_carries_prices_and_dates() {
        let s = series(&[10.0, 11.0, 12.0]);
        let frame = compute_frame(&s, &IndicatorConfig::classic());
        for (row, bar) in frame.rows().iter().zip(s.bars()) {
            assert_eq!(row.date, bar.date);
            assert_eq!(row.close, bar.close);
            assert_eq!(row.volume, bar.volume);
        }
        assert_approx(frame.rows()[0].ema_short.unwrap(), 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn disabled_indicators_stay_none() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
        let frame = compute_frame(&series(&closes), &IndicatorConfig::classic());
        assert!(frame.rows().iter().all(|r| r.macd.is_none()
            && r.stoch_k.is_none()
            && r.volume_ma.is_none()));
    }

    #[test]
    fn macd_columns_are_consistent() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0).collect();
        let mut config = IndicatorConfig::classic();
        config.macd = Some(MacdConfig::default());
        let frame = compute_frame(&series(&closes), &config);
        for row in frame.rows() {
            let hist = row.macd.unwrap() - row.macd_signal.unwrap();
            assert_approx(row.macd_histogram.unwrap(), hist, 1e-9);
        }
    }
}
