//! Bar: one trading session of a daily price history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::series::ContractError;

/// OHLCV bar for a single session.
///
/// `volume` is `None` when the data source does not report it. A zero volume
/// is a real observation, not a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Basic OHLCV sanity check: positive finite prices, low <= open,close <= high,
    /// non-negative volume when present.
    pub fn is_sane(&self) -> bool {
        self.check(0).is_ok()
    }

    /// Validate this bar as the `index`-th session of a series.
    pub(crate) fn check(&self, index: usize) -> Result<(), ContractError> {
        for (field, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ContractError::InvalidPrice {
                    index,
                    date: self.date,
                    field,
                    value,
                });
            }
        }

        if self.low > self.open
            || self.low > self.close
            || self.high < self.open
            || self.high < self.close
        {
            return Err(ContractError::InvertedRange {
                index,
                date: self.date,
                open: self.open,
                high: self.high,
                low: self.low,
                close: self.close,
            });
        }

        if let Some(volume) = self.volume {
            if !volume.is_finite() || volume < 0.0 {
                return Err(ContractError::InvalidVolume {
                    index,
                    date: self.date,
                    value: volume,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> Bar {
        Bar::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            100.0,
            105.0,
            98.0,
            103.0,
        )
        .with_volume(50_000.0)
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_without_volume_is_sane() {
        let mut bar = sample_bar();
        bar.volume = None;
        assert!(bar.is_sane());
    }

    #[test]
    fn bar_detects_nan_price() {
        let mut bar = sample_bar();
        bar.open = f64::NAN;
        assert!(matches!(
            bar.check(3),
            Err(ContractError::InvalidPrice { index: 3, field: "open", .. })
        ));
    }

    #[test]
    fn bar_detects_non_positive_close() {
        let mut bar = sample_bar();
        bar.close = 0.0;
        bar.low = 0.0;
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar();
        bar.high = 97.0; // below low
        assert!(matches!(
            bar.check(0),
            Err(ContractError::InvertedRange { .. })
        ));
    }

    #[test]
    fn bar_detects_close_above_high() {
        let mut bar = sample_bar();
        bar.close = 106.0;
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_detects_negative_volume() {
        let mut bar = sample_bar();
        bar.volume = Some(-1.0);
        assert!(matches!(
            bar.check(0),
            Err(ContractError::InvalidVolume { .. })
        ));
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar();
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }

    #[test]
    fn missing_volume_deserializes_as_none() {
        let json = r#"{"date":"2024-01-02","open":1.0,"high":2.0,"low":0.5,"close":1.5}"#;
        let bar: Bar = serde_json::from_str(json).unwrap();
        assert_eq!(bar.volume, None);
    }
}
