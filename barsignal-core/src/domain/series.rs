//! PriceSeries: a validated, date-ascending sequence of bars.
//!
//! The series is the only input the engine accepts. Construction enforces the
//! input contract (strictly increasing dates, sane OHLCV) so every downstream
//! computation can index by position without re-checking.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bar::Bar;

/// Violations of the input contract between the engine and its callers.
///
/// These are programming/data errors, never transient: nothing is retried or
/// silently coerced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractError {
    #[error("bar {index}: date {date} is not after previous date {previous}")]
    DateOrder {
        index: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },

    #[error("bar {index}: duplicate date {date}")]
    DuplicateDate { index: usize, date: NaiveDate },

    #[error("bar {index} ({date}): {field} must be a positive finite price, got {value}")]
    InvalidPrice {
        index: usize,
        date: NaiveDate,
        field: &'static str,
        value: f64,
    },

    #[error(
        "bar {index} ({date}): OHLC range violated (open={open}, high={high}, low={low}, close={close})"
    )]
    InvertedRange {
        index: usize,
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },

    #[error("bar {index} ({date}): volume must be non-negative and finite, got {value}")]
    InvalidVolume {
        index: usize,
        date: NaiveDate,
        value: f64,
    },

    #[error("indicator frame has {frame} rows but the price series has {series} bars")]
    LengthMismatch { frame: usize, series: usize },

    #[error("indicator frame row {index} is dated {frame_date} but price bar {index} is dated {series_date}")]
    DateMismatch {
        index: usize,
        frame_date: NaiveDate,
        series_date: NaiveDate,
    },
}

/// Ordered daily price history for one instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct PriceSeries {
    #[serde(skip_serializing_if = "Option::is_none")]
    symbol: Option<String>,
    bars: Vec<Bar>,
}

#[derive(Deserialize)]
struct RawSeries {
    #[serde(default)]
    symbol: Option<String>,
    bars: Vec<Bar>,
}

impl TryFrom<RawSeries> for PriceSeries {
    type Error = ContractError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        let series = PriceSeries::new(raw.bars)?;
        Ok(match raw.symbol {
            Some(symbol) => series.with_symbol(symbol),
            None => series,
        })
    }
}

impl TryFrom<Vec<Bar>> for PriceSeries {
    type Error = ContractError;

    fn try_from(bars: Vec<Bar>) -> Result<Self, Self::Error> {
        PriceSeries::new(bars)
    }
}

impl PriceSeries {
    /// Validate and wrap a bar sequence. The bars must already be in ascending
    /// date order; out-of-order input is rejected, never re-sorted.
    pub fn new(bars: Vec<Bar>) -> Result<Self, ContractError> {
        for (index, bar) in bars.iter().enumerate() {
            bar.check(index)?;
            if index > 0 {
                let previous = bars[index - 1].date;
                if bar.date == previous {
                    return Err(ContractError::DuplicateDate {
                        index,
                        date: bar.date,
                    });
                }
                if bar.date < previous {
                    return Err(ContractError::DateOrder {
                        index,
                        date: bar.date,
                        previous,
                    });
                }
            }
        }

        Ok(Self { symbol: None, bars })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// True when at least one bar reports volume.
    pub fn has_volume(&self) -> bool {
        self.bars.iter().any(|b| b.volume.is_some())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }
}

impl<'a> IntoIterator for &'a PriceSeries {
    type Item = &'a Bar;
    type IntoIter = std::slice::Iter<'a, Bar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}
