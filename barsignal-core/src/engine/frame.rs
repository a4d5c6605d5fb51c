//! IndicatorFrame: one row of computed values per input bar.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Bar;

/// Identifies a computed field of an `IndicatorRow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    EmaShort,
    EmaLong,
    Rsi,
    BbMiddle,
    BbUpper,
    BbLower,
    Macd,
    MacdSignal,
    MacdHistogram,
    StochK,
    StochD,
    VolumeMa,
}

/// Indicator values for a single session.
///
/// Every computed field is `None` while its indicator is warming up, when it
/// is mathematically undefined at this bar, or when the indicator is not
/// enabled in the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
    pub ema_short: Option<f64>,
    pub ema_long: Option<f64>,
    pub rsi: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub volume_ma: Option<f64>,
}

impl IndicatorRow {
    /// A row carrying the bar's prices with every computed field unset.
    pub fn from_bar(bar: &Bar) -> Self {
        Self {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            ema_short: None,
            ema_long: None,
            rsi: None,
            bb_middle: None,
            bb_upper: None,
            bb_lower: None,
            macd: None,
            macd_signal: None,
            macd_histogram: None,
            stoch_k: None,
            stoch_d: None,
            volume_ma: None,
        }
    }

    pub fn get(&self, column: Column) -> Option<f64> {
        match column {
            Column::EmaShort => self.ema_short,
            Column::EmaLong => self.ema_long,
            Column::Rsi => self.rsi,
            Column::BbMiddle => self.bb_middle,
            Column::BbUpper => self.bb_upper,
            Column::BbLower => self.bb_lower,
            Column::Macd => self.macd,
            Column::MacdSignal => self.macd_signal,
            Column::MacdHistogram => self.macd_histogram,
            Column::StochK => self.stoch_k,
            Column::StochD => self.stoch_d,
            Column::VolumeMa => self.volume_ma,
        }
    }

    pub fn set(&mut self, column: Column, value: Option<f64>) {
        let slot = match column {
            Column::EmaShort => &mut self.ema_short,
            Column::EmaLong => &mut self.ema_long,
            Column::Rsi => &mut self.rsi,
            Column::BbMiddle => &mut self.bb_middle,
            Column::BbUpper => &mut self.bb_upper,
            Column::BbLower => &mut self.bb_lower,
            Column::Macd => &mut self.macd,
            Column::MacdSignal => &mut self.macd_signal,
            Column::MacdHistogram => &mut self.macd_histogram,
            Column::StochK => &mut self.stoch_k,
            Column::StochD => &mut self.stoch_d,
            Column::VolumeMa => &mut self.volume_ma,
        };
        *slot = value;
    }
}

/// Indicator rows aligned 1:1 by position with the price series they came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorFrame {
    rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    pub fn from_rows(rows: Vec<IndicatorRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }

    /// The final two rows as (previous, latest).
    pub fn last_two(&self) -> Option<(&IndicatorRow, &IndicatorRow)> {
        match self.rows.as_slice() {
            [.., previous, latest] => Some((previous, latest)),
            _ => None,
        }
    }

    /// The last `n` rows (all rows if the frame is shorter).
    pub fn tail(&self, n: usize) -> &[IndicatorRow] {
        let start = self.rows.len().saturating_sub(n);
        &self.rows[start..]
    }

    /// Values of one column across the frame.
    pub fn column(&self, column: Column) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.get(column)).collect()
    }

    /// Index of the first row where `column` is defined.
    pub fn first_defined(&self, column: Column) -> Option<usize> {
        self.rows.iter().position(|r| r.get(column).is_some())
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [IndicatorRow] {
        &mut self.rows
    }
}
