//! Presentation-ready views of an analysis: trade events, the tail table,
//! and flat export rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Action, Signal, SignalReason};
use crate::engine::{Analysis, IndicatorFrame, IndicatorRow};

/// Default number of rows in the tail view.
pub const DEFAULT_TAIL: usize = 20;

/// A BUY or SELL, with the close it was decided on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub date: NaiveDate,
    pub action: Action,
    pub close: f64,
    pub reason: Option<SignalReason>,
    /// Close-to-close return since the matching BUY; SELLs only.
    pub return_pct: Option<f64>,
}

/// All BUY and SELL signals in date order.
pub fn trade_events(signals: &[Signal]) -> Vec<TradeEvent> {
    let mut entry: Option<f64> = None;
    signals
        .iter()
        .filter(|s| s.is_trade())
        .map(|s| {
            let return_pct = match s.action {
                Action::Buy => {
                    entry = Some(s.close);
                    None
                }
                _ => entry.take().map(|e| (s.close / e - 1.0) * 100.0),
            };
            TradeEvent {
                date: s.date,
                action: s.action,
                close: s.close,
                reason: s.reason,
                return_pct,
            }
        })
        .collect()
}

/// One line of the tail table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailRow {
    pub date: NaiveDate,
    pub close: f64,
    pub ema_short: Option<f64>,
    pub ema_long: Option<f64>,
    pub rsi: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub action: Action,
}

/// The last `n` sessions joined with their signals.
pub fn tail(frame: &IndicatorFrame, signals: &[Signal], n: usize) -> Vec<TailRow> {
    let rows = frame.tail(n);
    let skip = frame.len() - rows.len();
    rows.iter()
        .enumerate()
        .map(|(i, row)| TailRow {
            date: row.date,
            close: row.close,
            ema_short: row.ema_short,
            ema_long: row.ema_long,
            rsi: row.rsi,
            bb_upper: row.bb_upper,
            bb_lower: row.bb_lower,
            action: signals.get(skip + i).map_or(Action::Hold, |s| s.action),
        })
        .collect()
}

/// Flat CSV record: every frame column plus the session's signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
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
    pub signal: Action,
    pub reason: Option<SignalReason>,
}

impl ExportRow {
    fn new(row: &IndicatorRow, signal: Option<&Signal>) -> Self {
        Self {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
            ema_short: row.ema_short,
            ema_long: row.ema_long,
            rsi: row.rsi,
            bb_middle: row.bb_middle,
            bb_upper: row.bb_upper,
            bb_lower: row.bb_lower,
            macd: row.macd,
            macd_signal: row.macd_signal,
            macd_histogram: row.macd_histogram,
            stoch_k: row.stoch_k,
            stoch_d: row.stoch_d,
            volume_ma: row.volume_ma,
            signal: signal.map_or(Action::Hold, |s| s.action),
            reason: signal.and_then(|s| s.reason),
        }
    }
}

pub fn export_rows(analysis: &Analysis) -> Vec<ExportRow> {
    analysis
        .frame
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| ExportRow::new(row, analysis.signals.get(i)))
        .collect()
}
