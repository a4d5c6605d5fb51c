//! Latest-bar alert summary.
//!
//! Derived from the final two frame rows only; stateless and independent of
//! the signal generator's position.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::AlertConfig;
use crate::engine::{IndicatorFrame, IndicatorRow};
use crate::signals::{ge, gt, le, lt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCondition {
    /// MACD line crossed above its signal line.
    MacdBullishCross,
    /// MACD line crossed below its signal line.
    MacdBearishCross,
    RsiEnteredOverbought,
    RsiExitedOverbought,
    RsiEnteredOversold,
    RsiExitedOversold,
    /// Close moved from inside the bands to above the upper band.
    CloseAboveUpperBand,
    /// Close moved from inside the bands to below the lower band.
    CloseBelowLowerBand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub condition: AlertCondition,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AlertSummary {
    /// Fewer than two rows: no crossing can be evaluated.
    InsufficientHistory,
    NoConditionMet { date: NaiveDate },
    Triggered { date: NaiveDate, alerts: Vec<Alert> },
}

impl AlertSummary {
    pub fn alerts(&self) -> &[Alert] {
        match self {
            AlertSummary::Triggered { alerts, .. } => alerts,
            _ => &[],
        }
    }

    pub fn is_triggered(&self) -> bool {
        matches!(self, AlertSummary::Triggered { .. })
    }
}

impl fmt::Display for AlertSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSummary::InsufficientHistory => {
                f.write_str("insufficient history (need at least 2 sessions)")
            }
            AlertSummary::NoConditionMet { date } => {
                write!(f, "{date}: no condition currently met")
            }
            AlertSummary::Triggered { date, alerts } => {
                write!(f, "{date}:")?;
                for alert in alerts {
                    write!(f, "\n  - {}", alert.message)?;
                }
                Ok(())
            }
        }
    }
}

/// Evaluate every alert condition on the last two rows of `frame`.
pub fn summarize(frame: &IndicatorFrame, config: &AlertConfig) -> AlertSummary {
    let Some((prev, latest)) = frame.last_two() else {
        return AlertSummary::InsufficientHistory;
    };

    let alerts: Vec<Alert> = evaluate(prev, latest, config)
        .into_iter()
        .map(|condition| Alert {
            condition,
            message: message(condition, latest, config),
        })
        .collect();

    if alerts.is_empty() {
        AlertSummary::NoConditionMet { date: latest.date }
    } else {
        AlertSummary::Triggered {
            date: latest.date,
            alerts,
        }
    }
}

fn evaluate(prev: &IndicatorRow, latest: &IndicatorRow, config: &AlertConfig) -> Vec<AlertCondition> {
    let overbought = Some(config.rsi_overbought);
    let oversold = Some(config.rsi_oversold);
    let mut conditions = Vec::new();

    if le(prev.macd, prev.macd_signal) && gt(latest.macd, latest.macd_signal) {
        conditions.push(AlertCondition::MacdBullishCross);
    }
    if ge(prev.macd, prev.macd_signal) && lt(latest.macd, latest.macd_signal) {
        conditions.push(AlertCondition::MacdBearishCross);
    }

    if le(prev.rsi, overbought) && gt(latest.rsi, overbought) {
        conditions.push(AlertCondition::RsiEnteredOverbought);
    }
    if gt(prev.rsi, overbought) && le(latest.rsi, overbought) {
        conditions.push(AlertCondition::RsiExitedOverbought);
    }
    if ge(prev.rsi, oversold) && lt(latest.rsi, oversold) {
        conditions.push(AlertCondition::RsiEnteredOversold);
    }
    if lt(prev.rsi, oversold) && ge(latest.rsi, oversold) {
        conditions.push(AlertCondition::RsiExitedOversold);
    }

    if le(Some(prev.close), prev.bb_upper) && gt(Some(latest.close), latest.bb_upper) {
        conditions.push(AlertCondition::CloseAboveUpperBand);
    }
    if ge(Some(prev.close), prev.bb_lower) && lt(Some(latest.close), latest.bb_lower) {
        conditions.push(AlertCondition::CloseBelowLowerBand);
    }

    conditions
}

// Only called for conditions that held, so the values read here are defined.
fn message(condition: AlertCondition, row: &IndicatorRow, config: &AlertConfig) -> String {
    let value = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"));
    match condition {
        AlertCondition::MacdBullishCross => format!(
            "MACD ({}) crossed above signal ({})",
            value(row.macd),
            value(row.macd_signal)
        ),
        AlertCondition::MacdBearishCross => format!(
            "MACD ({}) crossed below signal ({})",
            value(row.macd),
            value(row.macd_signal)
        ),
        AlertCondition::RsiEnteredOverbought => format!(
            "RSI {} entered overbought (> {})",
            value(row.rsi),
            config.rsi_overbought
        ),
        AlertCondition::RsiExitedOverbought => format!(
            "RSI {} left overbought (<= {})",
            value(row.rsi),
            config.rsi_overbought
        ),
        AlertCondition::RsiEnteredOversold => format!(
            "RSI {} entered oversold (< {})",
            value(row.rsi),
            config.rsi_oversold
        ),
        AlertCondition::RsiExitedOversold => format!(
            "RSI {} left oversold (>= {})",
            value(row.rsi),
            config.rsi_oversold
        ),
        AlertCondition::CloseAboveUpperBand => format!(
            "close {:.2} above upper band ({})",
            row.close,
            value(row.bb_upper)
        ),
        AlertCondition::CloseBelowLowerBand => format!(
            "close {:.2} below lower band ({})",
            row.close,
            value(row.bb_lower)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;

    fn row(day: u32, close: f64) -> IndicatorRow {
        let date = NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
        IndicatorRow::from_bar(&Bar::new(date, close, close + 1.0, close - 1.0, close))
    }

    fn conditions(summary: &AlertSummary) -> Vec<AlertCondition> {
        summary.alerts().iter().map(|a| a.condition).collect()
    }

    #[test]
    fn fewer_than_two_rows_is_insufficient() {
        let config = AlertConfig::default();
        assert_eq!(
            summarize(&IndicatorFrame::default(), &config),
            AlertSummary::InsufficientHistory
        );
        let frame = IndicatorFrame::from_rows(vec![row(1, 100.0)]);
        assert_eq!(summarize(&frame, &config), AlertSummary::InsufficientHistory);
    }

    #[test]
    fn quiet_market_reports_no_condition() {
        let mut a = row(1, 100.0);
        let mut b = row(2, 100.5);
        a.rsi = Some(50.0);
        b.rsi = Some(52.0);
        let summary = summarize(
            &IndicatorFrame::from_rows(vec![a, b]),
            &AlertConfig::default(),
        );
        assert!(!summary.is_triggered());
        assert!(summary.to_string().contains("no condition currently met"));
    }

    #[test]
    fn macd_crosses_both_directions() {
        let mut a = row(1, 100.0);
        let mut b = row(2, 100.0);
        a.macd = Some(-0.5);
        a.macd_signal = Some(0.0);
        b.macd = Some(0.5);
        b.macd_signal = Some(0.1);
        let frame = IndicatorFrame::from_rows(vec![a.clone(), b.clone()]);
        assert_eq!(
            conditions(&summarize(&frame, &AlertConfig::default())),
            vec![AlertCondition::MacdBullishCross]
        );

        let frame = IndicatorFrame::from_rows(vec![b, a]);
        assert_eq!(
            conditions(&summarize(&frame, &AlertConfig::default())),
            vec![AlertCondition::MacdBearishCross]
        );
    }

    #[test]
    fn rsi_threshold_crossings() {
        let cases = [
            (65.0, 72.0, AlertCondition::RsiEnteredOverbought),
            (75.0, 68.0, AlertCondition::RsiExitedOverbought),
            (35.0, 28.0, AlertCondition::RsiEnteredOversold),
            (25.0, 31.0, AlertCondition::RsiExitedOversold),
        ];
        for (before, after, expected) in cases {
            let mut a = row(1, 100.0);
            let mut b = row(2, 100.0);
            a.rsi = Some(before);
            b.rsi = Some(after);
            let summary = summarize(
                &IndicatorFrame::from_rows(vec![a, b]),
                &AlertConfig::default(),
            );
            assert_eq!(conditions(&summary), vec![expected], "{before} -> {after}");
        }
    }

    #[test]
    fn thresholds_are_configurable() {
        let mut a = row(1, 100.0);
        let mut b = row(2, 100.0);
        a.rsi = Some(75.0);
        b.rsi = Some(78.0);
        let config = AlertConfig {
            rsi_overbought: 77.0,
            rsi_oversold: 20.0,
        };
        let summary = summarize(&IndicatorFrame::from_rows(vec![a, b]), &config);
        assert_eq!(conditions(&summary), vec![AlertCondition::RsiEnteredOverbought]);
    }

    #[test]
    fn band_breakouts() {
        let mut a = row(1, 100.0);
        let mut b = row(2, 106.0);
        for r in [&mut a, &mut b] {
            r.bb_upper = Some(105.0);
            r.bb_lower = Some(95.0);
        }
        let summary = summarize(
            &IndicatorFrame::from_rows(vec![a.clone(), b]),
            &AlertConfig::default(),
        );
        assert_eq!(conditions(&summary), vec![AlertCondition::CloseAboveUpperBand]);
        assert!(summary.to_string().contains("above upper band"));

        let mut c = row(2, 94.0);
        c.bb_upper = Some(105.0);
        c.bb_lower = Some(95.0);
        let summary = summarize(&IndicatorFrame::from_rows(vec![a, c]), &AlertConfig::default());
        assert_eq!(conditions(&summary), vec![AlertCondition::CloseBelowLowerBand]);
    }

    #[test]
    fn undefined_values_never_alert() {
        let a = row(1, 100.0);
        let b = row(2, 200.0);
        let summary = summarize(
            &IndicatorFrame::from_rows(vec![a, b]),
            &AlertConfig::default(),
        );
        assert!(matches!(summary, AlertSummary::NoConditionMet { .. }));
    }

    #[test]
    fn summary_serializes_with_status_tag() {
        let json = serde_json::to_string(&AlertSummary::InsufficientHistory).unwrap();
        assert_eq!(json, r#"{"status":"insufficient_history"}"#);
    }
}
