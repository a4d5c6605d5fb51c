//! Signal types emitted by the generator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the generator recommends for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Single-position state: either out of the market or holding one long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    Flat,
    Long,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Flat => f.pad("FLAT"),
            Position::Long => f.pad("LONG"),
        }
    }
}

/// Why a BUY or SELL fired.
///
/// Exit reasons are checked in declaration order; the first one that holds
/// is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalReason {
    /// Fresh upward EMA crossover with RSI and band guards satisfied.
    Crossover,
    TakeProfit,
    StopLoss,
    /// Short EMA fell below long EMA.
    TrendReversal,
    /// RSI above the overbought threshold.
    Overbought,
    /// Close above the upper Bollinger band.
    BandExhaustion,
}

impl SignalReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalReason::Crossover => "crossover",
            SignalReason::TakeProfit => "take_profit",
            SignalReason::StopLoss => "stop_loss",
            SignalReason::TrendReversal => "trend_reversal",
            SignalReason::Overbought => "overbought",
            SignalReason::BandExhaustion => "band_exhaustion",
        }
    }
}

impl fmt::Display for SignalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One signal per session, index-aligned with the indicator frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub date: NaiveDate,
    pub action: Action,
    /// Session close the decision was made on.
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<SignalReason>,
}

impl Signal {
    pub fn hold(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            action: Action::Hold,
            close,
            reason: None,
        }
    }

    pub fn is_trade(&self) -> bool {
        self.action != Action::Hold
    }
}
