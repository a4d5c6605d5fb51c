//! Analysis engine: indicators, signals and alerts for one price series.
//!
//! A run is a straight pipeline with no feedback:
//!
//! 1. Precompute every configured indicator into an `IndicatorFrame`
//! 2. Scan the frame with the single-position signal generator
//! 3. Derive the alert summary from the final two rows

pub mod frame;
pub mod precompute;

pub use frame::{Column, IndicatorFrame, IndicatorRow};
pub use precompute::{compute_frame, compute_warmup, indicator_set};

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::alerts::{self, AlertSummary};
use crate::config::{ConfigError, EngineConfig, IndicatorConfig};
use crate::domain::{Action, ContractError, Position, PriceSeries, Signal};
use crate::signals::{final_position, SignalGenerator};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("input contract violated: {0}")]
    Contract(#[from] ContractError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub frame: IndicatorFrame,
    pub signals: Vec<Signal>,
    pub alerts: AlertSummary,
    /// Bars needed before both RSI and the Bollinger bands are defined.
    pub bars_required: usize,
}

impl Analysis {
    pub fn status(&self) -> AnalysisStatus {
        if self.frame.is_empty() {
            return AnalysisStatus::NoData;
        }
        if self.frame.len() < self.bars_required {
            return AnalysisStatus::WarmingUp {
                bars_available: self.frame.len(),
                bars_required: self.bars_required,
            };
        }
        AnalysisStatus::Ready {
            position: final_position(&self.signals),
            last_action: self
                .signals
                .last()
                .map_or(Action::Hold, |signal| signal.action),
        }
    }

    pub fn buy_count(&self) -> usize {
        self.count(Action::Buy)
    }

    pub fn sell_count(&self) -> usize {
        self.count(Action::Sell)
    }

    fn count(&self, action: Action) -> usize {
        self.signals.iter().filter(|s| s.action == action).count()
    }
}

/// What the presentation layer should say about a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisStatus {
    NoData,
    WarmingUp {
        bars_available: usize,
        bars_required: usize,
    },
    Ready {
        position: Position,
        last_action: Action,
    },
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisStatus::NoData => f.write_str("no data"),
            AnalysisStatus::WarmingUp {
                bars_available,
                bars_required,
            } => write!(
                f,
                "warming up ({bars_available}/{bars_required} sessions)"
            ),
            AnalysisStatus::Ready {
                position,
                last_action,
            } => match (position, last_action) {
                (Position::Flat, Action::Hold) => f.write_str("FLAT, no signal active"),
                _ => write!(f, "{position}, last signal {last_action}"),
            },
        }
    }
}

/// Sessions needed before the generator can see every indicator it reads.
pub fn bars_required(config: &IndicatorConfig) -> usize {
    (config.rsi_period + 1).max(config.bollinger_period)
}

/// Validate `config`, then compute indicators, signals and alerts for `series`.
pub fn run(series: &PriceSeries, config: &EngineConfig) -> Result<Analysis, EngineError> {
    config.validate()?;

    let frame = compute_frame(series, &config.indicators);
    let signals = SignalGenerator::new(config.signals).generate(series, &frame)?;
    let alerts = alerts::summarize(&frame, &config.alerts);

    let analysis = Analysis {
        frame,
        signals,
        alerts,
        bars_required: bars_required(&config.indicators),
    };

    info!(
        symbol = series.symbol().unwrap_or("-"),
        profile = %config.profile,
        bars = series.len(),
        buys = analysis.buy_count(),
        sells = analysis.sell_count(),
        status = %analysis.status(),
        "analysis complete"
    );

    Ok(analysis)
}
