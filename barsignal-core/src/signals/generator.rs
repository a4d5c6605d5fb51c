//! Single-position signal generator.
//!
//! Scans the indicator frame bar by bar with a FLAT/LONG state machine and
//! emits exactly one `Signal` per session.
//!
//! Entry (FLAT → LONG) needs a fresh upward EMA crossover with RSI below the
//! overbought threshold and the close under the upper band. Exit (LONG →
//! FLAT) fires on the first of: take-profit, stop-loss, trend reversal,
//! overbought RSI, close above the upper band.

use tracing::trace;

use super::{gt, le, lt};
use crate::config::SignalConfig;
use crate::domain::{Action, ContractError, Position, PriceSeries, Signal, SignalReason};
use crate::engine::{IndicatorFrame, IndicatorRow};

/// Transient position state carried across the scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalState {
    pub position: Position,
    /// Close of the BUY bar; `Some` exactly when `position` is `Long`.
    pub entry_price: Option<f64>,
}

impl Default for SignalState {
    fn default() -> Self {
        Self {
            position: Position::Flat,
            entry_price: None,
        }
    }
}

impl SignalState {
    fn enter(&mut self, close: f64) {
        self.position = Position::Long;
        self.entry_price = Some(close);
    }

    fn exit(&mut self) {
        self.position = Position::Flat;
        self.entry_price = None;
    }
}

#[derive(Debug, Clone)]
pub struct SignalGenerator {
    config: SignalConfig,
}

impl SignalGenerator {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    /// Produce one signal per bar of `series`.
    ///
    /// `frame` must have been computed from `series`: same length, same dates
    /// at every position.
    pub fn generate(
        &self,
        series: &PriceSeries,
        frame: &IndicatorFrame,
    ) -> Result<Vec<Signal>, ContractError> {
        check_alignment(series, frame)?;

        let rows = frame.rows();
        let mut state = SignalState::default();
        let mut signals = Vec::with_capacity(rows.len());

        for (i, row) in rows.iter().enumerate() {
            if i == 0 {
                signals.push(Signal::hold(row.date, row.close));
                continue;
            }

            let (action, reason) = match state.position {
                Position::Long => match self.exit_reason(row, &state) {
                    Some(reason) => {
                        state.exit();
                        (Action::Sell, Some(reason))
                    }
                    None => (Action::Hold, None),
                },
                Position::Flat => {
                    if self.should_enter(&rows[i - 1], row) {
                        state.enter(row.close);
                        (Action::Buy, Some(SignalReason::Crossover))
                    } else {
                        (Action::Hold, None)
                    }
                }
            };

            if action != Action::Hold {
                trace!(
                    date = %row.date,
                    action = %action,
                    reason = ?reason,
                    close = row.close,
                    position = %state.position,
                    "state transition"
                );
            }

            signals.push(Signal {
                date: row.date,
                action,
                close: row.close,
                reason,
            });
        }

        Ok(signals)
    }

    fn should_enter(&self, prev: &IndicatorRow, row: &IndicatorRow) -> bool {
        let crossed_up =
            gt(row.ema_short, row.ema_long) && le(prev.ema_short, prev.ema_long);
        crossed_up
            && lt(row.rsi, Some(self.config.rsi_overbought))
            && lt(Some(row.close), row.bb_upper)
    }

    fn exit_reason(&self, row: &IndicatorRow, state: &SignalState) -> Option<SignalReason> {
        let entry = state.entry_price?;
        let close = row.close;

        if close >= entry * (1.0 + self.config.profit_target) {
            Some(SignalReason::TakeProfit)
        } else if close <= entry * (1.0 - self.config.stop_loss) {
            Some(SignalReason::StopLoss)
        } else if lt(row.ema_short, row.ema_long) {
            Some(SignalReason::TrendReversal)
        } else if gt(row.rsi, Some(self.config.rsi_overbought)) {
            Some(SignalReason::Overbought)
        } else if gt(Some(close), row.bb_upper) {
            Some(SignalReason::BandExhaustion)
        } else {
            None
        }
    }
}

fn check_alignment(series: &PriceSeries, frame: &IndicatorFrame) -> Result<(), ContractError> {
    if series.len() != frame.len() {
        return Err(ContractError::LengthMismatch {
            frame: frame.len(),
            series: series.len(),
        });
    }
    for (index, (bar, row)) in series.iter().zip(frame.rows()).enumerate() {
        if bar.date != row.date {
            return Err(ContractError::DateMismatch {
                index,
                frame_date: row.date,
                series_date: bar.date,
            });
        }
    }
    Ok(())
}

/// Position after replaying a signal sequence from FLAT.
pub fn final_position(signals: &[Signal]) -> Position {
    signals
        .iter()
        .fold(Position::Flat, |position, signal| match signal.action {
            Action::Buy => Position::Long,
            Action::Sell => Position::Flat,
            Action::Hold => position,
        })
}
