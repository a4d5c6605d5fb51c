//! barsignal core: indicators, signals and alerts over daily price bars.
//!
//! This crate contains the whole analysis pipeline:
//! - Domain types (bars, validated price series, signals)
//! - Incremental indicators (EMA, RSI, Bollinger, MACD, Stochastic, volume MA)
//! - Indicator frame precomputation
//! - Single-position FLAT/LONG signal generator
//! - Latest-bar alert summary
//! - Configuration profiles, report views and run fingerprints
//!
//! The core is synchronous and performs no I/O beyond loading a config file.

pub mod alerts;
pub mod config;
pub mod domain;
pub mod engine;
pub mod fingerprint;
pub mod indicators;
pub mod report;
pub mod signals;
pub mod synthetic;

pub use config::{ConfigError, EngineConfig, Profile};
pub use domain::{Action, Bar, ContractError, Position, PriceSeries, Signal, SignalReason};
pub use engine::{run, Analysis, AnalysisStatus, EngineError, IndicatorFrame, IndicatorRow};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: all public types are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();
        require_send::<domain::Signal>();
        require_sync::<domain::Signal>();
        require_send::<domain::ContractError>();
        require_sync::<domain::ContractError>();

        // Engine types
        require_send::<engine::IndicatorFrame>();
        require_sync::<engine::IndicatorFrame>();
        require_send::<engine::Analysis>();
        require_sync::<engine::Analysis>();
        require_send::<engine::EngineError>();
        require_sync::<engine::EngineError>();
        require_send::<Box<dyn indicators::Indicator>>();
        require_sync::<Box<dyn indicators::Indicator>>();

        // Signals and alerts
        require_send::<signals::SignalGenerator>();
        require_sync::<signals::SignalGenerator>();
        require_send::<signals::SignalState>();
        require_sync::<signals::SignalState>();
        require_send::<alerts::AlertSummary>();
        require_sync::<alerts::AlertSummary>();

        // Config and fingerprint
        require_send::<config::EngineConfig>();
        require_sync::<config::EngineConfig>();
        require_send::<fingerprint::RunFingerprint>();
        require_sync::<fingerprint::RunFingerprint>();
    }
}
