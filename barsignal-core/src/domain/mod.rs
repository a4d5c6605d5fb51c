//! Domain types: bars, validated price series, signals.

pub mod bar;
pub mod series;
pub mod signal;

pub use bar::Bar;
pub use series::{ContractError, PriceSeries};
pub use signal::{Action, Position, Signal, SignalReason};
