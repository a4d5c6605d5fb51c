//! Signal generation over a computed indicator frame.
//!
//! Comparisons against undefined indicator values are always false: a
//! missing RSI never triggers an entry or an exit.

pub mod generator;

pub use generator::{final_position, SignalGenerator, SignalState};

pub(crate) fn gt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

pub(crate) fn lt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

pub(crate) fn le(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a <= b)
}

pub(crate) fn ge(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a >= b)
}
