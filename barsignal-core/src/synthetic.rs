//! Seeded synthetic price series for demos and benchmarks.
//!
//! A random walk with uniform ±3% daily returns starting at 100, skipping
//! weekends. The same seed always produces the same series. Series are
//! tagged with a `SYNTH-` symbol so they are never mistaken for market data.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{Bar, ContractError, PriceSeries};

pub const START_PRICE: f64 = 100.0;

/// `sessions` weekday bars starting at (or after) `start`.
pub fn synthetic_series(
    start: NaiveDate,
    sessions: usize,
    seed: u64,
) -> Result<PriceSeries, ContractError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bars = Vec::with_capacity(sessions);
    let mut price = START_PRICE;
    let mut current = start;

    while bars.len() < sessions {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64) as f64;

        bars.push(Bar::new(current, open, high, low, close).with_volume(volume));

        price = close;
        current += chrono::Duration::days(1);
    }

    Ok(PriceSeries::new(bars)?.with_symbol(format!("SYNTH-{seed}")))
}
