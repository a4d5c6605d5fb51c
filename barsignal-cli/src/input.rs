//! Price series loaders: CSV and JSON files.
//!
//! CSV needs a header row with `date,open,high,low,close` and an optional
//! `volume` column (capitalized headers are accepted). JSON is either a
//! `{"symbol": ..., "bars": [...]}` object or a bare array of bars.
//!
//! Rows must already be in ascending date order. Contract violations from
//! the core are reported with the offending file.

use std::path::Path;

use anyhow::{bail, Context, Result};
use barsignal_core::domain::{Bar, PriceSeries};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CsvBar {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(default, alias = "Volume")]
    volume: Option<f64>,
}

impl From<CsvBar> for Bar {
    fn from(row: CsvBar) -> Self {
        Bar {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        }
    }
}

/// Object form of a JSON series. Validation happens in `PriceSeries::new`
/// so contract errors keep their message.
#[derive(Deserialize)]
struct JsonSeries {
    #[serde(default)]
    symbol: Option<String>,
    bars: Vec<Bar>,
}

/// Load a series, picking the format from the file extension.
pub fn load_series(path: &Path, symbol: Option<&str>) -> Result<PriceSeries> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let series = match extension.as_deref() {
        Some("csv") => load_csv(path)?,
        Some("json") => load_json(path)?,
        _ => bail!(
            "unsupported input '{}': expected a .csv or .json file",
            path.display()
        ),
    };

    let series = match symbol {
        Some(symbol) => series.with_symbol(symbol),
        None if series.symbol().is_none() => match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => series.with_symbol(stem.to_ascii_uppercase()),
            None => series,
        },
        None => series,
    };

    debug!(
        path = %path.display(),
        bars = series.len(),
        symbol = series.symbol().unwrap_or("-"),
        "loaded price series"
    );
    Ok(series)
}

pub fn load_csv(path: &Path) -> Result<PriceSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut bars = Vec::new();
    for (line, record) in reader.deserialize::<CsvBar>().enumerate() {
        // +2: one for the header, one for 1-based numbering
        let row = record.with_context(|| format!("{}: bad row at line {}", path.display(), line + 2))?;
        bars.push(Bar::from(row));
    }

    PriceSeries::new(bars).with_context(|| format!("{}: invalid price series", path.display()))
}

pub fn load_json(path: &Path) -> Result<PriceSeries> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{}: not valid JSON", path.display()))?;

    let (symbol, bars) = if value.is_array() {
        let bars: Vec<Bar> = serde_json::from_value(value)
            .with_context(|| format!("{}: not a valid bar array", path.display()))?;
        (None, bars)
    } else if value.is_object() {
        let raw: JsonSeries = serde_json::from_value(value)
            .with_context(|| format!("{}: not a valid price series object", path.display()))?;
        (raw.symbol, raw.bars)
    } else {
        bail!(
            "{}: expected a bar array or a {{\"symbol\", \"bars\"}} object",
            path.display()
        );
    };

    let series = PriceSeries::new(bars)
        .with_context(|| format!("{}: invalid price series", path.display()))?;
    Ok(match symbol {
        Some(symbol) => series.with_symbol(symbol),
        None => series,
    })
}
