//! Terminal tables and file exports.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use barsignal_core::config::EngineConfig;
use barsignal_core::domain::{Action, PriceSeries};
use barsignal_core::engine::{Analysis, AnalysisStatus};
use barsignal_core::fingerprint::RunFingerprint;
use barsignal_core::report::{export_rows, tail, trade_events, TailRow, TradeEvent};
use serde::Serialize;

/// Everything written by `--json-out`.
#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub symbol: Option<&'a str>,
    pub synthetic: bool,
    pub config: &'a EngineConfig,
    pub status: AnalysisStatus,
    pub fingerprint: &'a RunFingerprint,
    pub trades: Vec<TradeEvent>,
    pub analysis: &'a Analysis,
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

pub fn print_summary(
    series: &PriceSeries,
    config: &EngineConfig,
    analysis: &Analysis,
    fingerprint: &RunFingerprint,
    synthetic: bool,
) {
    println!();
    println!("=== Analysis ===");
    println!("Symbol:         {}", series.symbol().unwrap_or("-"));
    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        println!("Period:         {} to {}", first.date, last.date);
    }
    println!(
        "Bars:           {} ({} required)",
        series.len(),
        analysis.bars_required
    );
    println!(
        "Profile:        {} (EMA {}/{}, RSI {}, BB {}x{})",
        config.profile,
        config.indicators.ema_short,
        config.indicators.ema_long,
        config.indicators.rsi_period,
        config.indicators.bollinger_period,
        config.indicators.bollinger_multiplier
    );
    println!(
        "Signals:        {} BUY, {} SELL",
        analysis.buy_count(),
        analysis.sell_count()
    );
    println!("Status:         {}", analysis.status());
    println!("Fingerprint:    {}", fingerprint.run_hash().short());
    if synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!();
}

pub fn print_trades(events: &[TradeEvent]) {
    println!("--- Trades ---");
    if events.is_empty() {
        println!("(no BUY or SELL signals)");
        println!();
        return;
    }
    println!(
        "{:<6} {:<12} {:>10} {:>9}  {}",
        "Action", "Date", "Close", "Return", "Reason"
    );
    println!("{}", "-".repeat(56));
    for event in events {
        let ret = event
            .return_pct
            .map_or_else(String::new, |r| format!("{r:+.2}%"));
        let reason = event.reason.map_or("", |r| r.as_str());
        println!(
            "{:<6} {:<12} {:>10.2} {:>9}  {}",
            event.action,
            event.date.to_string(),
            event.close,
            ret,
            reason
        );
    }
    println!();
}

pub fn print_tail(rows: &[TailRow]) {
    println!("--- Last {} sessions ---", rows.len());
    println!(
        "{:<12} {:>10} {:>10} {:>10} {:>7} {:>10} {:>10}  {}",
        "Date", "Close", "EMA short", "EMA long", "RSI", "BB upper", "BB lower", "Signal"
    );
    println!("{}", "-".repeat(88));
    for row in rows {
        let marker = match row.action {
            Action::Hold => String::new(),
            action => action.to_string(),
        };
        println!(
            "{:<12} {:>10.2} {:>10} {:>10} {:>7} {:>10} {:>10}  {}",
            row.date.to_string(),
            row.close,
            fmt_opt(row.ema_short),
            fmt_opt(row.ema_long),
            fmt_opt(row.rsi),
            fmt_opt(row.bb_upper),
            fmt_opt(row.bb_lower),
            marker
        );
    }
    println!();
}

pub fn print_alerts(analysis: &Analysis) {
    println!("--- Alerts ---");
    println!("{}", analysis.alerts);
    println!();
}

/// Print all sections of the `analyze` report.
pub fn print_report(
    series: &PriceSeries,
    config: &EngineConfig,
    analysis: &Analysis,
    fingerprint: &RunFingerprint,
    synthetic: bool,
    tail_len: usize,
) {
    print_summary(series, config, analysis, fingerprint, synthetic);
    print_trades(&trade_events(&analysis.signals));
    if tail_len > 0 {
        print_tail(&tail(&analysis.frame, &analysis.signals, tail_len));
    }
    print_alerts(analysis);
}

/// Write `report` as pretty JSON to `path`, or stdout when `path` is `-`.
pub fn write_json(path: &Path, report: &JsonReport<'_>) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    if path == Path::new("-") {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{json}")?;
    } else {
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

/// Frame rows plus signal column as CSV.
pub fn export_csv(analysis: &Analysis) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in export_rows(analysis) {
        wtr.serialize(row)?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

pub fn write_csv(path: &Path, analysis: &Analysis) -> Result<()> {
    let csv = export_csv(analysis)?;
    std::fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))
}

/// Bars as CSV in the format `input::load_csv` reads back.
pub fn write_series_csv(path: &Path, series: &PriceSeries) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for bar in series {
        wtr.serialize(bar)?;
    }
    wtr.flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use barsignal_core::engine;
    use barsignal_core::synthetic::synthetic_series;
    use chrono::NaiveDate;

    fn series() -> PriceSeries {
        synthetic_series(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 60, 5).unwrap()
    }

    #[test]
    fn csv_export_has_header_and_one_line_per_bar() {
        let s = series();
        let analysis = engine::run(&s, &EngineConfig::default()).unwrap();
        let csv = export_csv(&analysis).unwrap();
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("date,open,high,low,close,volume,ema_short"));
        assert!(header.ends_with("signal,reason"));
        assert_eq!(lines.count(), 60);
    }

    #[test]
    fn series_csv_reads_back() {
        let s = series();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synth.csv");
        write_series_csv(&path, &s).unwrap();
        let loaded = crate::input::load_csv(&path).unwrap();
        assert_eq!(loaded.len(), s.len());
        assert_eq!(loaded.bars()[0].date, s.bars()[0].date);
        assert_eq!(loaded.bars()[0].volume, s.bars()[0].volume);
    }

    #[test]
    fn json_report_written_to_file() {
        let s = series();
        let config = EngineConfig::default();
        let analysis = engine::run(&s, &config).unwrap();
        let fingerprint = RunFingerprint::new(&config, &s, &analysis);
        let report = JsonReport {
            symbol: s.symbol(),
            synthetic: true,
            config: &config,
            status: analysis.status(),
            fingerprint: &fingerprint,
            trades: trade_events(&analysis.signals),
            analysis: &analysis,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&path, &report).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["synthetic"], true);
        assert_eq!(value["analysis"]["signals"].as_array().unwrap().len(), 60);
        assert_eq!(value["status"]["status"], "ready");
    }
}
