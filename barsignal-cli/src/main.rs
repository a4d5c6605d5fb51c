//! barsignal CLI: indicator tables, trade signals and alerts for daily prices.
//!
//! Commands:
//! - `analyze`: run the engine over a CSV/JSON file or a synthetic series
//! - `synthetic`: write a seeded synthetic series as CSV
//! - `config`: print the default configuration of a profile as TOML

mod input;
mod logging;
mod output;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use barsignal_core::config::{EngineConfig, Profile};
use barsignal_core::domain::PriceSeries;
use barsignal_core::engine;
use barsignal_core::fingerprint::RunFingerprint;
use barsignal_core::report::{trade_events, DEFAULT_TAIL};
use barsignal_core::synthetic::synthetic_series;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::output::JsonReport;

#[derive(Parser)]
#[command(
    name = "barsignal",
    version,
    about = "Daily price indicators, BUY/SELL/HOLD signals and alerts"
)]
struct Cli {
    /// Log filter directive (e.g. `info`, `barsignal_core=debug`). Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute indicators and signals for a price series.
    Analyze(AnalyzeArgs),
    /// Write a seeded synthetic price series as CSV.
    Synthetic {
        /// Number of weekday sessions to generate.
        #[arg(long, default_value_t = 252)]
        sessions: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// First calendar date (YYYY-MM-DD); weekends are skipped.
        #[arg(long, default_value = "2020-01-02")]
        start: NaiveDate,

        /// Output CSV path.
        #[arg(long)]
        output: PathBuf,
    },
    /// Print the full default configuration for a profile as TOML.
    Config {
        #[arg(long, default_value = "classic")]
        profile: Profile,
    },
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Price series file (.csv or .json).
    #[arg(long, conflicts_with = "synthetic")]
    input: Option<PathBuf>,

    /// Use a synthetic series of this many sessions instead of a file.
    #[arg(long)]
    synthetic: Option<usize>,

    /// Seed for `--synthetic`.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// First calendar date for `--synthetic` (YYYY-MM-DD).
    #[arg(long, default_value = "2020-01-02")]
    start: NaiveDate,

    /// Symbol label (defaults to the file's symbol or name).
    #[arg(long)]
    symbol: Option<String>,

    /// TOML config file.
    #[arg(long, conflicts_with = "profile")]
    config: Option<PathBuf>,

    /// Built-in profile: classic or extended.
    #[arg(long)]
    profile: Option<Profile>,

    #[arg(long)]
    ema_short: Option<usize>,

    #[arg(long)]
    ema_long: Option<usize>,

    #[arg(long)]
    rsi_period: Option<usize>,

    /// Take-profit fraction (0.05 = +5%).
    #[arg(long)]
    profit_target: Option<f64>,

    /// Stop-loss fraction (0.02 = -2%).
    #[arg(long)]
    stop_loss: Option<f64>,

    #[arg(long)]
    rsi_overbought: Option<f64>,

    /// Sessions in the tail table (0 hides it).
    #[arg(long, default_value_t = DEFAULT_TAIL)]
    tail: usize,

    /// Write the full analysis as JSON (`-` for stdout, which suppresses the tables).
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Write frame rows with a signal column as CSV.
    #[arg(long)]
    csv_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref(), cli.log_json)?;

    match cli.command {
        Commands::Analyze(args) => run_analyze(args),
        Commands::Synthetic {
            sessions,
            seed,
            start,
            output,
        } => run_synthetic(sessions, seed, start, output),
        Commands::Config { profile } => {
            print!("{}", EngineConfig::for_profile(profile).to_toml_string()?);
            Ok(())
        }
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = build_config(&args)?;

    let (series, synthetic) = match (&args.input, args.synthetic) {
        (Some(path), _) => (input::load_series(path, args.symbol.as_deref())?, false),
        (None, Some(sessions)) => {
            let series = synthetic_series(args.start, sessions, args.seed)?;
            let series = match &args.symbol {
                Some(symbol) => series.with_symbol(symbol.as_str()),
                None => series,
            };
            (series, true)
        }
        (None, None) => bail!("one of --input or --synthetic is required"),
    };

    let analysis = engine::run(&series, &config)?;
    let fingerprint = RunFingerprint::new(&config, &series, &analysis);

    let json_to_stdout = args
        .json_out
        .as_deref()
        .is_some_and(|p| p == std::path::Path::new("-"));
    if !json_to_stdout {
        output::print_report(
            &series,
            &config,
            &analysis,
            &fingerprint,
            synthetic,
            args.tail,
        );
    }

    if let Some(path) = &args.json_out {
        let report = JsonReport {
            symbol: series.symbol(),
            synthetic,
            config: &config,
            status: analysis.status(),
            fingerprint: &fingerprint,
            trades: trade_events(&analysis.signals),
            analysis: &analysis,
        };
        output::write_json(path, &report)?;
        if !json_to_stdout {
            println!("JSON written to: {}", path.display());
        }
    }

    if let Some(path) = &args.csv_out {
        output::write_csv(path, &analysis)?;
        if !json_to_stdout {
            println!("CSV written to: {}", path.display());
        }
    }

    Ok(())
}

/// Config file or profile defaults, then individual flag overrides.
fn build_config(args: &AnalyzeArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::for_profile(args.profile.unwrap_or_default()),
    };

    if let Some(v) = args.ema_short {
        config.indicators.ema_short = v;
    }
    if let Some(v) = args.ema_long {
        config.indicators.ema_long = v;
    }
    if let Some(v) = args.rsi_period {
        config.indicators.rsi_period = v;
    }
    if let Some(v) = args.profit_target {
        config.signals.profit_target = v;
    }
    if let Some(v) = args.stop_loss {
        config.signals.stop_loss = v;
    }
    if let Some(v) = args.rsi_overbought {
        config.signals.rsi_overbought = v;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn run_synthetic(sessions: usize, seed: u64, start: NaiveDate, output: PathBuf) -> Result<()> {
    let series: PriceSeries = synthetic_series(start, sessions, seed)?;
    output::write_series_csv(&output, &series)?;
    info!(sessions, seed, path = %output.display(), "wrote synthetic series");
    println!(
        "Wrote {} synthetic sessions to {}",
        series.len(),
        output.display()
    );
    Ok(())
}
