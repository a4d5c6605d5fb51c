//! Engine configuration: indicator periods, signal thresholds, alert thresholds.
//!
//! Every field has a default, and TOML files only need to name the values
//! they change. A top-level `profile` key selects the base the file is
//! layered on:
//!
//! ```toml
//! profile = "extended"
//!
//! [signals]
//! profit_target = 0.08
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be >= {min}, got {value}")]
    PeriodTooShort {
        name: &'static str,
        value: usize,
        min: usize,
    },

    #[error("EMA short period ({short}) must be less than EMA long period ({long})")]
    EmaOrder { short: usize, long: usize },

    #[error("MACD fast period ({fast}) must be less than MACD slow period ({slow})")]
    MacdOrder { fast: usize, slow: usize },

    #[error("{name} must be a finite fraction in {range}, got {value}")]
    InvalidFraction {
        name: &'static str,
        range: &'static str,
        value: f64,
    },

    #[error("{name} must be within [0, 100], got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("bollinger multiplier must be finite and >= 0, got {0}")]
    InvalidMultiplier(f64),

    #[error("RSI oversold threshold ({oversold}) must be below overbought threshold ({overbought})")]
    ThresholdOrder { oversold: f64, overbought: f64 },

    #[error("unknown profile '{0}' (expected 'classic' or 'extended')")]
    UnknownProfile(String),

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Named parameter presets.
///
/// - `Classic`: EMA 9/21, RSI 14, Bollinger 20/2; MACD, stochastic and volume MA off.
/// - `Extended`: EMA 12/26 plus MACD 12/26/9, stochastic 14/3 and volume MA 20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    #[default]
    Classic,
    Extended,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Classic => f.write_str("classic"),
            Profile::Extended => f.write_str("extended"),
        }
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Profile::Classic),
            "extended" => Ok(Profile::Extended),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdConfig {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StochasticConfig {
    pub period: usize,
    /// %D smoothing window over %K.
    pub smoothing: usize,
}

impl Default for StochasticConfig {
    fn default() -> Self {
        Self {
            period: 14,
            smoothing: 3,
        }
    }
}

/// Indicator periods. `None` disables an optional indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub ema_short: usize,
    pub ema_long: usize,
    pub rsi_period: usize,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_ma: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stochastic: Option<StochasticConfig>,
}

impl IndicatorConfig {
    pub fn classic() -> Self {
        Self {
            ema_short: 9,
            ema_long: 21,
            rsi_period: 14,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
            volume_ma: None,
            macd: None,
            stochastic: None,
        }
    }

    pub fn extended() -> Self {
        Self {
            ema_short: 12,
            ema_long: 26,
            volume_ma: Some(20),
            macd: Some(MacdConfig::default()),
            stochastic: Some(StochasticConfig::default()),
            ..Self::classic()
        }
    }

    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Classic => Self::classic(),
            Profile::Extended => Self::extended(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        min_period("ema_short", self.ema_short, 1)?;
        if self.ema_long <= self.ema_short {
            return Err(ConfigError::EmaOrder {
                short: self.ema_short,
                long: self.ema_long,
            });
        }
        min_period("rsi_period", self.rsi_period, 1)?;
        min_period("bollinger_period", self.bollinger_period, 2)?;
        if !self.bollinger_multiplier.is_finite() || self.bollinger_multiplier < 0.0 {
            return Err(ConfigError::InvalidMultiplier(self.bollinger_multiplier));
        }

        if let Some(macd) = &self.macd {
            min_period("macd.fast", macd.fast, 1)?;
            if macd.slow <= macd.fast {
                return Err(ConfigError::MacdOrder {
                    fast: macd.fast,
                    slow: macd.slow,
                });
            }
            min_period("macd.signal", macd.signal, 1)?;
        }
        if let Some(stoch) = &self.stochastic {
            min_period("stochastic.period", stoch.period, 1)?;
            min_period("stochastic.smoothing", stoch.smoothing, 1)?;
        }
        if let Some(period) = self.volume_ma {
            min_period("volume_ma", period, 1)?;
        }
        Ok(())
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self::classic()
    }
}

/// Entry/exit thresholds for the single-position generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Take-profit as a fraction of entry price (0.05 = +5%).
    pub profit_target: f64,
    /// Stop-loss as a fraction of entry price (0.02 = -2%).
    pub stop_loss: f64,
    pub rsi_overbought: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            profit_target: 0.05,
            stop_loss: 0.02,
            rsi_overbought: 70.0,
        }
    }
}

impl SignalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.profit_target.is_finite() || self.profit_target <= 0.0 {
            return Err(ConfigError::InvalidFraction {
                name: "profit_target",
                range: "(0, inf)",
                value: self.profit_target,
            });
        }
        if !self.stop_loss.is_finite() || self.stop_loss <= 0.0 || self.stop_loss >= 1.0 {
            return Err(ConfigError::InvalidFraction {
                name: "stop_loss",
                range: "(0, 1)",
                value: self.stop_loss,
            });
        }
        threshold("rsi_overbought", self.rsi_overbought)
    }
}

/// Thresholds for the latest-bar alert summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
        }
    }
}

impl AlertConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        threshold("alerts.rsi_overbought", self.rsi_overbought)?;
        threshold("alerts.rsi_oversold", self.rsi_oversold)?;
        if self.rsi_oversold >= self.rsi_overbought {
            return Err(ConfigError::ThresholdOrder {
                oversold: self.rsi_oversold,
                overbought: self.rsi_overbought,
            });
        }
        Ok(())
    }
}

/// Complete configuration for one engine run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub profile: Profile,
    pub indicators: IndicatorConfig,
    pub signals: SignalConfig,
    pub alerts: AlertConfig,
}

impl EngineConfig {
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            profile,
            indicators: IndicatorConfig::for_profile(profile),
            signals: SignalConfig::default(),
            alerts: AlertConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.indicators.validate()?;
        self.signals.validate()?;
        self.alerts.validate()
    }

    /// Parse a TOML document, layering it over the defaults of its `profile`.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: toml::Table = toml::from_str(s)?;
        let profile = match file.get("profile") {
            Some(value) => value.clone().try_into::<Profile>()?,
            None => Profile::default(),
        };

        let mut merged = toml::Value::try_from(Self::for_profile(profile))?;
        merge_toml(&mut merged, toml::Value::Table(file));
        let config: Self = merged.try_into()?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Recursively overlay `overlay` onto `base`: tables merge key by key,
/// everything else replaces.
fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn min_period(name: &'static str, value: usize, min: usize) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::PeriodTooShort { name, value, min });
    }
    Ok(())
}

fn threshold(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(ConfigError::InvalidThreshold { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_classic_and_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.profile, Profile::Classic);
        assert_eq!(config.indicators.ema_short, 9);
        assert_eq!(config.indicators.ema_long, 21);
        assert_eq!(config.indicators.rsi_period, 14);
        assert_eq!(config.indicators.bollinger_period, 20);
        assert_eq!(config.indicators.bollinger_multiplier, 2.0);
        assert!(config.indicators.macd.is_none());
        assert_eq!(config.signals.profit_target, 0.05);
        assert_eq!(config.signals.stop_loss, 0.02);
        assert_eq!(config.signals.rsi_overbought, 70.0);
        config.validate().unwrap();
    }

    #[test]
    fn extended_profile_enables_optional_indicators() {
        let config = EngineConfig::for_profile(Profile::Extended);
        assert_eq!(config.indicators.ema_short, 12);
        assert_eq!(config.indicators.ema_long, 26);
        assert_eq!(config.indicators.macd, Some(MacdConfig::default()));
        assert_eq!(config.indicators.stochastic, Some(StochasticConfig::default()));
        assert_eq!(config.indicators.volume_ma, Some(20));
        config.validate().unwrap();
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config = EngineConfig::from_toml_str(
            r#"
            [signals]
            profit_target = 0.08

            [indicators]
            rsi_period = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.signals.profit_target, 0.08);
        assert_eq!(config.signals.stop_loss, 0.02);
        assert_eq!(config.indicators.rsi_period, 10);
        assert_eq!(config.indicators.ema_short, 9);
    }

    #[test]
    fn toml_profile_sets_the_base() {
        let config = EngineConfig::from_toml_str(
            r#"
            profile = "extended"

            [indicators.macd]
            signal = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.profile, Profile::Extended);
        assert_eq!(config.indicators.ema_short, 12);
        let macd = config.indicators.macd.unwrap();
        assert_eq!((macd.fast, macd.slow, macd.signal), (12, 26, 5));
        assert_eq!(config.indicators.volume_ma, Some(20));
    }

    #[test]
    fn classic_profile_can_enable_macd() {
        let config = EngineConfig::from_toml_str("[indicators.macd]\nfast = 8\n").unwrap();
        let macd = config.indicators.macd.unwrap();
        assert_eq!((macd.fast, macd.slow, macd.signal), (8, 26, 9));
    }

    #[test]
    fn toml_roundtrip() {
        let config = EngineConfig::for_profile(Profile::Extended);
        let text = config.to_toml_string().unwrap();
        let back = EngineConfig::from_toml_str(&text).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = EngineConfig::from_toml_str("[signals\nprofit_target = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_inverted_ema_periods() {
        let err = EngineConfig::from_toml_str("[indicators]\nema_short = 30\n").unwrap_err();
        assert!(matches!(err, ConfigError::EmaOrder { short: 30, long: 21 }));
    }

    #[test]
    fn rejects_bad_fractions_and_thresholds() {
        let mut config = SignalConfig::default();
        config.stop_loss = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFraction { name: "stop_loss", .. })
        ));

        let mut config = SignalConfig::default();
        config.profit_target = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = SignalConfig::default();
        config.rsi_overbought = 120.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn rejects_short_bollinger_period() {
        let mut config = IndicatorConfig::classic();
        config.bollinger_period = 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PeriodTooShort { name: "bollinger_period", min: 2, .. })
        ));
    }

    #[test]
    fn rejects_inverted_alert_thresholds() {
        let config = AlertConfig {
            rsi_overbought: 30.0,
            rsi_oversold: 70.0,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdOrder { .. })
        ));
    }

    #[test]
    fn profile_from_str() {
        assert_eq!("Extended".parse::<Profile>().unwrap(), Profile::Extended);
        assert_eq!(Profile::Classic.to_string(), "classic");
        assert!(matches!(
            "turbo".parse::<Profile>(),
            Err(ConfigError::UnknownProfile(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, "[signals]\nstop_loss = 0.03\n").unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.signals.stop_loss, 0.03);

        let missing = EngineConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
