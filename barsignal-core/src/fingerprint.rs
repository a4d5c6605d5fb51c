//! Run fingerprinting: deterministic identification of an analysis run.
//!
//! - `config_hash`: the effective configuration.
//! - `dataset_hash`: the input series (symbol and every bar).
//! - `output_hash`: frame, signals and alert summary.
//!
//! Each is BLAKE3 over canonical `serde_json`. Struct fields serialize in
//! declaration order, so identical inputs always hash identically.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::domain::PriceSeries;
use crate::engine::Analysis;

/// Hex-encoded BLAKE3 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
    pub fn of<T: Serialize>(value: &T) -> Self {
        let json = serde_json::to_vec(value).expect("fingerprinted value must serialize");
        Self(blake3::hash(&json).to_hex().to_string())
    }

    /// First 12 hex characters, for display.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFingerprint {
    pub config_hash: ContentHash,
    pub dataset_hash: ContentHash,
    pub output_hash: ContentHash,
}

impl RunFingerprint {
    pub fn new(config: &EngineConfig, series: &PriceSeries, analysis: &Analysis) -> Self {
        Self {
            config_hash: ContentHash::of(config),
            dataset_hash: ContentHash::of(series),
            output_hash: ContentHash::of(analysis),
        }
    }

    /// Single digest over the three component hashes.
    pub fn run_hash(&self) -> ContentHash {
        ContentHash::of(self)
    }
}
