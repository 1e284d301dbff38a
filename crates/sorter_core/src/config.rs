//! Tournament tuning parameters and catalog providers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, SorterError};
use crate::types::Item;

/// Tuning parameters for round planning, selection and elimination.
///
/// Every field has a default, so a TOML file only needs to name the values
/// it changes:
///
/// ```toml
/// finalist_count = 20
/// survivor_floor = 5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SorterConfig {
    /// Appearances every item should reach during discovery
    pub min_discovery_appearances: u32,
    /// Share of the catalog expected to survive discovery, in percent
    pub survivor_percent: u32,
    /// Exposure budget for the elimination phase relative to its field, in percent
    pub elimination_exposure_percent: u32,
    /// Items that advance to the head-to-head phase
    pub finalist_count: usize,
    /// Appearances every finalist should reach during head-to-head
    pub finalist_min_appearances: u32,
    /// Phase lengths are rounded up to a multiple of this
    pub round_multiple: usize,
    /// Items scoring at or below this are cut at the end of discovery
    pub discovery_cut_score: u32,
    /// The discovery cut never leaves fewer survivors than this
    pub survivor_floor: usize,
    /// Win rates closer than this are treated as tied in head-to-head rankings
    pub win_rate_tolerance: f64,
}

impl Default for SorterConfig {
    fn default() -> Self {
        Self {
            min_discovery_appearances: 2,
            survivor_percent: 60,
            elimination_exposure_percent: 120,
            finalist_count: 15,
            finalist_min_appearances: 4,
            round_multiple: 5,
            discovery_cut_score: 0,
            survivor_floor: 3,
            win_rate_tolerance: 0.01,
        }
    }
}

impl SorterConfig {
    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Reject parameter combinations that cannot produce a sensible plan
    pub fn validate(&self) -> Result<()> {
        if self.min_discovery_appearances == 0 {
            return Err(SorterError::Config(
                "min_discovery_appearances must be at least 1".to_string(),
            ));
        }
        if self.survivor_percent == 0 || self.survivor_percent > 100 {
            return Err(SorterError::Config(format!(
                "survivor_percent must be within 1..=100, got {}",
                self.survivor_percent
            )));
        }
        if self.elimination_exposure_percent == 0 {
            return Err(SorterError::Config(
                "elimination_exposure_percent must be positive".to_string(),
            ));
        }
        if self.finalist_count == 0 {
            return Err(SorterError::Config(
                "finalist_count must be at least 1".to_string(),
            ));
        }
        if self.finalist_min_appearances == 0 {
            return Err(SorterError::Config(
                "finalist_min_appearances must be at least 1".to_string(),
            ));
        }
        if self.round_multiple == 0 {
            return Err(SorterError::Config(
                "round_multiple must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.win_rate_tolerance) {
            return Err(SorterError::Config(format!(
                "win_rate_tolerance must be within [0, 1), got {}",
                self.win_rate_tolerance
            )));
        }
        Ok(())
    }
}

/// Streaming provider whose track ids make an item playable.
///
/// Catalog loaders use this to drop items the active provider cannot embed
/// before they ever reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Deezer,
    Spotify,
}

impl Provider {
    /// Catalog field holding this provider's track id
    pub fn id_field(&self) -> &'static str {
        match self {
            Provider::Deezer => "deezerId",
            Provider::Spotify => "spotifyId",
        }
    }

    /// Whether the item carries a usable id for this provider
    pub fn is_available(&self, item: &Item) -> bool {
        match item.fields.get(self.id_field()) {
            Some(serde_json::Value::String(s)) => !s.trim().is_empty(),
            Some(serde_json::Value::Number(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Deezer => f.write_str("deezer"),
            Provider::Spotify => f.write_str("spotify"),
        }
    }
}

impl FromStr for Provider {
    type Err = SorterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "deezer" => Ok(Provider::Deezer),
            "spotify" => Ok(Provider::Spotify),
            _ => Err(SorterError::Config(format!("Unknown provider: {}", s))),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
