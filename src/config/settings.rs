//! User settings
//!
//! Stored as `config.json` in the base directory. Every field has a serde
//! default so older files keep loading after new settings are added.

use serde::{Deserialize, Serialize};

use super::paths::PocketPaths;
use crate::error::PocketError;
use crate::models::UserId;
use crate::scan::DEFAULT_CONFIDENCE_THRESHOLD;

/// Receipt scanning preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Readings below this confidence are rejected
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// `[program, args...]` run to structure receipt text
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub structurer_command: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            structurer_command: Vec::new(),
        }
    }
}

/// User settings for pocket-ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Owner of every record created from this installation
    #[serde(default = "UserId::new")]
    pub user_id: UserId,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// strftime format used when printing dates
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub scan: ScanSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_confidence_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            user_id: UserId::new(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            scan: ScanSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist yet
    pub fn load_or_create(paths: &PocketPaths) -> Result<Self, PocketError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Caller decides when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| PocketError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| PocketError::Config(format!("Failed to parse settings file: {}", e)))
    }

    pub fn save(&self, paths: &PocketPaths) -> Result<(), PocketError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| PocketError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| PocketError::Io(format!("Failed to write settings file: {}", e)))
    }
}
