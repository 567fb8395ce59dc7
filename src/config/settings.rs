//! User settings for Stockroom
//!
//! Manages preferences: file encoding and dialect, the named stores, default
//! search mode, fuzzy-match threshold and backup retention.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::paths::StockroomPaths;
use crate::error::StockroomError;
use crate::models::MatchMode;
use crate::storage::codec::Dialect;
use crate::storage::encoding::TextEncoding;
use crate::storage::file_io::{read_json, write_json_atomic};

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of backups to keep
    pub keep: u32,
    /// Take a backup before destructive operations
    #[serde(default = "default_true")]
    pub before_destructive: bool,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self {
            keep: 20,
            before_destructive: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// User settings for Stockroom
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version of the settings file
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Encoding used for every store and order file
    #[serde(default)]
    pub encoding: TextEncoding,

    /// Grammar applied when reading stores
    #[serde(default)]
    pub dialect: Dialect,

    /// Mode used by `search` when none is given
    #[serde(default)]
    pub default_match_mode: MatchMode,

    /// Minimum similarity percentage reported by fuzzy matching
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Backup retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,

    /// Named stores, mapped to file names inside the data directory
    #[serde(default = "default_stores")]
    pub stores: BTreeMap<String, String>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_similarity_threshold() -> f64 {
    75.0
}

fn default_stores() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("warehouse".to_string(), "warehouse.txt".to_string()),
        ("storefront".to_string(), "storefront.txt".to_string()),
    ])
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            encoding: TextEncoding::default(),
            dialect: Dialect::default(),
            default_match_mode: MatchMode::default(),
            similarity_threshold: default_similarity_threshold(),
            backup_retention: BackupRetention::default(),
            stores: default_stores(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or default settings if the file doesn't exist
    pub fn load_or_create(paths: &StockroomPaths) -> Result<Self, StockroomError> {
        let settings: Settings = if paths.settings_file().exists() {
            read_json(paths.settings_file()).map_err(|e| {
                StockroomError::Config(format!("Failed to parse settings file: {}", e))
            })?
        } else {
            // Don't save yet - let caller decide when to persist
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &StockroomPaths) -> Result<(), StockroomError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), StockroomError> {
        if !(0.0..=100.0).contains(&self.similarity_threshold) {
            return Err(StockroomError::Config(format!(
                "similarity_threshold must be between 0 and 100, got {}",
                self.similarity_threshold
            )));
        }
        if let Some((name, _)) = self.stores.iter().find(|(_, file)| file.trim().is_empty()) {
            return Err(StockroomError::Config(format!(
                "store '{}' has an empty file name",
                name
            )));
        }
        Ok(())
    }
}
