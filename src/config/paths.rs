//! Path management for Stockroom
//!
//! Provides XDG-compliant path resolution for configuration, stores, and backups.
//!
//! ## Path Resolution Order
//!
//! 1. `STOCKROOM_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/stockroom` or `~/.config/stockroom`
//! 3. Windows: `%APPDATA%\stockroom`

use std::path::PathBuf;

use crate::error::StockroomError;

/// Manages all paths used by Stockroom
#[derive(Debug, Clone)]
pub struct StockroomPaths {
    /// Base directory for all Stockroom data
    base_dir: PathBuf,
}

impl StockroomPaths {
    /// Create a new StockroomPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, StockroomError> {
        let base_dir = if let Ok(custom) = std::env::var("STOCKROOM_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create StockroomPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/stockroom/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory holding store files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the directory holding pending order files
    pub fn orders_dir(&self) -> PathBuf {
        self.data_dir().join("orders")
    }

    /// Get the backup directory
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the order restrictions file
    pub fn restrictions_file(&self) -> PathBuf {
        self.base_dir.join("restrictions.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to the write-ahead journal for multi-file updates
    pub fn journal_file(&self) -> PathBuf {
        self.base_dir.join("pending-write.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), StockroomError> {
        for dir in [
            self.base_dir.clone(),
            self.data_dir(),
            self.orders_dir(),
            self.backup_dir(),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                StockroomError::Io(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    /// Check if Stockroom has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, StockroomError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME")
                .map_err(|_| StockroomError::Config("HOME environment variable not set".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("stockroom"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, StockroomError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| StockroomError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("stockroom"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StockroomPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.orders_dir(), temp_dir.path().join("data").join("orders"));
        assert_eq!(paths.backup_dir(), temp_dir.path().join("backups"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StockroomPaths::with_base_dir(temp_dir.path().to_path_buf());

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(paths.orders_dir().exists());
        assert!(paths.backup_dir().exists());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StockroomPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.journal_file(), temp_dir.path().join("pending-write.json"));
    }
}
