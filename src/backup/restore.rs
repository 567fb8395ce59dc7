//! Backup restoration for Stockroom
//!
//! Writes every archived file back through the storage journal, so a restore
//! is either completed or left replayable by `recover`.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::audit::{AuditEntry, Operation};
use crate::error::{StockroomError, StockroomResult};
use crate::storage::{PendingWrite, Storage};

use super::manager::{BackupArchive, FileRole, ARCHIVE_SCHEMA_VERSION};

/// Handles restoring from backups
pub struct RestoreManager<'a> {
    storage: &'a Storage,
}

impl<'a> RestoreManager<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn read_archive(&self, backup_path: &Path) -> StockroomResult<BackupArchive> {
        let contents = fs::read_to_string(backup_path)
            .map_err(|e| StockroomError::Io(format!("Failed to read backup file: {}", e)))?;

        let archive: BackupArchive = serde_json::from_str(&contents)
            .map_err(|e| StockroomError::Json(format!("Failed to parse backup file: {}", e)))?;

        if archive.schema_version > ARCHIVE_SCHEMA_VERSION {
            return Err(StockroomError::Storage(format!(
                "Backup schema version {} is newer than supported version {}",
                archive.schema_version, ARCHIVE_SCHEMA_VERSION
            )));
        }
        Ok(archive)
    }

    /// Restore every file in a backup, overwriting current contents
    ///
    /// Order files created after the backup was taken are left alone.
    pub fn restore_from_file(&self, backup_path: &Path) -> StockroomResult<RestoreResult> {
        let archive = self.read_archive(backup_path)?;
        self.restore_from_archive(&archive)
    }

    /// Restore from a parsed archive
    pub fn restore_from_archive(&self, archive: &BackupArchive) -> StockroomResult<RestoreResult> {
        let encoding = self.storage.options().encoding;
        let mut writes = Vec::new();
        let mut result = RestoreResult {
            backup_date: archive.created_at,
            ..RestoreResult::default()
        };

        for file in &archive.files {
            let path = match file.role {
                FileRole::Store => self
                    .storage
                    .store_path(&file.name)
                    .unwrap_or_else(|_| file.path.clone()),
                FileRole::Order => self.storage.order_path(&file.name),
            };
            let write = PendingWrite {
                path,
                encoding,
                contents: file.contents.clone(),
            };
            write.validate()?;
            writes.push(write);

            match file.role {
                FileRole::Store => result.stores.push(file.name.clone()),
                FileRole::Order => result.orders.push(file.name.clone()),
            }
        }

        self.storage.write_all("restore", writes)?;

        info!(
            stores = result.stores.len(),
            orders = result.orders.len(),
            "restored backup"
        );
        self.storage.log_audit(&AuditEntry::new(
            Operation::Restore,
            result.stores.iter().chain(result.orders.iter()).map(String::as_str),
            result.summary(),
        ));

        Ok(result)
    }

    /// Check a backup file without restoring it
    pub fn validate_backup(&self, backup_path: &Path) -> StockroomResult<ValidationResult> {
        let archive = self.read_archive(backup_path)?;

        Ok(ValidationResult {
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            reason: archive.reason.clone(),
            store_count: archive.stores().count(),
            order_count: archive.orders().count(),
        })
    }
}

/// Result of a restore operation
#[derive(Debug, Default)]
pub struct RestoreResult {
    pub backup_date: DateTime<Utc>,
    pub stores: Vec<String>,
    pub orders: Vec<String>,
}

impl RestoreResult {
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.stores.is_empty() {
            parts.push(format!("stores: {}", self.stores.join(", ")));
        }
        if !self.orders.is_empty() {
            parts.push(format!("orders: {}", self.orders.join(", ")));
        }
        if parts.is_empty() {
            "Nothing to restore".to_string()
        } else {
            format!("Restored {}", parts.join("; "))
        }
    }
}

/// Result of validating a backup
#[derive(Debug)]
pub struct ValidationResult {
    pub schema_version: u32,
    pub backup_date: DateTime<Utc>,
    pub reason: Option<String>,
    pub store_count: usize,
    pub order_count: usize,
}

impl ValidationResult {
    pub fn summary(&self) -> String {
        format!(
            "{} store(s), {} order file(s){}",
            self.store_count,
            self.order_count,
            self.reason
                .as_ref()
                .map(|r| format!(", taken before {}", r))
                .unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::BackupManager;
    use crate::config::{paths::StockroomPaths, settings::Settings};
    use tempfile::TempDir;

    fn create_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = StockroomPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths, &Settings::default()).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_backup_and_restore() {
        let (_temp, storage) = create_storage();
        let warehouse = storage.store_path("warehouse").unwrap();
        fs::write(&warehouse, "    Tornillo 3\n").unwrap();
        fs::write(storage.order_path("import"), "    Cable 1 ok\n").unwrap();

        let settings = Settings::default();
        let backup_path = BackupManager::new(&storage, settings.backup_retention.clone())
            .create_backup(None)
            .unwrap();

        fs::write(&warehouse, "    Tornillo 0\n    Basura 9\n").unwrap();
        fs::write(storage.order_path("import"), "").unwrap();

        let result = RestoreManager::new(&storage)
            .restore_from_file(&backup_path)
            .unwrap();

        assert_eq!(fs::read_to_string(&warehouse).unwrap(), "    Tornillo 3\n");
        assert_eq!(
            fs::read_to_string(storage.order_path("import")).unwrap(),
            "    Cable 1 ok\n"
        );
        assert_eq!(result.orders, vec!["import".to_string()]);
        assert!(result.summary().contains("warehouse"));
        assert!(storage.pending_write().unwrap().is_none());
        assert_eq!(
            storage.audit().read_all().unwrap()[0].operation,
            Operation::Restore
        );
    }

    #[test]
    fn test_validate_backup() {
        let (_temp, storage) = create_storage();
        let backup_path = BackupManager::new(&storage, Default::default())
            .create_backup(Some("rename"))
            .unwrap();

        let validation = RestoreManager::new(&storage)
            .validate_backup(&backup_path)
            .unwrap();
        assert_eq!(validation.store_count, 2);
        assert_eq!(validation.order_count, 0);
        assert!(validation.summary().contains("rename"));
    }

    #[test]
    fn test_invalid_backup_file() {
        let (temp, storage) = create_storage();
        let bogus = temp.path().join("backups").join("backup-20250101-000000.json");
        fs::write(&bogus, "not json").unwrap();

        assert!(RestoreManager::new(&storage).validate_backup(&bogus).is_err());
    }
}
