//! Backup manager for Stockroom
//!
//! Snapshots every configured store and every order file into a single
//! timestamped JSON archive, and keeps only the most recent ones.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::settings::BackupRetention;
use crate::error::{StockroomError, StockroomResult};
use crate::storage::store::read_text;
use crate::storage::Storage;

/// Current archive layout version
pub const ARCHIVE_SCHEMA_VERSION: u32 = 1;

/// Metadata about a backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Which kind of file an archived entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    Store,
    Order,
}

/// One archived file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedFile {
    pub role: FileRole,
    /// Store name or order id
    pub name: String,
    /// Where the file lived when archived
    pub path: PathBuf,
    /// Decoded text; empty when the file did not exist
    pub contents: String,
}

/// Backup archive format
#[derive(Debug, Serialize, Deserialize)]
pub struct BackupArchive {
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    /// Why the backup was taken, e.g. the operation that triggered it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub files: Vec<ArchivedFile>,
}

impl BackupArchive {
    pub fn stores(&self) -> impl Iterator<Item = &ArchivedFile> {
        self.files.iter().filter(|f| f.role == FileRole::Store)
    }

    pub fn orders(&self) -> impl Iterator<Item = &ArchivedFile> {
        self.files.iter().filter(|f| f.role == FileRole::Order)
    }
}

/// Manages backup creation and retention
pub struct BackupManager<'a> {
    storage: &'a Storage,
    backup_dir: PathBuf,
    retention: BackupRetention,
}

impl<'a> BackupManager<'a> {
    pub fn new(storage: &'a Storage, retention: BackupRetention) -> Self {
        Self {
            backup_dir: storage.paths().backup_dir(),
            storage,
            retention,
        }
    }

    /// Snapshot all stores and order files
    ///
    /// Returns the path to the created backup file.
    pub fn create_backup(&self, reason: Option<&str>) -> StockroomResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            StockroomError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        let now = Utc::now();
        let filename = format!(
            "backup-{}-{:03}.json",
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let backup_path = self.backup_dir.join(&filename);

        let archive = self.create_archive(now, reason)?;
        let json = serde_json::to_string_pretty(&archive)
            .map_err(|e| StockroomError::Json(format!("Failed to serialize backup: {}", e)))?;

        fs::write(&backup_path, json)
            .map_err(|e| StockroomError::Io(format!("Failed to write backup file: {}", e)))?;

        info!(path = %backup_path.display(), files = archive.files.len(), "created backup");
        Ok(backup_path)
    }

    fn create_archive(
        &self,
        timestamp: DateTime<Utc>,
        reason: Option<&str>,
    ) -> StockroomResult<BackupArchive> {
        let encoding = self.storage.options().encoding;
        let mut files = Vec::new();

        for name in self.storage.store_names() {
            let path = self.storage.store_path(name)?;
            files.push(ArchivedFile {
                role: FileRole::Store,
                name: name.clone(),
                contents: read_text(&path, encoding)?,
                path,
            });
        }
        for order in self.storage.order_names()? {
            let path = self.storage.order_path(&order);
            files.push(ArchivedFile {
                role: FileRole::Order,
                contents: read_text(&path, encoding)?,
                name: order,
                path,
            });
        }

        Ok(BackupArchive {
            schema_version: ARCHIVE_SCHEMA_VERSION,
            created_at: timestamp,
            reason: reason.map(str::to_string),
            files,
        })
    }

    /// List all available backups, newest first
    pub fn list_backups(&self) -> StockroomResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.backup_dir)
            .map_err(|e| StockroomError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| StockroomError::Io(format!("Failed to read directory entry: {}", e)))?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(info) = parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }

    /// Delete all but the newest `keep` backups
    pub fn enforce_retention(&self) -> StockroomResult<Vec<PathBuf>> {
        let mut deleted = Vec::new();

        for backup in self
            .list_backups()?
            .into_iter()
            .skip(self.retention.keep as usize)
        {
            fs::remove_file(&backup.path)
                .map_err(|e| StockroomError::Io(format!("Failed to delete old backup: {}", e)))?;
            deleted.push(backup.path);
        }

        if !deleted.is_empty() {
            debug!(deleted = deleted.len(), "pruned backups");
        }
        Ok(deleted)
    }

    /// Create a backup and then enforce retention
    pub fn create_backup_with_retention(
        &self,
        reason: Option<&str>,
    ) -> StockroomResult<(PathBuf, Vec<PathBuf>)> {
        let backup_path = self.create_backup(reason)?;
        let deleted = self.enforce_retention()?;
        Ok((backup_path, deleted))
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Find a backup by filename
    pub fn get_backup(&self, filename: &str) -> StockroomResult<Option<BackupInfo>> {
        let path = self.backup_dir.join(filename);
        if path.exists() {
            Ok(parse_backup_info(&path))
        } else {
            Ok(None)
        }
    }

    pub fn get_latest_backup(&self) -> StockroomResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let date_part = filename.strip_prefix("backup-")?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(date_part)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
    })
}

/// Parse `YYYYMMDD-HHMMSS` or `YYYYMMDD-HHMMSS-mmm`
fn parse_backup_timestamp(date_str: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let date_part = parts[0];
    let time_part = parts[1];
    let millis: u32 = match parts.get(2) {
        Some(ms) => ms.parse().ok()?,
        None => 0,
    };

    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let year: i32 = date_part.get(0..4)?.parse().ok()?;
    let month: u32 = date_part.get(4..6)?.parse().ok()?;
    let day: u32 = date_part.get(6..8)?.parse().ok()?;
    let hour: u32 = time_part.get(0..2)?.parse().ok()?;
    let minute: u32 = time_part.get(2..4)?.parse().ok()?;
    let second: u32 = time_part.get(4..6)?.parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = chrono::NaiveTime::from_hms_milli_opt(hour, minute, second, millis)?;
    Some(DateTime::from_naive_utc_and_offset(
        chrono::NaiveDateTime::new(date, time),
        Utc,
    ))
}
