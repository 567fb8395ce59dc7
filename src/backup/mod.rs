//! Backup system for Stockroom
//!
//! - `BackupManager`: snapshots every store and order file into one JSON
//!   archive and prunes old archives down to the configured count.
//! - `RestoreManager`: validates archives and writes their files back.
//!
//! A backup is taken automatically before destructive operations (strict
//! sync, rename) unless `backup_retention.before_destructive` is off.

mod manager;
mod restore;

pub use manager::{ArchivedFile, BackupArchive, BackupInfo, BackupManager, FileRole};
pub use restore::{RestoreManager, RestoreResult, ValidationResult};
