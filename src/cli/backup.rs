//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use clap::Subcommand;
use std::path::PathBuf;

use crate::backup::{BackupManager, RestoreManager};
use crate::error::{StockroomError, StockroomResult};
use crate::session::Session;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Snapshot every store and order file
    Create,

    /// List all available backups
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Restore from a backup
    Restore {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Delete old backups beyond the retention count
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(session: &Session, cmd: BackupCommands) -> StockroomResult<()> {
    let retention = session.settings().backup_retention.clone();
    let manager = BackupManager::new(session.storage(), retention.clone());

    match cmd {
        BackupCommands::Create => {
            let (backup_path, deleted) = manager.create_backup_with_retention(None)?;
            println!("Backup created: {}", file_name(&backup_path));
            println!("Location: {}", backup_path.display());
            if !deleted.is_empty() {
                println!("Pruned {} old backup(s).", deleted.len());
            }
        }

        BackupCommands::List { verbose } => {
            let backups = manager.list_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: stockroom backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            for (i, backup) in backups.iter().enumerate() {
                let age = chrono::Utc::now().signed_duration_since(backup.created_at);

                if verbose {
                    println!(
                        "{}. {}\n   Created: {}\n   Size: {}\n   Age: {}\n",
                        i + 1,
                        backup.filename,
                        backup.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                        format_size(backup.size_bytes),
                        format_duration(age),
                    );
                } else {
                    println!(
                        "  {}. {} ({} ago, {})",
                        i + 1,
                        backup.filename,
                        format_duration(age),
                        format_size(backup.size_bytes),
                    );
                }
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Restore { backup, force } => {
            let backup_path = resolve_backup_path(&manager, &backup)?;

            let restore_manager = RestoreManager::new(session.storage());
            let validation = restore_manager.validate_backup(&backup_path)?;

            println!("Backup Information");
            println!("==================");
            println!("File: {}", backup_path.display());
            println!(
                "Created: {}",
                validation.backup_date.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!("Contents: {}", validation.summary());
            println!();

            if !force {
                println!("WARNING: This will overwrite the current stores and orders!");
                println!("To proceed, run again with --force flag:");
                println!("  stockroom backup restore {} --force", backup);
                return Ok(());
            }

            let pre_restore = manager.create_backup(Some("restore"))?;
            println!("Pre-restore backup saved: {}", file_name(&pre_restore));

            let result = restore_manager.restore_from_file(&backup_path)?;
            println!("Restore complete!");
            println!("{}", result.summary());
        }

        BackupCommands::Prune { force } => {
            let backups = manager.list_backups()?;
            let to_delete = backups.len().saturating_sub(retention.keep as usize);

            if to_delete == 0 {
                println!("No backups to prune.");
                println!(
                    "Keeping up to {} backup(s); you have {}.",
                    retention.keep,
                    backups.len()
                );
                return Ok(());
            }

            println!("Prune Summary");
            println!("=============");
            println!("Retention: keep {}", retention.keep);
            println!("Current backups: {}", backups.len());
            println!("To be deleted: {}", to_delete);
            println!();

            if !force {
                println!("To delete old backups, run again with --force flag:");
                println!("  stockroom backup prune --force");
                return Ok(());
            }

            let deleted = manager.enforce_retention()?;
            println!("Deleted {} backup(s).", deleted.len());
        }
    }

    Ok(())
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Resolve a backup identifier to a full path
fn resolve_backup_path(manager: &BackupManager, backup: &str) -> StockroomResult<PathBuf> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .get_latest_backup()?
            .map(|b| b.path)
            .ok_or_else(|| StockroomError::Storage("No backups found".into()));
    }

    let path = PathBuf::from(backup);
    if path.exists() {
        return Ok(path);
    }

    for candidate in [backup.to_string(), format!("{}.json", backup)] {
        if let Some(info) = manager.get_backup(&candidate)? {
            return Ok(info.path);
        }
    }

    Err(StockroomError::Storage(format!("Backup not found: {}", backup)))
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds();

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
