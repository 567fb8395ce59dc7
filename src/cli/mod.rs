//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod export;
pub mod inventory;
pub mod order;
pub mod reconcile;
pub mod sync;

pub use backup::{handle_backup_command, BackupCommands};
pub use export::handle_export_command;
pub use inventory::{
    handle_adjust_command, handle_check_command, handle_search_command, handle_show_command,
    handle_transfer_command,
};
pub use order::{handle_order_command, OrderCommands};
pub use reconcile::{handle_duplicates_command, handle_match_command};
pub use sync::{handle_normalize_command, handle_rename_command, handle_strict_sync_command};
