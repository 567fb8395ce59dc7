//! Storage layer for Stockroom
//!
//! Plain-text store files with atomic writes, a line codec, consolidation,
//! order files, and a write-ahead journal for updates spanning several files.

pub mod codec;
pub mod consolidate;
pub mod encoding;
pub mod file_io;
pub mod journal;
pub mod order_file;
pub mod store;

pub use codec::{Diagnostic, DiagnosticKind, Dialect, Parsed, SkipReason};
pub use consolidate::consolidate;
pub use encoding::TextEncoding;
pub use journal::{Journal, WriteIntent};
pub use order_file::{parse_order, OrderEntry, OrderFile, OrderLine};
pub use store::{PendingWrite, Store, StoreOptions};

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::StockroomPaths;
use crate::config::restrictions::order_id;
use crate::config::settings::Settings;
use crate::error::{StockroomError, StockroomResult};

/// Main storage coordinator: resolves store names to files and writes them
pub struct Storage {
    paths: StockroomPaths,
    options: StoreOptions,
    stores: BTreeMap<String, String>,
    journal: Journal,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: StockroomPaths, settings: &Settings) -> StockroomResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            options: StoreOptions {
                encoding: settings.encoding,
                dialect: settings.dialect,
            },
            stores: settings.stores.clone(),
            journal: Journal::new(paths.journal_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &StockroomPaths {
        &self.paths
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Names of the configured stores
    pub fn store_names(&self) -> impl Iterator<Item = &String> {
        self.stores.keys()
    }

    /// Resolve a store name, or a path to a store file
    ///
    /// Configured names map into the data directory. Anything containing a
    /// path separator or ending in `.txt` is taken as a path.
    pub fn store_path(&self, name: &str) -> StockroomResult<PathBuf> {
        if let Some(file) = self.stores.get(name) {
            return Ok(self.paths.data_dir().join(file));
        }
        if name.contains(std::path::MAIN_SEPARATOR) || name.contains('/') || name.ends_with(".txt")
        {
            return Ok(PathBuf::from(name));
        }
        Err(StockroomError::Config(format!(
            "Unknown store '{}'. Known stores: {}",
            name,
            self.stores.keys().cloned().collect::<Vec<_>>().join(", ")
        )))
    }

    /// Load a store fresh from disk
    pub fn open(&self, name: &str) -> StockroomResult<Store> {
        Store::load(name, self.store_path(name)?, self.options)
    }

    /// Path of a pending order file
    pub fn order_path(&self, order: &str) -> PathBuf {
        self.paths.orders_dir().join(format!("{}.txt", order_id(order)))
    }

    /// Load an order file fresh from disk
    pub fn open_order(&self, order: &str) -> StockroomResult<OrderFile> {
        OrderFile::load(order_id(order), self.order_path(order), self.options)
    }

    /// Names of the order files present on disk
    pub fn order_names(&self) -> StockroomResult<Vec<String>> {
        let dir = self.paths.orders_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)
            .map_err(|e| StockroomError::Io(format!("Failed to read {}: {}", dir.display(), e)))?
        {
            let path = entry
                .map_err(|e| StockroomError::Io(format!("Failed to read directory entry: {}", e)))?
                .path();
            if path.extension().is_some_and(|ext| ext == "txt") {
                if let Some(stem) = path.file_stem() {
                    names.push(stem.to_string_lossy().to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Every store and order file managed here, existing or not
    pub fn managed_files(&self) -> StockroomResult<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = self
            .stores
            .values()
            .map(|file| self.paths.data_dir().join(file))
            .collect();
        for order in self.order_names()? {
            files.push(self.order_path(&order));
        }
        Ok(files)
    }

    /// Write several files as one journaled update
    pub fn write_all(&self, operation: &str, writes: Vec<PendingWrite>) -> StockroomResult<()> {
        self.journal.write_all(operation, writes)
    }

    /// The unfinished multi-file update, if any
    pub fn pending_write(&self) -> StockroomResult<Option<WriteIntent>> {
        self.journal.pending()
    }

    /// Replay an unfinished multi-file update
    pub fn recover(&self) -> StockroomResult<Option<WriteIntent>> {
        self.journal.recover()
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Record an operation in the audit log
    ///
    /// The files are already written by the time this runs, so a logging
    /// failure is reported but does not fail the operation.
    pub fn log_audit(&self, entry: &AuditEntry) {
        if let Err(e) = self.audit.log(entry) {
            warn!(operation = %entry.operation, "failed to write audit entry: {}", e);
        }
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
