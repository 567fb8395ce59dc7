//! Custom error types for Stockroom
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Per-line parse problems are not errors; the
//! codec reports them as diagnostics (see `storage::codec`).

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for Stockroom operations
#[derive(Error, Debug)]
pub enum StockroomError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// A record or argument failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Item not present in a store
    #[error("Item not found in {store}: {item}")]
    ItemNotFound { store: String, item: String },

    /// Not enough stock to remove or move the requested quantity
    #[error("Insufficient stock for '{item}' in {store}: need {needed}, have {available}")]
    InsufficientStock {
        store: String,
        item: String,
        needed: u64,
        available: u64,
    },

    /// Rename target already exists
    #[error("Cannot rename to '{item}': already exists in {store}")]
    DuplicateKeyOnRename { store: String, item: String },

    /// Item blocked by a restriction on the order file
    #[error("'{item}' cannot be added to order '{order}': contains restricted keyword '{keyword}'")]
    RestrictedKeyword {
        order: String,
        keyword: String,
        item: String,
    },

    /// Bytes on disk are not valid in the configured encoding
    #[error("Cannot decode {path} as {encoding}: {reason}")]
    Decode {
        path: PathBuf,
        encoding: &'static str,
        reason: String,
    },

    /// Text contains characters the configured encoding cannot represent
    #[error("Cannot encode {path} as {encoding}: {reason}")]
    Encode {
        path: PathBuf,
        encoding: &'static str,
        reason: String,
    },

    /// A multi-file update stopped after some files were already written
    #[error(
        "Partial write: {} file(s) saved but {failed} was not ({reason}); run 'stockroom recover'",
        .written.len()
    )]
    PartialWrite {
        written: Vec<PathBuf>,
        failed: PathBuf,
        reason: String,
    },

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl StockroomError {
    /// Create an "item not found" error
    pub fn item_not_found(store: impl Into<String>, item: impl Into<String>) -> Self {
        Self::ItemNotFound {
            store: store.into(),
            item: item.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ItemNotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error left one file of a pair updated
    pub fn is_partial_write(&self) -> bool {
        matches!(self, Self::PartialWrite { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for StockroomError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StockroomError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Stockroom operations
pub type StockroomResult<T> = Result<T, StockroomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StockroomError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = StockroomError::item_not_found("warehouse", "Tornillo");
        assert_eq!(err.to_string(), "Item not found in warehouse: Tornillo");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_insufficient_stock_error() {
        let err = StockroomError::InsufficientStock {
            store: "warehouse".into(),
            item: "Tornillo".into(),
            needed: 50,
            available: 30,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for 'Tornillo' in warehouse: need 50, have 30"
        );
    }

    #[test]
    fn test_restricted_keyword_error() {
        let err = StockroomError::RestrictedKeyword {
            order: "wholesale".into(),
            keyword: "original".into(),
            item: "Cargador Original".into(),
        };
        assert!(err.to_string().contains("restricted keyword 'original'"));
    }

    #[test]
    fn test_partial_write_error() {
        let err = StockroomError::PartialWrite {
            written: vec![PathBuf::from("warehouse.txt")],
            failed: PathBuf::from("storefront.txt"),
            reason: "disk full".into(),
        };
        assert!(err.is_partial_write());
        assert_eq!(
            err.to_string(),
            "Partial write: 1 file(s) saved but storefront.txt was not (disk full); run 'stockroom recover'"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StockroomError = io_err.into();
        assert!(matches!(err, StockroomError::Io(_)));
    }
}
