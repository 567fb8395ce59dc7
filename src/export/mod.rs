//! Export module for Stockroom
//!
//! Exports a single store in several formats:
//! - CSV: spreadsheet-compatible rows
//! - JSON: machine-readable, with schema version and metadata
//! - YAML: the JSON document in a human-readable form

pub mod csv;
pub mod json;
pub mod yaml;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::error::StockroomResult;
use crate::storage::Store;

pub use self::csv::export_store_csv;
pub use json::{export_store_json, ExportMetadata, StoreExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_store_yaml;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Yaml,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            other => Err(format!("Unknown export format '{}'. Use csv, json or yaml", other)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// Export a store in the given format
pub fn export_store<W: Write>(store: &Store, format: ExportFormat, writer: &mut W) -> StockroomResult<()> {
    match format {
        ExportFormat::Csv => export_store_csv(store, writer),
        ExportFormat::Json => export_store_json(store, writer),
        ExportFormat::Yaml => export_store_yaml(store, writer),
    }
}
