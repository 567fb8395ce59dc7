//! JSON export
//!
//! A store exported with schema versioning and summary metadata.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StockroomError, StockroomResult};
use crate::models::Record;
use crate::storage::Store;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// One store as exported
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    /// Version of the tool that wrote the export
    pub app_version: String,
    pub store: String,
    pub records: Vec<Record>,
    pub metadata: ExportMetadata,
}

/// Summary figures for quick inspection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub record_count: usize,
    pub total_quantity: u64,
    /// Lines skipped or flagged while loading, excluding blanks and comments
    pub problem_count: usize,
}

impl StoreExport {
    pub fn from_store(store: &Store) -> Self {
        let mut records = store.records().to_vec();
        records.sort_by(|a, b| a.description().cmp(b.description()));

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            store: store.name().to_string(),
            metadata: ExportMetadata {
                record_count: records.len(),
                total_quantity: store.total_quantity(),
                problem_count: store.problems().count(),
            },
            records,
        }
    }
}

/// Export a store as pretty-printed JSON
pub fn export_store_json<W: Write>(store: &Store, writer: &mut W) -> StockroomResult<()> {
    let export = StoreExport::from_store(store);
    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| StockroomError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| StockroomError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoreOptions;

    #[test]
    fn test_export_store_json() {
        let store = Store::with_records(
            "warehouse",
            "warehouse.txt",
            StoreOptions::default(),
            vec![
                Record::new("Tuerca", 5).unwrap(),
                Record::new("Arandela", 2).unwrap(),
            ],
        )
        .unwrap();

        let mut output = Vec::new();
        export_store_json(&store, &mut output).unwrap();

        let parsed: StoreExport = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(parsed.store, "warehouse");
        assert_eq!(parsed.records[0].description(), "Arandela");
        assert_eq!(parsed.metadata.total_quantity, 7);
    }
}
