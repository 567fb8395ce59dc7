//! YAML export
//!
//! Same document as the JSON export, for reading by hand.

use std::io::Write;

use crate::error::{StockroomError, StockroomResult};
use crate::export::json::StoreExport;
use crate::storage::Store;

/// Export a store as YAML with a short header comment
pub fn export_store_yaml<W: Write>(store: &Store, writer: &mut W) -> StockroomResult<()> {
    let export = StoreExport::from_store(store);

    writeln!(writer, "# Stockroom export of '{}'", export.store)
        .map_err(|e| StockroomError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| StockroomError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| StockroomError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| StockroomError::Export(e.to_string()))?;
    Ok(())
}
