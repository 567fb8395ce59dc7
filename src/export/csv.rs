//! CSV export
//!
//! One row per record, spreadsheet-compatible.

use std::io::Write;

use crate::error::{StockroomError, StockroomResult};
use crate::storage::Store;

/// Export a store as `Description,Quantity` rows sorted by description
pub fn export_store_csv<W: Write>(store: &Store, writer: W) -> StockroomResult<()> {
    let mut records: Vec<_> = store.records().iter().collect();
    records.sort_by(|a, b| a.description().cmp(b.description()));

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(["Description", "Quantity"])
        .map_err(|e| StockroomError::Export(e.to_string()))?;

    for record in records {
        let quantity = record.quantity().to_string();
        csv_writer
            .write_record([record.description(), quantity.as_str()])
            .map_err(|e| StockroomError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| StockroomError::Export(e.to_string()))?;
    Ok(())
}
