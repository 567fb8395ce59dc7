//! CLI command for store export

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::error::{StockroomError, StockroomResult};
use crate::export::{export_store, ExportFormat};
use crate::session::Session;

/// Export a store to a file, or to stdout when no output is given
pub fn handle_export_command(
    session: &Session,
    store: &str,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> StockroomResult<()> {
    let store = session.storage().open(store)?;

    match output {
        Some(path) => {
            let file = File::create(&path).map_err(|e| {
                StockroomError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            export_store(&store, format, &mut writer)?;
            writer
                .flush()
                .map_err(|e| StockroomError::Export(e.to_string()))?;
            eprintln!(
                "Exported {} ({} records) as {} to {}",
                store.name(),
                store.len(),
                format,
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            export_store(&store, format, &mut writer)?;
            writer
                .flush()
                .map_err(|e| StockroomError::Export(e.to_string()))?;
        }
    }

    Ok(())
}
