//! Write-ahead intent journal for multi-file updates
//!
//! Before touching several files, the full rendered contents of every file
//! are recorded in a journal. Files are then written one by one and the
//! journal is removed. A journal left on disk means an update stopped
//! half-way; replaying it finishes the update.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{StockroomError, StockroomResult};

use super::file_io::{read_json, write_json_atomic};
use super::store::PendingWrite;

/// Files an operation intends to write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteIntent {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Name of the operation, for display
    pub operation: String,
    pub writes: Vec<PendingWrite>,
}

impl WriteIntent {
    pub fn new(operation: impl Into<String>, writes: Vec<PendingWrite>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            operation: operation.into(),
            writes,
        }
    }
}

/// The journal file
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// The unfinished intent, if any
    pub fn pending(&self) -> StockroomResult<Option<WriteIntent>> {
        read_json(&self.path)
    }

    fn begin(&self, intent: &WriteIntent) -> StockroomResult<()> {
        write_json_atomic(&self.path, &Some(intent))
    }

    fn clear(&self) -> StockroomResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                StockroomError::Io(format!("Failed to clear {}: {}", self.path.display(), e))
            })?;
        }
        Ok(())
    }

    /// Write several files under the journal
    ///
    /// Nothing is written while an earlier intent is unfinished. If the first
    /// file fails nothing has changed and the journal is cleared. If a later
    /// file fails the journal stays behind and `PartialWrite` is returned.
    pub fn write_all(&self, operation: &str, writes: Vec<PendingWrite>) -> StockroomResult<()> {
        if let Some(stale) = self.pending()? {
            return Err(StockroomError::Storage(format!(
                "An earlier '{}' update is unfinished; run 'stockroom recover' first",
                stale.operation
            )));
        }

        if writes.len() < 2 {
            for write in &writes {
                write.apply()?;
            }
            return Ok(());
        }

        let intent = WriteIntent::new(operation, writes);
        self.begin(&intent)?;

        let mut written = Vec::new();
        for write in &intent.writes {
            if let Err(e) = write.apply() {
                if written.is_empty() {
                    self.clear()?;
                    return Err(e);
                }
                warn!(
                    operation,
                    failed = %write.path.display(),
                    "multi-file update stopped part-way"
                );
                return Err(StockroomError::PartialWrite {
                    written,
                    failed: write.path.clone(),
                    reason: e.to_string(),
                });
            }
            written.push(write.path.clone());
        }

        self.clear()
    }

    /// Finish an interrupted update, returning what was replayed
    pub fn recover(&self) -> StockroomResult<Option<WriteIntent>> {
        let Some(intent) = self.pending()? else {
            return Ok(None);
        };

        for write in &intent.writes {
            write.apply()?;
        }
        self.clear()?;

        info!(operation = %intent.operation, files = intent.writes.len(), "replayed journal");
        Ok(Some(intent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::encoding::TextEncoding;
    use crate::storage::file_io::temp_path_for;
    use tempfile::TempDir;

    fn write(path: PathBuf, contents: &str) -> PendingWrite {
        PendingWrite {
            path,
            encoding: TextEncoding::Utf8,
            contents: contents.to_string(),
        }
    }

    #[test]
    fn test_write_all_clears_journal() {
        let temp_dir = TempDir::new().unwrap();
        let journal = Journal::new(temp_dir.path().join("pending-write.json"));
        let a = temp_dir.path().join("a.txt");
        let b = temp_dir.path().join("b.txt");

        journal
            .write_all("transfer", vec![write(a.clone(), "    A 1\n"), write(b.clone(), "    B 2\n")])
            .unwrap();

        assert_eq!(fs::read_to_string(&a).unwrap(), "    A 1\n");
        assert_eq!(fs::read_to_string(&b).unwrap(), "    B 2\n");
        assert!(!journal.path().exists());
        assert!(journal.pending().unwrap().is_none());
    }

    #[test]
    fn test_second_failure_reports_partial_write_and_recovers() {
        let temp_dir = TempDir::new().unwrap();
        let journal = Journal::new(temp_dir.path().join("pending-write.json"));
        let a = temp_dir.path().join("a.txt");
        let b = temp_dir.path().join("b.txt");
        fs::write(&b, "    B 9\n").unwrap();

        // Block the second write
        fs::create_dir(temp_path_for(&b)).unwrap();

        let err = journal
            .write_all("transfer", vec![write(a.clone(), "    A 1\n"), write(b.clone(), "    B 2\n")])
            .unwrap_err();
        assert!(err.is_partial_write());
        assert_eq!(fs::read_to_string(&a).unwrap(), "    A 1\n");
        assert_eq!(fs::read_to_string(&b).unwrap(), "    B 9\n");

        let pending = journal.pending().unwrap().unwrap();
        assert_eq!(pending.operation, "transfer");

        // Further writes are refused until recovery, single-file ones too
        assert!(journal
            .write_all("normalize", vec![write(a.clone(), ""), write(b.clone(), "")])
            .is_err());
        let err = journal
            .write_all("adjust", vec![write(a.clone(), "    A 1\n    C 5\n")])
            .unwrap_err();
        assert!(matches!(err, StockroomError::Storage(_)));
        assert_eq!(fs::read_to_string(&a).unwrap(), "    A 1\n");

        fs::remove_dir(temp_path_for(&b)).unwrap();
        let replayed = journal.recover().unwrap().unwrap();
        assert_eq!(replayed.writes.len(), 2);
        assert_eq!(fs::read_to_string(&b).unwrap(), "    B 2\n");
        assert!(journal.recover().unwrap().is_none());
    }

    #[test]
    fn test_first_failure_changes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let journal = Journal::new(temp_dir.path().join("pending-write.json"));
        let a = temp_dir.path().join("a.txt");
        let b = temp_dir.path().join("b.txt");
        fs::create_dir(temp_path_for(&a)).unwrap();

        let err = journal
            .write_all("transfer", vec![write(a.clone(), "    A 1\n"), write(b.clone(), "    B 2\n")])
            .unwrap_err();
        assert!(!err.is_partial_write());
        assert!(!a.exists());
        assert!(!b.exists());
        assert!(journal.pending().unwrap().is_none());
    }
}
