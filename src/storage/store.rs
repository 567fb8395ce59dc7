//! File-backed inventory store
//!
//! A store is loaded fresh for each operation, mutated in memory and written
//! back whole. Saving consolidates duplicate keys and sorts by description.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{StockroomError, StockroomResult};
use crate::models::{normalize_key, Record};

use super::codec::{self, Diagnostic, Dialect};
use super::consolidate::consolidate;
use super::encoding::TextEncoding;
use super::file_io::{read_bytes, same_file, write_atomic};

/// How store files are read and written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    pub encoding: TextEncoding,
    pub dialect: Dialect,
}

/// Rendered file contents waiting to be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingWrite {
    pub path: PathBuf,
    pub encoding: TextEncoding,
    pub contents: String,
}

impl PendingWrite {
    /// Encode and write atomically
    pub fn apply(&self) -> StockroomResult<()> {
        let bytes = self.encoding.encode(&self.contents, &self.path)?;
        write_atomic(&self.path, &bytes)
    }

    /// Check the contents can be encoded, without writing
    pub fn validate(&self) -> StockroomResult<()> {
        self.encoding.encode(&self.contents, &self.path).map(|_| ())
    }
}

/// Read a text file in the given encoding; missing files read as empty
pub fn read_text(path: &Path, encoding: TextEncoding) -> StockroomResult<String> {
    match read_bytes(path)? {
        Some(bytes) => encoding.decode(&bytes, path),
        None => Ok(String::new()),
    }
}

/// An in-memory store bound to a file
#[derive(Debug, Clone)]
pub struct Store {
    name: String,
    path: PathBuf,
    options: StoreOptions,
    records: Vec<Record>,
    diagnostics: Vec<Diagnostic>,
}

impl Store {
    /// Create an empty store that will save to `path`
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, options: StoreOptions) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            options,
            records: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Build a store from records already in memory
    pub fn with_records(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        options: StoreOptions,
        records: Vec<Record>,
    ) -> StockroomResult<Self> {
        let mut store = Self::new(name, path, options);
        store.records = consolidate(&records)?;
        Ok(store)
    }

    /// Load a store from disk
    ///
    /// A missing file is an empty store. Duplicate keys in the file are merged
    /// in memory; bad lines are kept as diagnostics.
    pub fn load(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        options: StoreOptions,
    ) -> StockroomResult<Self> {
        let mut store = Self::new(name, path, options);
        let text = read_text(&store.path, options.encoding)?;
        let parsed = codec::parse(&text, options.dialect);

        for problem in parsed.problems() {
            warn!(store = %store.name, "{}", problem);
        }

        store.records = consolidate(&parsed.records)?;
        store.diagnostics = parsed.diagnostics;

        debug!(
            store = %store.name,
            path = %store.path.display(),
            records = store.records.len(),
            "loaded store"
        );
        Ok(store)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether both stores are backed by the same file, however spelled
    pub fn is_same_file(&self, other: &Store) -> bool {
        same_file(&self.path, &other.path)
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Everything the codec reported while loading
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics other than blank lines and comments
    pub fn problems(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_noise())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total units across all records
    pub fn total_quantity(&self) -> u64 {
        self.records.iter().map(Record::quantity).sum()
    }

    fn position(&self, description: &str) -> Option<usize> {
        let key = normalize_key(description);
        self.records.iter().position(|r| r.key() == key)
    }

    /// Find a record by description (case-insensitive)
    pub fn get(&self, description: &str) -> Option<&Record> {
        self.position(description).map(|i| &self.records[i])
    }

    pub fn get_mut(&mut self, description: &str) -> Option<&mut Record> {
        self.position(description).map(move |i| &mut self.records[i])
    }

    pub fn contains(&self, description: &str) -> bool {
        self.position(description).is_some()
    }

    /// Quantity on hand, zero if the item is absent
    pub fn quantity_of(&self, description: &str) -> u64 {
        self.get(description).map(Record::quantity).unwrap_or(0)
    }

    /// Set of normalized keys
    pub fn keys(&self) -> BTreeSet<String> {
        self.records.iter().map(Record::key).collect()
    }

    /// Add stock, creating the record if it doesn't exist
    pub fn add(&mut self, description: &str, quantity: u64) -> StockroomResult<&Record> {
        let index = match self.position(description) {
            Some(index) => {
                self.records[index].add(quantity)?;
                index
            }
            None => {
                self.records.push(Record::new(description, quantity)?);
                self.records.len() - 1
            }
        };
        Ok(&self.records[index])
    }

    /// Remove stock from an existing record
    pub fn remove(&mut self, description: &str, quantity: u64) -> StockroomResult<&Record> {
        let index = self
            .position(description)
            .ok_or_else(|| StockroomError::item_not_found(&self.name, description.trim()))?;
        let name = self.name.clone();
        self.records[index].remove(quantity, &name)?;
        Ok(&self.records[index])
    }

    /// Insert a record; duplicates are merged into the existing entry
    pub fn insert(&mut self, record: Record) -> StockroomResult<()> {
        match self.position(record.description()) {
            Some(index) => self.records[index].add(record.quantity()),
            None => {
                self.records.push(record);
                Ok(())
            }
        }
    }

    /// Keep only records accepted by `keep`
    pub fn retain<F: FnMut(&Record) -> bool>(&mut self, keep: F) {
        self.records.retain(keep);
    }

    /// Consolidate and sort, then render the file contents
    pub fn prepare(&mut self) -> StockroomResult<PendingWrite> {
        let mut records = consolidate(&self.records)?;
        records.sort_by(|a, b| a.description().cmp(b.description()));
        self.records = records;
        self.pending(codec::serialize_in_order(&self.records))
    }

    /// Consolidate but keep the current order, then render
    pub fn prepare_in_place(&mut self) -> StockroomResult<PendingWrite> {
        self.records = consolidate(&self.records)?;
        self.pending(codec::serialize_in_order(&self.records))
    }

    fn pending(&self, contents: String) -> StockroomResult<PendingWrite> {
        let write = PendingWrite {
            path: self.path.clone(),
            encoding: self.options.encoding,
            contents,
        };
        write.validate()?;
        Ok(write)
    }

    /// Save sorted, overwriting the file atomically
    pub fn save(&mut self) -> StockroomResult<()> {
        self.prepare()?.apply()?;
        debug!(store = %self.name, records = self.records.len(), "saved store");
        Ok(())
    }

    /// Save keeping the in-memory order (for single-line edits)
    pub fn save_in_place(&mut self) -> StockroomResult<()> {
        self.prepare_in_place()?.apply()?;
        debug!(store = %self.name, records = self.records.len(), "saved store in place");
        Ok(())
    }
}
