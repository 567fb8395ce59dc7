//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure. Missing
//! files read as empty; writes go through a temp file and a rename.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::StockroomError;

/// Read raw bytes, returning `None` if the file doesn't exist
pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Option<Vec<u8>>, StockroomError> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(None);
    }

    fs::read(path)
        .map(Some)
        .map_err(|e| StockroomError::Io(format!("Failed to read {}: {}", path.display(), e)))
}

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, StockroomError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| StockroomError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| StockroomError::Json(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Resolve `path` to an absolute form that may not exist yet
///
/// The parent directory is canonicalized and the file name appended, so
/// `data/../data/a.txt` and `data/a.txt` resolve alike before `a.txt` exists.
pub fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (fs::canonicalize(parent), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// Whether two paths name the same file
pub fn same_file(a: &Path, b: &Path) -> bool {
    a == b || resolve_path(a) == resolve_path(b)
}

/// Sibling temp path used while writing `path`
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("stockroom"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write bytes to a file atomically (write to temp, then rename)
///
/// The file is either completely written or not modified at all.
pub fn write_atomic<P: AsRef<Path>>(path: P, contents: &[u8]) -> Result<(), StockroomError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                StockroomError::Io(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = temp_path_for(path);

    let result = (|| -> std::io::Result<()> {
        let mut file = File::create(&temp_path)?;
        file.write_all(contents)?;
        file.flush()?;
        file.sync_all()
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(StockroomError::Io(format!(
            "Failed to write {}: {}",
            temp_path.display(),
            e
        )));
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        StockroomError::Io(format!("Failed to replace {}: {}", path.display(), e))
    })
}

/// Write JSON to a file atomically
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), StockroomError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let json = serde_json::to_vec_pretty(data)
        .map_err(|e| StockroomError::Json(format!("Failed to serialize data: {}", e)))?;
    write_atomic(path, &json)
}
