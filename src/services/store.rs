//! Dataset store
//!
//! Loads a dataset file fully into memory and writes it back atomically:
//! the new content goes to a sibling `<name>.tmp` file which is fsynced and
//! then renamed over the target, so readers only ever see a complete file.

use crate::models::Record;
use crate::utils::error::{DatasetError, DatasetResult};
use serde::Serialize;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON dataset persistence
#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetStore;

impl DatasetStore {
    pub fn new() -> Self {
        Self
    }

    /// Load all records from `path`
    pub fn load(&self, path: &Path) -> DatasetResult<Vec<Record>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DatasetError::NotFound(path.to_path_buf()))
            }
            Err(e) => {
                return Err(DatasetError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        let records: Vec<Record> =
            serde_json::from_str(&content).map_err(|e| DatasetError::Corrupt {
                path: path.to_path_buf(),
                source: e,
            })?;

        debug!("Loaded {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Replace the file at `path` with `records`
    pub fn save(&self, path: &Path, records: &[Record]) -> DatasetResult<()> {
        let temp_path = self.write_temp(path, records)?;
        self.commit(&temp_path, path)?;

        debug!("Saved {} records to {}", records.len(), path.display());
        Ok(())
    }

    /// Write and fsync the sibling temp file; the target is left untouched
    pub fn write_temp(&self, path: &Path, records: &[Record]) -> DatasetResult<PathBuf> {
        let bytes = to_pretty_json(records)?;
        let temp_path = temp_path(path);

        let io_err = |source| DatasetError::Io {
            path: temp_path.clone(),
            source,
        };

        let mut file = File::create(&temp_path).map_err(io_err)?;
        file.write_all(&bytes).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;

        Ok(temp_path)
    }

    /// Atomically move a written temp file over the target
    pub fn commit(&self, temp_path: &Path, path: &Path) -> DatasetResult<()> {
        fs::rename(temp_path, path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Sibling temp path used while saving: `data.json` -> `data.json.tmp`
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Pretty JSON with 4-space indentation; non-ASCII text is written as-is
fn to_pretty_json(records: &[Record]) -> DatasetResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;
    Ok(buf)
}
