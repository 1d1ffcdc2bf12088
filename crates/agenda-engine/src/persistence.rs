//! Persistence port: an opaque key-value blob store plus the snapshot codec.
//!
//! The engine and store never call into this module themselves; the caller (usually
//! [`crate::calendar::Calendar`]) loads and saves the whole snapshot under
//! [`EVENTS_KEY`].

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{AgendaError, Result};
use crate::store::Snapshot;

/// Fixed key under which the full event mapping is persisted.
pub const EVENTS_KEY: &str = "events";

/// Key-value string storage consumed by the calendar session.
pub trait BlobStore {
    /// Fetch the value stored under `key`, or `None` if nothing was saved yet.
    fn load_blob(&self, key: &str) -> Result<Option<String>>;

    fn save_blob(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Encode a snapshot as JSON: `{"YYYY-MM-DD": [event, ...], ...}`.
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<String> {
    Ok(serde_json::to_string(snapshot)?)
}

pub fn decode_snapshot(blob: &str) -> Result<Snapshot> {
    Ok(serde_json::from_str(blob)?)
}

/// Volatile blob store, for tests and hosts that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, String>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(key: &str, value: impl Into<String>) -> Self {
        let mut blobs = HashMap::new();
        blobs.insert(key.to_string(), value.into());
        Self { blobs }
    }
}

impl BlobStore for MemoryBlobStore {
    fn load_blob(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn save_blob(&mut self, key: &str, value: &str) -> Result<()> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
///
/// Writes go to a temporary file in the same directory and are renamed into place,
/// so a crash never leaves a half-written blob.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn storage_error(path: &Path) -> impl FnOnce(io::Error) -> AgendaError + '_ {
    move |source| AgendaError::Storage {
        path: path.to_path_buf(),
        source,
    }
}

impl BlobStore for FileBlobStore {
    fn load_blob(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(&path)(e)),
        }
    }

    fn save_blob(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(storage_error(&self.dir))?;

        let path = self.path_for(key);
        let mut temp = tempfile::NamedTempFile::new_in(&self.dir).map_err(storage_error(&path))?;
        temp.write_all(value.as_bytes()).map_err(storage_error(&path))?;
        temp.flush().map_err(storage_error(&path))?;
        temp.persist(&path).map_err(|e| storage_error(&path)(e.error))?;
        Ok(())
    }
}
