//! Snapshot stores - string-keyed storage backends

use chrono::Utc;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::persist::error::PersistError;
use crate::persist::key::StorageKey;

/// A generic string-keyed store for serialized state
pub trait SnapshotStore {
    /// Payload stored under `key`, or `None` when nothing is stored
    fn load(&self, key: &StorageKey) -> Result<Option<String>, PersistError>;

    /// Store `payload` under `key`, replacing any previous value
    fn save(&mut self, key: &StorageKey, payload: &str) -> Result<(), PersistError>;

    /// Drop the value under `key`; returns whether one existed
    fn remove(&mut self, key: &StorageKey) -> Result<bool, PersistError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<StorageKey, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &StorageKey) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &StorageKey, payload: &str) -> Result<(), PersistError> {
        self.entries.insert(key.clone(), payload.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &StorageKey) -> Result<bool, PersistError> {
        Ok(self.entries.remove(key).is_some())
    }
}

/// One `<key>.json` file per key inside a state directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created lazily on the first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`
    pub fn path_for(&self, key: &StorageKey) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn ensure_dir(&self) -> Result<(), PersistError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|source| PersistError::Io {
                path: self.dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

impl SnapshotStore for FileStore {
    fn load(&self, key: &StorageKey) -> Result<Option<String>, PersistError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistError::Io { path, source }),
        }
    }

    fn save(&mut self, key: &StorageKey, payload: &str) -> Result<(), PersistError> {
        self.ensure_dir()?;

        let path = self.path_for(key);
        let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let tmp = self.dir.join(format!(".{}.{}.tmp", key, stamp));

        replace_file(&tmp, &path, payload)?;

        debug!(key = %key, path = ?path, bytes = payload.len(), "saved snapshot");
        Ok(())
    }

    fn remove(&mut self, key: &StorageKey) -> Result<bool, PersistError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(PersistError::Io { path, source }),
        }
    }
}

/// Write `payload` to `tmp`, then rename it over `path`.
///
/// The temp file is removed on any failure.
fn replace_file(tmp: &Path, path: &Path, payload: &str) -> Result<(), PersistError> {
    if let Err(source) = fs::write(tmp, payload) {
        let _ = fs::remove_file(tmp);
        return Err(PersistError::Io {
            path: tmp.to_path_buf(),
            source,
        });
    }
    // rename is atomic within a directory; readers see old or new, never torn
    if let Err(source) = fs::rename(tmp, path) {
        let _ = fs::remove_file(tmp);
        return Err(PersistError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
