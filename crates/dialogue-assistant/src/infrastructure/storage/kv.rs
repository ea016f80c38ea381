//! Key-value configuration storage.
//!
//! The assistant persists everything as text values addressed by a
//! `(group, key)` pair, the way a host plugin configuration manager does.
//! Two backends are provided:
//!
//! - [`MemoryKeyValueStore`] – a `HashMap`, for tests and embedding hosts that
//!   persist configuration themselves.
//! - [`FileKeyValueStore`] – one JSON object per group, stored as
//!   `<dir>/<group>.json` in the platform config directory.
//!
//! # Write safety
//!
//! `FileKeyValueStore::save` writes the whole group to a temporary file and
//! renames it over the old one, so an abrupt exit leaves either the previous
//! or the new contents on disk, never a torn file.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Error type for key-value storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A group file is not a JSON object of strings.
    #[error("failed to parse group file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A group could not be serialised.
    #[error("failed to serialise group: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Synchronous `(group, key) → text` storage.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    /// Reads a value.  `Ok(None)` means the key has never been written.
    fn load(&self, group: &str, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a value, replacing any previous one.
    fn save(&mut self, group: &str, key: &str, value: &str) -> Result<(), StorageError>;
}

// ── In-memory backend ─────────────────────────────────────────────────────────

/// A [`KeyValueStore`] backed by a `HashMap`.
#[derive(Debug, Default, Clone)]
pub struct MemoryKeyValueStore {
    values: HashMap<(String, String), String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored value without going through the trait.
    pub fn get(&self, group: &str, key: &str) -> Option<&str> {
        self.values
            .get(&(group.to_string(), key.to_string()))
            .map(String::as_str)
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn load(&self, group: &str, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(group, key).map(str::to_string))
    }

    fn save(&mut self, group: &str, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .insert((group.to_string(), key.to_string()), value.to_string());
        Ok(())
    }
}

// ── File backend ──────────────────────────────────────────────────────────────

/// A [`KeyValueStore`] that keeps one JSON file per group under a directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `dir`.  The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a store in the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NoPlatformConfigDir`] when the directory cannot
    /// be determined from the environment.
    pub fn in_config_dir() -> Result<Self, StorageError> {
        Ok(Self::new(super::config_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn group_path(&self, group: &str) -> PathBuf {
        self.dir.join(format!("{group}.json"))
    }

    fn read_group(&self, group: &str) -> Result<BTreeMap<String, String>, StorageError> {
        let path = self.group_path(group);
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|source| StorageError::Parse { path, source })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn load(&self, group: &str, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_group(group)?.remove(key))
    }

    fn save(&mut self, group: &str, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;

        // A damaged group file is replaced rather than blocking every future save.
        let mut values = self.read_group(group).unwrap_or_default();
        values.insert(key.to_string(), value.to_string());
        let content = serde_json::to_string_pretty(&values)?;

        let path = self.group_path(group);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;

        debug!(group, key, path = %path.display(), "saved configuration value");
        Ok(())
    }
}
