//! Persistence of the option store through a [`KeyValueStore`].
//!
//! The whole [`ConfigStore`] is written as one JSON value under a fixed
//! group/key pair after every mutation.  Loading never fails: missing,
//! unreadable or malformed data yields an empty store and a warning, so a bad
//! file costs the user their saved preferences but never stops the assistant.

use dialogue_core::{decode_store, encode_store, CodecError, ConfigStore};
use tracing::{info, warn};

use super::kv::{KeyValueStore, StorageError};

/// Configuration group that owns every value the assistant stores.
pub const CONFIG_GROUP: &str = "DIALOGUE_ASSISTANT";
/// Key of the serialised option store inside [`CONFIG_GROUP`].
pub const STORE_KEY: &str = "DIALOGUE_CONFIG";

/// Error raised when the option store cannot be written.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("could not encode option store: {0}")]
    Encode(#[from] CodecError),
    #[error("could not write option store: {0}")]
    Storage(#[from] StorageError),
}

/// Loads and saves the [`ConfigStore`] through a key-value backend.
pub struct OptionStateRepository<S> {
    backend: S,
}

impl<S: KeyValueStore> OptionStateRepository<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Reads the persisted store, falling back to an empty one.
    pub fn load(&self) -> ConfigStore {
        let raw = match self.backend.load(CONFIG_GROUP, STORE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("no saved dialogue options; starting empty");
                return ConfigStore::new();
            }
            Err(e) => {
                warn!(error = %e, "could not read saved dialogue options; starting empty");
                return ConfigStore::new();
            }
        };

        match decode_store(&raw) {
            Ok(store) => {
                info!(targets = store.len(), "loaded saved dialogue options");
                store
            }
            Err(CodecError::Empty) => ConfigStore::new(),
            Err(e) => {
                warn!(error = %e, "saved dialogue options are malformed; starting empty");
                ConfigStore::new()
            }
        }
    }

    /// Writes the whole store.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if encoding or the backend write fails.  The
    /// caller does not retry; the next mutation writes the full store again.
    pub fn save(&mut self, store: &ConfigStore) -> Result<(), PersistError> {
        let json = encode_store(store)?;
        self.backend.save(CONFIG_GROUP, STORE_KEY, &json)?;
        Ok(())
    }
}
