//! Storage infrastructure: durable configuration for the assistant.
//!
//! - `kv` – the `(group, key) → text` backend trait and its memory/file
//!   implementations.
//! - `repository` – writes the whole option store through that backend after
//!   every change, and reads it back at start-up.
//! - `settings` – the user's colour and behaviour settings in TOML.

use std::path::PathBuf;

pub mod kv;
pub mod repository;
pub mod settings;

pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StorageError};
pub use repository::{OptionStateRepository, PersistError, CONFIG_GROUP, STORE_KEY};
pub use settings::{AssistantSettings, SettingsError};

/// Determines the platform-appropriate directory for the assistant's files.
///
/// # Errors
///
/// Returns [`StorageError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, StorageError> {
    platform_config_dir().ok_or(StorageError::NoPlatformConfigDir)
}

/// Resolves the platform config base directory for the assistant.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("DialogueAssistant"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("dialogue-assistant"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("DialogueAssistant")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}
