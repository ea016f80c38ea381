//! TOML-based user settings for the assistant.
//!
//! Reads and writes [`AssistantSettings`] to `settings.toml` in the
//! platform-appropriate config directory:
//! - Windows:  `%APPDATA%\DialogueAssistant\settings.toml`
//! - Linux:    `~/.config/dialogue-assistant/settings.toml`
//! - macOS:    `~/Library/Application Support/DialogueAssistant/settings.toml`
//!
//! Example file:
//!
//! ```toml
//! highlight_colour = "#00B2B2"
//! locked_colour = "#5F5F5F"
//! idle_colour = "#000000"
//! populate_retry_limit = 5
//! launcher_regions = ["viewport"]
//! ```
//!
//! Every field has a `#[serde(default = ...)]`, so a partial file, or no file
//! at all, still yields a complete set of settings.

use std::path::{Path, PathBuf};

use dialogue_core::Colour;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::host::ContainerKey;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be serialized to TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// User-facing settings.  The engine reads the colours as opaque values at
/// decoration time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantSettings {
    /// Text colour of highlighted options.
    #[serde(default = "default_highlight_colour")]
    pub highlight_colour: Colour,
    /// Text colour of locked options.
    #[serde(default = "default_locked_colour")]
    pub locked_colour: Colour,
    /// Text colour restored when a decoration is removed.
    #[serde(default = "default_idle_colour")]
    pub idle_colour: Colour,
    /// How many deferred passes a dialogue open waits for its option list to
    /// be populated before giving up on decorating it.
    #[serde(default = "default_populate_retry_limit")]
    pub populate_retry_limit: u32,
    /// Interface regions whose clicks may start a new conversation even though
    /// their action type is not on the world whitelist.
    #[serde(default = "default_launcher_regions")]
    pub launcher_regions: Vec<ContainerKey>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_highlight_colour() -> Colour {
    Colour::HIGHLIGHT
}
fn default_locked_colour() -> Colour {
    Colour::LOCKED
}
fn default_idle_colour() -> Colour {
    Colour::IDLE
}
fn default_populate_retry_limit() -> u32 {
    5
}
fn default_launcher_regions() -> Vec<ContainerKey> {
    vec![ContainerKey::Viewport]
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            highlight_colour: default_highlight_colour(),
            locked_colour: default_locked_colour(),
            idle_colour: default_idle_colour(),
            populate_retry_limit: default_populate_retry_limit(),
            launcher_regions: default_launcher_regions(),
        }
    }
}

// ── Settings repository ───────────────────────────────────────────────────────

/// Resolves the full path to the settings file.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformConfigDir`] if the base directory cannot
/// be determined.
pub fn settings_file_path() -> Result<PathBuf, SettingsError> {
    super::platform_config_dir()
        .map(|dir| dir.join("settings.toml"))
        .ok_or(SettingsError::NoPlatformConfigDir)
}

/// Loads settings from the platform config directory.
///
/// # Errors
///
/// See [`load_settings_from`].
pub fn load_settings() -> Result<AssistantSettings, SettingsError> {
    load_settings_from(&settings_file_path()?)
}

/// Loads settings from `path`, returning defaults if the file does not exist.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors other than "not found",
/// and [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings_from(path: &Path) -> Result<AssistantSettings, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AssistantSettings::default()),
        Err(source) => Err(SettingsError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Persists `settings` to `path`, creating the parent directory if needed.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system failures or
/// [`SettingsError::Serialize`] if serialization fails.
pub fn save_settings_to(path: &Path, settings: &AssistantSettings) -> Result<(), SettingsError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
