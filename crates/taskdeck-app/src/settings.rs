//! Per-user settings persisted outside the task store.
//!
//! Stored as TOML under the platform config directory. A missing or
//! unreadable file yields the defaults; saving creates the directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors while loading or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No platform config directory is available.
    #[error("no config directory available")]
    NoConfigDir,

    /// The settings file exists but is not valid TOML.
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// Filesystem failure while reading or writing.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Client-side preferences; the service never sees these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Categories offered when creating or filtering tasks.
    pub categories: Vec<String>,
    /// Render with the dark palette.
    pub dark_mode: bool,
    /// Include completed tasks in views.
    pub show_completed: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            categories: ["Work", "Personal", "Shopping", "Health"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            dark_mode: false,
            show_completed: true,
        }
    }
}

impl Settings {
    /// Default on-disk location for the settings file.
    ///
    /// # Errors
    /// Fails when the platform has no config directory.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        dirs::config_dir()
            .map(|dir| dir.join("taskdeck").join("settings.toml"))
            .ok_or(SettingsError::NoConfigDir)
    }

    /// Load settings from the default location, falling back to defaults
    /// when the file does not exist.
    ///
    /// # Errors
    /// Fails when the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load settings from `path`, falling back to defaults when absent.
    ///
    /// # Errors
    /// Fails when the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        toml::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save settings to the default location, creating parent directories.
    ///
    /// # Errors
    /// Fails when the file cannot be written.
    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&Self::default_path()?)
    }

    /// Save settings to `path`, creating parent directories.
    ///
    /// # Errors
    /// Fails when the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let loaded = Settings::load_from(&dir.path().join("settings.toml"))
            .unwrap_or_else(|err| panic!("load: {err}"));
        assert_eq!(loaded, Settings::default());
        assert!(loaded.show_completed);
        assert!(!loaded.dark_mode);
        assert_eq!(loaded.categories.len(), 4);
    }

    #[test]
    fn roundtrips_through_disk() {
        let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let path = dir.path().join("nested").join("settings.toml");
        let settings = Settings {
            categories: vec!["Errands".to_owned()],
            dark_mode: true,
            show_completed: false,
        };
        settings
            .save_to(&path)
            .unwrap_or_else(|err| panic!("save: {err}"));
        let loaded = Settings::load_from(&path).unwrap_or_else(|err| panic!("load: {err}"));
        assert_eq!(loaded, settings);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "dark_mode = true\n").unwrap_or_else(|err| panic!("write: {err}"));
        let loaded = Settings::load_from(&path).unwrap_or_else(|err| panic!("load: {err}"));
        assert!(loaded.dark_mode);
        assert!(loaded.show_completed);
        assert_eq!(loaded.categories, Settings::default().categories);
    }

    #[test]
    fn garbage_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "not = [valid").unwrap_or_else(|err| panic!("write: {err}"));
        assert!(matches!(
            Settings::load_from(&path),
            Err(SettingsError::Parse { .. })
        ));
    }
}
