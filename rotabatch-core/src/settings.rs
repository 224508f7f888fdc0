//! Persisted user settings.
//!
//! The last used directory, angle and output directory are kept in a small
//! TOML file, `~/.rotabatch.toml` by default. Values are stored as strings so
//! hand-edited files stay forgiving; missing keys fall back to defaults and
//! an unreadable document is treated as empty.
//!
//! Saving rewrites the whole file. Two runs saving at the same time may
//! overwrite each other.
//!
//! ```no_run
//! use rotabatch_core::settings::SettingsStore;
//!
//! let store = SettingsStore::at_default_location().unwrap();
//! let mut settings = store.load().unwrap_or_default();
//! settings.default_angle = "180".to_string();
//! store.save(&settings).unwrap();
//! ```

use crate::config::{DEFAULT_ANGLE, RotationAngle};
use crate::error::{CoreError, CoreResult};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the settings document inside the home directory.
pub const SETTINGS_FILE: &str = ".rotabatch.toml";

/// Values remembered between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_angle: String,
    pub default_directory: String,
    pub output_directory: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_angle: DEFAULT_ANGLE.to_string(),
            default_directory: ".".to_string(),
            output_directory: String::new(),
        }
    }
}

impl Settings {
    /// Remembered angle, or the default when the stored value is not a
    /// number. Range is checked later, at validation.
    pub fn angle(&self) -> i64 {
        self.default_angle
            .trim()
            .parse()
            .unwrap_or(i64::from(DEFAULT_ANGLE))
    }

    /// Remembered directory; `.` when none is stored.
    pub fn directory(&self) -> PathBuf {
        match self.default_directory.trim() {
            "" => PathBuf::from("."),
            dir => PathBuf::from(dir),
        }
    }

    /// Remembered output directory, if any.
    pub fn output_dir(&self) -> Option<PathBuf> {
        match self.output_directory.trim() {
            "" => None,
            dir => Some(PathBuf::from(dir)),
        }
    }

    /// Records the values a run actually used.
    pub fn record_run(&mut self, directory: &Path, angle: RotationAngle, output_dir: Option<&Path>) {
        self.default_directory = directory.display().to_string();
        self.default_angle = angle.degrees().to_string();
        self.output_directory = output_dir
            .map(|dir| dir.display().to_string())
            .unwrap_or_default();
    }
}

/// Location of the settings document.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.rotabatch.toml`.
    pub fn at_default_location() -> CoreResult<Self> {
        default_path().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the settings. A missing file yields defaults; so does a file
    /// that is not valid TOML, with a warning.
    pub fn load(&self) -> CoreResult<Settings> {
        if !self.path.exists() {
            log::debug!("No settings file at {}", self.path.display());
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            CoreError::Settings(format!("could not read {}: {}", self.path.display(), e))
        })?;
        match toml::from_str(&content) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                log::warn!(
                    "Ignoring malformed settings file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(Settings::default())
            }
        }
    }

    /// Overwrites the settings file.
    pub fn save(&self, settings: &Settings) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(settings)
            .map_err(|e| CoreError::Settings(format!("could not serialize settings: {e}")))?;
        fs::write(&self.path, content).map_err(|e| {
            CoreError::Settings(format!("could not write {}: {}", self.path.display(), e))
        })?;
        log::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

/// Default settings path in the user's home directory.
pub fn default_path() -> CoreResult<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(SETTINGS_FILE))
        .ok_or_else(|| CoreError::Settings("could not determine the home directory".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("absent.toml"));
        let settings = store.load().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.angle(), 90);
        assert_eq!(settings.directory(), PathBuf::from("."));
        assert_eq!(settings.output_dir(), None);
    }

    #[test]
    fn save_then_load_keeps_recorded_run() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested").join("settings.toml"));

        let mut settings = Settings::default();
        settings.record_run(
            Path::new("/videos/phone"),
            RotationAngle::Deg270,
            Some(Path::new("/videos/out")),
        );
        store.save(&settings).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.default_angle, "270");
        assert_eq!(loaded.directory(), PathBuf::from("/videos/phone"));
        assert_eq!(loaded.output_dir(), Some(PathBuf::from("/videos/out")));
    }

    #[test]
    fn partial_and_malformed_documents_fall_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        fs::write(&path, "default_angle = \"180\"\n").unwrap();
        let partial = SettingsStore::new(&path).load().unwrap();
        assert_eq!(partial.angle(), 180);
        assert_eq!(partial.default_directory, ".");

        fs::write(&path, "not = valid = toml").unwrap();
        let malformed = SettingsStore::new(&path).load().unwrap();
        assert_eq!(malformed, Settings::default());
    }

    #[test]
    fn non_numeric_angle_uses_default() {
        let settings = Settings {
            default_angle: "sideways".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.angle(), 90);
    }
}
