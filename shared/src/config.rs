//! Configuration persistence utilities
//!
//! Provides functions for loading and saving settings to disk as TOML under
//! the platform config directory.

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Base configuration directory for the application
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "ether", "ether").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path of a named settings file inside the config directory
pub fn config_path(name: &str) -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(format!("{}.toml", name)))
}

/// Read a TOML file; `None` if it does not exist
pub fn load_from<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)?;
    Ok(Some(toml::from_str(&contents)?))
}

/// Write a TOML file, creating parent directories as needed
pub fn save_to<T: Serialize>(path: &Path, config: &T) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Load a named settings file
///
/// Returns `None` if the file doesn't exist yet.
/// Returns an error if the file exists but can't be parsed.
pub fn load_config<T: DeserializeOwned>(name: &str) -> Result<Option<T>, ConfigError> {
    let path = config_path(name).ok_or(ConfigError::NoConfigDir)?;
    load_from(&path)
}

/// Load a named settings file, falling back to defaults on any problem
pub fn load_config_or_default<T: DeserializeOwned + Default>(name: &str) -> T {
    match load_config(name) {
        Ok(Some(config)) => config,
        Ok(None) => T::default(),
        Err(e) => {
            warn!(name, error = %e, "failed to load settings, using defaults");
            T::default()
        }
    }
}

/// Save a named settings file
pub fn save_config<T: Serialize>(name: &str, config: &T) -> Result<(), ConfigError> {
    let path = config_path(name).ok_or(ConfigError::NoConfigDir)?;
    save_to(&path, config)
}

/// Remove a settings file; a missing file is not an error
pub fn delete_at(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Delete a named settings file
pub fn delete_config(name: &str) -> Result<(), ConfigError> {
    let path = config_path(name).ok_or(ConfigError::NoConfigDir)?;
    delete_at(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::InteractionConfig;
    use serde::Deserialize;

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    struct TestSettings {
        name: String,
        interaction: InteractionConfig,
    }

    fn scratch_path(file: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("ether-config-test-{}", std::process::id()))
            .join(file)
    }

    #[test]
    fn test_config_path() {
        if let Some(path) = config_path("ether") {
            assert!(path.to_string_lossy().ends_with("ether.toml"));
        }
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch_path("roundtrip.toml");
        let settings = TestSettings {
            name: "calibrated".to_string(),
            interaction: InteractionConfig {
                charge_duration_ms: 900.0,
                ..InteractionConfig::default()
            },
        };
        save_to(&path, &settings).unwrap();
        let loaded: Option<TestSettings> = load_from(&path).unwrap();
        assert_eq!(loaded, Some(settings));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_none() {
        let loaded: Option<TestSettings> = load_from(&scratch_path("absent.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let path = scratch_path("malformed.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "name = [unterminated").unwrap();
        let err = load_from::<TestSettings>(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_delete_removes_saved_settings() {
        let path = scratch_path("forget.toml");
        save_to(&path, &TestSettings::default()).unwrap();
        assert!(path.exists());

        delete_at(&path).unwrap();
        let loaded: Option<TestSettings> = load_from(&path).unwrap();
        assert!(loaded.is_none());

        // Deleting again is fine
        delete_at(&path).unwrap();
    }
}
