// src/config.rs
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const START_DIR_ENV: &str = "FILENAV_START_DIR";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub start_dir: Option<PathBuf>,
    pub show_hidden: bool,
    pub preferences_path: Option<PathBuf>,
}

impl AppConfig {
    /// `<config dir>/filenav`, if the platform has one.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("filenav"))
    }

    /// Loads the user's config file (defaults when absent) and applies
    /// environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::config_dir() {
            Some(dir) => Self::load_from(&dir.join("config.json"))?,
            None => AppConfig::default(),
        };
        config.apply_env(std::env::var_os(START_DIR_ENV).map(PathBuf::from));
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(AppConfig::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        serde_json::from_str(&raw)
            .map_err(|source| ConfigError::Malformed { path: path.to_path_buf(), source })
    }

    pub fn apply_env(&mut self, start_dir: Option<PathBuf>) {
        if let Some(dir) = start_dir.filter(|d| !d.as_os_str().is_empty()) {
            self.start_dir = Some(dir);
        }
    }

    pub fn preferences_path(&self) -> Option<PathBuf> {
        self.preferences_path
            .clone()
            .or_else(|| Self::config_dir().map(|d| d.join("preferences.json")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&tmp.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"show_hidden": true}"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert!(config.show_hidden);
        assert_eq!(config.start_dir, None);
    }

    #[test]
    fn test_malformed_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(AppConfig::load_from(&path), Err(ConfigError::Malformed { .. })));
    }

    #[test]
    fn test_env_override() {
        let mut config = AppConfig { start_dir: Some(PathBuf::from("/from/file")), ..AppConfig::default() };
        config.apply_env(None);
        assert_eq!(config.start_dir, Some(PathBuf::from("/from/file")));
        config.apply_env(Some(PathBuf::from("/from/env")));
        assert_eq!(config.start_dir, Some(PathBuf::from("/from/env")));
    }

    #[test]
    fn test_explicit_preferences_path() {
        let config = AppConfig { preferences_path: Some(PathBuf::from("/tmp/p.json")), ..AppConfig::default() };
        assert_eq!(config.preferences_path(), Some(PathBuf::from("/tmp/p.json")));
    }
}
