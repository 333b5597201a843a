// src/filesystem/roots.rs
use std::path::{Path, PathBuf};

use crate::config::AppConfig;

const APP_DIR_NAME: &str = "filenav";

/// Shared storage the browser starts in when it is available.
pub fn external_storage_root() -> Option<PathBuf> {
    dirs::home_dir().filter(|p| p.is_dir())
}

/// Directory owned by this application; created on first use.
pub fn app_private_dir() -> Option<PathBuf> {
    let dir = dirs::data_local_dir()?.join(APP_DIR_NAME);
    match std::fs::create_dir_all(&dir) {
        Ok(()) => Some(dir),
        Err(e) => {
            log::warn!("cannot create {}: {}", dir.display(), e);
            None
        }
    }
}

/// Configured start directory, else external storage, else the private
/// fallback, else the working directory.
pub fn preferred_root(config: &AppConfig) -> PathBuf {
    config
        .start_dir
        .clone()
        .filter(|p| p.is_dir())
        .or_else(external_storage_root)
        .or_else(app_private_dir)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnownFolder {
    Downloads,
    Documents,
    Pictures,
    Music,
}

impl WellKnownFolder {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "downloads" | "download" => Some(WellKnownFolder::Downloads),
            "documents" | "docs" => Some(WellKnownFolder::Documents),
            "pictures" | "images" => Some(WellKnownFolder::Pictures),
            "music" | "audio" => Some(WellKnownFolder::Music),
            _ => None,
        }
    }

    pub fn path(self) -> Option<PathBuf> {
        match self {
            WellKnownFolder::Downloads => dirs::download_dir(),
            WellKnownFolder::Documents => dirs::document_dir(),
            WellKnownFolder::Pictures => dirs::picture_dir(),
            WellKnownFolder::Music => dirs::audio_dir(),
        }
    }
}

/// Resolves a folder name typed by the user: well-known names first, then a
/// child of `current`.
pub fn resolve_folder(name: &str, current: Option<&Path>) -> Option<PathBuf> {
    if let Some(folder) = WellKnownFolder::from_name(name) {
        return folder.path();
    }
    current.map(|dir| dir.join(name)).filter(|p| p.is_dir())
}
