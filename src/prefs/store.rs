// src/prefs/store.rs
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::{PreferenceStore, Preferences};
use crate::error::PrefsError;

/// Preferences kept as one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonPreferences {
    path: PathBuf,
}

impl JsonPreferences {
    pub fn new(path: PathBuf) -> Self {
        JsonPreferences { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonPreferences {
    fn load(&self) -> Result<Preferences, PrefsError> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&mut self, prefs: &Preferences) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(prefs)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// In-process store. Clones share the same data, so a caller can keep a
/// handle and observe what the session saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    inner: Arc<Mutex<Preferences>>,
}

impl MemoryPreferences {
    pub fn new(prefs: Preferences) -> Self {
        MemoryPreferences { inner: Arc::new(Mutex::new(prefs)) }
    }

    pub fn snapshot(&self) -> Preferences {
        self.inner.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn load(&self) -> Result<Preferences, PrefsError> {
        Ok(self.snapshot())
    }

    fn save(&mut self, prefs: &Preferences) -> Result<(), PrefsError> {
        if let Ok(mut inner) = self.inner.lock() {
            *inner = prefs.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::Theme;

    #[test]
    fn test_json_roundtrip_through_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = JsonPreferences::new(tmp.path().join("nested/preferences.json"));
        assert_eq!(store.load().unwrap(), Preferences::default());

        let mut prefs = Preferences::default();
        prefs.theme = Theme::Azul;
        prefs.add_recent("/docs/a.txt");
        prefs.add_favorite("/docs");
        store.save(&prefs).unwrap();

        let reopened = JsonPreferences::new(store.path().to_path_buf());
        assert_eq!(reopened.load().unwrap(), prefs);
    }

    #[test]
    fn test_recent_files_saved_as_array() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = JsonPreferences::new(tmp.path().join("preferences.json"));
        let mut prefs = Preferences::default();
        prefs.add_recent("/docs/a|b.txt");
        prefs.add_recent("/docs/c.txt");
        store.save(&prefs).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["recent_files"], serde_json::json!(["/docs/c.txt", "/docs/a|b.txt"]));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("preferences.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(matches!(JsonPreferences::new(path).load(), Err(PrefsError::Malformed(_))));
    }

    #[test]
    fn test_memory_clones_share_state() {
        let handle = MemoryPreferences::default();
        let mut store = handle.clone();
        let mut prefs = Preferences::default();
        prefs.add_favorite("/x");
        store.save(&prefs).unwrap();
        assert!(handle.snapshot().is_favorite("/x"));
    }
}
