// src/prefs/mod.rs
//! Persisted user preferences: theme, recently opened files and favorites.

pub mod store;

pub use store::{JsonPreferences, MemoryPreferences};

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PrefsError;

pub const MAX_RECENT_FILES: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Theme {
    #[default]
    Guinda,
    Azul,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Guinda, Theme::Azul];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Guinda => "Guinda",
            Theme::Azul => "Azul",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Theme::ALL.into_iter().find(|t| t.name().eq_ignore_ascii_case(name))
    }

    pub fn next(self) -> Self {
        match self {
            Theme::Guinda => Theme::Azul,
            Theme::Azul => Theme::Guinda,
        }
    }
}

/// Unknown theme names fall back to the default instead of failing the load.
fn lenient_theme<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Theme, D::Error> {
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name.as_deref().and_then(Theme::from_name).unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    #[serde(deserialize_with = "lenient_theme")]
    pub theme: Theme,
    /// Most recent first, at most [`MAX_RECENT_FILES`], no duplicates.
    pub recent_files: Vec<String>,
    pub favorites: BTreeSet<String>,
}

impl Preferences {
    pub fn add_recent(&mut self, path: &str) {
        self.recent_files.retain(|p| p != path);
        self.recent_files.insert(0, path.to_string());
        self.recent_files.truncate(MAX_RECENT_FILES);
    }

    /// Returns false when `path` was already a favorite.
    pub fn add_favorite(&mut self, path: &str) -> bool {
        self.favorites.insert(path.to_string())
    }

    pub fn remove_favorite(&mut self, path: &str) -> bool {
        self.favorites.remove(path)
    }

    pub fn is_favorite(&self, path: &str) -> bool {
        self.favorites.contains(path)
    }
}

/// Key-value persistence behind the session. Calls are synchronous; how and
/// when data reaches disk is up to the implementation.
pub trait PreferenceStore: Send {
    fn load(&self) -> Result<Preferences, PrefsError>;
    fn save(&mut self, prefs: &Preferences) -> Result<(), PrefsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_moves_to_front() {
        let mut prefs = Preferences::default();
        prefs.add_recent("/a");
        prefs.add_recent("/b");
        prefs.add_recent("/a");
        assert_eq!(prefs.recent_files, vec!["/a", "/b"]);
    }

    #[test]
    fn test_recent_capped_at_ten() {
        let mut prefs = Preferences::default();
        for i in 0..15 {
            prefs.add_recent(&format!("/f{}", i));
        }
        assert_eq!(prefs.recent_files.len(), MAX_RECENT_FILES);
        assert_eq!(prefs.recent_files.first().map(String::as_str), Some("/f14"));
        assert_eq!(prefs.recent_files.last().map(String::as_str), Some("/f5"));
    }

    #[test]
    fn test_favorites_are_a_set() {
        let mut prefs = Preferences::default();
        assert!(prefs.add_favorite("/x"));
        assert!(!prefs.add_favorite("/x"));
        assert!(prefs.is_favorite("/x"));
        assert_eq!(prefs.favorites.len(), 1);
        assert!(prefs.remove_favorite("/x"));
        assert!(!prefs.is_favorite("/x"));
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let prefs: Preferences = serde_json::from_str(r#"{"theme":"Neon"}"#).unwrap();
        assert_eq!(prefs.theme, Theme::Guinda);
        let prefs: Preferences = serde_json::from_str(r#"{"theme":"azul"}"#).unwrap();
        assert_eq!(prefs.theme, Theme::Azul);
    }
}
