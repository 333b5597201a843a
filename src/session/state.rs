// src/session/state.rs
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::filesystem::FileEntry;
use crate::prefs::Theme;
use crate::preview::PreviewContent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    NoPermission,
    Loading,
    Browsing,
    Searching,
}

/// In-app view of one entry. `content` is `None` when it could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewPane {
    pub entry: FileEntry,
    pub content: Option<PreviewContent>,
}

/// Everything the presentation layer renders. Published whole after every
/// change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub phase: Phase,
    pub has_permission: bool,
    pub current_dir: Option<PathBuf>,
    pub entries: Vec<FileEntry>,
    pub loading: bool,
    pub show_hidden: bool,
    pub search_query: String,
    pub search_results: Vec<FileEntry>,
    /// Navigation stack, root first.
    pub breadcrumbs: Vec<PathBuf>,
    pub favorites: BTreeSet<String>,
    pub recent_files: Vec<String>,
    pub theme: Theme,
    pub preview: Option<PreviewPane>,
}

impl SessionState {
    pub fn is_searching(&self) -> bool {
        !self.search_query.trim().is_empty()
    }

    /// Search results while a query is active, otherwise the listing.
    pub fn visible_entries(&self) -> &[FileEntry] {
        if self.is_searching() {
            &self.search_results
        } else {
            &self.entries
        }
    }

    pub(crate) fn derive_phase(&mut self) {
        self.phase = if !self.has_permission {
            Phase::NoPermission
        } else if self.loading {
            Phase::Loading
        } else if self.is_searching() {
            Phase::Searching
        } else {
            Phase::Browsing
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_precedence() {
        let mut state = SessionState::default();
        state.loading = true;
        state.derive_phase();
        assert_eq!(state.phase, Phase::NoPermission);

        state.has_permission = true;
        state.derive_phase();
        assert_eq!(state.phase, Phase::Loading);

        state.loading = false;
        state.search_query = "  ".to_string();
        state.derive_phase();
        assert_eq!(state.phase, Phase::Browsing);

        state.search_query = "x".to_string();
        state.derive_phase();
        assert_eq!(state.phase, Phase::Searching);
    }
}
