// src/filesystem/search.rs
use super::{is_hidden_name, sort_entries, FileEntry};
use crate::error::FsError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// `skipped` holds directories the walk could not read.
    Matches { entries: Vec<FileEntry>, skipped: Vec<PathBuf> },
    BlankQuery,
    Unavailable(FsError),
}

impl SearchOutcome {
    pub fn entries(&self) -> &[FileEntry] {
        match self {
            SearchOutcome::Matches { entries, .. } => entries,
            _ => &[],
        }
    }

    pub fn into_entries(self) -> Vec<FileEntry> {
        match self {
            SearchOutcome::Matches { entries, .. } => entries,
            _ => Vec::new(),
        }
    }
}

/// Every entry under `root` (any depth) whose name contains `query`,
/// ignoring case. Hidden entries are neither matched nor descended into
/// unless `show_hidden`. Symlinks are not followed, so the walk always ends.
pub fn search_directory(root: &Path, query: &str, show_hidden: bool) -> SearchOutcome {
    if query.trim().is_empty() {
        return SearchOutcome::BlankQuery;
    }
    match std::fs::metadata(root) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => return SearchOutcome::Unavailable(FsError::NotADirectory(root.to_path_buf())),
        Err(e) => return SearchOutcome::Unavailable(FsError::from_io(root, &e)),
    }

    let needle = query.to_lowercase();
    let mut entries = Vec::new();
    let mut skipped = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| show_hidden || !is_hidden_name(e.file_name()));

    for item in walker {
        let item = match item {
            Ok(item) => item,
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                log::trace!("search skipped {}: {}", path.display(), err);
                skipped.push(path);
                continue;
            }
        };

        if !item.file_name().to_string_lossy().to_lowercase().contains(&needle) {
            continue;
        }
        match FileEntry::from_path(item.path()) {
            Ok(entry) => entries.push(entry),
            Err(e) => log::trace!("search dropped {}: {}", item.path().display(), e),
        }
    }

    sort_entries(&mut entries);
    SearchOutcome::Matches { entries, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(outcome: &SearchOutcome) -> Vec<&str> {
        outcome.entries().iter().map(|e| e.name()).collect()
    }

    fn fixture() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("A")).unwrap();
        fs::write(tmp.path().join("A/.secret"), b"s").unwrap();
        fs::write(tmp.path().join("A/note.txt"), b"n").unwrap();
        fs::write(tmp.path().join("b.txt"), b"b").unwrap();
        tmp
    }

    #[test]
    fn test_finds_nested_match() {
        let tmp = fixture();
        assert_eq!(names(&search_directory(tmp.path(), "note", false)), vec!["note.txt"]);
    }

    #[test]
    fn test_hidden_only_with_flag() {
        let tmp = fixture();
        assert!(search_directory(tmp.path(), ".sec", false).entries().is_empty());
        assert_eq!(names(&search_directory(tmp.path(), ".sec", true)), vec![".secret"]);
    }

    #[test]
    fn test_hidden_directories_not_descended() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join(".git/objects")).unwrap();
        fs::write(tmp.path().join(".git/objects/packfile"), b"").unwrap();

        assert!(search_directory(tmp.path(), "pack", false).entries().is_empty());
        assert_eq!(names(&search_directory(tmp.path(), "pack", true)), vec!["packfile"]);
    }

    #[test]
    fn test_case_insensitive_and_sorted_globally() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("x/REPORTS")).unwrap();
        fs::write(tmp.path().join("x/report-b.txt"), b"").unwrap();
        fs::write(tmp.path().join("Report-a.txt"), b"").unwrap();

        let outcome = search_directory(tmp.path(), "rEpOrT", false);
        assert_eq!(names(&outcome), vec!["REPORTS", "Report-a.txt", "report-b.txt"]);
        for entry in outcome.entries() {
            assert!(entry.path().starts_with(tmp.path()));
        }
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        let tmp = fixture();
        assert_eq!(search_directory(tmp.path(), "", true), SearchOutcome::BlankQuery);
        assert_eq!(search_directory(tmp.path(), "   ", true), SearchOutcome::BlankQuery);
    }

    #[test]
    fn test_invalid_root() {
        let tmp = fixture();
        assert!(matches!(
            search_directory(&tmp.path().join("missing"), "a", false),
            SearchOutcome::Unavailable(FsError::NotFound(_))
        ));
        assert!(matches!(
            search_directory(&tmp.path().join("b.txt"), "b", false),
            SearchOutcome::Unavailable(FsError::NotADirectory(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subtree_does_not_abort() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let locked = tmp.path().join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("match-inside"), b"").unwrap();
        fs::create_dir_all(tmp.path().join("open")).unwrap();
        fs::write(tmp.path().join("open/match-outside"), b"").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users read through mode bits; nothing to observe then.
        let readable = fs::read_dir(&locked).is_ok();
        let outcome = search_directory(tmp.path(), "match", false);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if readable {
            return;
        }

        assert_eq!(names(&outcome), vec!["match-outside"]);
        match outcome {
            SearchOutcome::Matches { skipped, .. } => assert_eq!(skipped, vec![locked]),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_terminates() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("loop")).unwrap();
        std::os::unix::fs::symlink(tmp.path(), tmp.path().join("loop/back")).unwrap();

        let outcome = search_directory(tmp.path(), "back", false);
        assert_eq!(names(&outcome), vec!["back"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_matches() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("real.txt"), b"r").unwrap();
        std::os::unix::fs::symlink(tmp.path().join("nowhere"), tmp.path().join("broken-link")).unwrap();

        let outcome = search_directory(tmp.path(), "broken", false);
        assert_eq!(names(&outcome), vec!["broken-link"]);
        assert!(!outcome.entries()[0].is_dir());
    }
}
