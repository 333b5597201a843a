// src/filesystem/mod.rs
pub mod dir;
pub mod file;
pub mod roots;
pub mod search;

pub use dir::{list_directory, Listing};
pub use file::{format_date, format_size, mime_for_extension, FileCategory};
pub use roots::WellKnownFolder;
pub use search::{search_directory, SearchOutcome};

use std::cmp::Ordering;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::FsError;

/// One filesystem node as seen at construction time. Fields are private so a
/// descriptor can never be edited in place; a changed file means a new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    path: PathBuf,
    name: String,
    is_dir: bool,
    size: u64,
    modified: i64,
    extension: String,
    is_hidden: bool,
}

impl FileEntry {
    /// A dangling symlink is still a child of its directory; it becomes an
    /// empty non-directory entry.
    pub fn from_path(path: &Path) -> Result<Self, FsError> {
        let (metadata, dangling) = match std::fs::metadata(path) {
            Ok(metadata) => (metadata, false),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let link = std::fs::symlink_metadata(path).map_err(|_| FsError::from_io(path, &e))?;
                (link, true)
            }
            Err(e) => return Err(FsError::from_io(path, &e)),
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let is_dir = !dangling && metadata.is_dir();
        let size = if is_dir || dangling { 0 } else { metadata.len() };
        let modified = metadata.modified().map(epoch_millis).unwrap_or(0);
        let extension = if is_dir {
            String::new()
        } else {
            path.extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default()
        };
        let is_hidden = is_hidden_name(OsStr::new(&name));
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map(|cwd| cwd.join(path)).unwrap_or_else(|_| path.to_path_buf())
        };

        Ok(FileEntry { path, name, is_dir, size, modified, extension, is_hidden })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Byte length; always 0 for directories.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Last modification, milliseconds since the Unix epoch.
    pub fn modified(&self) -> i64 {
        self.modified
    }

    /// Lowercase extension without the dot; empty for directories.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn is_hidden(&self) -> bool {
        self.is_hidden
    }

    pub fn formatted_size(&self) -> String {
        if self.is_dir {
            return "Folder".to_string();
        }
        format_size(self.size)
    }

    pub fn formatted_date(&self) -> String {
        format_date(self.modified)
    }

    pub fn category(&self) -> FileCategory {
        if self.is_dir {
            FileCategory::Directory
        } else {
            FileCategory::from_extension(&self.extension)
        }
    }

    /// Only text and images have an in-app viewer.
    pub fn opens_in_app(&self) -> bool {
        matches!(self.category(), FileCategory::Text | FileCategory::Image)
    }

    pub fn mime_type(&self) -> &'static str {
        mime_for_extension(&self.extension)
    }
}

/// Signed milliseconds from the Unix epoch; earlier times are negative.
pub fn epoch_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_millis()).map(|ms| -ms).unwrap_or(i64::MIN),
    }
}

/// Dot-prefixed names are hidden.
pub fn is_hidden_name(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Directories first, then case-insensitive name, then full path so equal
/// names still order deterministically.
pub fn display_order(a: &FileEntry, b: &FileEntry) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.path.cmp(&b.path))
}

pub fn sort_entries(entries: &mut [FileEntry]) {
    entries.sort_by_cached_key(|e| (!e.is_dir, e.name.to_lowercase(), e.path.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_file_entry_from_path() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("Report.TXT");
        fs::write(&file, b"hello").unwrap();

        let entry = FileEntry::from_path(&file).unwrap();
        assert_eq!(entry.name(), "Report.TXT");
        assert_eq!(entry.extension(), "txt");
        assert_eq!(entry.size(), 5);
        assert!(!entry.is_dir());
        assert!(!entry.is_hidden());
        assert_eq!(entry.category(), FileCategory::Text);
        assert!(entry.opens_in_app());
        assert!(entry.modified() > 0);
    }

    #[test]
    fn test_directory_has_no_size_or_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("photos.d");
        fs::create_dir(&dir).unwrap();

        let entry = FileEntry::from_path(&dir).unwrap();
        assert!(entry.is_dir());
        assert_eq!(entry.size(), 0);
        assert_eq!(entry.extension(), "");
        assert_eq!(entry.category(), FileCategory::Directory);
        assert_eq!(entry.formatted_size(), "Folder");
        assert!(!entry.opens_in_app());
    }

    #[test]
    fn test_hidden_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join(".secret");
        fs::write(&file, b"").unwrap();

        let entry = FileEntry::from_path(&file).unwrap();
        assert!(entry.is_hidden());
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("gone");
        assert!(matches!(FileEntry::from_path(&missing), Err(FsError::NotFound(_))));
    }

    #[test]
    fn test_epoch_millis_is_signed() {
        use std::time::Duration;

        assert_eq!(epoch_millis(UNIX_EPOCH), 0);
        assert_eq!(epoch_millis(UNIX_EPOCH + Duration::from_millis(2500)), 2500);
        assert_eq!(epoch_millis(UNIX_EPOCH - Duration::from_millis(1500)), -1500);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_an_empty_file() {
        let tmp = tempfile::tempdir().unwrap();
        let link = tmp.path().join("broken.txt");
        std::os::unix::fs::symlink(tmp.path().join("nowhere"), &link).unwrap();

        let entry = FileEntry::from_path(&link).unwrap();
        assert_eq!(entry.name(), "broken.txt");
        assert!(!entry.is_dir());
        assert_eq!(entry.size(), 0);
        assert_eq!(entry.extension(), "txt");
    }

    #[test]
    fn test_sort_puts_directories_first() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("alpha.txt"), b"").unwrap();
        fs::create_dir(tmp.path().join("Zeta")).unwrap();
        fs::write(tmp.path().join("Beta.md"), b"").unwrap();

        let mut entries: Vec<FileEntry> = ["alpha.txt", "Zeta", "Beta.md"]
            .iter()
            .map(|n| FileEntry::from_path(&tmp.path().join(n)).unwrap())
            .collect();
        sort_entries(&mut entries);

        let names: Vec<&str> = entries.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["Zeta", "alpha.txt", "Beta.md"]);
        for pair in entries.windows(2) {
            assert_ne!(display_order(&pair[0], &pair[1]), Ordering::Greater);
        }
    }
}
