// src/filesystem/dir.rs
use super::{sort_entries, FileEntry};
use crate::error::FsError;
use std::path::Path;

/// Result of reading one directory. An unreadable target is not a failure for
/// callers, only an empty listing with a reason attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Entries(Vec<FileEntry>),
    Unavailable(FsError),
}

impl Listing {
    pub fn entries(&self) -> &[FileEntry] {
        match self {
            Listing::Entries(entries) => entries,
            Listing::Unavailable(_) => &[],
        }
    }

    pub fn into_entries(self) -> Vec<FileEntry> {
        match self {
            Listing::Entries(entries) => entries,
            Listing::Unavailable(_) => Vec::new(),
        }
    }

    pub fn reason(&self) -> Option<&FsError> {
        match self {
            Listing::Entries(_) => None,
            Listing::Unavailable(err) => Some(err),
        }
    }
}

/// Immediate children of `path`, hidden entries dropped unless `show_hidden`,
/// in display order.
pub fn list_directory(path: &Path, show_hidden: bool) -> Listing {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => return Listing::Unavailable(FsError::from_io(path, &e)),
    };
    if !metadata.is_dir() {
        return Listing::Unavailable(FsError::NotADirectory(path.to_path_buf()));
    }

    let read_dir = match std::fs::read_dir(path) {
        Ok(read_dir) => read_dir,
        Err(e) => {
            log::trace!("cannot list {}: {}", path.display(), e);
            return Listing::Unavailable(FsError::from_io(path, &e));
        }
    };

    let mut entries = Vec::new();
    for child in read_dir.flatten() {
        match FileEntry::from_path(&child.path()) {
            Ok(entry) => {
                if !show_hidden && entry.is_hidden() { continue; }
                entries.push(entry);
            }
            // Dangling links and entries removed mid-listing.
            Err(e) => log::trace!("skipping {}: {}", child.path().display(), e),
        }
    }

    sort_entries(&mut entries);
    Listing::Entries(entries)
}
