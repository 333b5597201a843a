// src/permission.rs
use std::path::PathBuf;

/// Whether this process may browse general storage. Any grant flow lives
/// outside the crate; the session only reacts to the answer.
pub trait StoragePermission: Send {
    fn has_storage_access(&self) -> bool;
}

/// Access is granted when the storage root can be listed.
#[derive(Debug, Clone)]
pub struct ReadableRoot {
    root: PathBuf,
}

impl ReadableRoot {
    pub fn new(root: PathBuf) -> Self {
        ReadableRoot { root }
    }
}

impl StoragePermission for ReadableRoot {
    fn has_storage_access(&self) -> bool {
        std::fs::read_dir(&self.root).is_ok()
    }
}

impl StoragePermission for bool {
    fn has_storage_access(&self) -> bool {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readable_root() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(ReadableRoot::new(tmp.path().to_path_buf()).has_storage_access());
        assert!(!ReadableRoot::new(tmp.path().join("missing")).has_storage_access());
    }
}
