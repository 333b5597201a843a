// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Reasons a directory could not be read. Never surfaced to the user; the
/// lister and searcher collapse these into an empty result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FsError {
    #[error("{0} does not exist")]
    NotFound(PathBuf),
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("{0} is a directory")]
    IsADirectory(PathBuf),
    #[error("permission denied reading {0}")]
    PermissionDenied(PathBuf),
    #[error("failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },
}

impl FsError {
    pub fn from_io(path: &std::path::Path, err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io { path: path.to_path_buf(), message: err.to_string() },
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NavigationError {
    #[error("navigation stack cannot pop its root")]
    EmptyStack,
}

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("preferences io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed preferences: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("no application can open {0}")]
    NoHandler(PathBuf),
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};
    use std::path::Path;

    #[test]
    fn test_from_io_maps_kinds() {
        let path = Path::new("/srv/private");
        assert_eq!(
            FsError::from_io(path, &Error::from(ErrorKind::PermissionDenied)),
            FsError::PermissionDenied(path.to_path_buf())
        );
        assert_eq!(
            FsError::from_io(path, &Error::from(ErrorKind::NotFound)),
            FsError::NotFound(path.to_path_buf())
        );
        assert!(matches!(
            FsError::from_io(path, &Error::new(ErrorKind::Other, "disk on fire")),
            FsError::Io { message, .. } if message == "disk on fire"
        ));
    }
}
