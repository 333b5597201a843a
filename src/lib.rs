// src/lib.rs
//! A file browser core: directory listing, recursive search, navigation
//! history, favorites and recently opened files, behind a single session
//! controller that a front-end observes and drives.

pub mod config;
pub mod error;
pub mod filesystem;
pub mod navigation;
pub mod opener;
pub mod permission;
pub mod prefs;
pub mod preview;
pub mod session;

pub use config::AppConfig;
pub use error::{ConfigError, FsError, NavigationError, OpenError, PrefsError};
pub use filesystem::{FileCategory, FileEntry};
pub use navigation::NavigationStack;
pub use prefs::{Preferences, Theme};
pub use session::{Collaborators, ExternalOpen, OpenAction, Phase, PreviewPane, SessionController, SessionState};
