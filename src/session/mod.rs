// src/session/mod.rs
//! The session controller: the single owner of browsing state.
//!
//! Commands mutate state synchronously and hand filesystem work to a
//! [`worker`] on the blocking pool. Replies come back through a channel and
//! are applied by [`SessionController::pump`] (or the async `next_reply` /
//! `settle`), so every write to [`SessionState`] happens on the thread that
//! owns the controller.
//!
//! Each listing, search and preview request carries a generation number. Only
//! the newest generation of each kind is applied; anything older is dropped
//! when it arrives, whatever order the blocking pool finishes in.

pub mod state;
mod worker;

pub use state::{Phase, PreviewPane, SessionState};

use std::path::{Path, PathBuf};

use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};

use crate::error::FsError;
use crate::filesystem::{roots, FileEntry};
use crate::navigation::NavigationStack;
use crate::opener::ExternalOpener;
use crate::permission::StoragePermission;
use crate::prefs::{PreferenceStore, Preferences, Theme};
use crate::preview::{text, PreviewManager};
use worker::{Reply, StackChange, Worker};

/// Platform services the session depends on.
pub struct Collaborators {
    pub preferences: Box<dyn PreferenceStore>,
    pub permission: Box<dyn StoragePermission>,
    pub opener: Box<dyn ExternalOpener>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAction {
    /// A directory listing was requested.
    Navigating,
    /// The target could not be navigated to; nothing changed.
    Ignored,
    /// A file was recorded as recently opened.
    Recorded { in_app: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalOpen {
    Launched,
    NoHandler,
}

pub struct SessionController {
    root: PathBuf,
    state: SessionState,
    stack: NavigationStack,
    /// Latest listing request not yet applied.
    in_flight: Option<(PathBuf, StackChange)>,
    prefs: Preferences,
    store: Box<dyn PreferenceStore>,
    permission: Box<dyn StoragePermission>,
    opener: Box<dyn ExternalOpener>,
    worker: Worker,
    replies: mpsc::UnboundedReceiver<Reply>,
    list_generation: u64,
    search_generation: u64,
    preview_generation: u64,
    /// Search generation current when the newest listing was requested.
    listing_search_generation: u64,
    listing_pending: bool,
    search_pending: bool,
    preview_pending: bool,
    publisher: watch::Sender<SessionState>,
}

impl SessionController {
    pub fn new(root: PathBuf, show_hidden: bool, collaborators: Collaborators, runtime: Handle) -> Self {
        let Collaborators { preferences: store, permission, opener } = collaborators;
        let prefs = store.load().unwrap_or_else(|e| {
            log::warn!("ignoring unreadable preferences: {}", e);
            Preferences::default()
        });

        let state = SessionState {
            show_hidden,
            theme: prefs.theme,
            recent_files: prefs.recent_files.clone(),
            favorites: prefs.favorites.clone(),
            ..SessionState::default()
        };
        let (publisher, _) = watch::channel(state.clone());
        let (worker, replies) = Worker::new(runtime, PreviewManager::new());

        SessionController {
            root,
            state,
            stack: NavigationStack::new(),
            in_flight: None,
            prefs,
            store,
            permission,
            opener,
            worker,
            replies,
            list_generation: 0,
            search_generation: 0,
            preview_generation: 0,
            listing_search_generation: 0,
            listing_pending: false,
            search_pending: false,
            preview_pending: false,
            publisher,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn navigation(&self) -> &NavigationStack {
        &self.stack
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Receives a fresh snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.publisher.subscribe()
    }

    /// Checks storage access and, when granted, opens the root.
    pub fn start(&mut self) -> bool {
        self.recheck_permission()
    }

    /// Re-queries storage access. A fresh grant triggers the first navigation.
    pub fn recheck_permission(&mut self) -> bool {
        let granted = self.permission.has_storage_access();
        let newly_granted = granted && !self.state.has_permission;
        self.state.has_permission = granted;

        if newly_granted && self.state.current_dir.is_none() && !self.listing_pending {
            log::info!("storage access granted, opening {}", self.root.display());
            if self.navigate_to_root() {
                return granted;
            }
        }
        self.publish();
        granted
    }

    // ---- navigation -------------------------------------------------------

    /// Descends into `dir`. Returns false, changing nothing, when `dir` is not
    /// an existing directory.
    pub fn navigate_to(&mut self, dir: &Path) -> bool {
        if !self.state.has_permission {
            return false;
        }
        if !dir.is_dir() {
            log::debug!("ignoring navigation to {}", dir.display());
            return false;
        }
        let mut stack = self.requested_stack().clone();
        stack.push(dir.to_path_buf());
        self.request_listing(dir.to_path_buf(), StackChange::Replace(stack));
        true
    }

    /// Goes back one level. At the root this does nothing.
    pub fn navigate_up(&mut self) -> bool {
        if !self.state.has_permission {
            return false;
        }
        let mut stack = self.requested_stack().clone();
        let parent = match stack.pop() {
            Ok(parent) => parent.to_path_buf(),
            Err(e) => {
                log::debug!("{}", e);
                return false;
            }
        };
        self.request_listing(parent, StackChange::Replace(stack));
        true
    }

    pub fn navigate_to_root(&mut self) -> bool {
        if !self.state.has_permission || !self.root.is_dir() {
            return false;
        }
        let root = self.root.clone();
        self.request_listing(root.clone(), StackChange::Replace(NavigationStack::rooted(root)));
        true
    }

    /// Returns to breadcrumb `index`, discarding everything after it.
    pub fn jump_to_breadcrumb(&mut self, index: usize) -> bool {
        if !self.state.has_permission {
            return false;
        }
        let mut stack = self.requested_stack().clone();
        let target = match stack.truncate_to(index) {
            Some(target) => target.to_path_buf(),
            None => return false,
        };
        self.request_listing(target, StackChange::Replace(stack));
        true
    }

    /// Navigates to a well-known folder (Downloads, Documents, Pictures,
    /// Music) or to a child of the current directory with that name.
    pub fn navigate_to_folder(&mut self, name: &str) -> bool {
        match roots::resolve_folder(name, self.state.current_dir.as_deref()) {
            Some(dir) => self.navigate_to(&dir),
            None => false,
        }
    }

    pub fn toggle_hidden(&mut self) {
        self.state.show_hidden = !self.state.show_hidden;

        if let Some((dir, change)) = self.in_flight.clone() {
            self.request_listing(dir, change);
        } else if let Some(dir) = self.state.current_dir.clone() {
            self.request_listing(dir, StackChange::Keep);
        } else {
            self.publish();
        }

        if self.state.is_searching() {
            let query = self.state.search_query.clone();
            self.search(&query);
        }
    }

    // ---- search -----------------------------------------------------------

    /// Searches the current directory's subtree. A blank query clears results.
    pub fn search(&mut self, query: &str) {
        self.state.search_query = query.to_string();
        self.search_generation += 1;

        if query.trim().is_empty() {
            self.search_pending = false;
            self.state.search_results.clear();
            self.refresh_loading();
            self.publish();
            return;
        }

        let Some(dir) = self.state.current_dir.clone() else {
            self.publish();
            return;
        };
        self.search_pending = true;
        self.refresh_loading();
        self.publish();
        log::debug!("search #{} for {:?} under {}", self.search_generation, query, dir.display());
        self.worker.search(self.search_generation, dir, query.to_string(), self.state.show_hidden);
    }

    pub fn clear_search(&mut self) {
        self.search("");
    }

    // ---- entries ----------------------------------------------------------

    /// Directories are entered; files are recorded as recently opened.
    pub fn open(&mut self, entry: &FileEntry) -> OpenAction {
        if entry.is_dir() {
            return if self.navigate_to(entry.path()) {
                OpenAction::Navigating
            } else {
                OpenAction::Ignored
            };
        }
        self.prefs.add_recent(&path_key(entry.path()));
        self.state.recent_files = self.prefs.recent_files.clone();
        self.persist();
        self.publish();
        OpenAction::Recorded { in_app: entry.opens_in_app() }
    }

    /// Builds the in-app view of `entry` on the worker. The result lands in
    /// [`SessionState::preview`]. Returns false for entries that open
    /// externally.
    pub fn request_preview(&mut self, entry: &FileEntry) -> bool {
        if !entry.opens_in_app() {
            return false;
        }
        self.preview_generation += 1;
        self.preview_pending = true;
        log::debug!("preview #{} of {}", self.preview_generation, entry.path().display());
        self.worker.preview(self.preview_generation, entry.clone());
        true
    }

    pub fn close_preview(&mut self) {
        self.preview_generation += 1;
        self.preview_pending = false;
        if self.state.preview.take().is_some() {
            self.publish();
        }
    }

    /// Reads a text file on the blocking pool. `None` if it cannot be read.
    pub async fn read_text_file(&self, entry: &FileEntry) -> Option<String> {
        let entry = entry.clone();
        self.worker
            .blocking(move || text::read_text_file(&entry))
            .await?
            .map_err(|e| log::debug!("{}", e))
            .ok()
    }

    pub fn open_externally(&self, entry: &FileEntry) -> ExternalOpen {
        match self.opener.open(entry.path(), entry.mime_type()) {
            Ok(()) => ExternalOpen::Launched,
            Err(e) => {
                log::info!("{}", e);
                ExternalOpen::NoHandler
            }
        }
    }

    // ---- preferences ------------------------------------------------------

    pub fn set_theme(&mut self, theme: Theme) {
        self.prefs.theme = theme;
        self.state.theme = theme;
        self.persist();
        self.publish();
    }

    pub fn add_favorite(&mut self, path: &Path) {
        if self.prefs.add_favorite(&path_key(path)) {
            self.sync_favorites();
        }
    }

    pub fn remove_favorite(&mut self, path: &Path) {
        if self.prefs.remove_favorite(&path_key(path)) {
            self.sync_favorites();
        }
    }

    /// Returns whether `path` is a favorite afterwards.
    pub fn toggle_favorite(&mut self, path: &Path) -> bool {
        if self.is_favorite(path) {
            self.remove_favorite(path);
            false
        } else {
            self.add_favorite(path);
            true
        }
    }

    pub fn is_favorite(&self, path: &Path) -> bool {
        self.prefs.is_favorite(&path_key(path))
    }

    // ---- replies ----------------------------------------------------------

    /// Applies every reply that has already arrived. Returns true if state
    /// changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Ok(reply) = self.replies.try_recv() {
            changed |= self.apply(reply);
        }
        changed
    }

    /// Waits for one reply and applies it.
    pub async fn next_reply(&mut self) -> bool {
        match self.replies.recv().await {
            Some(reply) => self.apply(reply),
            None => false,
        }
    }

    /// Waits until the newest listing, search and preview have all landed.
    pub async fn settle(&mut self) {
        while self.listing_pending || self.search_pending || self.preview_pending {
            match self.replies.recv().await {
                Some(reply) => {
                    self.apply(reply);
                }
                None => break,
            }
        }
    }

    fn apply(&mut self, reply: Reply) -> bool {
        match reply {
            Reply::Listed { generation, dir, stack, listing } => {
                if generation != self.list_generation {
                    log::debug!("dropping stale listing #{} of {}", generation, dir.display());
                    return false;
                }
                self.listing_pending = false;
                self.in_flight = None;

                if let Some(FsError::NotFound(_) | FsError::NotADirectory(_)) = listing.reason() {
                    log::debug!("listing of {} vanished: {:?}", dir.display(), listing.reason());
                    self.refresh_loading();
                    self.publish();
                    return true;
                }

                let entering = self.state.current_dir.as_deref() != Some(dir.as_path());
                log::info!("showing {} ({} entries)", dir.display(), listing.entries().len());
                self.state.current_dir = Some(dir);
                self.state.entries = listing.into_entries();
                if let StackChange::Replace(stack) = stack {
                    self.stack = stack;
                }
                self.state.breadcrumbs = self.stack.as_slice().to_vec();

                if entering {
                    if self.search_generation == self.listing_search_generation {
                        self.search_generation += 1;
                        self.search_pending = false;
                        self.state.search_query.clear();
                        self.state.search_results.clear();
                    } else if self.state.is_searching() {
                        // Issued while this listing was in flight, so it ran
                        // against the directory being left.
                        let query = self.state.search_query.clone();
                        self.search(&query);
                    }
                }
                self.refresh_loading();
                self.publish();
                true
            }
            Reply::Searched { generation, outcome } => {
                if generation != self.search_generation {
                    log::debug!("dropping stale search #{}", generation);
                    return false;
                }
                self.search_pending = false;
                self.state.search_results = outcome.into_entries();
                self.refresh_loading();
                self.publish();
                true
            }
            Reply::Previewed { generation, entry, content } => {
                if generation != self.preview_generation {
                    log::debug!("dropping stale preview #{}", generation);
                    return false;
                }
                self.preview_pending = false;
                self.state.preview = Some(PreviewPane { entry, content });
                self.publish();
                true
            }
        }
    }

    // ---- internals --------------------------------------------------------

    /// The stack as it will be once the newest listing request lands.
    fn requested_stack(&self) -> &NavigationStack {
        match &self.in_flight {
            Some((_, StackChange::Replace(stack))) => stack,
            _ => &self.stack,
        }
    }

    fn request_listing(&mut self, dir: PathBuf, change: StackChange) {
        self.list_generation += 1;
        self.listing_pending = true;
        self.listing_search_generation = self.search_generation;
        self.in_flight = Some((dir.clone(), change.clone()));
        self.state.loading = true;
        self.publish();
        log::debug!("listing #{} of {}", self.list_generation, dir.display());
        self.worker.list(self.list_generation, dir, self.state.show_hidden, change);
    }

    fn refresh_loading(&mut self) {
        self.state.loading = self.listing_pending || self.search_pending;
    }

    fn sync_favorites(&mut self) {
        self.state.favorites = self.prefs.favorites.clone();
        self.persist();
        self.publish();
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.prefs) {
            log::warn!("failed to save preferences: {}", e);
        }
    }

    fn publish(&mut self) {
        self.state.derive_phase();
        self.publisher.send_replace(self.state.clone());
    }
}

fn path_key(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
