// src/session/worker.rs
use std::path::PathBuf;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::filesystem::{list_directory, search_directory, Listing, SearchOutcome};
use crate::filesystem::FileEntry;
use crate::navigation::NavigationStack;
use crate::preview::{PreviewContent, PreviewManager};

/// Where a listing leaves the navigation stack once it lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StackChange {
    Replace(NavigationStack),
    Keep,
}

#[derive(Debug)]
pub(crate) enum Reply {
    Listed {
        generation: u64,
        dir: PathBuf,
        stack: StackChange,
        listing: Listing,
    },
    Searched {
        generation: u64,
        outcome: SearchOutcome,
    },
    Previewed {
        generation: u64,
        entry: FileEntry,
        content: Option<PreviewContent>,
    },
}

/// Runs blocking filesystem work on the runtime's blocking pool and sends
/// the results back to the single controller.
pub(crate) struct Worker {
    runtime: Handle,
    replies: mpsc::UnboundedSender<Reply>,
    previews: Arc<PreviewManager>,
}

impl Worker {
    pub(crate) fn new(runtime: Handle, previews: PreviewManager) -> (Self, mpsc::UnboundedReceiver<Reply>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Worker { runtime, replies: tx, previews: Arc::new(previews) }, rx)
    }

    pub(crate) fn list(&self, generation: u64, dir: PathBuf, show_hidden: bool, stack: StackChange) {
        let tx = self.replies.clone();
        self.runtime.spawn_blocking(move || {
            let listing = list_directory(&dir, show_hidden);
            // Receiver gone means the session was dropped.
            let _ = tx.send(Reply::Listed { generation, dir, stack, listing });
        });
    }

    pub(crate) fn search(&self, generation: u64, root: PathBuf, query: String, show_hidden: bool) {
        let tx = self.replies.clone();
        self.runtime.spawn_blocking(move || {
            let outcome = search_directory(&root, &query, show_hidden);
            let _ = tx.send(Reply::Searched { generation, outcome });
        });
    }

    pub(crate) fn preview(&self, generation: u64, entry: FileEntry) {
        let tx = self.replies.clone();
        let previews = Arc::clone(&self.previews);
        self.runtime.spawn_blocking(move || {
            let content = previews.get_preview(&entry);
            let _ = tx.send(Reply::Previewed { generation, entry, content });
        });
    }

    /// Runs `f` on the blocking pool and waits for it. `None` if it panicked.
    pub(crate) async fn blocking<T, F>(&self, f: F) -> Option<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        self.runtime.spawn_blocking(f).await.ok()
    }
}
