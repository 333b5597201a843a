// src/preview/mod.rs
//! In-app viewers for entries that open without an external application.

use crate::error::FsError;
use crate::filesystem::FileEntry;

pub mod image;
pub mod text;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewContent {
    Text(String),
    /// Terminal rendering of an image, or a one-line placeholder.
    Picture(String),
}

pub trait PreviewProvider: Send + Sync {
    fn can_preview(&self, entry: &FileEntry) -> bool;
    fn generate_preview(&self, entry: &FileEntry) -> Result<PreviewContent, FsError>;
}

pub struct PreviewManager {
    providers: Vec<Box<dyn PreviewProvider>>,
}

impl Default for PreviewManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewManager {
    pub fn new() -> Self {
        let mut manager = PreviewManager { providers: Vec::new() };
        manager.register(Box::new(text::TextPreview::new()));
        manager.register(Box::new(image::ImagePreview::new()));
        manager
    }

    pub fn register(&mut self, provider: Box<dyn PreviewProvider>) {
        self.providers.push(provider);
    }

    /// `None` for directories, unsupported categories and unreadable files.
    pub fn get_preview(&self, entry: &FileEntry) -> Option<PreviewContent> {
        let provider = self.providers.iter().find(|p| p.can_preview(entry))?;
        match provider.generate_preview(entry) {
            Ok(content) => Some(content),
            Err(e) => {
                log::debug!("no preview for {}: {}", entry.path().display(), e);
                None
            }
        }
    }
}
