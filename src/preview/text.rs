// src/preview/text.rs
use super::*;
use crate::filesystem::FileCategory;
use std::fs;

pub struct TextPreview {
    max_lines: usize,
}

impl TextPreview {
    pub fn new() -> Self {
        TextPreview { max_lines: 500 }
    }
}

impl Default for TextPreview {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewProvider for TextPreview {
    fn can_preview(&self, entry: &FileEntry) -> bool {
        entry.category() == FileCategory::Text
    }

    fn generate_preview(&self, entry: &FileEntry) -> Result<PreviewContent, FsError> {
        let content = read_text_file(entry)?;
        let lines: Vec<&str> = content.lines().take(self.max_lines).collect();
        Ok(PreviewContent::Text(lines.join("\n")))
    }
}

/// Whole contents of a readable, non-directory entry.
pub fn read_text_file(entry: &FileEntry) -> Result<String, FsError> {
    if entry.is_dir() {
        return Err(FsError::IsADirectory(entry.path().to_path_buf()));
    }
    fs::read_to_string(entry.path()).map_err(|e| FsError::from_io(entry.path(), &e))
}
