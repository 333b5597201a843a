// src/preview/image.rs
use super::*;
use crate::filesystem::FileCategory;
use std::process::Command;

pub struct ImagePreview {
    width: u32,
    height: u32,
}

impl ImagePreview {
    pub fn new() -> Self {
        ImagePreview { width: 80, height: 40 }
    }
}

impl Default for ImagePreview {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewProvider for ImagePreview {
    fn can_preview(&self, entry: &FileEntry) -> bool {
        entry.category() == FileCategory::Image
    }

    fn generate_preview(&self, entry: &FileEntry) -> Result<PreviewContent, FsError> {
        std::fs::metadata(entry.path()).map_err(|e| FsError::from_io(entry.path(), &e))?;

        if which::which("chafa").is_ok() {
            let size = format!("{}x{}", self.width, self.height);
            let output = Command::new("chafa")
                .args(["--size", &size])
                .arg(entry.path())
                .output();

            if let Ok(output) = output {
                if output.status.success() {
                    let ascii = String::from_utf8_lossy(&output.stdout).to_string();
                    return Ok(PreviewContent::Picture(ascii));
                }
            }
        }

        Ok(PreviewContent::Picture(format!(
            "[{} image, {}: install chafa for a terminal preview]",
            entry.extension().to_uppercase(),
            entry.formatted_size()
        )))
    }
}
