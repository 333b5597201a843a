// src/filesystem/file.rs
use std::fmt;

use chrono::{Local, TimeZone};

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Human-readable size. Units are truncated, never rounded: 1535 bytes is "1 KB".
pub fn format_size(bytes: u64) -> String {
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{} KB", bytes / KB)
    } else if bytes < GB {
        format!("{} MB", bytes / MB)
    } else {
        format!("{} GB", bytes / GB)
    }
}

/// `dd/MM/yyyy HH:mm` in local time.
pub fn format_date(epoch_millis: i64) -> String {
    Local
        .timestamp_millis_opt(epoch_millis)
        .single()
        .map(|dt| dt.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    Directory,
    Text,
    Image,
    Audio,
    Video,
    Pdf,
    Document,
    Archive,
    Other,
}

impl FileCategory {
    /// Expects a lowercase extension without the dot.
    pub fn from_extension(extension: &str) -> Self {
        match extension {
            "txt" | "md" | "log" | "xml" | "json" => FileCategory::Text,
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "webp" => FileCategory::Image,
            "mp3" | "wav" | "ogg" | "m4a" => FileCategory::Audio,
            "mp4" | "avi" | "mkv" | "mov" => FileCategory::Video,
            "pdf" => FileCategory::Pdf,
            "doc" | "docx" => FileCategory::Document,
            "zip" | "rar" | "7z" => FileCategory::Archive,
            _ => FileCategory::Other,
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileCategory::Directory => "Folder",
            FileCategory::Text => "Text",
            FileCategory::Image => "Image",
            FileCategory::Audio => "Audio",
            FileCategory::Video => "Video",
            FileCategory::Pdf => "PDF",
            FileCategory::Document => "Document",
            FileCategory::Archive => "Archive",
            FileCategory::Other => "File",
        };
        write!(f, "{}", s)
    }
}

/// MIME type handed to external viewers. Unknown extensions get the wildcard.
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "txt" | "md" | "log" => "text/plain",
        "html" | "htm" => "text/html",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "zip" => "application/zip",
        "rar" => "application/x-rar-compressed",
        "7z" => "application/x-7z-compressed",
        _ => "*/*",
    }
}
