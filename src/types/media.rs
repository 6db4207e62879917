use std::path::{Path, PathBuf};

use crate::error::Result;

/// Media type prefix a file must declare to be accepted as a source.
pub const VIDEO_MIME_PREFIX: &str = "video/";

/// Extensions offered by the open dialog. Advisory only: playback support is
/// whatever the installed GStreamer plugins can decode.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "webm", "mov", "avi", "mkv", "ogv", "mpg", "mpeg"];

/// A user-supplied file as the intake sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub file_name: String,
    pub path: PathBuf,
    pub size: u64,
    pub mime_type: String,
}

impl SelectedFile {
    pub fn new(file_name: String, path: PathBuf, size: u64, mime_type: String) -> Self {
        SelectedFile {
            file_name,
            path,
            size,
            mime_type,
        }
    }

    /// Describes a file on disk, inferring its media type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let size = std::fs::metadata(path)?.len();
        Ok(Self::new(
            file_name_of(path),
            path.to_path_buf(),
            size,
            mime_for_path(path).to_string(),
        ))
    }

    /// Describes a file with a platform-declared media type. An empty
    /// declaration falls back to the extension.
    pub fn with_declared_mime(path: &Path, declared: &str) -> Result<Self> {
        let mut file = Self::from_path(path)?;
        if !declared.trim().is_empty() {
            file.mime_type = declared.trim().to_ascii_lowercase();
        }
        Ok(file)
    }

    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with(VIDEO_MIME_PREFIX)
    }

    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "video".to_string())
    }

    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "mp4".to_string())
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Media type implied by a file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "mp4" => "video/mp4",
        "m4v" => "video/x-m4v",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "ogv" => "video/ogg",
        "mpg" | "mpeg" => "video/mpeg",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Stream details reported by the discoverer for the details card.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaInfo {
    pub duration: Option<f64>,
    pub resolution: Option<(u32, u32)>,
    pub frame_rate: Option<f64>,
    pub codec: Option<String>,
    pub has_audio: bool,
}
