use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::ops::timeline_math::SEEK_STEP;
use crate::types::trim::TrimPolicy;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CLIPTRIM_CONFIG";

/// User settings. Every field has a default, so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// How out-of-order trim edits are resolved.
    pub trim_policy: TrimPolicy,
    /// Granularity of the timeline seek control, seconds.
    pub seek_step: f64,
    /// Drag increment of the start/end inputs, seconds.
    pub trim_input_step: f64,
    /// Decoded frames kept for instant scrubbing.
    pub frame_cache_frames: usize,
    /// ffmpeg executable used by Save Trim / Save Cut Video.
    pub ffmpeg_binary: String,
    /// Folder the save dialogs open in.
    pub export_dir: Option<PathBuf>,
    pub window_size: (f32, f32),
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            trim_policy: TrimPolicy::default(),
            seek_step: SEEK_STEP,
            trim_input_step: 0.1,
            frame_cache_frames: 24,
            ffmpeg_binary: "ffmpeg".to_string(),
            export_dir: None,
            window_size: (1100.0, 720.0),
        }
    }
}

impl EditorConfig {
    /// Loads a config from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: EditorConfig = serde_json::from_str(&json)?;
        Ok(config.sanitized())
    }

    /// Loads the user's config, falling back to defaults when it is missing
    /// or unreadable.
    pub fn load() -> Self {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(explicit) => PathBuf::from(explicit),
            None => default_config_path(),
        };
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(config) => {
                info!(path = %path.display(), "config loaded");
                config
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Replaces nonsensical numeric values with their defaults.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.seek_step.is_finite() && self.seek_step > 0.0) {
            self.seek_step = defaults.seek_step;
        }
        if !(self.trim_input_step.is_finite() && self.trim_input_step > 0.0) {
            self.trim_input_step = defaults.trim_input_step;
        }
        if self.frame_cache_frames == 0 {
            self.frame_cache_frames = defaults.frame_cache_frames;
        }
        self
    }
}

/// `%APPDATA%\cliptrim\config.json` on Windows, `~/.config/cliptrim/config.json` elsewhere.
pub fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    let base = std::env::var("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir());
    #[cfg(not(target_os = "windows"))]
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .unwrap_or_else(|_| std::env::temp_dir());
    base.join("cliptrim").join("config.json")
}
