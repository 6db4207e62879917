use std::path::PathBuf;
use std::process::ExitStatus;

use gstreamer as gst;
use thiserror::Error;

/// Errors produced by the editor, the intake and the playback/export backends.
#[derive(Error, Debug)]
pub enum TrimError {
    #[error("rejected {name}: media type {mime:?} is not a video type")]
    NotVideo { name: String, mime: String },

    #[error("no source is loaded")]
    NoSource,

    #[error("invalid time value: {0}")]
    InvalidTime(f64),

    #[error("trim interval out of order: start {start:.2}s, end {end:.2}s, duration {duration:.2}s")]
    UnorderedTrim { start: f64, end: f64, duration: f64 },

    #[error("trim interval is empty ({start:.2}s..{end:.2}s)")]
    EmptyRange { start: f64, end: f64 },

    #[error("playback error: {0}")]
    Playback(String),

    #[error("GStreamer error: {0}")]
    Glib(#[from] gst::glib::Error),

    #[error("GStreamer call failed: {0}")]
    GlibCall(#[from] gst::glib::BoolError),

    #[error("pipeline state change failed: {0}")]
    StateChange(#[from] gst::StateChangeError),

    #[error("ffmpeg exited with {status} while writing {}", output.display())]
    Ffmpeg { status: ExitStatus, output: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, TrimError>;
