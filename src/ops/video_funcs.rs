use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{info, warn};

use crate::error::{Result, TrimError};
use crate::types::cut_list::Segment;

/// Arguments for a stream-copy trim of `[start, end]`.
///
/// `-ss` before `-i` seeks on the input so the output starts near `start`;
/// `-t` then bounds the length. Nothing is re-encoded.
pub fn trim_args(input: &Path, output: &Path, start: f64, end: f64) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-ss".to_string(),
        format!("{:.3}", start),
        "-i".to_string(),
        input.to_string_lossy().to_string(),
        "-t".to_string(),
        format!("{:.3}", end - start),
        "-c".to_string(),
        "copy".to_string(),
        "-avoid_negative_ts".to_string(),
        "make_zero".to_string(),
        output.to_string_lossy().to_string(),
    ]
}

/// Writes `[start, end]` of `input` to `output` using the ffmpeg CLI.
///
/// # Arguments
/// * `ffmpeg` - ffmpeg executable name or path.
/// * `input` - Path to the source video.
/// * `output` - Path of the file to write; overwritten if present.
/// * `start` - Start time in seconds.
/// * `end` - End time in seconds.
pub fn trim_video_ffmpeg(ffmpeg: &str, input: &Path, output: &Path, start: f64, end: f64) -> Result<()> {
    if !(start.is_finite() && end.is_finite()) || start < 0.0 || end <= start {
        return Err(TrimError::EmptyRange { start, end });
    }

    info!(input = %input.display(), output = %output.display(), start, end, "exporting trim");
    let status = Command::new(ffmpeg)
        .args(trim_args(input, output, start, end))
        .status()?;
    if !status.success() {
        warn!(%status, output = %output.display(), "ffmpeg failed");
        return Err(TrimError::Ffmpeg {
            status,
            output: output.to_path_buf(),
        });
    }
    Ok(())
}

/// Output path of the `index`-th (zero based) segment export.
pub fn segment_output_path(dir: &Path, stem: &str, extension: &str, index: usize) -> PathBuf {
    dir.join(format!("{}_part{}.{}", stem, index + 1, extension))
}

/// Writes every segment to `<stem>_part<N>.<ext>` inside `dir`.
///
/// Stops at the first failure; files already written are kept.
pub fn export_segments(
    ffmpeg: &str,
    input: &Path,
    dir: &Path,
    stem: &str,
    extension: &str,
    segments: &[Segment],
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(segments.len());
    for (index, segment) in segments.iter().enumerate() {
        let output = segment_output_path(dir, stem, extension, index);
        trim_video_ffmpeg(ffmpeg, input, &output, segment.start, segment.end)?;
        written.push(output);
    }
    info!(count = written.len(), dir = %dir.display(), "segments exported");
    Ok(written)
}
