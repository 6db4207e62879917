use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use gst::prelude::*;
use gst_pbutils::prelude::*;
use gstreamer as gst;
use gstreamer_pbutils as gst_pbutils;
use tracing::{debug, warn};

use crate::error::{Result, TrimError};
use crate::types::media::MediaInfo;

// Both run on the UI thread when a file is accepted, so each gets one short
// budget that covers all of its waits.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);
const POSTER_TIMEOUT: Duration = Duration::from_secs(2);
const POSTER_WIDTH: u32 = 320;
const POSTER_FILE: &str = "poster.png";

/// Reads duration and stream details with the GStreamer discoverer.
pub fn probe_media(uri: &str) -> Result<MediaInfo> {
    let discoverer = gst_pbutils::Discoverer::new(to_clock(PROBE_TIMEOUT))?;
    let info = discoverer.discover_uri(uri)?;

    let mut media = MediaInfo {
        duration: info.duration().map(|d| d.nseconds() as f64 / 1_000_000_000.0),
        has_audio: !info.audio_streams().is_empty(),
        ..MediaInfo::default()
    };
    if let Some(video) = info.video_streams().first() {
        media.resolution = Some((video.width(), video.height()));
        let rate = video.framerate();
        if rate.denom() > 0 && rate.numer() > 0 {
            media.frame_rate = Some(rate.numer() as f64 / rate.denom() as f64);
        }
        media.codec = video
            .caps()
            .and_then(|caps| caps.structure(0).map(|s| s.name().to_string()));
    }
    debug!(uri, ?media, "probed");
    Ok(media)
}

/// Renders one frame about a second in as a PNG inside `dir`.
pub fn extract_poster(source: &Path, dir: &Path) -> Result<PathBuf> {
    let poster = dir.join(POSTER_FILE);
    let pipeline_str = format!(
        "filesrc location=\"{}\" ! decodebin ! videoconvert ! videoscale ! video/x-raw,format=RGB,width={},pixel-aspect-ratio=1/1 ! pngenc snapshot=true ! filesink location=\"{}\"",
        source.display(),
        POSTER_WIDTH,
        poster.display()
    );
    let pipeline = gst::parse::launch(&pipeline_str)?
        .downcast::<gst::Pipeline>()
        .map_err(|_| TrimError::Playback("poster pipeline is not a gst::Pipeline".into()))?;

    let result = run_to_eos(&pipeline);
    pipeline.set_state(gst::State::Null).ok();
    result?;

    if poster.exists() {
        Ok(poster)
    } else {
        Err(TrimError::Playback("poster frame was not written".into()))
    }
}

fn to_clock(duration: Duration) -> gst::ClockTime {
    gst::ClockTime::from_nseconds(duration.as_nanos() as u64)
}

/// Time left before `deadline`, `None` once it has passed.
fn remaining(deadline: Instant, now: Instant) -> Option<Duration> {
    deadline.checked_duration_since(now).filter(|d| !d.is_zero())
}

fn run_to_eos(pipeline: &gst::Pipeline) -> Result<()> {
    let deadline = Instant::now() + POSTER_TIMEOUT;
    let timed_out = || TrimError::Playback("timed out waiting for poster frame".into());

    pipeline.set_state(gst::State::Paused)?;
    let (state_change, _, _) = pipeline.state(to_clock(POSTER_TIMEOUT));
    state_change?;
    if let Err(err) = pipeline.seek_simple(
        gst::SeekFlags::FLUSH | gst::SeekFlags::KEY_UNIT,
        gst::ClockTime::from_seconds(1),
    ) {
        // Sources shorter than a second keep their first frame.
        debug!(%err, "poster seek skipped");
    }
    pipeline.set_state(gst::State::Playing)?;

    let bus = pipeline
        .bus()
        .ok_or_else(|| TrimError::Playback("pipeline has no bus".into()))?;
    loop {
        let left = remaining(deadline, Instant::now()).ok_or_else(timed_out)?;
        let Some(msg) = bus.timed_pop(to_clock(left)) else {
            return Err(timed_out());
        };
        use gst::MessageView;
        match msg.view() {
            MessageView::Eos(..) => return Ok(()),
            MessageView::Error(err) => {
                warn!(error = %err.error(), "poster pipeline failed");
                return Err(TrimError::Glib(err.error()));
            }
            _ => (),
        }
    }
}

/// Decodes a poster PNG into tightly packed RGBA.
pub fn load_poster(path: &Path) -> Result<([usize; 2], Vec<u8>)> {
    let rgba = image::open(path)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok((size, rgba.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_poster_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(POSTER_FILE);
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();

        let (size, data) = load_poster(&path).unwrap();
        assert_eq!(size, [4, 2]);
        assert_eq!(data.len(), 4 * 2 * 4);
        assert_eq!(&data[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_remaining_budget() {
        let now = Instant::now();
        let deadline = now + Duration::from_millis(1500);
        assert_eq!(remaining(deadline, now), Some(Duration::from_millis(1500)));
        assert_eq!(remaining(deadline, deadline), None);
        assert_eq!(remaining(now, deadline), None);
        assert_eq!(to_clock(Duration::from_millis(250)), gst::ClockTime::from_mseconds(250));
    }

    #[test]
    fn test_load_poster_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_poster(&dir.path().join("nothing.png")).is_err());
    }
}
