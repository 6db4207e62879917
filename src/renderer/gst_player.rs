use std::num::NonZeroUsize;

use gst::prelude::*;
use gstreamer as gst;
use gstreamer_app as gst_app;
use gstreamer_video as gst_video;
use lru::LruCache;
use tracing::{debug, error, info, warn};

use crate::error::{Result, TrimError};
use crate::renderer::surface::{PlaybackSurface, PlayerEvent};

#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub data: Vec<u8>, // Tightly packed RGBA
    pub width: u32,
    pub height: u32,
    pub timestamp: f64, // Time in seconds
}

/// Cache key for a frame timestamp: whole centiseconds, the seek step.
fn cache_key(seconds: f64) -> u64 {
    (seconds.max(0.0) * 100.0).round() as u64
}

fn clock_to_seconds(time: gst::ClockTime) -> f64 {
    time.nseconds() as f64 / 1_000_000_000.0
}

fn seconds_to_clock(seconds: f64) -> gst::ClockTime {
    gst::ClockTime::from_nseconds((seconds.max(0.0) * 1_000_000_000.0) as u64)
}

/// Playback surface backed by a GStreamer `playbin` whose video sink is an
/// `appsink` producing RGBA frames for the preview texture.
pub struct GstPlayer {
    /// Whether `gst::init` succeeded; no element may be built otherwise.
    available: bool,
    playbin: Option<gst::Element>,
    appsink: Option<gst_app::AppSink>,
    is_playing: bool,
    /// Reached end of stream; the next `play` rewinds to the start.
    ended: bool,
    metadata_sent: bool,
    last_position: Option<f64>,
    frame: Option<VideoFrame>,
    frame_dirty: bool,
    frame_cache: LruCache<u64, VideoFrame>,
}

impl GstPlayer {
    pub fn new(cache_frames: usize, available: bool) -> Self {
        let capacity = NonZeroUsize::new(cache_frames).unwrap_or(NonZeroUsize::MIN);
        Self {
            available,
            playbin: None,
            appsink: None,
            is_playing: false,
            ended: false,
            metadata_sent: false,
            last_position: None,
            frame: None,
            frame_dirty: false,
            frame_cache: LruCache::new(capacity),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.playbin.is_some()
    }

    /// The newest frame, if it has not been handed out yet.
    pub fn take_new_frame(&mut self) -> Option<&VideoFrame> {
        if !self.frame_dirty {
            return None;
        }
        self.frame_dirty = false;
        self.frame.as_ref()
    }

    fn build_pipeline(uri: &str) -> Result<(gst::Element, gst_app::AppSink)> {
        let playbin = gst::ElementFactory::make("playbin")
            .name("preview")
            .property("uri", uri)
            .build()?;

        let caps = gst_video::VideoCapsBuilder::new()
            .format(gst_video::VideoFormat::Rgba)
            .build();
        let appsink = gst::ElementFactory::make("appsink")
            .name("frames")
            .build()?
            .downcast::<gst_app::AppSink>()
            .map_err(|_| TrimError::Playback("appsink element has an unexpected type".into()))?;
        appsink.set_caps(Some(&caps));
        appsink.set_max_buffers(1);
        appsink.set_drop(true);

        playbin.set_property("video-sink", &appsink);
        Ok((playbin, appsink))
    }

    fn drain_bus(&mut self, events: &mut Vec<PlayerEvent>) {
        let Some(bus) = self.playbin.as_ref().and_then(|p| p.bus()) else {
            return;
        };
        while let Some(msg) = bus.pop() {
            use gst::MessageView;
            match msg.view() {
                MessageView::Eos(..) => {
                    info!("end of stream");
                    if let Some(playbin) = &self.playbin {
                        if let Err(err) = playbin.set_state(gst::State::Paused) {
                            warn!(%err, "failed to pause at end of stream");
                        }
                    }
                    self.mark_ended();
                    events.push(PlayerEvent::Ended);
                }
                MessageView::Error(err) => {
                    error!(
                        source = ?err.src().map(|s| s.path_string()),
                        error = %err.error(),
                        debug = ?err.debug(),
                        "pipeline error"
                    );
                    self.is_playing = false;
                    events.push(PlayerEvent::Failed(err.error().to_string()));
                }
                MessageView::Warning(w) => {
                    warn!(error = %w.error(), "pipeline warning");
                }
                _ => (),
            }
        }
    }

    fn mark_ended(&mut self) {
        self.is_playing = false;
        self.ended = true;
    }

    /// Start position for the next `play`: zero after end of stream.
    fn resume_from(&self) -> Option<gst::ClockTime> {
        self.ended.then_some(gst::ClockTime::ZERO)
    }

    fn query_times(&mut self, events: &mut Vec<PlayerEvent>) {
        let Some(playbin) = &self.playbin else {
            return;
        };
        if !self.metadata_sent {
            if let Some(duration) = playbin.query_duration::<gst::ClockTime>() {
                self.metadata_sent = true;
                events.push(PlayerEvent::MetadataLoaded(clock_to_seconds(duration)));
            }
        }
        if let Some(position) = playbin.query_position::<gst::ClockTime>() {
            let seconds = clock_to_seconds(position);
            if self.last_position != Some(seconds) {
                self.last_position = Some(seconds);
                events.push(PlayerEvent::TimeUpdated(seconds));
            }
        }
    }

    fn pull_frame(&mut self) {
        let Some(appsink) = &self.appsink else {
            return;
        };
        let sample = if self.is_playing {
            appsink.try_pull_sample(gst::ClockTime::ZERO)
        } else {
            appsink.try_pull_preroll(gst::ClockTime::ZERO)
        };
        let Some(sample) = sample else {
            return;
        };
        let Some(frame) = frame_from_sample(&sample) else {
            debug!("sample without a mappable RGBA buffer");
            return;
        };
        if self.frame.as_ref().map(|f| f.timestamp) == Some(frame.timestamp) && !self.frame_dirty {
            return;
        }
        if !self.is_playing {
            self.frame_cache.put(cache_key(frame.timestamp), frame.clone());
        }
        self.frame = Some(frame);
        self.frame_dirty = true;
    }
}

/// Copies an RGBA sample into a tightly packed frame, dropping row padding.
fn frame_from_sample(sample: &gst::Sample) -> Option<VideoFrame> {
    let buffer = sample.buffer()?;
    let caps = sample.caps()?;
    let info = gst_video::VideoInfo::from_caps(caps).ok()?;
    let map = buffer.map_readable().ok()?;

    let width = info.width() as usize;
    let height = info.height() as usize;
    let stride = usize::try_from(*info.stride().first()?).ok()?;
    let row_bytes = width * 4;
    if stride < row_bytes {
        return None;
    }

    let mut data = Vec::with_capacity(row_bytes * height);
    for row in map.as_slice().chunks(stride).take(height) {
        data.extend_from_slice(row.get(..row_bytes)?);
    }
    if data.len() != row_bytes * height {
        return None;
    }

    Some(VideoFrame {
        data,
        width: info.width(),
        height: info.height(),
        timestamp: buffer.pts().map(clock_to_seconds).unwrap_or(0.0),
    })
}

impl PlaybackSurface for GstPlayer {
    fn load(&mut self, uri: &str) -> Result<()> {
        self.unload();
        if !self.available {
            return Err(TrimError::Playback("GStreamer is not initialized".into()));
        }
        let (playbin, appsink) = Self::build_pipeline(uri)?;
        if let Err(err) = playbin.set_state(gst::State::Paused) {
            playbin.set_state(gst::State::Null).ok();
            return Err(err.into());
        }
        info!(uri, "pipeline prerolling");
        self.playbin = Some(playbin);
        self.appsink = Some(appsink);
        Ok(())
    }

    fn unload(&mut self) {
        if let Some(playbin) = self.playbin.take() {
            if let Err(err) = playbin.set_state(gst::State::Null) {
                warn!(%err, "failed to stop pipeline");
            }
            debug!("pipeline released");
        }
        self.appsink = None;
        self.is_playing = false;
        self.ended = false;
        self.metadata_sent = false;
        self.last_position = None;
        self.frame = None;
        self.frame_dirty = false;
        self.frame_cache.clear();
    }

    fn play(&mut self) -> Result<()> {
        let playbin = self.playbin.as_ref().ok_or(TrimError::NoSource)?;
        if let Some(start) = self.resume_from() {
            debug!("rewinding after end of stream");
            playbin.seek_simple(gst::SeekFlags::FLUSH, start)?;
        }
        playbin.set_state(gst::State::Playing)?;
        self.is_playing = true;
        self.ended = false;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        let playbin = self.playbin.as_ref().ok_or(TrimError::NoSource)?;
        playbin.set_state(gst::State::Paused)?;
        self.is_playing = false;
        Ok(())
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        let playbin = self.playbin.as_ref().ok_or(TrimError::NoSource)?;
        playbin.seek_simple(
            gst::SeekFlags::FLUSH | gst::SeekFlags::ACCURATE,
            seconds_to_clock(seconds),
        )?;
        // A seek away from the end means `play` continues from there.
        self.ended = false;
        if let Some(frame) = self.frame_cache.get(&cache_key(seconds)) {
            self.frame = Some(frame.clone());
            self.frame_dirty = true;
        }
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<PlayerEvent> {
        let mut events = Vec::new();
        self.drain_bus(&mut events);
        self.query_times(&mut events);
        self.pull_frame();
        events
    }
}

impl Drop for GstPlayer {
    fn drop(&mut self) {
        self.unload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_centiseconds() {
        assert_eq!(cache_key(0.0), 0);
        assert_eq!(cache_key(1.234), 123);
        assert_eq!(cache_key(1.236), 124);
        assert_eq!(cache_key(-5.0), 0);
    }

    #[test]
    fn test_clock_conversion() {
        assert_eq!(seconds_to_clock(1.5), gst::ClockTime::from_mseconds(1500));
        assert_eq!(clock_to_seconds(gst::ClockTime::from_mseconds(2500)), 2.5);
        assert_eq!(seconds_to_clock(-1.0), gst::ClockTime::ZERO);
    }

    #[test]
    fn test_unloaded_player_rejects_commands() {
        let mut player = GstPlayer::new(4, true);
        assert!(!player.is_loaded());
        assert!(matches!(player.play(), Err(TrimError::NoSource)));
        assert!(matches!(player.pause(), Err(TrimError::NoSource)));
        assert!(matches!(player.seek(3.0), Err(TrimError::NoSource)));
        assert!(player.poll_events().is_empty());
        assert!(player.take_new_frame().is_none());
    }

    #[test]
    fn test_end_of_stream_rewinds_next_play() {
        let mut player = GstPlayer::new(4, true);
        assert_eq!(player.resume_from(), None);

        player.is_playing = true;
        player.mark_ended();
        assert!(!player.is_playing);
        assert_eq!(player.resume_from(), Some(gst::ClockTime::ZERO));

        player.unload();
        assert_eq!(player.resume_from(), None);
    }

    #[test]
    fn test_load_without_gstreamer_is_an_error() {
        let mut player = GstPlayer::new(4, false);
        let err = player.load("file:///tmp/clip.mp4").unwrap_err();
        assert!(matches!(err, TrimError::Playback(_)));
        assert!(!player.is_loaded());
    }
}
