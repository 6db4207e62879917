/// Playback facts mirrored from the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Current position in seconds.
    pub current_time: f64,
    /// Total length in seconds; 0 until metadata has loaded.
    pub duration: f64,
    pub is_playing: bool,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self {
            current_time: 0.0,
            duration: 0.0,
            is_playing: false,
        }
    }

    pub fn has_duration(&self) -> bool {
        self.duration.is_finite() && self.duration > 0.0
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}
