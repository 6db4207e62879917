//! Mapping between media time and proportional timeline positions.
//!
//! Everything here is pure. A duration that is zero, negative or not finite
//! means metadata has not arrived yet; the mapping functions report that as
//! `None` instead of producing `NaN` positions.

/// Granularity of the seek control, in seconds.
pub const SEEK_STEP: f64 = 0.01;

/// Position of `time` as a percentage of `duration`.
///
/// Not clamped: a time outside `[0, duration]` maps outside `[0, 100]`.
pub fn to_percent(time: f64, duration: f64) -> Option<f64> {
    if !duration.is_finite() || duration <= 0.0 || !time.is_finite() {
        return None;
    }
    Some(time / duration * 100.0)
}

/// Whether markers can be positioned for this duration.
pub fn is_renderable(duration: f64) -> bool {
    duration.is_finite() && duration > 0.0
}

/// Percent positions of the three timeline markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineMarkers {
    pub start: f64,
    pub end: f64,
    pub playhead: f64,
}

impl TimelineMarkers {
    /// Highlighted trim region as `(left, right)` insets, both in percent.
    pub fn region(&self) -> (f64, f64) {
        (self.start, 100.0 - self.end)
    }

    /// The same markers with every position pulled into `[0, 100]` for drawing.
    pub fn clamped(&self) -> Self {
        Self {
            start: self.start.clamp(0.0, 100.0),
            end: self.end.clamp(0.0, 100.0),
            playhead: self.playhead.clamp(0.0, 100.0),
        }
    }
}

pub fn markers(start: f64, end: f64, current: f64, duration: f64) -> Option<TimelineMarkers> {
    Some(TimelineMarkers {
        start: to_percent(start, duration)?,
        end: to_percent(end, duration)?,
        playhead: to_percent(current, duration)?,
    })
}

/// Rounds `time` to the nearest multiple of `step`.
pub fn snap_to_step(time: f64, step: f64) -> f64 {
    if step <= 0.0 || !step.is_finite() {
        return time;
    }
    (time / step).round() * step
}

/// Maps a horizontal pointer fraction on the seek control back to a time.
///
/// The fraction is clamped to `[0, 1]` and the result snapped to `step`,
/// then clamped again so snapping can never leave `[0, duration]`.
pub fn time_at_fraction(fraction: f64, duration: f64, step: f64) -> Option<f64> {
    if !is_renderable(duration) || !fraction.is_finite() {
        return None;
    }
    let raw = fraction.clamp(0.0, 1.0) * duration;
    Some(snap_to_step(raw, step).clamp(0.0, duration))
}

/// The seek control reports a list of handle values; only the first is used.
pub fn seek_target(values: &[f64]) -> Option<f64> {
    values.first().copied().filter(|v| v.is_finite())
}
