use crate::ops::segment_ops::cut_segment_at;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
}

impl Segment {
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time < self.end
    }
}

/// Contiguous segments covering `[0, duration]`, split by "Cut at Position".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutList {
    segments: Vec<Segment>,
}

impl CutList {
    pub fn new() -> Self {
        Self::default()
    }

    /// One segment spanning the whole source, or nothing before metadata.
    pub fn covering(duration: f64) -> Self {
        if duration.is_finite() && duration > 0.0 {
            Self {
                segments: vec![Segment {
                    start: 0.0,
                    end: duration,
                }],
            }
        } else {
            Self::new()
        }
    }

    /// Splits the segment containing `time`. Returns true if a split occurred.
    pub fn cut_at(&mut self, time: f64) -> bool {
        let Some(idx) = self.segments.iter().position(|s| s.contains(time)) else {
            return false;
        };
        match cut_segment_at(&self.segments[idx], time) {
            Some((left, right)) => {
                self.segments.splice(idx..=idx, [left, right]);
                true
            }
            None => false,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether any cut has been made.
    pub fn has_cuts(&self) -> bool {
        self.segments.len() > 1
    }

    /// Interior boundaries between segments, ascending.
    pub fn cut_points(&self) -> Vec<f64> {
        self.segments.iter().skip(1).map(|s| s.start).collect()
    }
}
