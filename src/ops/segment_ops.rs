use crate::types::cut_list::Segment;

/// Cuts a segment at the given playhead position, returning the two halves.
/// Returns None if the playhead is on or outside the segment's bounds.
pub fn cut_segment_at(segment: &Segment, playhead: f64) -> Option<(Segment, Segment)> {
    if !playhead.is_finite() || playhead <= segment.start || playhead >= segment.end {
        return None;
    }

    let left = Segment {
        start: segment.start,
        end: playhead,
    };
    let right = Segment {
        start: playhead,
        end: segment.end,
    };
    Some((left, right))
}
