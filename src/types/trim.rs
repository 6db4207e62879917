use serde::{Deserialize, Serialize};

use crate::error::{Result, TrimError};

/// What a start/end edit does when it would break `0 <= start <= end <= duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimPolicy {
    /// Pull the edited edge into its legal range.
    #[default]
    Clamp,
    /// Clamp to `[0, duration]`, then exchange the edges if they crossed.
    Swap,
    /// Refuse the edit and leave the interval untouched.
    Reject,
    /// Store the raw value.
    Unchecked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimEdge {
    Start,
    End,
}

/// The `[start, end]` sub-range of the source intended for export, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrimRange {
    pub start: f64,
    pub end: f64,
}

impl TrimRange {
    /// The interval covering the whole source.
    pub fn full(duration: f64) -> Self {
        Self {
            start: 0.0,
            end: duration.max(0.0),
        }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }

    /// Whether the interval satisfies every bound for `duration`.
    pub fn is_valid_for(&self, duration: f64) -> bool {
        self.start >= 0.0 && self.is_ordered() && self.end <= duration
    }

    /// Moves one edge to `value` under `policy`.
    ///
    /// On `Err` the range is unchanged.
    pub fn set_edge(
        &mut self,
        edge: TrimEdge,
        value: f64,
        duration: f64,
        policy: TrimPolicy,
    ) -> Result<()> {
        if !value.is_finite() {
            return Err(TrimError::InvalidTime(value));
        }
        let duration = duration.max(0.0);

        match policy {
            TrimPolicy::Unchecked => self.assign(edge, value),
            TrimPolicy::Clamp => {
                let clamped = match edge {
                    TrimEdge::Start => value.clamp(0.0, self.end.clamp(0.0, duration)),
                    TrimEdge::End => value.clamp(self.start.clamp(0.0, duration), duration),
                };
                self.assign(edge, clamped);
            }
            TrimPolicy::Swap => {
                self.assign(edge, value.clamp(0.0, duration));
                if self.start > self.end {
                    std::mem::swap(&mut self.start, &mut self.end);
                }
            }
            TrimPolicy::Reject => {
                let mut candidate = *self;
                candidate.assign(edge, value);
                if !candidate.is_valid_for(duration) {
                    return Err(TrimError::UnorderedTrim {
                        start: candidate.start,
                        end: candidate.end,
                        duration,
                    });
                }
                *self = candidate;
            }
        }
        Ok(())
    }

    fn assign(&mut self, edge: TrimEdge, value: f64) {
        match edge {
            TrimEdge::Start => self.start = value,
            TrimEdge::End => self.end = value,
        }
    }
}
