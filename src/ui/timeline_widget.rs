use eframe::egui::{self, StrokeKind};

use crate::ops::timeline_math::{self, TimelineMarkers};

const TIMELINE_HEIGHT: f32 = 36.0;
const MARKER_WIDTH: f32 = 4.0;
const PLAYHEAD_HANDLE: f32 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEvent {
    /// The control reported new seek values (only the first is meaningful).
    Seek(Vec<f64>),
}

/// Horizontal trim timeline: selected region, start/end markers, playhead.
pub struct TimelineWidget<'a> {
    markers: Option<TimelineMarkers>,
    duration: f64,
    step: f64,
    cut_points: &'a [f64],
}

impl<'a> TimelineWidget<'a> {
    pub fn new(markers: Option<TimelineMarkers>, duration: f64, step: f64) -> Self {
        Self {
            markers,
            duration,
            step,
            cut_points: &[],
        }
    }

    /// Cut positions to draw as thin ticks, seconds.
    pub fn with_cut_points(mut self, cut_points: &'a [f64]) -> Self {
        self.cut_points = cut_points;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> Vec<TimelineEvent> {
        let mut events = Vec::new();
        let size = egui::vec2(ui.available_width(), TIMELINE_HEIGHT);
        let enabled = timeline_math::is_renderable(self.duration) && self.markers.is_some();
        let sense = if enabled {
            egui::Sense::click_and_drag()
        } else {
            egui::Sense::hover()
        };
        let (rect, response) = ui.allocate_exact_size(size, sense);
        let painter = ui.painter_at(rect);

        painter.rect_filled(rect, 6.0, egui::Color32::from_gray(40));

        let Some(markers) = self.markers.map(|m| m.clamped()) else {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Waiting for duration…",
                egui::FontId::proportional(12.0),
                egui::Color32::GRAY,
            );
            return events;
        };

        // Selected region: left offset = start, right offset = 100 - end.
        let (left, right) = markers.region();
        let region = egui::Rect::from_min_max(
            egui::pos2(x_at_percent(rect, left), rect.top()),
            egui::pos2(rect.right() - percent_width(rect, right), rect.bottom()),
        );
        painter.rect_filled(region, 6.0, egui::Color32::from_rgba_unmultiplied(70, 130, 220, 90));
        painter.rect_stroke(
            region,
            6.0,
            egui::Stroke::new(1.0, egui::Color32::from_rgb(70, 130, 220)),
            StrokeKind::Inside,
        );

        for &cut in self.cut_points {
            if let Some(percent) = timeline_math::to_percent(cut, self.duration) {
                let x = x_at_percent(rect, percent.clamp(0.0, 100.0));
                painter.line_segment(
                    [egui::pos2(x, rect.top() + 6.0), egui::pos2(x, rect.bottom() - 6.0)],
                    egui::Stroke::new(1.0, egui::Color32::YELLOW),
                );
            }
        }

        for percent in [markers.start, markers.end] {
            let x = x_at_percent(rect, percent);
            let marker = egui::Rect::from_center_size(
                egui::pos2(x, rect.center().y),
                egui::vec2(MARKER_WIDTH, rect.height()),
            );
            painter.rect_filled(marker, 2.0, egui::Color32::from_rgb(70, 130, 220));
        }

        let playhead_x = x_at_percent(rect, markers.playhead);
        painter.line_segment(
            [egui::pos2(playhead_x, rect.top()), egui::pos2(playhead_x, rect.bottom())],
            egui::Stroke::new(2.0, egui::Color32::RED),
        );
        let handle_rect = egui::Rect::from_center_size(
            egui::pos2(playhead_x, rect.top() + PLAYHEAD_HANDLE / 2.0),
            egui::vec2(PLAYHEAD_HANDLE, PLAYHEAD_HANDLE),
        );
        painter.rect_filled(handle_rect, 6.0, egui::Color32::RED);

        if response.clicked() || response.dragged() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let fraction = fraction_at(rect, pointer.x);
                if let Some(time) = timeline_math::time_at_fraction(fraction, self.duration, self.step) {
                    events.push(TimelineEvent::Seek(vec![time]));
                }
            }
        }

        events
    }
}

fn percent_width(rect: egui::Rect, percent: f64) -> f32 {
    rect.width() * (percent / 100.0) as f32
}

fn x_at_percent(rect: egui::Rect, percent: f64) -> f32 {
    rect.left() + percent_width(rect, percent)
}

/// Pointer x as a fraction of the control width, clamped to `[0, 1]`.
fn fraction_at(rect: egui::Rect, x: f32) -> f64 {
    if rect.width() <= 0.0 {
        return 0.0;
    }
    (((x - rect.left()) / rect.width()) as f64).clamp(0.0, 1.0)
}
