use std::path::PathBuf;

use eframe::egui;

use crate::error::Result;
use crate::types::intake::{DragPhase, FileIntake};
use crate::types::media::{SelectedFile, VIDEO_EXTENSIONS};

const SUPPORTED_FORMATS: &str = "Supports MP4, WebM, MOV, AVI and other common formats";

#[derive(Debug, Clone, PartialEq)]
pub enum UploaderAction {
    /// A file chosen through the open dialog.
    Picked(PathBuf),
}

/// Describes a dropped file. `None` when the platform gave no path.
pub fn dropped_to_selected(dropped: &egui::DroppedFile) -> Option<Result<SelectedFile>> {
    let path = dropped.path.as_ref()?;
    Some(SelectedFile::with_declared_mime(path, &dropped.mime))
}

/// Drop zone plus picker shown while no source is loaded.
pub fn uploader_panel(
    ui: &mut egui::Ui,
    intake: &FileIntake,
    start_dir: Option<&PathBuf>,
) -> Option<UploaderAction> {
    let mut action = None;

    ui.vertical_centered(|ui| {
        ui.add_space(24.0);
        ui.heading("Video Trimmer");
        ui.label("Upload a video to trim it or cut it into parts");
        ui.add_space(16.0);

        let (fill, stroke, prompt) = match intake.drag_phase() {
            DragPhase::Dragging => (
                egui::Color32::from_rgba_unmultiplied(70, 130, 220, 40),
                egui::Color32::from_rgb(70, 130, 220),
                "Drop the video here",
            ),
            DragPhase::Idle => (
                egui::Color32::TRANSPARENT,
                egui::Color32::GRAY,
                "Drag and drop a video file",
            ),
        };

        let zone_width = ui.available_width().min(520.0);
        egui::Frame::new()
            .fill(fill)
            .stroke(egui::Stroke::new(2.0, stroke))
            .corner_radius(12.0)
            .inner_margin(egui::Margin::same(24))
            .show(ui, |ui| {
                ui.set_width(zone_width);
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new("🎬").size(36.0));
                    ui.label(egui::RichText::new(prompt).size(16.0));
                    ui.label("or");
                    if ui.button("Select Video").clicked() {
                        let mut dialog = rfd::FileDialog::new().add_filter("Video", VIDEO_EXTENSIONS);
                        if let Some(dir) = start_dir {
                            dialog = dialog.set_directory(dir);
                        }
                        if let Some(path) = dialog.pick_file() {
                            action = Some(UploaderAction::Picked(path));
                        }
                    }
                });
            });

        ui.add_space(12.0);
        ui.label(
            egui::RichText::new(SUPPORTED_FORMATS)
                .size(11.0)
                .color(egui::Color32::GRAY),
        );
    });

    action
}
