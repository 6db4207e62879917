use eframe::egui;

use crate::error::Result;
use crate::renderer::gst_player::GstPlayer;
use crate::renderer::surface::{PlaybackSurface, PlayerEvent, SurfaceCommand};

/// A video player widget that displays frames from the playback pipeline.
pub struct VideoPlayer {
    player: GstPlayer,
    texture: Option<egui::TextureHandle>,
}

impl VideoPlayer {
    pub fn new(cache_frames: usize, gst_available: bool) -> Self {
        Self {
            player: GstPlayer::new(cache_frames, gst_available),
            texture: None,
        }
    }

    /// Forwards an editor command to the pipeline.
    pub fn execute(&mut self, command: &SurfaceCommand) -> Result<()> {
        if matches!(command, SurfaceCommand::Load { .. } | SurfaceCommand::Unload) {
            self.texture = None;
        }
        self.player.execute(command)
    }

    /// Collects pipeline events and uploads the newest frame, if any.
    pub fn poll(&mut self, ctx: &egui::Context) -> Vec<PlayerEvent> {
        let events = self.player.poll_events();
        self.update_texture(ctx);
        events
    }

    pub fn is_loaded(&self) -> bool {
        self.player.is_loaded()
    }

    /// Update the egui texture from the newest VideoFrame.
    fn update_texture(&mut self, ctx: &egui::Context) {
        let Some(frame) = self.player.take_new_frame() else {
            return;
        };
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [frame.width as usize, frame.height as usize],
            &frame.data,
        );
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("preview_frame", image, egui::TextureOptions::LINEAR));
            }
        }
    }

    /// Draws the frame letterboxed on black with a play/pause overlay.
    /// Returns true when the overlay button was clicked.
    pub fn show(&self, ui: &mut egui::Ui, is_playing: bool) -> bool {
        let width = ui.available_width();
        let size = egui::vec2(width, width * 9.0 / 16.0);
        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
        ui.painter().rect_filled(rect, 8.0, egui::Color32::BLACK);

        if let Some(texture) = &self.texture {
            let tex_size = texture.size_vec2();
            let scale = (rect.width() / tex_size.x).min(rect.height() / tex_size.y);
            let image_rect = egui::Rect::from_center_size(rect.center(), tex_size * scale);
            ui.painter().image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        } else {
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Loading preview…",
                egui::FontId::proportional(14.0),
                egui::Color32::GRAY,
            );
        }

        let button_rect = egui::Rect::from_center_size(
            egui::pos2(rect.center().x, rect.bottom() - 32.0),
            egui::vec2(40.0, 40.0),
        );
        let label = if is_playing { "⏸" } else { "▶" };
        let button = egui::Button::new(egui::RichText::new(label).size(18.0))
            .fill(egui::Color32::from_white_alpha(50))
            .corner_radius(20.0);
        ui.put(button_rect, button).on_hover_text(if is_playing { "Pause" } else { "Play" }).clicked()
    }
}
