use std::path::{Path, PathBuf};
use std::time::Duration;

use eframe::egui;
use tracing::{error, info, warn};

use crate::config::EditorConfig;
use crate::error::{Result, TrimError};
use crate::ops::video_funcs::{export_segments, trim_video_ffmpeg};
use crate::renderer::probe::{extract_poster, load_poster, probe_media};
use crate::renderer::surface::PlayerEvent;
use crate::types::intake::{Accepted, FileIntake};
use crate::types::media::{MediaInfo, SelectedFile};
use crate::types::session::{EditorCommand, EditorSession};
use crate::types::source::SourceRegistry;
use crate::ui::timeline_widget::{TimelineEvent, TimelineWidget};
use crate::ui::trim_panel::{EditorTab, PanelAction, details_card, trim_panel};
use crate::ui::uploader::{UploaderAction, dropped_to_selected, uploader_panel};
use crate::ui::video_player::VideoPlayer;

const IDLE_POLL: Duration = Duration::from_millis(100);

pub struct AppState {
    pub config: EditorConfig,
    pub registry: SourceRegistry,
    pub intake: FileIntake,
    pub session: EditorSession,
    pub video_player: VideoPlayer,
    pub tab: EditorTab,
    pub media_info: Option<MediaInfo>,
    pub poster: Option<egui::TextureHandle>,
    pub status: Option<String>,
    /// Why GStreamer could not start; previews are refused while set.
    pub gst_error: Option<String>,
}

impl AppState {
    pub fn new(config: EditorConfig, gst_error: Option<String>) -> Self {
        Self {
            session: EditorSession::new(config.trim_policy),
            video_player: VideoPlayer::new(config.frame_cache_frames, gst_error.is_none()),
            registry: SourceRegistry::new(),
            intake: FileIntake::new(),
            tab: EditorTab::default(),
            media_info: None,
            poster: None,
            status: gst_error
                .as_ref()
                .map(|err| format!("GStreamer is unavailable: {}", err)),
            gst_error,
            config,
        }
    }

    /// Applies a command and forwards the resulting surface commands.
    fn dispatch(&mut self, command: EditorCommand) {
        let commands = match self.session.dispatch(command) {
            Ok(commands) => commands,
            Err(err) => return self.report(err),
        };
        for command in &commands {
            if let Err(err) = self.video_player.execute(command) {
                self.report(err);
            }
        }
    }

    fn report(&mut self, err: TrimError) {
        error!(%err, "editor error");
        self.status = Some(err.to_string());
    }

    fn offer_path(&mut self, ctx: &egui::Context, path: &Path) {
        let accepted = SelectedFile::from_path(path).and_then(|file| self.intake.offer(file, &self.registry));
        match accepted {
            Ok(accepted) => self.accept(ctx, accepted),
            Err(err) => self.report(err),
        }
    }

    fn handle_drag_and_drop(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) =
            ctx.input(|i| (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone()));

        if hovering && !self.intake.is_dragging() {
            self.intake.drag_enter();
        } else if !hovering && dropped.is_empty() && self.intake.is_dragging() {
            self.intake.drag_leave();
        }
        if dropped.is_empty() {
            return;
        }

        let mut files = Vec::with_capacity(dropped.len());
        for file in &dropped {
            match dropped_to_selected(file) {
                Some(Ok(selected)) => files.push(selected),
                Some(Err(err)) => warn!(name = %file.name, %err, "unreadable dropped file"),
                None => warn!(name = %file.name, "dropped file has no path"),
            }
        }
        match self.intake.drop_files(files, &self.registry) {
            Ok(Some(accepted)) => self.accept(ctx, accepted),
            Ok(None) => {}
            Err(err) => self.report(err),
        }
    }

    /// Probes the new source, renders its poster and hands it to the session.
    fn accept(&mut self, ctx: &egui::Context, accepted: Accepted) {
        let Accepted { handle, file } = accepted;
        if let Some(err) = &self.gst_error {
            let err = TrimError::Playback(format!(
                "cannot preview {}: GStreamer is unavailable ({})",
                file.file_name, err
            ));
            self.intake.clear();
            return self.report(err);
        }
        self.status = None;

        self.media_info = match probe_media(handle.uri()) {
            Ok(info) => Some(info),
            Err(err) => {
                warn!(file = %file.file_name, %err, "could not probe media");
                None
            }
        };
        self.poster = match extract_poster(handle.path(), handle.scratch_dir()).and_then(|p| load_poster(&p)) {
            Ok((size, rgba)) => {
                let image = egui::ColorImage::from_rgba_unmultiplied(size, &rgba);
                Some(ctx.load_texture("poster", image, egui::TextureOptions::LINEAR))
            }
            Err(err) => {
                warn!(file = %file.file_name, %err, "no poster frame");
                None
            }
        };

        self.tab = EditorTab::Trim;
        self.dispatch(EditorCommand::LoadSource(handle));
    }

    fn new_video(&mut self) {
        self.dispatch(EditorCommand::ClearSource);
        self.intake.clear();
        self.media_info = None;
        self.poster = None;
        self.status = None;
    }

    fn export_dir(&self, source: &Path) -> Option<PathBuf> {
        self.config
            .export_dir
            .clone()
            .or_else(|| source.parent().map(Path::to_path_buf))
    }

    fn save_trim(&mut self) {
        let Some(input) = self.session.source().and_then(|s| self.registry.resolve(s.id())) else {
            return self.report(TrimError::NoSource);
        };
        let Some(file) = self.intake.selected() else {
            return self.report(TrimError::NoSource);
        };
        let default_name = format!("{}_trimmed.{}", file.stem(), file.extension());

        let mut dialog = rfd::FileDialog::new().set_file_name(&default_name);
        if let Some(dir) = self.export_dir(&input) {
            dialog = dialog.set_directory(dir);
        }
        let Some(output) = dialog.save_file() else {
            return;
        };

        let trim = self.session.trim();
        match trim_video_ffmpeg(&self.config.ffmpeg_binary, &input, &output, trim.start, trim.end) {
            Ok(()) => {
                info!(output = %output.display(), "trim saved");
                self.status = Some(format!("Saved {}", output.display()));
            }
            Err(err) => self.report(err),
        }
    }

    fn save_cuts(&mut self) {
        let Some(input) = self.session.source().and_then(|s| self.registry.resolve(s.id())) else {
            return self.report(TrimError::NoSource);
        };
        let Some(file) = self.intake.selected() else {
            return self.report(TrimError::NoSource);
        };
        let (stem, extension) = (file.stem(), file.extension());

        let mut dialog = rfd::FileDialog::new();
        if let Some(dir) = self.export_dir(&input) {
            dialog = dialog.set_directory(dir);
        }
        let Some(dir) = dialog.pick_folder() else {
            return;
        };

        let result: Result<Vec<PathBuf>> = export_segments(
            &self.config.ffmpeg_binary,
            &input,
            &dir,
            &stem,
            &extension,
            self.session.cuts().segments(),
        );
        match result {
            Ok(written) => {
                self.status = Some(format!("Saved {} parts to {}", written.len(), dir.display()));
            }
            Err(err) => self.report(err),
        }
    }
}

pub struct TrimApp {
    pub state: AppState,
}

impl TrimApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    fn show_uploader(&mut self, ctx: &egui::Context) {
        self.state.handle_drag_and_drop(ctx);

        let mut action = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            action = uploader_panel(ui, &self.state.intake, self.state.config.export_dir.as_ref());
            if let Some(status) = &self.state.status {
                ui.vertical_centered(|ui| {
                    ui.colored_label(egui::Color32::LIGHT_RED, status);
                });
            }
        });

        if let Some(UploaderAction::Picked(path)) = action {
            self.state.offer_path(ctx, &path);
        }
    }

    fn show_editor(&mut self, ctx: &egui::Context) {
        let mut new_video = false;
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Video Trimmer");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    new_video = ui.button("Upload New Video").clicked();
                });
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(self.state.status.as_deref().unwrap_or("Ready"));
        });

        let mut toggle = false;
        let mut timeline_events = Vec::new();
        let mut actions = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                let session = &self.state.session;
                toggle = self.state.video_player.show(ui, session.playback().is_playing);

                ui.horizontal(|ui| {
                    ui.monospace(format!("{} / {}", session.current_label(), session.duration_label()));
                });
                let cut_points = session.cuts().cut_points();
                timeline_events = TimelineWidget::new(
                    session.markers(),
                    session.playback().duration,
                    self.state.config.seek_step,
                )
                .with_cut_points(&cut_points)
                .show(ui);

                ui.add_space(8.0);
                actions = trim_panel(ui, &mut self.state.tab, session, self.state.config.trim_input_step);

                ui.add_space(8.0);
                if let Some(file) = self.state.intake.selected() {
                    details_card(ui, file, self.state.media_info.as_ref(), self.state.poster.as_ref());
                }
            });
        });

        if toggle {
            self.state.dispatch(EditorCommand::TogglePlayPause);
        }
        for event in timeline_events {
            match event {
                TimelineEvent::Seek(values) => self.state.dispatch(EditorCommand::SeekValues(values)),
            }
        }
        for action in actions {
            match action {
                PanelAction::Edit(command) => self.state.dispatch(command),
                PanelAction::SaveTrim => self.state.save_trim(),
                PanelAction::SaveCuts => self.state.save_cuts(),
            }
        }
        if new_video {
            self.state.new_video();
        }
    }
}

impl eframe::App for TrimApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for event in self.state.video_player.poll(ctx) {
            if let PlayerEvent::Failed(reason) = &event {
                self.state.status = Some(format!("Playback failed: {}", reason));
            }
            self.state.session.handle_event(event);
        }

        if self.state.session.source().is_some() {
            self.show_editor(ctx);
        } else {
            self.show_uploader(ctx);
        }

        if self.state.session.playback().is_playing {
            ctx.request_repaint();
        } else if self.state.video_player.is_loaded() {
            ctx.request_repaint_after(IDLE_POLL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_without_gstreamer_reports_instead_of_loading() {
        let tmp = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        let mut state = AppState::new(EditorConfig::default(), Some("no plugins".to_string()));
        assert!(state.status.as_deref().is_some_and(|s| s.contains("no plugins")));

        let file = SelectedFile::from_path(tmp.path()).unwrap();
        let accepted = state.intake.offer(file, &state.registry).unwrap();
        state.accept(&egui::Context::default(), accepted);

        assert!(state.session.source().is_none());
        assert!(state.intake.selected().is_none());
        assert_eq!(state.registry.live_count(), 0);
        assert!(state.status.as_deref().is_some_and(|s| s.contains("GStreamer is unavailable")));
    }
}
