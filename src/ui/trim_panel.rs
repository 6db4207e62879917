use eframe::egui;

use crate::ops::format::{format_size, format_time, format_time_precise};
use crate::types::media::{MediaInfo, SelectedFile};
use crate::types::session::{EditorCommand, EditorSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTab {
    #[default]
    Trim,
    Cut,
}

#[derive(Debug)]
pub enum PanelAction {
    Edit(EditorCommand),
    SaveTrim,
    SaveCuts,
}

/// Tabbed trim / cut controls under the preview.
pub fn trim_panel(
    ui: &mut egui::Ui,
    tab: &mut EditorTab,
    session: &EditorSession,
    input_step: f64,
) -> Vec<PanelAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        ui.selectable_value(tab, EditorTab::Trim, "✂ Trim");
        ui.selectable_value(tab, EditorTab::Cut, "🔪 Cut");
    });
    ui.separator();

    match tab {
        EditorTab::Trim => trim_tab(ui, session, input_step, &mut actions),
        EditorTab::Cut => cut_tab(ui, session, &mut actions),
    }
    actions
}

fn trim_tab(ui: &mut egui::Ui, session: &EditorSession, input_step: f64, actions: &mut Vec<PanelAction>) {
    let duration = session.playback().duration;
    let trim = session.trim();

    egui::Grid::new("trim_inputs")
        .num_columns(3)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label("Start");
            let mut start = trim.start;
            let response = ui.add(
                egui::DragValue::new(&mut start)
                    .range(0.0..=duration)
                    .speed(input_step)
                    .fixed_decimals(2)
                    .suffix(" s"),
            );
            if response.changed() {
                actions.push(PanelAction::Edit(EditorCommand::SetTrimStart(start)));
            }
            if ui.button("Set to Current").clicked() {
                actions.push(PanelAction::Edit(EditorCommand::SetTrimStartToCurrent));
            }
            ui.end_row();

            ui.label("End");
            let mut end = trim.end;
            let response = ui.add(
                egui::DragValue::new(&mut end)
                    .range(0.0..=duration)
                    .speed(input_step)
                    .fixed_decimals(2)
                    .suffix(" s"),
            );
            if response.changed() {
                actions.push(PanelAction::Edit(EditorCommand::SetTrimEnd(end)));
            }
            if ui.button("Set to Current").clicked() {
                actions.push(PanelAction::Edit(EditorCommand::SetTrimEndToCurrent));
            }
            ui.end_row();
        });

    ui.add_space(6.0);
    ui.label(format!(
        "Selection: {} to {} ({})",
        format_time(trim.start),
        format_time(trim.end),
        format_time_precise(trim.length()),
    ));

    ui.label(
        egui::RichText::new(format!("Out-of-order edits: {:?}", session.policy()))
            .size(11.0)
            .color(egui::Color32::GRAY),
    );

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        if ui.button("Reset").clicked() {
            actions.push(PanelAction::Edit(EditorCommand::ResetTrim));
        }
        let can_save = trim.is_valid_for(duration) && trim.length() > 0.0;
        if ui
            .add_enabled(can_save, egui::Button::new("💾 Save Trim"))
            .on_disabled_hover_text("Select a non-empty range first")
            .clicked()
        {
            actions.push(PanelAction::SaveTrim);
        }
    });
}

fn cut_tab(ui: &mut egui::Ui, session: &EditorSession, actions: &mut Vec<PanelAction>) {
    let cuts = session.cuts();

    ui.horizontal(|ui| {
        ui.label(format!("Current position: {}", format_time_precise(session.playback().current_time)));
        if ui
            .add_enabled(session.playback().has_duration(), egui::Button::new("Cut at Position"))
            .clicked()
        {
            actions.push(PanelAction::Edit(EditorCommand::CutAtPosition));
        }
    });
    ui.add_space(6.0);

    if cuts.segments().is_empty() {
        ui.label("Waiting for duration…");
        return;
    }

    egui_extras::TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(egui_extras::Column::auto()) // #
        .column(egui_extras::Column::auto()) // Start
        .column(egui_extras::Column::auto()) // End
        .column(egui_extras::Column::remainder()) // Length
        .column(egui_extras::Column::auto()) // Go
        .max_scroll_height(160.0)
        .header(20.0, |mut header| {
            header.col(|ui| { ui.strong("#"); });
            header.col(|ui| { ui.strong("Start"); });
            header.col(|ui| { ui.strong("End"); });
            header.col(|ui| { ui.strong("Length"); });
            header.col(|ui| { ui.strong(""); });
        })
        .body(|mut body| {
            for (index, segment) in cuts.segments().iter().enumerate() {
                body.row(22.0, |mut row| {
                    row.col(|ui| { ui.label(format!("{}", index + 1)); });
                    row.col(|ui| { ui.label(format_time_precise(segment.start)); });
                    row.col(|ui| { ui.label(format_time_precise(segment.end)); });
                    row.col(|ui| { ui.label(format_time_precise(segment.length())); });
                    row.col(|ui| {
                        if ui.small_button("▶").on_hover_text("Jump to segment").clicked() {
                            actions.push(PanelAction::Edit(EditorCommand::Seek(segment.start)));
                        }
                    });
                });
            }
        });

    ui.add_space(6.0);
    if ui
        .add_enabled(cuts.has_cuts(), egui::Button::new("💾 Save Cut Video"))
        .on_disabled_hover_text("Add at least one cut first")
        .clicked()
    {
        actions.push(PanelAction::SaveCuts);
    }
}

/// Source card: poster, name, size and probed stream details.
pub fn details_card(
    ui: &mut egui::Ui,
    file: &SelectedFile,
    info: Option<&MediaInfo>,
    poster: Option<&egui::TextureHandle>,
) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.horizontal(|ui| {
            if let Some(poster) = poster {
                let size = poster.size_vec2();
                let scale = 96.0 / size.x.max(1.0);
                ui.image((poster.id(), size * scale));
            }
            ui.vertical(|ui| {
                ui.strong(&file.file_name);
                for line in detail_lines(file, info) {
                    ui.label(line);
                }
            });
        });
    });
}

/// Text rows of the details card below the file name.
fn detail_lines(file: &SelectedFile, info: Option<&MediaInfo>) -> Vec<String> {
    let mut lines = vec![format!("{} · {}", format_size(file.size), file.mime_type)];
    let Some(info) = info else {
        return lines;
    };
    if let Some(duration) = info.duration {
        lines.push(format!("Duration {}", format_time(duration)));
    }
    if let Some((w, h)) = info.resolution {
        lines.push(format!("{}x{}", w, h));
    }
    if let Some(rate) = info.frame_rate {
        lines.push(format!("{:.2} fps", rate));
    }
    if let Some(codec) = &info.codec {
        lines.push(codec.clone());
    }
    lines.push(if info.has_audio { "With audio" } else { "No audio" }.to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn clip() -> SelectedFile {
        SelectedFile::new(
            "clip.mp4".to_string(),
            PathBuf::from("/videos/clip.mp4"),
            2048,
            "video/mp4".to_string(),
        )
    }

    #[test]
    fn test_detail_lines_without_probe() {
        assert_eq!(detail_lines(&clip(), None), vec!["2.0 KB · video/mp4".to_string()]);
    }

    #[test]
    fn test_detail_lines_show_probed_duration() {
        let info = MediaInfo {
            duration: Some(65.4),
            resolution: Some((1920, 1080)),
            frame_rate: Some(30.0),
            codec: Some("video/x-h264".to_string()),
            has_audio: true,
        };
        let lines = detail_lines(&clip(), Some(&info));
        assert_eq!(
            lines,
            vec![
                "2.0 KB · video/mp4",
                "Duration 01:05",
                "1920x1080",
                "30.00 fps",
                "video/x-h264",
                "With audio",
            ]
        );
    }
}
