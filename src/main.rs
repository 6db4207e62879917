mod config;
mod error;
mod ops;
mod renderer;
mod types;
mod ui;

use eframe::egui;
use gstreamer as gst;
use tracing::{error, info};

use crate::config::EditorConfig;
use crate::ui::app::{AppState, TrimApp};

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // The window still opens so the failure can be shown; nothing touches
    // GStreamer while `gst_error` is set.
    let gst_error = gst::init().err().map(|err| {
        error!(%err, "failed to initialize GStreamer");
        err.to_string()
    });

    let config = EditorConfig::load();
    info!(?config, "starting");
    let (width, height) = config.window_size;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("ClipTrim")
            .with_inner_size([width, height])
            .with_min_inner_size([640.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "ClipTrim",
        native_options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(TrimApp::new(AppState::new(config, gst_error))))
        }),
    )
}
