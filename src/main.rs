mod app;
mod codec;
mod model;
mod store;

use std::fs::File;
use std::sync::Mutex;

use eframe::egui;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(log_file: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("railsketch=info"));

    let (file, file_error) = if log_file.is_empty() {
        (None, None)
    } else {
        match File::create(log_file) {
            Ok(file) => (Some(file), None),
            Err(e) => (None, Some(e)),
        }
    };
    let file_layer = file.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!("Cannot open log file {log_file}: {e}");
    }
}

fn main() -> eframe::Result<()> {
    let settings_path = app::config_path();
    let settings = app::load_settings(&settings_path).unwrap_or_default();
    init_tracing(&settings.log_file);
    tracing::info!("Settings from {settings_path}");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height])
            .with_title("RailSketch"),
        ..Default::default()
    };
    eframe::run_native(
        "RailSketch",
        native_options,
        Box::new(|cc| Ok(Box::new(app::RailSketchApp::new(cc, settings, settings_path)))),
    )
}
