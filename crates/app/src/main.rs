//! PDF Annotator
//!
//! egui desktop shell: open a PDF, page through it and draw on an overlay
//! aligned to the rendered page.

mod app;
mod overlay;

use app::AnnotatorApp;
use pdf_annotator_core::{AnnotatorConfig, FileHandle};
use tracing::warn;

fn setup_logging() {
    use tracing_subscriber::prelude::*;

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true);

    // RUST_LOG wins; otherwise info globally and debug for our crates
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("info,pdf_annotator=debug,pdf_annotator_core=debug")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .init();
}

fn main() -> eframe::Result {
    setup_logging();

    let config = AnnotatorConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring invalid configuration, using defaults");
        AnnotatorConfig::default()
    });

    // Optional PDF path as the first argument
    let initial_file = std::env::args_os().nth(1).map(FileHandle::new);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_drag_and_drop(true)
            .with_title("PDF Annotator"),
        ..Default::default()
    };

    eframe::run_native(
        "PDF Annotator",
        options,
        Box::new(move |_cc| Ok(Box::new(AnnotatorApp::new(&config, initial_file)))),
    )
}
