//! FlowVis - Main Entry Point
//!
//! Interactive editor for dataflow graphs of sensors and modules.

use flowvis_rs::{config::AppConfig, frontend::FlowVisApp};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,flowvis_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting FlowVis");

    let config = AppConfig::load_or_default();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("FlowVis"),
        ..Default::default()
    };

    eframe::run_native(
        "FlowVis",
        native_options,
        Box::new(|cc| Ok(Box::new(FlowVisApp::new(cc, config)))),
    )
}
