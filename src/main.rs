mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::RtoDashboardApp;
use crate::config::Settings;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = Settings::resolve(std::env::args());

    // The dashboard has nothing to show without its dataset.
    let dataset = match data::cache::load_cached(&settings.data_path) {
        Ok(ds) => ds,
        Err(e) => {
            log::error!("Failed to load {}: {e:#}", settings.data_path.display());
            eprintln!(
                "error: cannot load RTO data from {}: {e:#}",
                settings.data_path.display()
            );
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window.width, settings.window.height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "RTO Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(RtoDashboardApp::new(dataset)))),
    )
}
