//! Bike Rental Dashboard - daily rental statistics with interactive charts
//!
//! Loads the rental table once, then opens the dashboard window.

use anyhow::{anyhow, Context};
use bike_dashboard::data::DataLoader;
use bike_dashboard::gui::DashboardApp;
use bike_dashboard::logging;
use bike_dashboard::settings::Settings;
use eframe::egui;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load dashboard settings")?;
    logging::init(&settings.log_filter);

    // A missing or unreadable data file is fatal: no partial dashboard
    let table = DataLoader::new()
        .load_csv(&settings.data_path)
        .map_err(|e| {
            error!(path = %settings.data_path.display(), "{}", e);
            e
        })
        .with_context(|| format!("Cannot load rental data from {}", settings.data_path.display()))?;

    info!(rows = table.height(), "Starting dashboard");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Bike Rental Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Bike Rental Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, table, settings)))),
    )
    .map_err(|e| anyhow!("Dashboard window failed: {}", e))
}
