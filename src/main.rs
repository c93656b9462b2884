//! California Fire Dashboard - Wildfire incidents 2013 to 2019
//!
//! Loads the incident CSV once, then renders a fire map, the top-10 county
//! ranking and a yearly statistic for the year chosen in the sidebar.

mod charts;
mod config;
mod dashboard;
mod data;
mod export;
mod gui;
mod stats;

use anyhow::Context;
use config::{DashboardConfig, DEFAULT_CONFIG_PATH};
use dashboard::Dashboard;
use data::IncidentTable;
use eframe::egui;
use gui::FireDashboardApp;

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = DashboardConfig::load(DEFAULT_CONFIG_PATH).inspect_err(|e| {
        log::error!("{}", e);
    })?;

    let table = IncidentTable::load_csv(&config.csv_path)
        .inspect_err(|e| log::error!("{}", e))
        .with_context(|| format!("Cannot start without {}", config.csv_path.display()))?;

    let mut dashboard = Dashboard::new(table, config.map.clone());
    if let Err(e) = dashboard.warm() {
        log::warn!("Cache warm-up failed, computing on demand: {}", e);
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("California Fire Incidents"),
        ..Default::default()
    };

    let DashboardConfig {
        csv_path,
        export_dir,
        ..
    } = config;
    eframe::run_native(
        "California Fire Incidents",
        options,
        Box::new(move |cc| Ok(Box::new(FireDashboardApp::new(cc, dashboard, csv_path, export_dir)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {}", e))
}
