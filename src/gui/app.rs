//! Fire Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::dashboard::Dashboard;
use crate::data::IncidentTable;
use crate::export::export_artifacts;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::PathBuf;

/// Main application window.
pub struct FireDashboardApp {
    dashboard: Dashboard,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    csv_path: PathBuf,
    export_dir: PathBuf,
}

impl FireDashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        dashboard: Dashboard,
        csv_path: PathBuf,
        export_dir: PathBuf,
    ) -> Self {
        let mut app = Self {
            dashboard,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            csv_path,
            export_dir,
        };
        app.rerender();
        app
    }

    /// Recompute every artifact for the current control panel state.
    fn rerender(&mut self) {
        let state = self.control_panel.state;
        log::debug!("Rendering {:?}", state);
        self.chart_viewer.set_artifacts(self.dashboard.render(state));
    }

    /// Re-read the CSV; cached subsets and series of the old table are dropped.
    fn handle_reload(&mut self) {
        match IncidentTable::load_csv(&self.csv_path) {
            Ok(table) => {
                let rows = table.height();
                self.dashboard.replace_table(table);
                self.control_panel
                    .set_status(&format!("Reloaded {} incidents", rows));
                self.rerender();
            }
            Err(e) => {
                log::error!("Reload failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    /// Handle chart export - ask for a folder, write PNGs and summary, open the folder
    fn handle_export(&mut self) {
        let Some(artifacts) = &self.chart_viewer.artifacts else {
            self.control_panel.set_status("No charts to export");
            return;
        };

        let dir = match rfd::FileDialog::new()
            .set_directory(&self.export_dir)
            .pick_folder()
        {
            Some(dir) => dir,
            None => return, // User cancelled
        };

        match export_artifacts(self.dashboard.table(), artifacts, &dir) {
            Ok(report) => {
                self.control_panel.set_status(&format!(
                    "Exported {} files to {}",
                    report.files.len(),
                    report.dir.display()
                ));
                if let Err(e) = open::that(&report.dir) {
                    log::warn!("Could not open {}: {}", report.dir.display(), e);
                }
                self.export_dir = dir;
            }
            Err(e) => {
                log::error!("Export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for FireDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(360.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::StateChanged => self.rerender(),
                        ControlPanelAction::Export => self.handle_export(),
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
