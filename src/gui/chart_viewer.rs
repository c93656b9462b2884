//! Chart Viewer Widget
//! Central scrollable panel showing the map, county ranking and yearly analysis.

use crate::charts::ChartPlotter;
use crate::dashboard::DashboardArtifacts;
use egui::{Color32, RichText, ScrollArea};

const MAP_HEIGHT: f32 = 520.0;
const CHART_HEIGHT: f32 = 360.0;
const SECTION_SPACING: f32 = 20.0;

/// Displays the artifacts of the latest render.
#[derive(Default)]
pub struct ChartViewer {
    pub artifacts: Option<DashboardArtifacts>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_artifacts(&mut self, artifacts: DashboardArtifacts) {
        self.artifacts = Some(artifacts);
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let Some(artifacts) = &self.artifacts else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for line in artifacts.title.lines() {
                    ui.label(RichText::new(line).size(28.0).strong());
                }
                ui.add_space(SECTION_SPACING);

                Self::section_header(ui, &artifacts.map_header, &artifacts.map_caption);
                ChartPlotter::draw_fire_map(ui, &artifacts.fire_map, MAP_HEIGHT);
                ui.label(
                    RichText::new(format!("{} incidents", artifacts.fire_map.markers.len()))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
                ui.add_space(SECTION_SPACING);

                Self::section_header(ui, &artifacts.top_header, &artifacts.top_caption);
                ChartPlotter::draw_top_counties(ui, &artifacts.top_counties, CHART_HEIGHT);
                ui.add_space(SECTION_SPACING);

                ui.label(RichText::new(&artifacts.analysis_header).size(20.0).strong());
                ui.add_space(5.0);
                ChartPlotter::draw_yearly_chart(ui, &artifacts.yearly, CHART_HEIGHT);
                ui.add_space(SECTION_SPACING);
            });
    }

    fn section_header(ui: &mut egui::Ui, header: &str, caption: &str) {
        ui.label(RichText::new(header).size(20.0).strong());
        ui.label(RichText::new(caption).size(13.0));
        ui.add_space(5.0);
    }
}
