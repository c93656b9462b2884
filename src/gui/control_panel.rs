//! Control Panel Widget
//! Left side panel with the year slider, color and analysis selectors.

use crate::charts::BarColor;
use crate::dashboard::{DashboardState, YEAR_RANGE};
use crate::stats::AnalysisType;
use egui::{Color32, RichText};

/// Left side control panel owning the user-selected parameters.
pub struct ControlPanel {
    pub state: DashboardState,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            state: DashboardState::default(),
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;
        let before = self.state;

        // ===== Year Section =====
        ui.add_space(5.0);
        ui.label(
            RichText::new("Show Fire Maps and Top 10 Acres Burned Counties By Year")
                .size(15.0)
                .strong(),
        );
        ui.add_space(8.0);

        ui.add(
            egui::Slider::new(&mut self.state.year, YEAR_RANGE)
                .step_by(1.0)
                .text("Select Year"),
        );

        ui.add_space(10.0);
        ui.label("Select a color:");
        for color in BarColor::ALL {
            ui.radio_value(&mut self.state.color, color, color.label());
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Analysis Section =====
        ui.label(
            RichText::new("Display Yearly Statistical Data Analysis Chart")
                .size(15.0)
                .strong(),
        );
        ui.add_space(8.0);
        ui.label("Select Analysis Type:");
        for analysis in AnalysisType::ALL {
            ui.radio_value(&mut self.state.analysis, analysis, analysis.label());
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export / Reload =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("Export Charts").size(14.0))
                .min_size(egui::vec2(150.0, 30.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::Export;
            }
            ui.add_space(5.0);
            if ui
                .button("Reload CSV")
                .on_hover_text("Read the incident file again and drop cached results")
                .clicked()
            {
                action = ControlPanelAction::Reload;
            }
        });

        ui.add_space(8.0);
        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        if action == ControlPanelAction::None && self.state != before {
            action = ControlPanelAction::StateChanged;
        }
        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    StateChanged,
    Export,
    Reload,
}
