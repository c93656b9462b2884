//! Chart Export Module
//! Saves the current dashboard view as PNG charts plus a JSON summary.

use crate::charts::{ChartRenderer, RenderError};
use crate::dashboard::DashboardArtifacts;
use crate::data::IncidentTable;
use crate::stats::{CountyAcres, YearlySeries};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SCATTER_FILE: &str = "incident_locations.png";
pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Failed to write summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// Files written by one export.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}

#[derive(Serialize)]
struct ExportSummary<'a> {
    year: i32,
    color: &'static str,
    analysis: &'static str,
    incidents: usize,
    map_markers: usize,
    top_counties: &'a [CountyAcres],
    yearly: &'a YearlySeries,
}

/// File names for the per-view charts.
pub fn chart_file_names(artifacts: &DashboardArtifacts) -> (String, String) {
    let year = artifacts.state.year;
    (
        format!("top_counties_{}.png", year),
        format!("yearly_{:?}.png", artifacts.state.analysis).to_lowercase(),
    )
}

/// Write the location scatter, both charts and `summary.json` into `dir`.
pub fn export_artifacts(
    table: &IncidentTable,
    artifacts: &DashboardArtifacts,
    dir: &Path,
) -> Result<ExportReport, ExportError> {
    fs::create_dir_all(dir)?;
    let (top_file, yearly_file) = chart_file_names(artifacts);

    let scatter_path = dir.join(SCATTER_FILE);
    ChartRenderer::render_location_scatter(table, &scatter_path)?;

    let top_path = dir.join(top_file);
    ChartRenderer::render_top_counties(&artifacts.top_counties, &top_path)?;

    let yearly_path = dir.join(yearly_file);
    ChartRenderer::render_yearly(&artifacts.yearly, &yearly_path)?;

    let summary_path = write_summary(table, artifacts, dir)?;

    log::info!("Exported charts to {}", dir.display());
    Ok(ExportReport {
        dir: dir.to_path_buf(),
        files: vec![scatter_path, top_path, yearly_path, summary_path],
    })
}

/// Write `summary.json` describing the exported view.
pub fn write_summary(
    table: &IncidentTable,
    artifacts: &DashboardArtifacts,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let summary = ExportSummary {
        year: artifacts.state.year,
        color: artifacts.state.color.label(),
        analysis: artifacts.state.analysis.label(),
        incidents: table.height(),
        map_markers: artifacts.fire_map.markers.len(),
        top_counties: &artifacts.top_counties.counties,
        yearly: &artifacts.yearly.series,
    };

    let path = dir.join(SUMMARY_FILE);
    fs::write(&path, serde_json::to_string_pretty(&summary)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapSettings;
    use crate::dashboard::{Dashboard, DashboardState};
    use crate::data::fixtures::scenario_table;
    use crate::stats::AnalysisType;

    #[test]
    fn summary_describes_the_view() {
        let table = scenario_table();
        let mut dashboard = Dashboard::new(table.clone(), MapSettings::default());
        let artifacts = dashboard.render(DashboardState {
            year: 2018,
            analysis: AnalysisType::AverageInjuries,
            ..DashboardState::default()
        });

        let dir = std::env::temp_dir().join(format!(
            "calfire_dashboard_export_{}",
            std::process::id()
        ));
        let path = write_summary(&table, &artifacts, &dir).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_dir_all(&dir);

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["year"], 2018);
        assert_eq!(json["analysis"], "Average Injuries of Major Incidents");
        assert_eq!(json["incidents"], 3);
        assert_eq!(json["map_markers"], 2);
        assert_eq!(json["top_counties"][0]["county"], "Butte");
        assert_eq!(json["top_counties"][0]["acres"], 150000.0);
        assert_eq!(json["yearly"]["analysis"], "AverageInjuries");
    }

    #[test]
    fn chart_names_include_year_and_analysis() {
        let mut dashboard = Dashboard::new(scenario_table(), MapSettings::default());
        let artifacts = dashboard.render(DashboardState {
            year: 2017,
            analysis: AnalysisType::MedianStructuresDamaged,
            ..DashboardState::default()
        });
        let (top, yearly) = chart_file_names(&artifacts);
        assert_eq!(top, "top_counties_2017.png");
        assert_eq!(yearly, "yearly_medianstructuresdamaged.png");
    }

    fn export_into(name: &str, state: DashboardState) -> (ExportReport, Vec<u64>) {
        let table = scenario_table();
        let mut dashboard = Dashboard::new(table.clone(), MapSettings::default());
        let artifacts = dashboard.render(state);

        let dir = std::env::temp_dir().join(format!(
            "calfire_dashboard_{}_{}",
            name,
            std::process::id()
        ));
        let report = export_artifacts(&table, &artifacts, &dir).unwrap();
        let sizes = report
            .files
            .iter()
            .map(|path| fs::metadata(path).map(|m| m.len()).unwrap_or(0))
            .collect();
        let _ = fs::remove_dir_all(&dir);
        (report, sizes)
    }

    #[test]
    fn exports_bar_analysis_files() {
        let (report, sizes) = export_into(
            "export_bar",
            DashboardState {
                year: 2018,
                analysis: AnalysisType::TotalAcresBurned,
                ..DashboardState::default()
            },
        );

        assert_eq!(report.files.len(), 4);
        assert!(report.files[0].ends_with(SCATTER_FILE));
        assert!(report.files[1].ends_with("top_counties_2018.png"));
        assert!(report.files[2].ends_with("yearly_totalacresburned.png"));
        assert!(report.files[3].ends_with(SUMMARY_FILE));
        assert!(sizes.iter().all(|&size| size > 0), "{:?}", sizes);
    }

    #[test]
    fn exports_line_analysis_files() {
        let (report, sizes) = export_into(
            "export_line",
            DashboardState {
                year: 2017,
                analysis: AnalysisType::MajorIncidentCount,
                ..DashboardState::default()
            },
        );

        assert!(report.files[2].ends_with("yearly_majorincidentcount.png"));
        assert_eq!(sizes.len(), 4);
        assert!(sizes.iter().all(|&size| size > 0), "{:?}", sizes);
    }

    #[test]
    fn exports_year_without_incidents() {
        let (report, sizes) = export_into(
            "export_empty",
            DashboardState {
                year: 2013,
                analysis: AnalysisType::MedianStructuresDamaged,
                ..DashboardState::default()
            },
        );

        assert!(report.files[1].ends_with("top_counties_2013.png"));
        assert_eq!(sizes.len(), 4);
        assert!(sizes.iter().all(|&size| size > 0), "{:?}", sizes);
    }
}
