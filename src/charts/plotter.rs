//! Chart Plotter Module
//! Interactive map and chart widgets drawn with egui_plot.

use super::map::{FireMap, CALIFORNIA_OUTLINE};
use super::palette::{BarColor, Rgb};
use crate::stats::{ChartKind, CountyAcres, YearlySeries};
use egui::{Color32, Stroke};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points, Polygon};

/// Vertices used to approximate each map circle
const CIRCLE_SEGMENTS: usize = 32;
const OUTLINE_COLOR: Color32 = Color32::from_rgb(90, 90, 90);

/// Top-10 county ranking for one year, drawn in the selected color.
#[derive(Debug, Clone, PartialEq)]
pub struct TopCountiesChart {
    pub year: i32,
    pub counties: Vec<CountyAcres>,
    pub color: BarColor,
}

/// A yearly aggregate and how to draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyChart {
    pub series: YearlySeries,
    pub kind: ChartKind,
}

impl YearlyChart {
    pub fn new(series: YearlySeries) -> Self {
        let kind = series.analysis.chart_kind();
        Self { series, kind }
    }
}

pub fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// Draws dashboard artifacts into egui.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Fire map: California outline plus one filled circle per incident.
    /// Hovering a marker shows its popup text.
    pub fn draw_fire_map(ui: &mut egui::Ui, map: &FireMap, height: f32) {
        let width = ui.available_width();
        let bounds = map.view_bounds(f64::from(width), f64::from(height));
        let color = to_color32(map.color);

        Plot::new(format!("fire_map_{}", map.year))
            .height(height)
            .data_aspect(map.aspect() as f32)
            .include_x(bounds.min_lon)
            .include_x(bounds.max_lon)
            .include_y(bounds.min_lat)
            .include_y(bounds.max_lat)
            .x_axis_label("Longitude")
            .y_axis_label("Latitude")
            .allow_scroll(false)
            .show_grid(false)
            .label_formatter(|name, value| {
                if name.is_empty() {
                    format!("{:.3}, {:.3}", value.y, value.x)
                } else {
                    name.to_string()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(CALIFORNIA_OUTLINE.iter().copied()))
                        .color(OUTLINE_COLOR)
                        .width(1.0),
                );

                for marker in &map.markers {
                    if marker.radius_m > 0.0 {
                        plot_ui.polygon(
                            Polygon::new(PlotPoints::new(marker.outline(CIRCLE_SEGMENTS)))
                                .fill_color(color.gamma_multiply(0.35))
                                .stroke(Stroke::new(1.0, color)),
                        );
                    }
                    plot_ui.points(
                        Points::new(vec![[marker.longitude, marker.latitude]])
                            .radius(1.5)
                            .color(color)
                            .name(&marker.popup),
                    );
                }
            });
    }

    /// Bar chart of the year's top counties. X-axis: county, Y-axis: acres burned.
    pub fn draw_top_counties(ui: &mut egui::Ui, chart: &TopCountiesChart, height: f32) {
        let color = to_color32(chart.color.rgb());
        let labels: Vec<String> = chart.counties.iter().map(|c| c.county.clone()).collect();

        let bars: Vec<Bar> = chart
            .counties
            .iter()
            .enumerate()
            .map(|(i, c)| {
                Bar::new(i as f64, c.acres)
                    .name(&c.county)
                    .width(0.6)
                    .fill(color)
            })
            .collect();

        Plot::new(format!("top_counties_{}", chart.year))
            .height(height)
            .x_axis_label("County")
            .y_axis_label("Acres Burned")
            .allow_scroll(false)
            .allow_drag(false)
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (idx - mark.value).abs() < 1e-6 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(color));
            });
    }

    /// Yearly aggregate, as bars or as a line depending on the analysis.
    pub fn draw_yearly_chart(ui: &mut egui::Ui, chart: &YearlyChart, height: f32) {
        let color = to_color32(BarColor::Blue.rgb());
        let label = chart.series.analysis.label();

        Plot::new(format!("yearly_{:?}", chart.series.analysis))
            .height(height)
            .x_axis_label("ArchiveYear")
            .y_axis_label(label)
            .allow_scroll(false)
            .allow_drag(false)
            .include_y(0.0)
            .x_axis_formatter(|mark, _range| {
                if (mark.value - mark.value.round()).abs() < 1e-6 {
                    format!("{:.0}", mark.value)
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| match chart.kind {
                ChartKind::Bar => {
                    let bars: Vec<Bar> = chart
                        .series
                        .points
                        .iter()
                        .map(|p| {
                            Bar::new(f64::from(p.year), p.value)
                                .name(p.year.to_string())
                                .width(0.6)
                        })
                        .collect();
                    plot_ui.bar_chart(BarChart::new(bars).color(color).name(label));
                }
                ChartKind::Line => {
                    let points: Vec<[f64; 2]> = chart
                        .series
                        .points
                        .iter()
                        .map(|p| [f64::from(p.year), p.value])
                        .collect();
                    plot_ui.line(
                        Line::new(PlotPoints::new(points.clone()))
                            .color(color)
                            .width(2.0)
                            .name(label),
                    );
                    plot_ui.points(Points::new(points).radius(3.0).color(color));
                }
            });
    }
}
