//! Static Chart Renderer
//! Writes PNG versions of the dashboard charts with plotters.
//!
//! Three images are produced:
//! 1. Location scatter: every incident's longitude/latitude, unfiltered
//! 2. Top counties: bar chart in the selected color
//! 3. Yearly analysis: bar or line chart depending on the statistic

use super::plotter::{TopCountiesChart, YearlyChart};
use crate::dashboard::YEAR_RANGE;
use crate::data::{IncidentTable, LATITUDE, LONGITUDE};
use crate::stats::ChartKind;
use plotters::prelude::*;
use polars::prelude::PolarsError;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 800;
const FONT: &str = "sans-serif";

const SCATTER_TITLE: &str = "California Fire Incidents for Year 2013 to 2019";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart rendering failed: {0}")]
    Drawing(String),
    #[error("Failed to read chart data: {0}")]
    Data(#[from] PolarsError),
}

fn drawing_error<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

fn rgb(color: [u8; 3]) -> RGBColor {
    RGBColor(color[0], color[1], color[2])
}

/// Renders chart artifacts to image files.
pub struct ChartRenderer;

impl ChartRenderer {
    /// Scatter of every incident location, including the out-of-state outliers
    /// the map filter drops.
    pub fn render_location_scatter(table: &IncidentTable, path: &Path) -> Result<(), RenderError> {
        let latitudes = table.f64_column(LATITUDE)?;
        let longitudes = table.f64_column(LONGITUDE)?;
        let points: Vec<(f64, f64)> = longitudes
            .into_iter()
            .zip(latitudes)
            .filter_map(|(lon, lat)| Some((lon?, lat?)))
            .filter(|(lon, lat)| lon.is_finite() && lat.is_finite())
            .collect();

        let (x_range, y_range) = Self::padded_extent(&points);

        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(SCATTER_TITLE, (FONT, 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .x_desc("Longitude")
            .y_desc("Latitude")
            .draw()
            .map_err(drawing_error)?;

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 2, rgb([31, 119, 180]).mix(0.6).filled())),
            )
            .map_err(drawing_error)?;

        root.present().map_err(drawing_error)?;
        log::debug!("Wrote location scatter ({} points) to {}", points.len(), path.display());
        Ok(())
    }

    /// Bar chart of the top counties. County names are rotated under the bars.
    pub fn render_top_counties(chart: &TopCountiesChart, path: &Path) -> Result<(), RenderError> {
        let names: Vec<String> = chart.counties.iter().map(|c| c.county.clone()).collect();
        let segments = names.len().max(1) as i32;
        let y_max = Self::value_ceiling(chart.counties.iter().map(|c| c.acres));
        let color = rgb(chart.color.rgb());

        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        let mut ctx = ChartBuilder::on(&root)
            .caption(format!("Top 10 Counties in Year {}", chart.year), (FONT, 28))
            .margin(20)
            .x_label_area_size(140)
            .y_label_area_size(90)
            .build_cartesian_2d((0..segments).into_segmented(), 0f64..y_max)
            .map_err(drawing_error)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(names.len().max(1))
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                    names.get(*i as usize).cloned().unwrap_or_default()
                }
                SegmentValue::Last => String::new(),
            })
            .x_label_style((FONT, 14).into_font().transform(FontTransform::Rotate90))
            .x_desc("County")
            .y_desc("Acres Burned")
            .draw()
            .map_err(drawing_error)?;

        ctx.draw_series(
            Histogram::vertical(&ctx)
                .style(color.filled())
                .margin(8)
                .data(
                    chart
                        .counties
                        .iter()
                        .enumerate()
                        .map(|(i, c)| (i as i32, c.acres)),
                ),
        )
        .map_err(drawing_error)?;

        root.present().map_err(drawing_error)?;
        Ok(())
    }

    /// Yearly statistic as a bar chart or a line chart.
    pub fn render_yearly(chart: &YearlyChart, path: &Path) -> Result<(), RenderError> {
        let points: Vec<(i32, f64)> = chart
            .series
            .points
            .iter()
            .map(|p| (p.year, p.value))
            .collect();
        let (first, last) = Self::year_span(&points);
        let y_max = Self::value_ceiling(points.iter().map(|&(_, v)| v));
        let label = chart.series.analysis.label();
        let color = rgb([31, 119, 180]);

        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        match chart.kind {
            ChartKind::Bar => {
                let mut ctx = ChartBuilder::on(&root)
                    .caption(label, (FONT, 26))
                    .margin(20)
                    .x_label_area_size(50)
                    .y_label_area_size(90)
                    .build_cartesian_2d((first..last + 1).into_segmented(), 0f64..y_max)
                    .map_err(drawing_error)?;

                ctx.configure_mesh()
                    .disable_x_mesh()
                    .x_label_formatter(&|v| match v {
                        SegmentValue::CenterOf(y) | SegmentValue::Exact(y) => y.to_string(),
                        SegmentValue::Last => String::new(),
                    })
                    .x_desc("ArchiveYear")
                    .y_desc(label)
                    .draw()
                    .map_err(drawing_error)?;

                ctx.draw_series(
                    Histogram::vertical(&ctx)
                        .style(color.filled())
                        .margin(12)
                        .data(points.iter().copied()),
                )
                .map_err(drawing_error)?;
            }
            ChartKind::Line => {
                let mut ctx = ChartBuilder::on(&root)
                    .caption(label, (FONT, 26))
                    .margin(20)
                    .x_label_area_size(50)
                    .y_label_area_size(90)
                    .build_cartesian_2d(first..last, 0f64..y_max)
                    .map_err(drawing_error)?;

                ctx.configure_mesh()
                    .x_labels((last - first + 1) as usize)
                    .x_label_formatter(&|y| y.to_string())
                    .x_desc("ArchiveYear")
                    .y_desc(label)
                    .draw()
                    .map_err(drawing_error)?;

                ctx.draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
                    .map_err(drawing_error)?;
                ctx.draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
                )
                .map_err(drawing_error)?;
            }
        }

        root.present().map_err(drawing_error)?;
        Ok(())
    }

    /// Axis ranges covering `points` with 5% padding; California when empty.
    fn padded_extent(points: &[(f64, f64)]) -> (Range<f64>, Range<f64>) {
        if points.is_empty() {
            return (-125.0..-113.0, 32.0..43.0);
        }

        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(x, y) in points {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        let pad = |lo: f64, hi: f64| {
            let p = ((hi - lo) * 0.05).max(0.5);
            lo - p..hi + p
        };
        (pad(min_x, max_x), pad(min_y, max_y))
    }

    /// First and last year to draw. A single year is widened so the axis is not degenerate.
    fn year_span(points: &[(i32, f64)]) -> (i32, i32) {
        let first = points.iter().map(|&(y, _)| y).min();
        let last = points.iter().map(|&(y, _)| y).max();
        match (first, last) {
            (Some(first), Some(last)) if first < last => (first, last),
            (Some(year), Some(_)) => (year - 1, year + 1),
            _ => (*YEAR_RANGE.start(), *YEAR_RANGE.end()),
        }
    }

    /// Upper bound of the value axis with 10% headroom.
    fn value_ceiling(values: impl Iterator<Item = f64>) -> f64 {
        let max = values.filter(|v| v.is_finite()).fold(0.0, f64::max);
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_pads_points() {
        let (x, y) = ChartRenderer::padded_extent(&[(-124.0, 33.0), (-114.0, 42.0)]);
        assert!(x.start < -124.0 && x.end > -114.0);
        assert!(y.start < 33.0 && y.end > 42.0);
    }

    #[test]
    fn extent_defaults_to_california() {
        let (x, y) = ChartRenderer::padded_extent(&[]);
        assert_eq!(x, -125.0..-113.0);
        assert_eq!(y, 32.0..43.0);
    }

    #[test]
    fn year_span_handles_single_and_empty_series() {
        assert_eq!(ChartRenderer::year_span(&[(2014, 1.0), (2018, 2.0)]), (2014, 2018));
        assert_eq!(ChartRenderer::year_span(&[(2016, 1.0)]), (2015, 2017));
        assert_eq!(ChartRenderer::year_span(&[]), (2013, 2019));
    }

    #[test]
    fn value_ceiling_has_headroom() {
        let ceiling = ChartRenderer::value_ceiling([10.0, 20.0].into_iter());
        assert!((ceiling - 22.0).abs() < 1e-9);
        assert_eq!(ChartRenderer::value_ceiling(std::iter::empty()), 1.0);
        assert_eq!(ChartRenderer::value_ceiling([f64::NAN].into_iter()), 1.0);
    }
}
