//! Fire Map Module
//! Builds the per-year fire map artifact: one circle marker per incident.

use super::palette::{named_color, Rgb, DEFAULT_MARKER_COLOR};
use crate::config::MapSettings;
use crate::data::{
    DataProcessor, IncidentTable, ProcessorError, ACRES_BURNED, COUNTIES, LATITUDE, LONGITUDE,
    NAME,
};
use serde::Serialize;
use std::f64::consts::PI;

/// Length of one degree of latitude in meters
const METERS_PER_DEGREE: f64 = 111_320.0;
/// Web Mercator tile edge in pixels
const TILE_SIZE: f64 = 256.0;

/// Coarse California border as `[longitude, latitude]`, drawn under the markers.
pub const CALIFORNIA_OUTLINE: [[f64; 2]; 30] = [
    [-124.21, 42.00],
    [-120.00, 42.00],
    [-120.00, 39.00],
    [-114.63, 35.00],
    [-114.43, 34.08],
    [-114.72, 33.40],
    [-114.52, 33.03],
    [-114.72, 32.72],
    [-117.12, 32.53],
    [-117.25, 32.87],
    [-117.40, 33.20],
    [-117.90, 33.60],
    [-118.40, 33.75],
    [-118.50, 34.03],
    [-119.20, 34.15],
    [-120.00, 34.45],
    [-120.62, 34.57],
    [-120.64, 35.15],
    [-121.30, 35.65],
    [-121.90, 36.30],
    [-121.80, 36.80],
    [-122.40, 37.20],
    [-122.50, 37.78],
    [-123.00, 38.00],
    [-123.70, 38.90],
    [-123.80, 39.80],
    [-124.35, 40.25],
    [-124.10, 41.00],
    [-124.20, 41.60],
    [-124.21, 42.00],
];

/// A circle drawn at an incident location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    /// Circle radius in meters
    pub radius_m: f64,
    pub acres: Option<f64>,
    pub popup: String,
}

impl MapMarker {
    /// Circle outline as `[longitude, latitude]` vertices.
    pub fn outline(&self, segments: usize) -> Vec<[f64; 2]> {
        let segments = segments.max(3);
        let dlat = self.radius_m / METERS_PER_DEGREE;
        let dlon = self.radius_m / (METERS_PER_DEGREE * self.latitude.to_radians().cos());

        (0..segments)
            .map(|i| {
                let theta = 2.0 * PI * i as f64 / segments as f64;
                [
                    self.longitude + dlon * theta.cos(),
                    self.latitude + dlat * theta.sin(),
                ]
            })
            .collect()
    }
}

/// Longitude/latitude extent visible in a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

/// Map of one year's incidents with a fixed viewpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FireMap {
    pub year: i32,
    /// `[latitude, longitude]`
    pub center: [f64; 2],
    pub zoom: u8,
    pub color: Rgb,
    pub markers: Vec<MapMarker>,
}

impl FireMap {
    /// Visible extent for a viewport of `width` x `height` pixels at the fixed zoom.
    pub fn view_bounds(&self, width: f64, height: f64) -> ViewBounds {
        let lon_per_px = 360.0 / (TILE_SIZE * 2f64.powi(i32::from(self.zoom)));
        let lat_per_px = lon_per_px * self.center[0].to_radians().cos();
        let half_w = width / 2.0 * lon_per_px;
        let half_h = height / 2.0 * lat_per_px;

        ViewBounds {
            min_lon: self.center[1] - half_w,
            max_lon: self.center[1] + half_w,
            min_lat: self.center[0] - half_h,
            max_lat: self.center[0] + half_h,
        }
    }

    /// Ratio of horizontal to vertical degrees per pixel at the map center.
    pub fn aspect(&self) -> f64 {
        1.0 / self.center[0].to_radians().cos()
    }
}

/// Builds [`FireMap`] artifacts.
pub struct MapBuilder;

impl MapBuilder {
    /// Map of the incidents in `subset` for `year`.
    ///
    /// `subset` is expected to be geo-filtered already. Rows with missing or
    /// negative acreage still get a marker, with zero radius.
    pub fn map_by_year(
        subset: &IncidentTable,
        year: i32,
        settings: &MapSettings,
    ) -> Result<FireMap, ProcessorError> {
        let df = DataProcessor::filter_by_year(subset, year)?;

        let latitudes = df.f64_column(LATITUDE)?;
        let longitudes = df.f64_column(LONGITUDE)?;
        let acres = df.f64_column(ACRES_BURNED)?;
        let counties = df.str_column(COUNTIES)?;
        let names = df.str_column(NAME)?;

        let markers: Vec<MapMarker> = latitudes
            .into_iter()
            .zip(longitudes)
            .zip(acres)
            .zip(counties.into_iter().zip(names))
            .filter_map(|(((lat, lon), acres), (county, name))| {
                let (latitude, longitude) = (lat?, lon?);
                Some(MapMarker {
                    latitude,
                    longitude,
                    radius_m: Self::radius(acres, settings.radius_scale),
                    acres,
                    popup: Self::popup(county.as_deref(), acres, name.as_deref()),
                })
            })
            .collect();

        let color = named_color(&settings.marker_color).unwrap_or_else(|| {
            log::warn!(
                "Unknown marker color {:?}, falling back to red",
                settings.marker_color
            );
            DEFAULT_MARKER_COLOR
        });

        log::debug!("Fire map for {} has {} markers", year, markers.len());

        Ok(FireMap {
            year,
            center: settings.center,
            zoom: settings.zoom,
            color,
            markers,
        })
    }

    /// Marker radius in meters: `sqrt(acres) * scale`, zero when acreage is unusable.
    pub fn radius(acres: Option<f64>, scale: f64) -> f64 {
        acres
            .filter(|a| a.is_finite() && *a >= 0.0)
            .map(|a| a.sqrt() * scale)
            .unwrap_or(0.0)
    }

    fn popup(county: Option<&str>, acres: Option<f64>, name: Option<&str>) -> String {
        let acres = acres
            .map(|a| format!("{:?}", a))
            .unwrap_or_else(|| "unknown".to_string());
        format!(
            "County: {}\nAcresBurned: {}\nName: {}",
            county.unwrap_or(""),
            acres,
            name.unwrap_or("")
        )
    }
}
