//! Dashboard Module
//! Turns the user's selections into a full set of chart artifacts.

use crate::charts::{
    BarColor, FireMap, MapBuilder, TopCountiesChart, YearlyChart, DEFAULT_MARKER_COLOR,
};
use crate::config::MapSettings;
use crate::data::{IncidentTable, MapDataCache, ProcessorError, TableId};
use crate::stats::{AnalysisType, StatsCalculator, YearlySeries};
use std::collections::HashMap;
use std::ops::RangeInclusive;

/// Years selectable with the year slider
pub const YEAR_RANGE: RangeInclusive<i32> = 2013..=2019;

pub const PAGE_TITLE: &str = "California Fire Incidents\nYear 2013 to 2019";

/// The three user-controlled parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardState {
    pub year: i32,
    pub color: BarColor,
    pub analysis: AnalysisType,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            year: *YEAR_RANGE.start(),
            color: BarColor::default(),
            analysis: AnalysisType::default(),
        }
    }
}

impl DashboardState {
    /// Copy of the state with the year forced into [`YEAR_RANGE`].
    pub fn clamped(self) -> Self {
        Self {
            year: self.year.clamp(*YEAR_RANGE.start(), *YEAR_RANGE.end()),
            ..self
        }
    }
}

/// Everything drawn for one interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardArtifacts {
    pub state: DashboardState,
    pub title: &'static str,
    pub map_header: String,
    pub map_caption: String,
    pub fire_map: FireMap,
    pub top_header: String,
    pub top_caption: String,
    pub top_counties: TopCountiesChart,
    pub analysis_header: String,
    pub yearly: YearlyChart,
}

/// Owns the loaded table and the memoized views derived from it.
pub struct Dashboard {
    table: IncidentTable,
    map_settings: MapSettings,
    map_cache: MapDataCache,
    yearly_cache: HashMap<(TableId, AnalysisType), YearlySeries>,
}

impl Dashboard {
    pub fn new(table: IncidentTable, map_settings: MapSettings) -> Self {
        Self {
            table,
            map_settings,
            map_cache: MapDataCache::new(),
            yearly_cache: HashMap::new(),
        }
    }

    pub fn table(&self) -> &IncidentTable {
        &self.table
    }

    /// Precompute the geo subset and every yearly series.
    pub fn warm(&mut self) -> Result<(), ProcessorError> {
        self.map_cache.process_map_data(&self.table)?;
        let all = StatsCalculator::all_yearly_series(&self.table)?;
        let id = self.table.id();
        self.yearly_cache
            .extend(all.into_iter().map(|(analysis, series)| ((id, analysis), series)));
        log::info!(
            "Warmed dashboard caches: {} yearly series",
            self.yearly_cache.len()
        );
        Ok(())
    }

    /// Swap in a freshly loaded table, dropping everything derived from the old one.
    pub fn replace_table(&mut self, table: IncidentTable) {
        let old = self.table.id();
        self.map_cache.invalidate(old);
        self.yearly_cache.retain(|(id, _), _| *id != old);
        self.table = table;
    }

    /// Build all artifacts for `state`.
    ///
    /// Never fails: a failed computation is logged and drawn as an empty chart.
    pub fn render(&mut self, state: DashboardState) -> DashboardArtifacts {
        let state = state.clamped();
        let year = state.year;

        let fire_map = self.fire_map(year).unwrap_or_else(|e| {
            log::error!("Failed to build fire map for {}: {}", year, e);
            FireMap {
                year,
                center: self.map_settings.center,
                zoom: self.map_settings.zoom,
                color: DEFAULT_MARKER_COLOR,
                markers: Vec::new(),
            }
        });

        let counties = StatsCalculator::top_counties(&self.table, year).unwrap_or_else(|e| {
            log::error!("Failed to rank counties for {}: {}", year, e);
            Vec::new()
        });

        let series = self.yearly_series(state.analysis).unwrap_or_else(|e| {
            log::error!("Failed to compute {}: {}", state.analysis.label(), e);
            YearlySeries::empty(state.analysis)
        });

        DashboardArtifacts {
            state,
            title: PAGE_TITLE,
            map_header: format!("Fire Map for Year {}", year),
            map_caption: format!(
                "The area of the red circle shows the acres burned in Year {}.",
                year
            ),
            fire_map,
            top_header: format!("Top 10 Counties in Year {}", year),
            top_caption: format!(
                "Below is a bar plot of top 10 counties with most yearly total acres burned in {}",
                year
            ),
            top_counties: TopCountiesChart {
                year,
                counties,
                color: state.color,
            },
            analysis_header: format!("Data Analysis: \n{}", state.analysis.label()),
            yearly: YearlyChart::new(series),
        }
    }

    fn fire_map(&mut self, year: i32) -> Result<FireMap, ProcessorError> {
        let map_data = self.map_cache.process_map_data(&self.table)?;
        MapBuilder::map_by_year(&map_data, year, &self.map_settings)
    }

    fn yearly_series(&mut self, analysis: AnalysisType) -> Result<YearlySeries, ProcessorError> {
        let key = (self.table.id(), analysis);
        if let Some(series) = self.yearly_cache.get(&key) {
            return Ok(series.clone());
        }
        let series = StatsCalculator::yearly_series(&self.table, analysis)?;
        self.yearly_cache.insert(key, series.clone());
        Ok(series)
    }
}
