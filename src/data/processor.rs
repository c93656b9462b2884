//! Data Processor Module
//! Geographic and year filters over the incident table, plus the memoized map subset.

use super::loader::{IncidentTable, TableId, ARCHIVE_YEAR, LATITUDE, LONGITUDE};
use polars::prelude::*;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Open bounding box used to discard unrealistic coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub max_longitude: f64,
    pub min_latitude: f64,
    pub max_latitude: f64,
}

/// California spans roughly 114°W to 124°W and 32.5°N to 42°N.
pub const CALIFORNIA_BOUNDS: GeoBounds = GeoBounds {
    max_longitude: -114.0,
    min_latitude: 30.0,
    max_latitude: 44.0,
};

impl GeoBounds {
    /// Strict comparisons; rows on the boundary or with null coordinates fail.
    fn predicate(&self) -> Expr {
        col(LONGITUDE)
            .lt(lit(self.max_longitude))
            .and(col(LATITUDE).gt(lit(self.min_latitude)))
            .and(col(LATITUDE).lt(lit(self.max_latitude)))
    }

    fn cache_key(&self) -> [u64; 3] {
        [
            self.max_longitude.to_bits(),
            self.min_latitude.to_bits(),
            self.max_latitude.to_bits(),
        ]
    }
}

/// Stateless filters over incident tables.
pub struct DataProcessor;

impl DataProcessor {
    /// Keep rows located inside California. Rows with null coordinates are dropped.
    pub fn process_map_data(table: &IncidentTable) -> Result<IncidentTable, ProcessorError> {
        Self::filter_to_bounds(table, &CALIFORNIA_BOUNDS)
    }

    pub fn filter_to_bounds(
        table: &IncidentTable,
        bounds: &GeoBounds,
    ) -> Result<IncidentTable, ProcessorError> {
        let subset = table.filter(bounds.predicate())?;
        log::debug!(
            "Geo filter kept {} of {} rows",
            subset.height(),
            table.height()
        );
        Ok(subset)
    }

    /// Rows whose `ArchiveYear` equals `year`. No match gives an empty table.
    pub fn filter_by_year(table: &IncidentTable, year: i32) -> Result<IncidentTable, ProcessorError> {
        Ok(table.filter(col(ARCHIVE_YEAR).eq(lit(year)))?)
    }
}

/// Memoized geo-filtered subsets keyed by source table and bounds.
///
/// The source table never changes within a session, so entries stay valid
/// until [`MapDataCache::invalidate`] is called for a reloaded table.
#[derive(Default)]
pub struct MapDataCache {
    entries: HashMap<(TableId, [u64; 3]), IncidentTable>,
    misses: usize,
}

impl MapDataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_map_data(
        &mut self,
        table: &IncidentTable,
    ) -> Result<IncidentTable, ProcessorError> {
        self.filter_to_bounds(table, &CALIFORNIA_BOUNDS)
    }

    pub fn filter_to_bounds(
        &mut self,
        table: &IncidentTable,
        bounds: &GeoBounds,
    ) -> Result<IncidentTable, ProcessorError> {
        match self.entries.entry((table.id(), bounds.cache_key())) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                self.misses += 1;
                let subset = DataProcessor::filter_to_bounds(table, bounds)?;
                Ok(entry.insert(subset).clone())
            }
        }
    }

    /// Drop every cached subset derived from `table_id`.
    pub fn invalidate(&mut self, table_id: TableId) {
        self.entries.retain(|(id, _), _| *id != table_id);
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of times a subset had to be computed.
    #[cfg(test)]
    pub fn misses(&self) -> usize {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{scenario_table, table, Row};

    fn coordinates(table: &IncidentTable) -> Vec<(f64, f64)> {
        let lats = table.f64_column(LATITUDE).unwrap();
        let lons = table.f64_column(LONGITUDE).unwrap();
        lats.into_iter()
            .zip(lons)
            .map(|(lat, lon)| (lat.unwrap(), lon.unwrap()))
            .collect()
    }

    fn mixed_location_table() -> IncidentTable {
        table(&[
            Row::new(2019, "Shasta", Some(10.0)).at(40.5, -122.3),
            Row::new(2019, "Nowhere", Some(10.0)).at(36.0, -100.0),
            Row::new(2019, "Nowhere", Some(10.0)).at(50.0, -120.0),
            Row::new(2019, "Nowhere", Some(10.0)).at(0.0, 0.0),
            Row::new(2019, "Edge", Some(10.0)).at(44.0, -120.0),
            Row::new(2019, "Edge", Some(10.0)).at(36.0, -114.0),
            Row::new(2018, "San Diego", Some(10.0)).at(32.8, -116.9),
        ])
    }

    #[test]
    fn geo_filter_keeps_only_rows_strictly_inside_bounds() {
        let subset = DataProcessor::process_map_data(&mixed_location_table()).unwrap();

        assert_eq!(subset.height(), 2);
        for (lat, lon) in coordinates(&subset) {
            assert!(lon < -114.0);
            assert!(lat > 30.0 && lat < 44.0);
        }
    }

    #[test]
    fn longitude_minus_100_is_excluded_regardless_of_latitude() {
        let rows: Vec<Row> = [31.0, 36.0, 43.0]
            .iter()
            .map(|&lat| Row::new(2019, "Nowhere", Some(1.0)).at(lat, -100.0))
            .collect();
        let subset = DataProcessor::process_map_data(&table(&rows)).unwrap();
        assert_eq!(subset.height(), 0);
    }

    #[test]
    fn null_coordinates_are_dropped() {
        let df = df!(
            "ArchiveYear" => [2019i32, 2019],
            "Counties" => ["A", "B"],
            "Latitude" => [Some(38.0), None],
            "Longitude" => [Some(-121.0), Some(-121.0)],
            "AcresBurned" => [1.0, 2.0],
            "Name" => ["a", "b"],
            "MajorIncident" => [false, false],
            "Injuries" => [None::<f64>, None],
            "StructuresDamaged" => [None::<f64>, None],
        )
        .unwrap();
        let table = IncidentTable::from_dataframe(df).unwrap();

        let subset = DataProcessor::process_map_data(&table).unwrap();
        assert_eq!(subset.height(), 1);
    }

    #[test]
    fn geo_filter_does_not_mutate_input() {
        let table = mixed_location_table();
        let before = table.height();
        let _ = DataProcessor::process_map_data(&table).unwrap();
        assert_eq!(table.height(), before);
    }

    #[test]
    fn year_filter_partitions_the_table() {
        let table = scenario_table();
        for year in 2013..=2019 {
            let selected = DataProcessor::filter_by_year(&table, year).unwrap();
            let complement = table.filter(col(ARCHIVE_YEAR).neq(lit(year))).unwrap();

            assert!(selected.i32_values(ARCHIVE_YEAR).unwrap().iter().all(|&y| y == year));
            assert_eq!(selected.height() + complement.height(), table.height());
        }
    }

    #[test]
    fn year_filter_selects_scenario_rows() {
        let selected = DataProcessor::filter_by_year(&scenario_table(), 2018).unwrap();
        let counties = selected.str_column("Counties").unwrap();
        assert_eq!(
            counties,
            vec![Some("Butte".to_string()), Some("Ventura".to_string())]
        );
    }

    #[test]
    fn year_without_rows_is_empty_not_error() {
        let selected = DataProcessor::filter_by_year(&scenario_table(), 2013).unwrap();
        assert_eq!(selected.height(), 0);
    }

    #[test]
    fn cache_reuses_subset_until_invalidated() {
        let table = mixed_location_table();
        let mut cache = MapDataCache::new();

        let first = cache.process_map_data(&table).unwrap();
        let second = cache.process_map_data(&table).unwrap();
        assert_eq!(first.id(), second.id());
        assert_eq!(cache.misses(), 1);

        cache.invalidate(table.id());
        assert!(cache.is_empty());

        let third = cache.process_map_data(&table).unwrap();
        assert_ne!(first.id(), third.id());
        assert_eq!(third.height(), first.height());
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn cache_keys_on_table_identity() {
        let mut cache = MapDataCache::new();
        cache.process_map_data(&scenario_table()).unwrap();
        cache.process_map_data(&scenario_table()).unwrap();
        assert_eq!(cache.misses(), 2);
    }
}
