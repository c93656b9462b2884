//! Statistics Calculator Module
//! County rankings and yearly pivot aggregations over the incident table.

use crate::data::{
    DataProcessor, IncidentTable, ProcessorError, ACRES_BURNED, ARCHIVE_YEAR, COUNTIES, INJURIES,
    MAJOR_INCIDENT, STRUCTURES_DAMAGED,
};
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::{Data, Median, Statistics};
use std::collections::{BTreeMap, HashMap};

/// Number of counties shown in the acreage ranking
pub const TOP_COUNTY_LIMIT: usize = 10;

/// Total acreage burned in one county.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountyAcres {
    pub county: String,
    pub acres: f64,
}

/// How a yearly series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    Bar,
    Line,
}

/// The yearly statistics the dashboard can display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum AnalysisType {
    #[default]
    TotalAcresBurned,
    MajorIncidentCount,
    AverageInjuries,
    MedianStructuresDamaged,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 4] = [
        AnalysisType::TotalAcresBurned,
        AnalysisType::MajorIncidentCount,
        AnalysisType::AverageInjuries,
        AnalysisType::MedianStructuresDamaged,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisType::TotalAcresBurned => "Total Acres Burned",
            AnalysisType::MajorIncidentCount => "Number of Major Incident",
            AnalysisType::AverageInjuries => "Average Injuries of Major Incidents",
            AnalysisType::MedianStructuresDamaged => {
                "Median Number of Structure Damaged of Major Incidents"
            }
        }
    }

    pub fn chart_kind(&self) -> ChartKind {
        match self {
            AnalysisType::MajorIncidentCount => ChartKind::Line,
            _ => ChartKind::Bar,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

/// One value per archive year, ascending by year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlySeries {
    pub analysis: AnalysisType,
    pub points: Vec<YearValue>,
}

impl YearlySeries {
    pub fn empty(analysis: AnalysisType) -> Self {
        Self {
            analysis,
            points: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn value_for(&self, year: i32) -> Option<f64> {
        self.points.iter().find(|p| p.year == year).map(|p| p.value)
    }
}

/// Which rows feed a yearly reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowScope {
    All,
    MajorOnly,
}

/// Handles aggregate calculations over incident tables.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Ten counties with the largest summed acreage in `year`.
    ///
    /// Null acreage counts as nothing toward a county's sum. Equal sums are
    /// ordered by county name so the ranking is reproducible.
    pub fn top_counties(
        table: &IncidentTable,
        year: i32,
    ) -> Result<Vec<CountyAcres>, ProcessorError> {
        let by_year = DataProcessor::filter_by_year(table, year)?;

        let ranked = by_year
            .dataframe()
            .clone()
            .lazy()
            .filter(col(COUNTIES).is_not_null())
            .group_by([col(COUNTIES)])
            .agg([col(ACRES_BURNED).sum()])
            .sort_by_exprs(
                [col(ACRES_BURNED), col(COUNTIES)],
                SortMultipleOptions::default().with_order_descending_multi([true, false]),
            )
            .limit(TOP_COUNTY_LIMIT as IdxSize)
            .collect()?;

        let counties = ranked.column(COUNTIES)?.str()?;
        let acres = ranked.column(ACRES_BURNED)?.f64()?;

        Ok(counties
            .into_iter()
            .zip(acres.into_iter())
            .filter_map(|(county, acres)| {
                Some(CountyAcres {
                    county: county?.to_string(),
                    acres: acres.unwrap_or(0.0),
                })
            })
            .collect())
    }

    /// Sum of acreage per year. Years whose acreage is entirely missing report 0.
    pub fn total_acres_by_year(table: &IncidentTable) -> Result<YearlySeries, ProcessorError> {
        let buckets = Self::year_buckets(table, ACRES_BURNED, RowScope::All)?;
        Ok(Self::reduce(
            AnalysisType::TotalAcresBurned,
            buckets,
            |values| Some(values.iter().sum()),
        ))
    }

    /// Count of major incidents per year. Every year in the table appears, possibly with 0.
    pub fn major_incidents_by_year(table: &IncidentTable) -> Result<YearlySeries, ProcessorError> {
        let buckets = Self::year_buckets(table, MAJOR_INCIDENT, RowScope::All)?;
        Ok(Self::reduce(
            AnalysisType::MajorIncidentCount,
            buckets,
            |values| Some(values.iter().sum()),
        ))
    }

    /// Mean injuries of major incidents per year; years without reported injuries are omitted.
    pub fn average_injuries_by_year(table: &IncidentTable) -> Result<YearlySeries, ProcessorError> {
        let buckets = Self::year_buckets(table, INJURIES, RowScope::MajorOnly)?;
        Ok(Self::reduce(AnalysisType::AverageInjuries, buckets, Self::mean))
    }

    /// Median structures damaged by major incidents per year.
    pub fn median_structures_damaged_by_year(
        table: &IncidentTable,
    ) -> Result<YearlySeries, ProcessorError> {
        let buckets = Self::year_buckets(table, STRUCTURES_DAMAGED, RowScope::MajorOnly)?;
        Ok(Self::reduce(
            AnalysisType::MedianStructuresDamaged,
            buckets,
            Self::median,
        ))
    }

    pub fn yearly_series(
        table: &IncidentTable,
        analysis: AnalysisType,
    ) -> Result<YearlySeries, ProcessorError> {
        match analysis {
            AnalysisType::TotalAcresBurned => Self::total_acres_by_year(table),
            AnalysisType::MajorIncidentCount => Self::major_incidents_by_year(table),
            AnalysisType::AverageInjuries => Self::average_injuries_by_year(table),
            AnalysisType::MedianStructuresDamaged => {
                Self::median_structures_damaged_by_year(table)
            }
        }
    }

    /// Compute every yearly series in parallel.
    pub fn all_yearly_series(
        table: &IncidentTable,
    ) -> Result<HashMap<AnalysisType, YearlySeries>, ProcessorError> {
        AnalysisType::ALL
            .par_iter()
            .map(|&analysis| Ok((analysis, Self::yearly_series(table, analysis)?)))
            .collect()
    }

    /// Arithmetic mean, `None` for an empty slice.
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.iter().mean())
    }

    /// Median with midpoint interpolation for even lengths (NumPy compatible).
    pub fn median(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(Data::new(values.to_vec()).median())
    }

    /// Non-null values of `column` grouped by archive year.
    ///
    /// A year whose rows are all null still gets an (empty) bucket.
    fn year_buckets(
        table: &IncidentTable,
        column: &str,
        scope: RowScope,
    ) -> Result<BTreeMap<i32, Vec<f64>>, ProcessorError> {
        let source = match scope {
            RowScope::All => table.clone(),
            RowScope::MajorOnly => table.filter(col(MAJOR_INCIDENT).eq(lit(true)))?,
        };
        let df = source.dataframe();

        let years = df.column(ARCHIVE_YEAR)?.i32()?;
        let values = df.column(column)?.cast(&DataType::Float64)?;
        let values = values.f64()?;

        let mut buckets: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
        for (year, value) in years.into_iter().zip(values.into_iter()) {
            let Some(year) = year else {
                continue;
            };
            let bucket = buckets.entry(year).or_default();
            if let Some(v) = value.filter(|v| !v.is_nan()) {
                bucket.push(v);
            }
        }
        Ok(buckets)
    }

    fn reduce(
        analysis: AnalysisType,
        buckets: BTreeMap<i32, Vec<f64>>,
        reducer: impl Fn(&[f64]) -> Option<f64>,
    ) -> YearlySeries {
        let points = buckets
            .into_iter()
            .filter_map(|(year, values)| reducer(&values).map(|value| YearValue { year, value }))
            .collect();
        YearlySeries { analysis, points }
    }
}
