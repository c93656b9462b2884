//! Incident Table Loader Module
//! Loads the fire incident CSV with Polars and normalizes the columns the dashboard uses.

use polars::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

pub const ARCHIVE_YEAR: &str = "ArchiveYear";
pub const COUNTIES: &str = "Counties";
pub const LATITUDE: &str = "Latitude";
pub const LONGITUDE: &str = "Longitude";
pub const ACRES_BURNED: &str = "AcresBurned";
pub const NAME: &str = "Name";
pub const MAJOR_INCIDENT: &str = "MajorIncident";
pub const INJURIES: &str = "Injuries";
pub const STRUCTURES_DAMAGED: &str = "StructuresDamaged";

/// Columns that must be present in the source CSV.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    ARCHIVE_YEAR,
    COUNTIES,
    LATITUDE,
    LONGITUDE,
    ACRES_BURNED,
    NAME,
    MAJOR_INCIDENT,
    INJURIES,
    STRUCTURES_DAMAGED,
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Process-unique identity of a loaded or derived table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(u64);

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

impl TableId {
    fn next() -> Self {
        Self(NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Immutable table of incident records.
///
/// Every filter produces a new table with its own [`TableId`]; the
/// underlying frame is never modified after construction.
#[derive(Debug, Clone)]
pub struct IncidentTable {
    id: TableId,
    df: DataFrame,
}

impl IncidentTable {
    /// Load the incident CSV using Polars.
    pub fn load_csv(file_path: impl AsRef<Path>) -> Result<Self, LoaderError> {
        let file_path = file_path.as_ref();
        log::info!("Loading incidents from {}", file_path.display());

        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        let table = Self::from_dataframe(df)?;
        log::info!(
            "Loaded {} incidents spanning years {:?}",
            table.height(),
            table.years()
        );
        Ok(table)
    }

    /// Validate required columns and coerce them to the types the dashboard expects.
    pub fn from_dataframe(df: DataFrame) -> Result<Self, LoaderError> {
        let present: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|required| !present.iter().any(|name| name == *required))
            .map(|s| s.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(LoaderError::MissingColumns(missing));
        }

        // The flag arrives either as a parsed boolean or as "True"/"False" text
        let major = match df.column(MAJOR_INCIDENT)?.dtype() {
            DataType::Boolean => col(MAJOR_INCIDENT),
            DataType::String => col(MAJOR_INCIDENT)
                .str()
                .to_lowercase()
                .eq(lit("true")),
            _ => col(MAJOR_INCIDENT).cast(DataType::Boolean),
        };

        let df = df
            .lazy()
            .with_columns([
                col(ARCHIVE_YEAR).cast(DataType::Int32),
                col(COUNTIES).cast(DataType::String),
                col(LATITUDE).cast(DataType::Float64),
                col(LONGITUDE).cast(DataType::Float64),
                col(ACRES_BURNED).cast(DataType::Float64),
                col(NAME).cast(DataType::String),
                major.alias(MAJOR_INCIDENT),
                col(INJURIES).cast(DataType::Float64),
                col(STRUCTURES_DAMAGED).cast(DataType::Float64),
            ])
            .collect()?;

        Ok(Self::wrap(df))
    }

    pub(crate) fn wrap(df: DataFrame) -> Self {
        Self {
            id: TableId::next(),
            df,
        }
    }

    /// Apply a row predicate, producing a new table.
    pub fn filter(&self, predicate: Expr) -> PolarsResult<Self> {
        let df = self.df.clone().lazy().filter(predicate).collect()?;
        Ok(Self::wrap(df))
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Distinct archive years, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years = self.i32_values(ARCHIVE_YEAR).unwrap_or_default();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Non-null values of an Int32 column.
    pub fn i32_values(&self, column: &str) -> PolarsResult<Vec<i32>> {
        Ok(self.df.column(column)?.i32()?.into_iter().flatten().collect())
    }

    pub fn f64_column(&self, column: &str) -> PolarsResult<Vec<Option<f64>>> {
        Ok(self.df.column(column)?.f64()?.into_iter().collect())
    }

    pub fn str_column(&self, column: &str) -> PolarsResult<Vec<Option<String>>> {
        Ok(self
            .df
            .column(column)?
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "calfire_dashboard_{}_{}.csv",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_and_normalizes_columns() {
        let path = write_temp_csv(
            "load",
            "ArchiveYear,Counties,Latitude,Longitude,AcresBurned,Name,MajorIncident,Injuries,StructuresDamaged,Extra\n\
             2018,Butte,39.8,-121.4,153336,Camp Fire,True,12,,x\n\
             2017,Ventura,34.4,-119.1,,Thomas Fire,False,,5,y\n",
        );

        let table = IncidentTable::load_csv(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(table.height(), 2);
        assert_eq!(table.years(), vec![2017, 2018]);

        let df = table.dataframe();
        assert_eq!(df.column(MAJOR_INCIDENT).unwrap().dtype(), &DataType::Boolean);
        assert_eq!(df.column(INJURIES).unwrap().dtype(), &DataType::Float64);

        let acres = table.f64_column(ACRES_BURNED).unwrap();
        assert_eq!(acres, vec![Some(153336.0), None]);

        let major: Vec<Option<bool>> = df
            .column(MAJOR_INCIDENT)
            .unwrap()
            .bool()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(major, vec![Some(true), Some(false)]);
    }

    #[test]
    fn missing_columns_are_reported() {
        let path = write_temp_csv(
            "missing",
            "ArchiveYear,Counties,Latitude,Longitude,Name\n2018,Butte,39.8,-121.4,Camp Fire\n",
        );

        let result = IncidentTable::load_csv(&path);
        let _ = std::fs::remove_file(&path);

        match result {
            Err(LoaderError::MissingColumns(missing)) => {
                assert_eq!(
                    missing,
                    vec![ACRES_BURNED, MAJOR_INCIDENT, INJURIES, STRUCTURES_DAMAGED]
                );
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let path = std::env::temp_dir().join("calfire_dashboard_does_not_exist.csv");
        assert!(IncidentTable::load_csv(&path).is_err());
    }

    #[test]
    fn derived_tables_get_fresh_ids() {
        let table = crate::data::fixtures::scenario_table();
        let subset = table.filter(col(ARCHIVE_YEAR).eq(lit(2018))).unwrap();
        assert_ne!(table.id(), subset.id());
        assert_eq!(subset.height(), 2);
    }
}
