//! Test fixtures for building incident tables in memory.

use super::IncidentTable;
use polars::prelude::*;

#[derive(Debug, Clone)]
pub struct Row {
    pub year: i32,
    pub county: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub acres: Option<f64>,
    pub name: &'static str,
    pub major: bool,
    pub injuries: Option<f64>,
    pub structures: Option<f64>,
}

impl Row {
    /// A minor incident placed inside the California bounding box.
    pub fn new(year: i32, county: &'static str, acres: Option<f64>) -> Self {
        Self {
            year,
            county,
            lat: 38.0,
            lon: -121.0,
            acres,
            name: "Fire",
            major: false,
            injuries: None,
            structures: None,
        }
    }

    pub fn at(mut self, lat: f64, lon: f64) -> Self {
        self.lat = lat;
        self.lon = lon;
        self
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn major(mut self, injuries: Option<f64>, structures: Option<f64>) -> Self {
        self.major = true;
        self.injuries = injuries;
        self.structures = structures;
        self
    }
}

pub fn table(rows: &[Row]) -> IncidentTable {
    let df = df!(
        "ArchiveYear" => rows.iter().map(|r| r.year).collect::<Vec<_>>(),
        "Counties" => rows.iter().map(|r| r.county).collect::<Vec<_>>(),
        "Latitude" => rows.iter().map(|r| r.lat).collect::<Vec<_>>(),
        "Longitude" => rows.iter().map(|r| r.lon).collect::<Vec<_>>(),
        "AcresBurned" => rows.iter().map(|r| r.acres).collect::<Vec<_>>(),
        "Name" => rows.iter().map(|r| r.name).collect::<Vec<_>>(),
        "MajorIncident" => rows.iter().map(|r| r.major).collect::<Vec<_>>(),
        "Injuries" => rows.iter().map(|r| r.injuries).collect::<Vec<_>>(),
        "StructuresDamaged" => rows.iter().map(|r| r.structures).collect::<Vec<_>>(),
    )
    .unwrap();
    IncidentTable::from_dataframe(df).unwrap()
}

/// Butte 2018 (150000 acres), Ventura 2018 (5000), Butte 2017 (1000).
pub fn scenario_table() -> IncidentTable {
    table(&[
        Row::new(2018, "Butte", Some(150000.0)).named("Camp Fire"),
        Row::new(2018, "Ventura", Some(5000.0)).named("Hill Fire"),
        Row::new(2017, "Butte", Some(1000.0)).named("Cherokee Fire"),
    ])
}
