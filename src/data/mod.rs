//! Data module - CSV loading and filtering

mod loader;
mod processor;

#[cfg(test)]
pub(crate) mod fixtures;

pub use loader::{
    IncidentTable, LoaderError, TableId, ACRES_BURNED, ARCHIVE_YEAR, COUNTIES, INJURIES,
    LATITUDE, LONGITUDE, MAJOR_INCIDENT, NAME, STRUCTURES_DAMAGED,
};
pub use processor::{DataProcessor, MapDataCache, ProcessorError};
