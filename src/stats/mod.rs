//! Stats module - County rankings and yearly aggregations

mod calculator;

pub use calculator::{AnalysisType, ChartKind, CountyAcres, StatsCalculator, YearlySeries};
