//! Charts module - Map and chart artifacts, interactive plotting, static export

mod map;
mod palette;
mod plotter;
mod renderer;

pub use map::{FireMap, MapBuilder};
pub use palette::{BarColor, DEFAULT_MARKER_COLOR};
pub use plotter::{ChartPlotter, TopCountiesChart, YearlyChart};
pub use renderer::{ChartRenderer, RenderError};
