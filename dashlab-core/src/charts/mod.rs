//! Chart specs for the tips dashboard.

pub mod builder;
pub mod histogram;
pub mod resample;
pub mod spec;

pub use builder::ChartSpecBuilder;
pub use spec::{
    ChartKind, ChartParams, ChartSpec, DensityPoint, Frequency, HistogramParams, Renderability,
    ScatterParams, ScatterPoint, SeriesPoint, TimeSeriesParams,
};
