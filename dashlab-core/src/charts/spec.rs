//! Chart descriptors handed to presentation sinks.
//!
//! A [`ChartSpec`] always exists for each [`ChartKind`]; whether it can be
//! drawn is carried by [`Renderability`], so a sink can show either the chart
//! or the reason it is missing.

use crate::tips::columns::{SIZE, TIME_ORDER, TIP, TOTAL_BILL};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    DailyAverageTip,
    BillDistribution,
    BillVsTip,
    BillTipSize,
}

impl ChartKind {
    /// Build order.
    pub const ALL: [ChartKind; 4] = [
        ChartKind::DailyAverageTip,
        ChartKind::BillDistribution,
        ChartKind::BillVsTip,
        ChartKind::BillTipSize,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::DailyAverageTip => "Tips over time: daily average",
            ChartKind::BillDistribution => "Total bill distribution with smoothing",
            ChartKind::BillVsTip => "Total bill vs tip",
            ChartKind::BillTipSize => "Total bill, tip and party size",
        }
    }

    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            ChartKind::DailyAverageTip => &[TIME_ORDER, TIP],
            ChartKind::BillDistribution => &[TOTAL_BILL],
            ChartKind::BillVsTip => &[TOTAL_BILL, TIP],
            ChartKind::BillTipSize => &[TOTAL_BILL, TIP, SIZE],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesParams {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub frequency: Frequency,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub x: f64,
    pub y: f64,
}

/// Equal-width histogram with an optional smoothed overlay.
///
/// `edges` has `bins + 1` entries and `counts` has `bins`. The overlay is in
/// count units, so it can share the y axis with the bars; it is empty when
/// the sample is too small or has no spread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramParams {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bins: usize,
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
    pub density: Vec<DensityPoint>,
}

impl HistogramParams {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Raw size value, for the sized variant.
    pub size: Option<f64>,
    /// Marker diameter in `[0, size_max]`.
    pub marker: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterParams {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub size_label: Option<String>,
    pub opacity: f64,
    pub size_max: f64,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartParams {
    TimeSeries(TimeSeriesParams),
    Histogram(HistogramParams),
    Scatter(ScatterParams),
}

impl ChartParams {
    pub fn title(&self) -> &str {
        match self {
            ChartParams::TimeSeries(p) => &p.title,
            ChartParams::Histogram(p) => &p.title,
            ChartParams::Scatter(p) => &p.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Renderability {
    Renderable(ChartParams),
    /// Required columns are missing.
    NotRenderable { reason: String },
    /// Columns are present but no row is plottable.
    Empty { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub required_columns: Vec<String>,
    pub render: Renderability,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, render: Renderability) -> Self {
        Self {
            kind,
            required_columns: kind
                .required_columns()
                .iter()
                .map(|c| c.to_string())
                .collect(),
            render,
        }
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn is_renderable(&self) -> bool {
        matches!(self.render, Renderability::Renderable(_))
    }

    pub fn params(&self) -> Option<&ChartParams> {
        match &self.render {
            Renderability::Renderable(params) => Some(params),
            _ => None,
        }
    }

    /// Why the chart cannot be drawn, if it cannot.
    pub fn reason(&self) -> Option<&str> {
        match &self.render {
            Renderability::Renderable(_) => None,
            Renderability::NotRenderable { reason } | Renderability::Empty { reason } => {
                Some(reason)
            }
        }
    }
}
