//! Builds the four tips chart specs from a table.

use super::histogram::{bin, gaussian_kde};
use super::resample::daily_mean;
use super::spec::{
    ChartKind, ChartParams, ChartSpec, DensityPoint, Frequency, HistogramParams, Renderability,
    ScatterParams, ScatterPoint, SeriesPoint, TimeSeriesParams,
};
use crate::config::ChartConfig;
use crate::tips::columns::{SIZE, TIME_ORDER, TIP, TOTAL_BILL};
use crate::tips::TipsTable;
use tracing::debug;

/// Decides which charts a table supports and computes their parameters.
#[derive(Debug, Clone, Default)]
pub struct ChartSpecBuilder {
    config: ChartConfig,
}

impl ChartSpecBuilder {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// One spec per [`ChartKind`], in [`ChartKind::ALL`] order.
    pub fn build(&self, table: &TipsTable) -> Vec<ChartSpec> {
        let specs: Vec<ChartSpec> = ChartKind::ALL
            .iter()
            .map(|&kind| ChartSpec::new(kind, self.render(kind, table)))
            .collect();
        debug!(
            renderable = specs.iter().filter(|s| s.is_renderable()).count(),
            rows = table.height(),
            "built chart specs"
        );
        specs
    }

    fn render(&self, kind: ChartKind, table: &TipsTable) -> Renderability {
        let missing: Vec<&str> = kind
            .required_columns()
            .iter()
            .copied()
            .filter(|c| !table.has_column(c))
            .collect();
        if !missing.is_empty() {
            return Renderability::NotRenderable {
                reason: format!(
                    "'{}' needs column(s) {}; missing {}",
                    kind.title(),
                    kind.required_columns().join(", "),
                    missing.join(", ")
                ),
            };
        }

        match kind {
            ChartKind::DailyAverageTip => self.daily_average(table),
            ChartKind::BillDistribution => self.distribution(table),
            ChartKind::BillVsTip => self.scatter(table, false),
            ChartKind::BillTipSize => self.scatter(table, true),
        }
    }

    fn daily_average(&self, table: &TipsTable) -> Renderability {
        let dates = table.dates(TIME_ORDER).unwrap_or_default();
        let tips = table.numeric(TIP).unwrap_or_default();
        let points: Vec<SeriesPoint> = daily_mean(&dates, &tips)
            .into_iter()
            .map(|(date, value)| SeriesPoint { date, value })
            .collect();

        if points.is_empty() {
            return Renderability::Empty {
                reason: "No dated tip values to average.".into(),
            };
        }

        Renderability::Renderable(ChartParams::TimeSeries(TimeSeriesParams {
            title: ChartKind::DailyAverageTip.title().into(),
            x_label: "Order date".into(),
            y_label: "Average tip ($)".into(),
            frequency: Frequency::Daily,
            points,
        }))
    }

    fn distribution(&self, table: &TipsTable) -> Renderability {
        let bills: Vec<f64> = table
            .numeric(TOTAL_BILL)
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect();

        let Some(binned) = bin(&bills, self.config.histogram_bins) else {
            return Renderability::Empty {
                reason: "No numeric total_bill values to plot.".into(),
            };
        };

        let scale = bills.len() as f64 * binned.bin_width();
        let density = gaussian_kde(&bills, self.config.kde_grid_points)
            .into_iter()
            .map(|(x, y)| DensityPoint { x, y: y * scale })
            .collect();

        Renderability::Renderable(ChartParams::Histogram(HistogramParams {
            title: ChartKind::BillDistribution.title().into(),
            x_label: "Total bill ($)".into(),
            y_label: "Count".into(),
            bins: self.config.histogram_bins,
            edges: binned.edges,
            counts: binned.counts,
            density,
        }))
    }

    fn scatter(&self, table: &TipsTable, sized: bool) -> Renderability {
        let bills = table.numeric(TOTAL_BILL).unwrap_or_default();
        let tips = table.numeric(TIP).unwrap_or_default();
        let sizes = if sized {
            table.numeric(SIZE).unwrap_or_default()
        } else {
            vec![None; bills.len()]
        };

        let rows: Vec<(f64, f64, Option<f64>)> = bills
            .iter()
            .zip(&tips)
            .zip(&sizes)
            .filter_map(|((bill, tip), size)| match (bill, tip, size) {
                (Some(x), Some(y), Some(s)) if sized => Some((*x, *y, Some(*s))),
                (Some(x), Some(y), _) if !sized => Some((*x, *y, None)),
                _ => None,
            })
            .collect();

        let (kind, size_max) = if sized {
            (ChartKind::BillTipSize, self.config.bubble_size_max)
        } else {
            (ChartKind::BillVsTip, self.config.scatter_size_max)
        };

        if rows.is_empty() {
            return Renderability::Empty {
                reason: format!(
                    "No rows with numeric {} to plot.",
                    kind.required_columns().join(", ")
                ),
            };
        }

        let largest = rows
            .iter()
            .filter_map(|(_, _, s)| *s)
            .fold(0.0_f64, f64::max);

        let points = rows
            .into_iter()
            .map(|(x, y, size)| ScatterPoint {
                x,
                y,
                size,
                marker: marker_size(size, largest, size_max),
            })
            .collect();

        Renderability::Renderable(ChartParams::Scatter(ScatterParams {
            title: kind.title().into(),
            x_label: "Total bill ($)".into(),
            y_label: "Tip ($)".into(),
            size_label: sized.then(|| "Party size".to_string()),
            opacity: self.config.scatter_opacity,
            size_max,
            points,
        }))
    }
}

/// Area-proportional marker diameter, so the largest value maps to
/// `size_max`. Unsized points and a non-positive maximum use `size_max`.
fn marker_size(size: Option<f64>, largest: f64, size_max: f64) -> f64 {
    match size {
        Some(s) if largest > 0.0 => size_max * (s.max(0.0) / largest).sqrt(),
        _ => size_max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;
    use crate::tips::{parse_csv, TipsEnricher};

    const SAMPLE: &[u8] = b"total_bill,tip,sex,smoker,day,time,size\n\
16.99,1.01,Female,No,Sun,Dinner,2\n\
10.34,1.66,Male,No,Sun,Dinner,3\n\
21.01,3.5,Male,No,Sun,Dinner,3\n\
23.68,3.31,Male,No,Sun,Dinner,2\n\
24.59,3.61,Female,No,Sun,Dinner,4\n";

    fn enriched(csv: &[u8]) -> TipsTable {
        TipsEnricher::default()
            .enrich(parse_csv(csv).unwrap(), &mut seeded(42))
            .unwrap()
    }

    #[test]
    fn builds_four_specs_in_order() {
        let specs = ChartSpecBuilder::default().build(&enriched(SAMPLE));
        let kinds: Vec<ChartKind> = specs.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, ChartKind::ALL.to_vec());
        assert!(specs.iter().all(ChartSpec::is_renderable));
    }

    #[test]
    fn histogram_uses_configured_bins_and_counts_every_bill() {
        let specs = ChartSpecBuilder::default().build(&enriched(SAMPLE));
        let Some(ChartParams::Histogram(hist)) = specs[1].params() else {
            panic!("expected histogram params");
        };
        assert_eq!(hist.bins, 20);
        assert_eq!(hist.counts.len(), 20);
        assert_eq!(hist.total(), 5);
        assert_eq!(hist.density.len(), 200);
        assert_eq!(hist.y_label, "Count");
    }

    #[test]
    fn missing_tip_blocks_tip_charts_only() {
        let table = enriched(b"total_bill,size\n10,2\n20,3\n");
        let specs = ChartSpecBuilder::default().build(&table);

        assert!(!specs[0].is_renderable());
        assert!(specs[1].is_renderable());
        assert!(!specs[2].is_renderable());
        assert!(!specs[3].is_renderable());
        assert!(matches!(specs[0].render, Renderability::NotRenderable { .. }));
        assert!(specs[2].reason().unwrap().contains("tip"));
    }

    #[test]
    fn unenriched_table_cannot_plot_daily_average() {
        let table = parse_csv(SAMPLE).unwrap();
        let specs = ChartSpecBuilder::default().build(&table);
        assert!(specs[0].reason().unwrap().contains("time_order"));
        assert!(specs[1].is_renderable());
    }

    #[test]
    fn non_numeric_bills_are_empty_not_missing() {
        let table = enriched(b"total_bill,tip\nabc,1\n,2\n");
        let specs = ChartSpecBuilder::default().build(&table);
        assert!(matches!(specs[1].render, Renderability::Empty { .. }));
        assert!(matches!(specs[2].render, Renderability::Empty { .. }));
        assert!(specs[0].is_renderable());
    }

    #[test]
    fn header_only_table_is_empty_everywhere() {
        let table = enriched(b"total_bill,tip,size\n");
        let specs = ChartSpecBuilder::default().build(&table);
        assert!(specs
            .iter()
            .all(|s| matches!(s.render, Renderability::Empty { .. })));
    }

    #[test]
    fn bubble_markers_scale_with_party_size() {
        let specs = ChartSpecBuilder::default().build(&enriched(SAMPLE));
        let Some(ChartParams::Scatter(bubble)) = specs[3].params() else {
            panic!("expected scatter params");
        };
        assert_eq!(bubble.size_max, 15.0);
        assert_eq!(bubble.size_label.as_deref(), Some("Party size"));

        let largest = bubble.points.iter().map(|p| p.marker).fold(0.0, f64::max);
        assert!((largest - 15.0).abs() < 1e-12);
        // size 2 of max 4 → 15 * sqrt(0.5)
        assert!((bubble.points[0].marker - 15.0 * 0.5f64.sqrt()).abs() < 1e-9);

        let Some(ChartParams::Scatter(plain)) = specs[2].params() else {
            panic!("expected scatter params");
        };
        assert_eq!(plain.opacity, 0.7);
        assert!(plain.points.iter().all(|p| p.marker == 10.0 && p.size.is_none()));
    }

    #[test]
    fn daily_average_points_are_ascending() {
        let specs = ChartSpecBuilder::default().build(&enriched(SAMPLE));
        let Some(ChartParams::TimeSeries(series)) = specs[0].params() else {
            panic!("expected time series params");
        };
        assert_eq!(series.frequency, Frequency::Daily);
        assert!(!series.points.is_empty());
        assert!(series.points.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn custom_bin_count() {
        let builder = ChartSpecBuilder::new(ChartConfig {
            histogram_bins: 7,
            ..ChartConfig::default()
        });
        let specs = builder.build(&enriched(SAMPLE));
        let Some(ChartParams::Histogram(hist)) = specs[1].params() else {
            panic!("expected histogram params");
        };
        assert_eq!(hist.bins, 7);
        assert_eq!(hist.edges.len(), 8);
    }
}
