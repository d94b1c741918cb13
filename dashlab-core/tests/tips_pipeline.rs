//! End-to-end tests for the tips pipeline: loader → enricher → chart specs.
//!
//! Tests:
//! 1. Remote loads are repeatable and keep every fixture row
//! 2. A malformed upload fails without consulting the remote source; short
//!    rows and repeated headers are accepted
//! 3. Enrichment dates every row inside the order window
//! 4. Missing `tip` blocks the tip charts but not the bill histogram
//! 5. The canonical fixture yields four renderable specs with 20 bins

use dashlab_core::charts::{ChartKind, ChartParams, ChartSpecBuilder, Renderability};
use dashlab_core::data::DataError;
use dashlab_core::rng::seeded;
use dashlab_core::session::tips_report;
use dashlab_core::tips::{CsvSource, OrderWindow, Provenance, TipsEnricher, TipsLoader};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const FIXTURE: &[u8] = include_bytes!("fixtures/tips.csv");
const FIXTURE_ROWS: usize = 244;

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

struct FixtureSource {
    calls: Arc<AtomicUsize>,
}

impl CsvSource for FixtureSource {
    fn location(&self) -> &str {
        "fixtures/tips.csv"
    }

    fn fetch(&self) -> Result<Vec<u8>, DataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(FIXTURE.to_vec())
    }
}

fn fixture_loader() -> (TipsLoader, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let loader = TipsLoader::new(Box::new(FixtureSource {
        calls: Arc::clone(&calls),
    }));
    (loader, calls)
}

fn fixture_data_rows() -> usize {
    FIXTURE
        .split(|&b| b == b'\n')
        .skip(1)
        .filter(|line| !line.is_empty())
        .count()
}

// ──────────────────────────────────────────────
// Loader
// ──────────────────────────────────────────────

#[test]
fn remote_load_is_repeatable_and_complete() {
    let (loader, calls) = fixture_loader();

    let first = loader.load(None);
    let second = loader.load(None);

    assert_eq!(first.provenance, Provenance::Remote);
    assert_eq!(first.provenance, second.provenance);
    assert_eq!(first.table.height(), fixture_data_rows());
    assert_eq!(first.table.height(), FIXTURE_ROWS);
    assert_eq!(
        first.table.column_names(),
        vec!["total_bill", "tip", "sex", "smoker", "day", "time", "size"]
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn malformed_upload_never_falls_back() {
    let (loader, calls) = fixture_loader();

    for bad in [&b""[..], b"a,b\n1,2,3\n", b"a\n\xff\n"] {
        let load = loader.load(Some(bad));
        assert_eq!(load.provenance, Provenance::Failed);
        assert!(load.table.is_empty());
        assert!(!load.error.unwrap_or_default().is_empty());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn lenient_uploads_still_load() {
    let (loader, calls) = fixture_loader();

    let short = loader.load(Some(&b"total_bill,tip,size\n10,1,2\n20,3\n"[..]));
    assert_eq!(short.provenance, Provenance::Local);
    assert_eq!(short.table.height(), 2);
    assert_eq!(short.table.numeric("size").unwrap(), vec![Some(2.0), None]);

    let repeated = loader.load(Some(&b"total_bill,tip,tip\n10,1,2\n"[..]));
    assert_eq!(repeated.provenance, Provenance::Local);
    assert_eq!(repeated.table.column_names(), vec!["total_bill", "tip", "tip.1"]);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn upload_of_fixture_is_local() {
    let (loader, calls) = fixture_loader();
    let load = loader.load(Some(FIXTURE));
    assert_eq!(load.provenance, Provenance::Local);
    assert_eq!(load.table.height(), FIXTURE_ROWS);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// ──────────────────────────────────────────────
// Enricher
// ──────────────────────────────────────────────

#[test]
fn enrichment_dates_every_fixture_row() {
    let (loader, _) = fixture_loader();
    let table = loader.load(None).table;
    let enriched = TipsEnricher::default()
        .enrich(table, &mut seeded(42))
        .unwrap();

    let window = OrderWindow::default();
    let dates = enriched.dates("time_order").unwrap();
    assert_eq!(dates.len(), FIXTURE_ROWS);
    assert!(dates.iter().all(|d| d.is_some_and(|d| window.contains(d))));
    assert_eq!(enriched.height(), FIXTURE_ROWS);
}

proptest! {
    #[test]
    fn uploads_of_any_row_count_enrich_cleanly(rows in 0usize..120, seed in any::<u64>()) {
        let mut csv = String::from("total_bill,tip\n");
        for i in 0..rows {
            csv.push_str(&format!("{}.5,{}\n", 10 + i, 1 + i % 5));
        }

        let (loader, _) = fixture_loader();
        let load = loader.load(Some(csv.as_bytes()));
        prop_assert_eq!(load.provenance, Provenance::Local);
        prop_assert_eq!(load.table.height(), rows);

        let enriched = TipsEnricher::default().enrich(load.table, &mut seeded(seed)).unwrap();
        let dates = enriched.dates("time_order").unwrap();
        prop_assert_eq!(dates.len(), rows);
        let window = OrderWindow::default();
        prop_assert!(dates.iter().all(|d| d.is_some_and(|d| window.contains(d))));
    }
}

// ──────────────────────────────────────────────
// Chart specs
// ──────────────────────────────────────────────

#[test]
fn missing_tip_column_blocks_tip_charts() {
    let (loader, _) = fixture_loader();
    let upload = b"total_bill,size\n12.5,2\n30.1,4\n18.0,3\n";
    let report = tips_report(
        &loader,
        Some(upload),
        &TipsEnricher::default(),
        &ChartSpecBuilder::default(),
        &mut seeded(42),
    );

    let by_kind = |kind: ChartKind| {
        report
            .specs
            .iter()
            .find(|s| s.kind == kind)
            .unwrap()
            .clone()
    };

    assert!(matches!(
        by_kind(ChartKind::DailyAverageTip).render,
        Renderability::NotRenderable { .. }
    ));
    assert!(matches!(
        by_kind(ChartKind::BillVsTip).render,
        Renderability::NotRenderable { .. }
    ));
    assert!(by_kind(ChartKind::BillDistribution).is_renderable());
}

#[test]
fn canonical_fixture_renders_all_four_charts() {
    let (loader, _) = fixture_loader();
    let report = tips_report(
        &loader,
        None,
        &TipsEnricher::default(),
        &ChartSpecBuilder::default(),
        &mut seeded(42),
    );

    assert_eq!(report.provenance, Provenance::Remote);
    assert_eq!(report.specs.len(), 4);
    for spec in &report.specs {
        assert!(spec.is_renderable(), "{:?} not renderable: {:?}", spec.kind, spec.reason());
    }

    let Some(ChartParams::Histogram(hist)) = report.specs[1].params() else {
        panic!("second spec should be the bill histogram");
    };
    assert_eq!(hist.bins, 20);
    assert_eq!(hist.total(), FIXTURE_ROWS as u64);

    let Some(ChartParams::TimeSeries(series)) = report.specs[0].params() else {
        panic!("first spec should be the daily average");
    };
    assert!(series.points.len() <= 31);

    let Some(ChartParams::Scatter(bubble)) = report.specs[3].params() else {
        panic!("fourth spec should be the sized scatter");
    };
    assert_eq!(bubble.points.len(), FIXTURE_ROWS);
}

#[test]
fn specs_serialize_to_json() {
    let (loader, _) = fixture_loader();
    let report = tips_report(
        &loader,
        None,
        &TipsEnricher::default(),
        &ChartSpecBuilder::default(),
        &mut seeded(42),
    );
    let json = serde_json::to_value(&report.specs).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(4));
    assert_eq!(json[1]["kind"], "bill_distribution");
    assert_eq!(json[1]["render"]["renderable"]["histogram"]["bins"], 20);
}
