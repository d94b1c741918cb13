//! Per-request orchestration for both dashboards.
//!
//! The loaders report failures in different shapes: quotes return
//! `Result<_, DataError>`, tips return a `TipsLoad` with provenance. The
//! report functions here fold both into tables plus [`Notice`]s, so the
//! surfaces only ever render.

use crate::charts::{ChartSpec, ChartSpecBuilder};
use crate::config::{ConfigError, DashConfig};
use crate::data::{Cache, DataError, MemoryCache, QuoteProvider, YahooProvider};
use crate::quotes::{QuoteKey, QuoteLoader, QuoteTable};
use crate::rng::seeded;
use crate::status::Notice;
use crate::tips::{CsvSource, HttpCsvSource, Provenance, TipsEnricher, TipsLoader, TipsTable};
use chrono::{Duration, NaiveDate};
use rand::Rng;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotesOutcome {
    Loaded,
    Empty,
    Failed,
}

#[derive(Debug, Clone)]
pub struct QuotesReport {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub outcome: QuotesOutcome,
    pub table: Arc<QuoteTable>,
    pub notices: Vec<Notice>,
}

impl QuotesReport {
    /// Whether the Close line chart has anything to draw.
    pub fn has_close(&self) -> bool {
        self.table.bars().iter().any(|b| b.close.is_finite())
    }
}

/// `[today - lookback_days, today)`, clamped at the earliest representable date.
pub fn default_window(today: NaiveDate, lookback_days: u32) -> (NaiveDate, NaiveDate) {
    let start = today
        .checked_sub_signed(Duration::days(i64::from(lookback_days)))
        .unwrap_or(NaiveDate::MIN);
    (start, today)
}

/// Load quotes and classify the result.
pub fn quotes_report<C: Cache<QuoteKey, QuoteTable>>(
    loader: &QuoteLoader<C>,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> QuotesReport {
    let key = QuoteKey::new(ticker, start, end);
    let (outcome, table, notices) = match loader.load(ticker, start, end) {
        Ok(table) if table.is_empty() => (
            QuotesOutcome::Empty,
            table,
            vec![Notice::warning(
                "No data for the selected period; widen the range or check the ticker.",
            )],
        ),
        Ok(table) => {
            let mut notices = Vec::new();
            if table.close_series().is_empty() {
                notices.push(Notice::warning("No 'Close' data; line chart unavailable."));
            }
            (QuotesOutcome::Loaded, table, notices)
        }
        Err(e) => {
            warn!(ticker = %key.ticker, error = %e, "quote load failed");
            (
                QuotesOutcome::Failed,
                Arc::new(QuoteTable::empty(key.ticker.clone())),
                vec![Notice::error(format!(
                    "Failed to load quotes for {}: {e}",
                    key.ticker
                ))],
            )
        }
    };

    QuotesReport {
        ticker: key.ticker,
        start,
        end,
        outcome,
        table,
        notices,
    }
}

#[derive(Debug, Clone)]
pub struct TipsReport {
    pub provenance: Provenance,
    pub table: TipsTable,
    pub specs: Vec<ChartSpec>,
    pub notices: Vec<Notice>,
}

/// Load, enrich and build chart specs for the tips dashboard.
///
/// An enrichment failure is reported as an error notice; charts are then
/// built from the table as loaded.
pub fn tips_report<R: Rng + ?Sized>(
    loader: &TipsLoader,
    upload: Option<&[u8]>,
    enricher: &TipsEnricher,
    builder: &ChartSpecBuilder,
    rng: &mut R,
) -> TipsReport {
    let load = loader.load(upload);
    let mut notices = vec![load.notice()];
    let provenance = load.provenance;

    // Enrichment runs for every outcome, so even a failed load carries a
    // (zero-row) `time_order` column.
    let raw = load.table;
    let table = match enricher.enrich(raw.clone(), rng) {
        Ok(enriched) => enriched,
        Err(e) => {
            warn!(error = %e, "tips enrichment failed");
            notices.push(Notice::error(format!("Failed to prepare the data: {e}")));
            raw
        }
    };

    if table.is_empty() {
        notices.push(Notice::warning(
            "No data. Upload a CSV or check the internet connection to load the demo dataset.",
        ));
    }

    let specs = builder.build(&table);
    info!(
        ?provenance,
        rows = table.height(),
        charts = specs.iter().filter(|s| s.is_renderable()).count(),
        "tips report ready"
    );

    TipsReport {
        provenance,
        table,
        specs,
        notices,
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),
}

/// Long-lived collaborators for one process, built from configuration.
///
/// Holds the memoized quote loader so repeated requests across reloads hit
/// the cache.
pub struct Session {
    config: DashConfig,
    quotes: QuoteLoader,
    tips: TipsLoader,
    enricher: TipsEnricher,
    builder: ChartSpecBuilder,
}

impl Session {
    /// Session backed by Yahoo Finance and the configured remote CSV.
    pub fn from_config(config: DashConfig) -> Result<Self, SessionError> {
        let provider = YahooProvider::new(config.quotes.request_timeout())?;
        let source =
            HttpCsvSource::new(config.tips.remote_url.clone(), config.tips.request_timeout())?;
        Self::with_sources(config, Box::new(provider), Box::new(source))
    }

    /// Session with caller-supplied sources.
    pub fn with_sources(
        config: DashConfig,
        provider: Box<dyn QuoteProvider>,
        source: Box<dyn CsvSource>,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let cache = match config.quotes.cache_ttl() {
            Some(ttl) => MemoryCache::with_ttl(ttl),
            None => MemoryCache::new(),
        };
        Ok(Self {
            quotes: QuoteLoader::with_cache(provider, cache),
            tips: TipsLoader::new(source),
            enricher: TipsEnricher::new(config.tips.order_window()?),
            builder: ChartSpecBuilder::new(config.charts.clone()),
            config,
        })
    }

    pub fn config(&self) -> &DashConfig {
        &self.config
    }

    pub fn quote_loader(&self) -> &QuoteLoader {
        &self.quotes
    }

    /// Default quote window ending `today`.
    pub fn quote_window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        default_window(today, self.config.quotes.lookback_days)
    }

    pub fn quotes(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> QuotesReport {
        quotes_report(&self.quotes, ticker, start, end)
    }

    /// Tips report with a fresh random source seeded from config, so the
    /// same table always gets the same order dates.
    pub fn tips(&self, upload: Option<&[u8]>) -> TipsReport {
        let mut rng = seeded(self.config.tips.seed);
        tips_report(&self.tips, upload, &self.enricher, &self.builder, &mut rng)
    }
}
