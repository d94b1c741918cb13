//! Daily quote tables and the memoized quote loader.

use crate::data::{Cache, DataError, MemoryCache, QuoteBar, QuoteProvider};
use chrono::NaiveDate;
use polars::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};

/// OHLCV rows for one ticker, keyed by trading date.
///
/// Dates are unique and strictly ascending. The table may be empty, which
/// means "no trading data in range" and is not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteTable {
    ticker: String,
    bars: Vec<QuoteBar>,
}

impl QuoteTable {
    pub fn empty(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            bars: Vec::new(),
        }
    }

    /// Build a table from provider output, keeping only `[start, end)`.
    ///
    /// Rows are sorted by date; when a date repeats, the later row wins.
    pub fn normalized(
        ticker: impl Into<String>,
        mut bars: Vec<QuoteBar>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        bars.retain(|b| b.date >= start && b.date < end);
        // Stable sort keeps provider order among equal dates.
        bars.sort_by_key(|b| b.date);

        let mut deduped: Vec<QuoteBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }

        Self {
            ticker: ticker.into(),
            bars: deduped,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[QuoteBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// `(date, close)` pairs for the line chart, skipping missing closes.
    pub fn close_series(&self) -> Vec<(NaiveDate, f64)> {
        self.bars
            .iter()
            .filter(|b| b.close.is_finite())
            .map(|b| (b.date, b.close))
            .collect()
    }

    /// Convert to a DataFrame with a Date column and the OHLCV columns.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
        let dates: Vec<i32> = self
            .bars
            .iter()
            .map(|b| (b.date - epoch).num_days() as i32)
            .collect();
        let opens: Vec<f64> = self.bars.iter().map(|b| b.open).collect();
        let highs: Vec<f64> = self.bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = self.bars.iter().map(|b| b.low).collect();
        let closes: Vec<f64> = self.bars.iter().map(|b| b.close).collect();
        let volumes: Vec<u64> = self.bars.iter().map(|b| b.volume).collect();

        DataFrame::new(vec![
            Column::new("Date".into(), dates).cast(&DataType::Date)?,
            Column::new("Open".into(), opens),
            Column::new("High".into(), highs),
            Column::new("Low".into(), lows),
            Column::new("Close".into(), closes),
            Column::new("Volume".into(), volumes),
        ])
    }
}

/// Memoization key for a quote request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuoteKey {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl QuoteKey {
    /// Tickers are trimmed and uppercased so `aapl ` and `AAPL` share an entry.
    pub fn new(ticker: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            ticker: ticker.trim().to_ascii_uppercase(),
            start,
            end,
        }
    }
}

/// Loads quote tables through a provider, memoized per `(ticker, start, end)`.
pub struct QuoteLoader<C = MemoryCache<QuoteKey, QuoteTable>> {
    provider: Box<dyn QuoteProvider>,
    cache: C,
}

impl QuoteLoader {
    /// Loader with a process-lifetime in-memory cache.
    pub fn new(provider: Box<dyn QuoteProvider>) -> Self {
        Self::with_cache(provider, MemoryCache::new())
    }
}

impl<C: Cache<QuoteKey, QuoteTable>> QuoteLoader<C> {
    pub fn with_cache(provider: Box<dyn QuoteProvider>, cache: C) -> Self {
        Self { provider, cache }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Load daily quotes for `[start, end)`.
    ///
    /// A blank ticker or an empty range yields an empty table without a
    /// network call. Provider errors propagate and are not cached.
    pub fn load(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Arc<QuoteTable>, DataError> {
        let key = QuoteKey::new(ticker, start, end);

        if key.ticker.is_empty() || start >= end {
            debug!(ticker = %key.ticker, %start, %end, "empty quote request, skipping fetch");
            return Ok(Arc::new(QuoteTable::empty(key.ticker)));
        }

        if let Some(hit) = self.cache.get(&key) {
            debug!(ticker = %key.ticker, %start, %end, "quote cache hit");
            return Ok(hit);
        }

        let fetch_key = key.clone();
        self.cache.get_or_compute(key, || {
            let bars = self
                .provider
                .fetch_ohlcv(&fetch_key.ticker, fetch_key.start, fetch_key.end)?;
            let table =
                QuoteTable::normalized(&fetch_key.ticker, bars, fetch_key.start, fetch_key.end);
            info!(
                ticker = %fetch_key.ticker,
                provider = self.provider.name(),
                rows = table.len(),
                "loaded quotes"
            );
            Ok(table)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn bar(date: NaiveDate, close: f64) -> QuoteBar {
        QuoteBar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 100,
        }
    }

    /// Provider returning a fixed set of bars and counting calls.
    struct FixedProvider {
        bars: Vec<QuoteBar>,
        calls: Arc<AtomicUsize>,
    }

    impl QuoteProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch_ohlcv(
            &self,
            _ticker: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<QuoteBar>, DataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.bars.clone())
        }
    }

    struct OfflineProvider;

    impl QuoteProvider for OfflineProvider {
        fn name(&self) -> &str {
            "offline"
        }

        fn fetch_ohlcv(
            &self,
            _ticker: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<QuoteBar>, DataError> {
            Err(DataError::NetworkUnreachable("offline".into()))
        }
    }

    #[test]
    fn normalized_sorts_dedups_and_clips() {
        let bars = vec![
            bar(d(2024, 1, 5), 5.0),
            bar(d(2024, 1, 2), 2.0),
            bar(d(2024, 1, 3), 3.0),
            bar(d(2024, 1, 3), 3.5),
            bar(d(2023, 12, 29), 0.0),
            bar(d(2024, 1, 10), 10.0),
        ];
        let table = QuoteTable::normalized("AAPL", bars, d(2024, 1, 1), d(2024, 1, 10));

        let dates: Vec<NaiveDate> = table.bars().iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 5)]);
        assert_eq!(table.bars()[1].close, 3.5);
    }

    #[test]
    fn close_series_skips_nan() {
        let mut gap = bar(d(2024, 1, 3), 0.0);
        gap.close = f64::NAN;
        let table = QuoteTable::normalized(
            "AAPL",
            vec![bar(d(2024, 1, 2), 2.0), gap],
            d(2024, 1, 1),
            d(2024, 2, 1),
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.close_series(), vec![(d(2024, 1, 2), 2.0)]);
    }

    #[test]
    fn dataframe_has_ohlcv_columns() {
        let table = QuoteTable::normalized(
            "AAPL",
            vec![bar(d(2024, 1, 2), 2.0), bar(d(2024, 1, 3), 3.0)],
            d(2024, 1, 1),
            d(2024, 2, 1),
        );
        let df = table.to_dataframe().unwrap();
        assert_eq!(df.height(), 2);
        for name in ["Date", "Open", "High", "Low", "Close", "Volume"] {
            assert!(df.column(name).is_ok(), "missing {name}");
        }
        assert_eq!(df.column("Date").unwrap().dtype(), &DataType::Date);
    }

    #[test]
    fn empty_table_converts_to_empty_frame() {
        let df = QuoteTable::empty("AAPL").to_dataframe().unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 6);
    }

    #[test]
    fn load_is_memoized_per_key() {
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = QuoteLoader::new(Box::new(FixedProvider {
            bars: vec![bar(d(2024, 1, 2), 2.0)],
            calls: Arc::clone(&calls),
        }));

        let a = loader.load("aapl", d(2024, 1, 1), d(2024, 2, 1)).unwrap();
        let b = loader.load("AAPL", d(2024, 1, 1), d(2024, 2, 1)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        loader.load("AAPL", d(2024, 1, 1), d(2024, 3, 1)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(loader.cache().len(), 2);
    }

    #[test]
    fn blank_ticker_or_empty_range_skips_provider() {
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = QuoteLoader::new(Box::new(FixedProvider {
            bars: vec![bar(d(2024, 1, 2), 2.0)],
            calls: Arc::clone(&calls),
        }));

        assert!(loader.load("  ", d(2024, 1, 1), d(2024, 2, 1)).unwrap().is_empty());
        assert!(loader.load("AAPL", d(2024, 2, 1), d(2024, 2, 1)).unwrap().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn provider_errors_propagate_and_are_not_cached() {
        let loader = QuoteLoader::new(Box::new(OfflineProvider));

        let err = loader.load("AAPL", d(2024, 1, 1), d(2024, 2, 1)).unwrap_err();
        assert!(matches!(err, DataError::NetworkUnreachable(_)));
        assert!(loader.cache().is_empty());
    }
}
