//! Market-data provider trait and structured error types.
//!
//! The QuoteProvider trait abstracts over quote sources (Yahoo Finance, test
//! fixtures) so the loader can be exercised without a network.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Daily OHLCV bar as returned by a provider.
///
/// Missing prices are carried as NaN rather than dropping the row, so a
/// partially populated trading day still shows up in the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Structured error types for network-backed data operations.
///
/// These are designed to be displayable in both CLI and TUI contexts.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    /// Classify a reqwest transport error.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            DataError::Timeout(err.to_string())
        } else if err.is_connect() || err.is_request() {
            DataError::NetworkUnreachable(err.to_string())
        } else {
            DataError::Other(err.to_string())
        }
    }
}

/// Trait for historical quote providers.
///
/// Implementations fetch daily bars for the half-open interval
/// `[start, end)`. An unknown ticker or an out-of-range request returns an
/// empty vector, not an error; errors are reserved for transport and format
/// failures.
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV bars for a ticker.
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<QuoteBar>, DataError>;
}
