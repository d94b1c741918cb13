//! DashLab Core: data loading, validation and chart specs for two dashboards.
//!
//! - Quotes: daily OHLCV for one ticker, fetched through a provider and
//!   memoized per `(ticker, start, end)`
//! - Tips: restaurant-tipping CSV from an upload or a remote fallback, enriched
//!   with a seeded synthetic order date
//! - Chart specs: four descriptive tips charts, each either renderable or
//!   carrying the reason it is not
//! - Session: folds every outcome into tables plus user-facing notices

pub mod charts;
pub mod config;
pub mod data;
pub mod quotes;
pub mod rng;
pub mod session;
pub mod status;
pub mod tips;
