//! Market-data acquisition and memoization

pub mod cache;
pub mod provider;
pub mod yahoo;

pub use cache::{Cache, MemoryCache};
pub use provider::{DataError, QuoteBar, QuoteProvider};
pub use yahoo::YahooProvider;
