//! Tipping-records pipeline: CSV ingestion, enrichment, and the loader that
//! chooses between an uploaded file and the remote demo dataset.

pub mod enrich;
pub mod loader;
pub mod parse;
pub mod source;
pub mod table;

pub use enrich::{OrderWindow, TipsEnricher};
pub use loader::{Provenance, TipsLoad, TipsLoader};
pub use parse::parse_csv;
pub use source::{CsvSource, HttpCsvSource, DEFAULT_TIPS_URL};
pub use table::TipsTable;

use crate::data::DataError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Column names the pipeline knows about.
pub mod columns {
    pub const TOTAL_BILL: &str = "total_bill";
    pub const TIP: &str = "tip";
    pub const SIZE: &str = "size";
    pub const TIME_ORDER: &str = "time_order";

    /// Header of the demo dataset; uploads in this layout render every chart.
    pub const EXPECTED: [&str; 7] = ["total_bill", "tip", "sex", "smoker", "day", "time", "size"];

    /// One-line upload guide naming [`EXPECTED`].
    pub fn expected_hint() -> String {
        format!("Expected columns: {}", EXPECTED.join(", "))
    }
}

/// Errors from reading or transforming a tips table.
#[derive(Debug, Error)]
pub enum TipsError {
    #[error("CSV parse error: {0}")]
    Parse(String),

    #[error("no columns to parse from file")]
    NoColumns,

    #[error(transparent)]
    Transport(#[from] DataError),

    #[error("table error: {0}")]
    Frame(#[from] PolarsError),
}

impl TipsError {
    /// True for failures to reach the remote dataset, as opposed to bad content.
    pub fn is_transport(&self) -> bool {
        matches!(self, TipsError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_hint_lists_demo_header() {
        assert_eq!(
            columns::expected_hint(),
            "Expected columns: total_bill, tip, sex, smoker, day, time, size"
        );
    }

    #[test]
    fn only_transport_errors_are_transport() {
        assert!(TipsError::Transport(DataError::Timeout("5s".into())).is_transport());
        assert!(!TipsError::NoColumns.is_transport());
    }
}
