//! `TipsTable`: the loaded tipping records as a polars DataFrame.

use super::TipsError;
use chrono::NaiveDate;
use polars::prelude::*;

/// Tipping records in file order.
///
/// Columns are whatever the source CSV provided, plus the derived columns
/// added by the enricher. Numeric analysis goes through [`TipsTable::numeric`],
/// which coerces text to numbers without failing.
#[derive(Debug, Clone)]
pub struct TipsTable {
    frame: DataFrame,
}

impl TipsTable {
    /// A table with no rows and no columns.
    pub fn empty() -> Self {
        Self {
            frame: DataFrame::empty(),
        }
    }

    pub fn from_frame(frame: DataFrame) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    pub fn has_columns(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.has_column(name))
    }

    /// Column values as `f64`, with unparseable or missing cells as `None`.
    ///
    /// Returns `None` when the column does not exist.
    pub fn numeric(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let column = self.frame.column(name).ok()?;
        let cast = column.cast(&DataType::Float64).ok()?;
        let values = cast.f64().ok()?;
        Some(
            values
                .into_iter()
                .map(|v| v.filter(|x| x.is_finite()))
                .collect(),
        )
    }

    /// Date column values, or `None` when the column is absent or not a date.
    pub fn dates(&self, name: &str) -> Option<Vec<Option<NaiveDate>>> {
        let column = self.frame.column(name).ok()?;
        if column.dtype() != &DataType::Date {
            return None;
        }
        let days = column.cast(&DataType::Int32).ok()?;
        let days = days.i32().ok()?;
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
        Some(
            days.into_iter()
                .map(|d| d.and_then(|d| epoch.checked_add_signed(chrono::Duration::days(d as i64))))
                .collect(),
        )
    }

    /// Display text for one cell; nulls render as an empty string.
    pub fn cell_text(&self, column: &str, row: usize) -> String {
        let Ok(column) = self.frame.column(column) else {
            return String::new();
        };
        match column.get(row) {
            Ok(AnyValue::Null) | Err(_) => String::new(),
            Ok(value) => match value.get_str() {
                Some(s) => s.to_string(),
                None => value.to_string(),
            },
        }
    }

    /// First `n` rows, for previews.
    pub fn head(&self, n: usize) -> TipsTable {
        Self {
            frame: self.frame.head(Some(n)),
        }
    }

    /// Add or replace a column. Its length must match the table height
    /// unless the table has no columns yet.
    pub fn set_column(&mut self, column: Column) -> Result<(), TipsError> {
        self.frame.with_column(column)?;
        Ok(())
    }
}

impl Default for TipsTable {
    fn default() -> Self {
        Self::empty()
    }
}
