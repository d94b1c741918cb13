//! Adds the synthetic `time_order` column and coerces `total_bill`.

use super::columns::{TIME_ORDER, TOTAL_BILL};
use super::{TipsError, TipsTable};
use chrono::NaiveDate;
use polars::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Closed calendar-day range that synthetic order dates are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl OrderWindow {
    /// `None` when `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of distinct days in the window.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl Default for OrderWindow {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2023, 1, 31).unwrap_or_default(),
        }
    }
}

/// Derives analysis columns on a freshly loaded table.
#[derive(Debug, Clone, Default)]
pub struct TipsEnricher {
    window: OrderWindow,
}

impl TipsEnricher {
    pub fn new(window: OrderWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> OrderWindow {
        self.window
    }

    /// Add `time_order` (one uniform draw per row, with replacement) and cast
    /// `total_bill` to Float64 with unparseable cells becoming null.
    ///
    /// The row count never changes. An existing `time_order` is replaced.
    pub fn enrich<R: Rng + ?Sized>(
        &self,
        mut table: TipsTable,
        rng: &mut R,
    ) -> Result<TipsTable, TipsError> {
        let height = table.height();
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
        let first = (self.window.start - epoch).num_days() as i32;
        let last = (self.window.end - epoch).num_days() as i32;

        let days: Vec<i32> = (0..height).map(|_| rng.gen_range(first..=last)).collect();
        let time_order = Column::new(TIME_ORDER.into(), days).cast(&DataType::Date)?;
        table.set_column(time_order)?;

        if let Ok(bills) = table.frame().column(TOTAL_BILL) {
            if bills.dtype() != &DataType::Float64 {
                let coerced = bills.cast(&DataType::Float64)?;
                table.set_column(coerced)?;
            }
        }

        debug!(
            rows = height,
            start = %self.window.start,
            end = %self.window.end,
            "enriched tips table"
        );
        Ok(table)
    }
}
