//! Calendar-day resampling.

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Mean of `values` per calendar day, ascending by day.
///
/// Rows where either the date or the value is missing are skipped, and days
/// with no remaining values do not appear in the output.
pub fn daily_mean(dates: &[Option<NaiveDate>], values: &[Option<f64>]) -> Vec<(NaiveDate, f64)> {
    let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for (date, value) in dates.iter().zip(values) {
        if let (Some(date), Some(value)) = (date, value) {
            let entry = buckets.entry(*date).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }
    buckets
        .into_iter()
        .map(|(date, (sum, count))| (date, sum / count as f64))
        .collect()
}
