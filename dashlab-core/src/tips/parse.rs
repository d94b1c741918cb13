//! CSV byte-stream parsing.
//!
//! The `csv` crate checks structure first:
//! - The first record is the header; a file without one has no columns and
//!   is rejected.
//! - A repeated header name gets a `.N` suffix (`tip`, `tip.1`, ...).
//! - Short records are padded with empty cells; a record longer than the
//!   header is a parse error.
//!
//! The rectangular result is then read by polars, which infers Int64,
//! Float64 or String per column. Empty cells and the usual NA spellings
//! (`NA`, `N/A`, `NaN`, `null`, ...) are null.

use super::{TipsError, TipsTable};
use polars::prelude::*;
use std::collections::HashSet;
use std::io::Cursor;
use tracing::debug;

/// Cell texts read as null in every column.
pub const NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Parse CSV bytes into a table.
pub fn parse_csv(bytes: &[u8]) -> Result<TipsTable, TipsError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| TipsError::Parse(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(TipsError::NoColumns);
    }
    let headers = dedupe_headers(headers);
    let width = headers.len();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&headers)
        .map_err(|e| TipsError::Parse(e.to_string()))?;

    let mut rows = 0usize;
    for record in reader.records() {
        let record = record.map_err(|e| TipsError::Parse(e.to_string()))?;
        if record.len() > width {
            let line = record.position().map_or(0, |p| p.line());
            return Err(TipsError::Parse(format!(
                "line {line}: expected at most {width} fields, found {}",
                record.len()
            )));
        }
        let mut cells: Vec<&str> = record.iter().collect();
        cells.resize(width, "");
        writer
            .write_record(&cells)
            .map_err(|e| TipsError::Parse(e.to_string()))?;
        rows += 1;
    }

    let frame = if rows == 0 {
        let columns: Vec<Column> = headers
            .iter()
            .map(|name| Column::new(name.as_str().into(), Vec::<Option<String>>::new()))
            .collect();
        DataFrame::new(columns)?
    } else {
        let normalized = writer
            .into_inner()
            .map_err(|e| TipsError::Parse(e.to_string()))?;
        read_frame(normalized)?
    };

    debug!(rows = frame.height(), columns = frame.width(), "parsed CSV");
    Ok(TipsTable::from_frame(frame))
}

fn read_frame(normalized: Vec<u8>) -> PolarsResult<DataFrame> {
    let null_values = NullValues::AllColumns(NULL_TOKENS.iter().map(|t| (*t).into()).collect());
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|opts| opts.with_null_values(Some(null_values.clone())))
        .into_reader_with_file_handle(Cursor::new(normalized))
        .finish()
}

/// Suffix repeated names with `.1`, `.2`, ... skipping names already taken.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut out = Vec::with_capacity(headers.len());
    for name in headers {
        let mut candidate = name.clone();
        let mut n = 1;
        while taken.contains(&candidate) {
            candidate = format!("{name}.{n}");
            n += 1;
        }
        taken.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_int_float_and_text_columns() {
        let csv = b"total_bill,tip,sex,size\n16.99,1.01,Female,2\n10.34,1.66,Male,3\n";
        let table = parse_csv(csv).unwrap();
        let frame = table.frame();

        assert_eq!(frame.height(), 2);
        assert_eq!(frame.column("total_bill").unwrap().dtype(), &DataType::Float64);
        assert_eq!(frame.column("size").unwrap().dtype(), &DataType::Int64);
        assert_eq!(frame.column("sex").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn mixed_column_stays_text() {
        let csv = b"total_bill,tip\n16.99,1.0\nabc,2.0\n";
        let table = parse_csv(csv).unwrap();
        assert_eq!(
            table.frame().column("total_bill").unwrap().dtype(),
            &DataType::String
        );
        assert_eq!(table.numeric("total_bill").unwrap(), vec![Some(16.99), None]);
    }

    #[test]
    fn na_tokens_are_null() {
        let csv = b"total_bill,tip\n16.99,NA\nn/a,2.0\nNaN,3.5\n";
        let table = parse_csv(csv).unwrap();
        let frame = table.frame();
        assert_eq!(frame.column("total_bill").unwrap().dtype(), &DataType::Float64);
        assert_eq!(
            table.numeric("total_bill").unwrap(),
            vec![Some(16.99), None, None]
        );
        assert_eq!(table.numeric("tip").unwrap(), vec![None, Some(2.0), Some(3.5)]);
    }

    #[test]
    fn empty_cells_are_null() {
        let csv = b"tip,day\n1.5,\n,Sun\n";
        let table = parse_csv(csv).unwrap();
        assert_eq!(table.numeric("tip").unwrap(), vec![Some(1.5), None]);
        assert_eq!(table.frame().column("day").unwrap().null_count(), 1);
    }

    #[test]
    fn header_only_is_valid_and_empty() {
        let table = parse_csv(b"total_bill,tip,size\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_names(), vec!["total_bill", "tip", "size"]);
    }

    #[test]
    fn zero_bytes_has_no_columns() {
        assert!(matches!(parse_csv(b""), Err(TipsError::NoColumns)));
    }

    #[test]
    fn short_rows_are_padded_with_null() {
        let table = parse_csv(b"total_bill,tip,size\n10,1,2\n20,3\n").unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(table.numeric("size").unwrap(), vec![Some(2.0), None]);
        assert_eq!(table.numeric("tip").unwrap(), vec![Some(1.0), Some(3.0)]);
    }

    #[test]
    fn long_rows_fail() {
        let err = parse_csv(b"a,b\n1,2\n3,4,5\n").unwrap_err();
        assert!(matches!(err, TipsError::Parse(_)));
        assert!(err.to_string().contains("at most 2 fields"));
    }

    #[test]
    fn invalid_utf8_fails() {
        let err = parse_csv(b"a,b\n1,\xff\xfe\n").unwrap_err();
        assert!(matches!(err, TipsError::Parse(_)));
    }

    #[test]
    fn duplicate_headers_get_numbered() {
        let table = parse_csv(b"total_bill,tip,tip\n10,1,2\n").unwrap();
        assert_eq!(table.column_names(), vec!["total_bill", "tip", "tip.1"]);
        assert_eq!(table.numeric("tip.1").unwrap(), vec![Some(2.0)]);
    }

    #[test]
    fn dedupe_skips_names_already_taken() {
        let names = vec!["a", "a.1", "a", "a"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(dedupe_headers(names), vec!["a", "a.1", "a.2", "a.3"]);
    }

    #[test]
    fn quoted_fields_follow_standard_escaping() {
        let csv = b"note,tip\n\"dinner, late\",2.5\n\"said \"\"thanks\"\"\",1\n";
        let table = parse_csv(csv).unwrap();
        assert_eq!(table.cell_text("note", 0), "dinner, late");
        assert_eq!(table.cell_text("note", 1), "said \"thanks\"");
    }
}
