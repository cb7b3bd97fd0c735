//! Delimited text reader and writer.

use crate::error::Result;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Rows scanned to infer the column types.
const INFER_SCHEMA_ROWS: usize = 100;

/// Read a comma-separated file with a header row.
///
/// Strings that look like ISO dates or date-times are parsed to temporal
/// columns, so a `date` column written by [`write_csv`] reads back as `Date`.
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)?;

    let parse_options = CsvParseOptions::default().with_try_parse_dates(true);

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_parse_options(parse_options)
        .into_reader_with_file_handle(file)
        .finish()?;

    restore_empty_columns(df)
}

/// Read an all-empty column as `Float64` nulls instead of text.
///
/// [`write_csv`] writes nulls as empty fields, so a column with no values
/// (for example a rolling mean over fewer rows than its window) would
/// otherwise come back as `String`.
fn restore_empty_columns(mut df: DataFrame) -> Result<DataFrame> {
    let empty: Vec<PlSmallStr> = df
        .get_columns()
        .iter()
        .filter(|c| c.dtype() == &DataType::String && c.len() > 0 && c.null_count() == c.len())
        .map(|c| c.name().clone())
        .collect();

    for name in empty {
        let restored = df.column(name.as_str())?.cast(&DataType::Float64)?;
        df.with_column(restored)?;
    }
    Ok(df)
}

/// Write `df` as comma-separated text: header row, no index, nulls as empty fields.
pub fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    let mut out = df.clone();

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut out)?;

    Ok(())
}
