//! Spreadsheet reader built on calamine.
//!
//! Only the first sheet is read. The first row holds the column names and
//! each column's dtype is inferred from its non-empty cells.

use crate::error::Result;
use calamine::{Data, DataType as _, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;

static EMPTY_CELL: Data = Data::Empty;

/// Inferred type of a spreadsheet column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Empty,
    Int,
    Float,
    Bool,
    Date,
    DateTime,
    Text,
}

impl CellKind {
    fn of(cell: &Data) -> Self {
        match cell {
            Data::Empty | Data::Error(_) => Self::Empty,
            Data::Int(_) => Self::Int,
            Data::Float(f) if is_integral(*f) => Self::Int,
            Data::Float(_) => Self::Float,
            Data::Bool(_) => Self::Bool,
            Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
                Some(dt) if dt.time() == NaiveTime::MIN => Self::Date,
                Some(_) => Self::DateTime,
                None => Self::Text,
            },
            Data::String(_) | Data::DurationIso(_) => Self::Text,
        }
    }

    /// Widen two kinds to one that holds both.
    fn merge(self, other: Self) -> Self {
        use CellKind::*;
        match (self, other) {
            (Empty, k) | (k, Empty) => k,
            (a, b) if a == b => a,
            (Int, Float) | (Float, Int) => Float,
            (Date, DateTime) | (DateTime, Date) => DateTime,
            _ => Text,
        }
    }
}

fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64
}

/// Read the first sheet of a workbook into a DataFrame.
pub fn read_excel(path: &Path) -> Result<DataFrame> {
    // surface a missing file as an IO error rather than a workbook error
    std::fs::metadata(path)?;
    let mut workbook = open_workbook_auto(path)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Ok(DataFrame::empty()),
    };

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let body: Vec<&[Data]> = rows.collect();

    let names = header_names(header);
    let columns = names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<&Data> = body
                .iter()
                .map(|row| row.get(idx).unwrap_or(&EMPTY_CELL))
                .collect();
            build_column(&name, &cells)
        })
        .collect::<Vec<_>>();

    Ok(DataFrame::new(columns)?)
}

/// Column names from the header row; blanks and repeats are made unique.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match cell {
                Data::Empty => format!("Unnamed: {idx}"),
                other => other.to_string(),
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

fn build_column(name: &str, cells: &[&Data]) -> Column {
    let kind = cells
        .iter()
        .fold(CellKind::Empty, |acc, cell| acc.merge(CellKind::of(cell)));
    let name: PlSmallStr = name.into();

    match kind {
        CellKind::Empty => Column::new(name, vec![None::<f64>; cells.len()]),
        CellKind::Int => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|cell| match cell {
                    Data::Int(v) => Some(*v),
                    Data::Float(f) => Some(*f as i64),
                    _ => None,
                })
                .collect();
            Column::new(name, values)
        }
        CellKind::Float => {
            let values: Vec<Option<f64>> = cells.iter().map(|cell| cell.as_f64()).collect();
            Column::new(name, values)
        }
        CellKind::Bool => {
            let values: Vec<Option<bool>> = cells.iter().map(|cell| cell.get_bool()).collect();
            Column::new(name, values)
        }
        CellKind::Date => {
            let values: Vec<Option<NaiveDate>> = cells
                .iter()
                .map(|cell| cell.as_datetime().map(|dt| dt.date()))
                .collect();
            Column::new(name, values)
        }
        CellKind::DateTime => {
            let values: Vec<Option<NaiveDateTime>> =
                cells.iter().map(|cell| cell.as_datetime()).collect();
            Column::new(name, values)
        }
        CellKind::Text => {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|cell| match cell {
                    Data::Empty | Data::Error(_) => None,
                    other => Some(other.to_string()),
                })
                .collect();
            Column::new(name, values)
        }
    }
}
