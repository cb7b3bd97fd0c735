//! Integration tests for loading and saving tables.

use chrono::NaiveDate;
use dataprep_data::{FileFormat, PrepError, load_data, load_data_tagged, save_to_csv};
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn sample_table() -> DataFrame {
    df!(
        "store" => ["north", "south", "east"],
        "units" => [Some(3i64), None, Some(7)],
        "revenue" => [10.5, 20.25, 30.0],
        "open" => [true, false, true],
        "date" => [
            NaiveDate::from_ymd_opt(2023, 4, 15).unwrap(),
            NaiveDate::from_ymd_opt(2023, 4, 16).unwrap(),
            NaiveDate::from_ymd_opt(2023, 4, 17).unwrap(),
        ]
    )
    .unwrap()
}

#[test]
fn test_save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sales.csv");
    let df = sample_table();

    save_to_csv(&df, &path).unwrap();
    let loaded = load_data(&path, FileFormat::Csv).unwrap();

    assert_eq!(loaded.get_column_names(), df.get_column_names());
    assert_eq!(loaded.column("date").unwrap().dtype(), &DataType::Date);
    assert!(loaded.equals_missing(&df));
}

#[test]
fn test_saved_file_has_header_and_no_index() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sales.csv");

    save_to_csv(&sample_table(), &path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();

    assert_eq!(lines.next(), Some("store,units,revenue,open,date"));
    assert_eq!(lines.next(), Some("north,3,10.5,true,2023-04-15"));
    // null units is an empty field
    assert_eq!(lines.next(), Some("south,,20.25,false,2023-04-16"));
}

#[test]
fn test_load_csv_by_tag() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("days.csv");
    fs::write(&path, "Month,NGÀY,revenue\n4,15,100\n4,16,\n").unwrap();

    let df = load_data_tagged(&path, "csv").unwrap();
    assert_eq!(df.shape(), (2, 3));
    assert_eq!(df.column("NGÀY").unwrap().dtype(), &DataType::Int64);
    assert_eq!(df.column("revenue").unwrap().null_count(), 1);
}

#[test]
fn test_unsupported_format() {
    let err = load_data_tagged("anything.parquet", "parquet").unwrap_err();
    assert!(matches!(err, PrepError::UnsupportedFormat(tag) if tag == "parquet"));
}

#[test]
fn test_missing_csv_is_io_error() {
    let dir = tempdir().unwrap();
    let err = load_data(dir.path().join("absent.csv"), FileFormat::Csv).unwrap_err();
    assert!(matches!(err, PrepError::Io(_)));
}

#[test]
fn test_missing_workbook_is_io_error() {
    let dir = tempdir().unwrap();
    let err = load_data(dir.path().join("absent.xlsx"), FileFormat::Excel).unwrap_err();
    assert!(matches!(err, PrepError::Io(_)));
}

#[test]
fn test_unwritable_path_is_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no_such_dir").join("out.csv");
    let err = save_to_csv(&sample_table(), &path).unwrap_err();
    assert!(matches!(err, PrepError::Io(_)));
}

#[test]
fn test_all_empty_column_reads_back_as_float() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sparse.csv");
    let df = df!(
        "revenue" => [1.0, 2.0, 3.0],
        "revenue_mean_7" => [None::<f64>, None, None]
    )
    .unwrap();

    save_to_csv(&df, &path).unwrap();
    let loaded = load_data(&path, FileFormat::Csv).unwrap();

    assert_eq!(
        loaded.column("revenue_mean_7").unwrap().dtype(),
        &DataType::Float64
    );
    assert_eq!(loaded.column("revenue_mean_7").unwrap().null_count(), 3);
    assert!(loaded.equals_missing(&df));
}

#[test]
fn test_load_workbook_first_sheet() {
    let df = load_data(fixture("sales.xlsx"), FileFormat::Excel).unwrap();

    let names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(
        names,
        vec!["Month", "NGÀY", "date", "Unnamed: 3", "revenue", "open", "revenue.1"]
    );
    assert_eq!(df.height(), 3);

    assert_eq!(df.column("Month").unwrap().dtype(), &DataType::Int64);
    assert_eq!(df.column("NGÀY").unwrap().dtype(), &DataType::Int64);
    assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
    assert_eq!(df.column("Unnamed: 3").unwrap().dtype(), &DataType::String);
    assert_eq!(df.column("revenue").unwrap().dtype(), &DataType::Float64);
    assert_eq!(df.column("open").unwrap().dtype(), &DataType::Boolean);
    assert_eq!(df.column("revenue.1").unwrap().dtype(), &DataType::Float64);

    let days: Vec<i64> = df
        .column("NGÀY")
        .unwrap()
        .as_materialized_series()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(days, vec![15, 16, 17]);

    let dates: Vec<Option<NaiveDate>> = df
        .column("date")
        .unwrap()
        .as_materialized_series()
        .date()
        .unwrap()
        .as_date_iter()
        .collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2023, 4, 15),
            NaiveDate::from_ymd_opt(2023, 4, 16),
            NaiveDate::from_ymd_opt(2023, 4, 17),
        ]
    );

    let revenue: Vec<Option<f64>> = df
        .column("revenue")
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(revenue, vec![Some(100.0), Some(120.5), None]);

    let stores: Vec<Option<&str>> = df
        .column("Unnamed: 3")
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(stores, vec![Some("north"), Some("south"), Some("east")]);
}

#[test]
fn test_load_workbook_by_tag() {
    let df = load_data_tagged(fixture("sales.xlsx"), "excel").unwrap();
    assert_eq!(df.shape(), (3, 7));
}
