//! Column lookup and date-key coercion helpers shared by the feature steps.

use crate::error::{PrepError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Date-only layouts accepted for string date keys.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Date-time layouts accepted for string date keys; the time part is dropped.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Returns true if `df` has a column called `name`.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Fail with [`PrepError::MissingColumn`] unless `df` has a column called `name`.
pub fn require_column(df: &DataFrame, name: &str) -> Result<()> {
    if has_column(df, name) {
        Ok(())
    } else {
        Err(PrepError::missing_column(name))
    }
}

/// Check every name in `names`, reporting the first one that is absent.
pub fn require_columns<S: AsRef<str>>(df: &DataFrame, names: &[S]) -> Result<()> {
    names
        .iter()
        .try_for_each(|name| require_column(df, name.as_ref()))
}

/// Names of all columns in `df`, in order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

/// Parse a date from text, accepting a handful of common layouts.
///
/// Date-times are truncated to their calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Return a copy of `df` whose column `name` has the `Date` dtype.
///
/// `Date` columns pass through, `Datetime` columns are truncated to the day
/// and strings are parsed with [`parse_date`]. Nulls stay null. The input
/// frame is never modified.
pub fn coerce_date_column(df: &DataFrame, name: &str) -> Result<DataFrame> {
    require_column(df, name)?;
    let column = df.column(name)?;

    let coerced = match column.dtype() {
        DataType::Date => return Ok(df.clone()),
        DataType::Datetime(_, _) | DataType::Null => column.cast(&DataType::Date)?,
        DataType::String => {
            let parsed = column
                .as_materialized_series()
                .str()?
                .into_iter()
                .map(|value| {
                    value
                        .map(|text| parse_date(text).ok_or_else(|| PrepError::invalid_date(name, text)))
                        .transpose()
                })
                .collect::<Result<Vec<Option<NaiveDate>>>>()?;
            Column::new(name.into(), parsed)
        }
        other => {
            return Err(PrepError::invalid_date(
                name,
                format!("values of type {other} are not dates"),
            ));
        }
    };

    let mut out = df.clone();
    out.with_column(coerced)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("2023-04-15", ymd(2023, 4, 15))]
    #[case("2023/04/15", ymd(2023, 4, 15))]
    #[case("04/15/2023", ymd(2023, 4, 15))]
    #[case("15.04.2023", ymd(2023, 4, 15))]
    #[case("2023-04-15 13:45:00", ymd(2023, 4, 15))]
    #[case("2023-04-15T00:00:00", ymd(2023, 4, 15))]
    #[case(" 2023-04-15 ", ymd(2023, 4, 15))]
    fn test_parse_date_layouts(#[case] text: &str, #[case] expected: NaiveDate) {
        assert_eq!(parse_date(text), Some(expected));
    }

    #[rstest]
    #[case("2023-02-30")]
    #[case("yesterday")]
    #[case("")]
    fn test_parse_date_rejects(#[case] text: &str) {
        assert_eq!(parse_date(text), None);
    }

    #[test]
    fn test_require_columns() {
        let df = df!("a" => [1, 2], "b" => [3, 4]).unwrap();
        assert!(require_columns(&df, &["a", "b"]).is_ok());

        let err = require_columns(&df, &["a", "c"]).unwrap_err();
        assert!(matches!(err, PrepError::MissingColumn(name) if name == "c"));
    }

    #[test]
    fn test_coerce_string_column_is_pure() {
        let df = df!(
            "date" => [Some("2023-01-02"), None, Some("2023-01-04")],
            "x" => [1, 2, 3]
        )
        .unwrap();

        let coerced = coerce_date_column(&df, "date").unwrap();
        assert_eq!(coerced.column("date").unwrap().dtype(), &DataType::Date);
        assert_eq!(coerced.column("date").unwrap().null_count(), 1);

        // the caller's frame keeps its string key
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_coerce_rejects_garbage() {
        let df = df!("date" => ["2023-01-02", "not a date"]).unwrap();
        let err = coerce_date_column(&df, "date").unwrap_err();
        assert!(
            matches!(err, PrepError::InvalidDateValue { column, value } if column == "date" && value == "not a date")
        );
    }

    #[test]
    fn test_coerce_rejects_numbers() {
        let df = df!("date" => [1.5, 2.5]).unwrap();
        assert!(matches!(
            coerce_date_column(&df, "date"),
            Err(PrepError::InvalidDateValue { .. })
        ));
    }

    #[test]
    fn test_coerce_missing_column() {
        let df = df!("day" => ["2023-01-02"]).unwrap();
        assert!(matches!(
            coerce_date_column(&df, "date"),
            Err(PrepError::MissingColumn(_))
        ));
    }
}
