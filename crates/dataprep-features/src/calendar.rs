//! Calendar features from month/day columns.
//!
//! Builds a `date` column for a fixed year and one-hot encodes the weekday
//! of each row. The indicator columns are derived from the weekdays that
//! actually occur, so two tables can end up with different indicator sets.

use crate::transform::Transform;
use chrono::{Datelike, NaiveDate, Weekday};
use dataprep_data::{PrepError, Result, columns::require_columns};
use polars::prelude::*;
use std::collections::BTreeMap;

/// Year assumed for every derived date.
pub const CALENDAR_YEAR: i32 = 2023;

/// Month-of-year input column.
pub const MONTH_COLUMN: &str = "Month";

/// Day-of-month input column.
pub const DAY_COLUMN: &str = "NGÀY";

/// Derived date column.
pub const DATE_COLUMN: &str = "date";

/// Intermediate weekday column; also the prefix of the indicator columns.
pub const WEEKDAY_COLUMN: &str = "weekday";

/// English name of a weekday.
pub const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Mapping from observed weekday name to its indicator column.
///
/// Ordered by weekday name, which is also the order of the indicator
/// columns in the output table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekdayEncoding {
    columns: BTreeMap<&'static str, String>,
}

impl WeekdayEncoding {
    fn from_observed<'a>(days: impl IntoIterator<Item = &'a Option<&'static str>>) -> Self {
        let columns = days
            .into_iter()
            .flatten()
            .map(|day| (*day, format!("{WEEKDAY_COLUMN}_{day}")))
            .collect();
        Self { columns }
    }

    /// Indicator column for `day`, if that weekday was observed.
    pub fn column_for(&self, day: Weekday) -> Option<&str> {
        self.columns.get(weekday_name(day)).map(String::as_str)
    }

    /// Indicator column names, in output order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.values().map(String::as_str).collect()
    }

    /// Number of indicator columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when no weekday was observed.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Add `date` and one-hot weekday columns derived from `Month` and `NGÀY`.
///
/// See [`add_time_feature_with_encoding`] for details.
pub fn add_time_feature(df: &DataFrame) -> Result<DataFrame> {
    add_time_feature_with_encoding(df).map(|(out, _)| out)
}

/// Add `date` and one-hot weekday columns, also returning the generated
/// weekday-to-column mapping.
///
/// `date` is `(2023, Month, NGÀY)`. A row with a null month or day gets a
/// null date and is false in every indicator column. The output holds the
/// original columns, then `date`, then one Boolean `weekday_<Name>` column
/// per observed weekday.
///
/// # Errors
///
/// Returns `MissingColumn` if `Month` or `NGÀY` is absent and
/// `InvalidDateValue` if a month or day is not a whole number or a row does
/// not form a real calendar date.
pub fn add_time_feature_with_encoding(df: &DataFrame) -> Result<(DataFrame, WeekdayEncoding)> {
    require_columns(df, &[MONTH_COLUMN, DAY_COLUMN])?;

    let months = int_values(df, MONTH_COLUMN)?;
    let days = int_values(df, DAY_COLUMN)?;

    let dates = months
        .iter()
        .zip(&days)
        .map(|pair| match pair {
            (Some(month), Some(day)) => calendar_date(*month, *day).map(Some),
            _ => Ok(None),
        })
        .collect::<Result<Vec<Option<NaiveDate>>>>()?;

    let weekdays: Vec<Option<&'static str>> = dates
        .iter()
        .map(|date| date.map(|d| weekday_name(d.weekday())))
        .collect();
    let encoding = WeekdayEncoding::from_observed(&weekdays);

    let mut with_date = df.clone();
    with_date.with_column(Column::new(DATE_COLUMN.into(), dates))?;
    with_date.with_column(Column::new(WEEKDAY_COLUMN.into(), weekdays))?;

    let indicators: Vec<Expr> = encoding
        .columns
        .iter()
        .map(|(day, column)| {
            when(col(WEEKDAY_COLUMN).eq(lit(*day)))
                .then(lit(true))
                .otherwise(lit(false))
                .alias(column.as_str())
        })
        .collect();

    let out = with_date
        .lazy()
        .with_columns(indicators)
        .collect()?
        .drop(WEEKDAY_COLUMN)?;

    Ok((out, encoding))
}

/// Values of `name` as 64-bit integers.
///
/// Floats must be whole numbers and strings must parse as integers; any
/// other non-null value fails with `InvalidDateValue`. Nulls stay null.
fn int_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let column = df.column(name)?;
    let dtype = column.dtype();

    if dtype.is_float() {
        let floats = column.cast(&DataType::Float64)?;
        return floats
            .as_materialized_series()
            .f64()?
            .into_iter()
            .map(|value| value.map(|v| whole_number(name, v)).transpose())
            .collect();
    }

    if !(dtype.is_integer() || matches!(dtype, DataType::String | DataType::Null)) {
        return Err(PrepError::invalid_date(
            name,
            format!("values of type {dtype} are not calendar numbers"),
        ));
    }

    // non-strict: unparseable strings come back as null and are caught below
    let ints = column.cast(&DataType::Int64)?;
    ints.as_materialized_series()
        .i64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            Some(v) => Ok(Some(v)),
            None => match column.get(row)? {
                AnyValue::Null => Ok(None),
                AnyValue::String(text) => Err(PrepError::invalid_date(name, text)),
                other => Err(PrepError::invalid_date(name, other)),
            },
        })
        .collect()
}

fn whole_number(name: &str, value: f64) -> Result<i64> {
    if value.is_finite() && value.fract() == 0.0 {
        Ok(value as i64)
    } else {
        Err(PrepError::invalid_date(name, value))
    }
}

fn calendar_date(month: i64, day: i64) -> Result<NaiveDate> {
    u32::try_from(month)
        .ok()
        .zip(u32::try_from(day).ok())
        .and_then(|(m, d)| NaiveDate::from_ymd_opt(CALENDAR_YEAR, m, d))
        .ok_or_else(|| {
            PrepError::invalid_date(DATE_COLUMN, format!("{CALENDAR_YEAR}-{month:02}-{day:02}"))
        })
}

/// [`add_time_feature`] as a [`Transform`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarFeatures;

impl Transform for CalendarFeatures {
    fn name(&self) -> &str {
        "time_features"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![MONTH_COLUMN, DAY_COLUMN]
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        add_time_feature(df)
    }
}
