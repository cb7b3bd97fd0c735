//! Lag and rolling-window features over a revenue series.
//!
//! Rows are assumed to be in ascending time order. Every statistic is taken
//! over the series shifted by one row, so a row never sees its own value.

use crate::transform::Transform;
use dataprep_data::{PrepError, Result, columns::require_column};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Default revenue column.
pub const DEFAULT_REVENUE_COLUMN: &str = "revenue";

/// Value one row back.
pub const PREV1: &str = "revenue_prev1";
/// Value two rows back.
pub const PREV2: &str = "revenue_prev2";
/// Mean of the three values before the current row.
pub const MEAN_3: &str = "revenue_mean_3";
/// Mean of the seven values before the current row.
pub const MEAN_7: &str = "revenue_mean_7";
/// `prev1 - prev2`.
pub const DIFF: &str = "revenue_diff";
/// `(prev1 - prev2) / prev2`.
pub const PCT_CHANGE: &str = "revenue_pct_change";
/// `prev1 - mean_7`.
pub const DEV_FROM_MEAN7: &str = "revenue_dev_from_mean7";

/// Derived column names, in output order.
pub const DERIVED_COLUMNS: [&str; 7] = [
    PREV1,
    PREV2,
    MEAN_3,
    MEAN_7,
    DIFF,
    PCT_CHANGE,
    DEV_FROM_MEAN7,
];

/// Configuration for [`TimeSeriesFeatures`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSeriesConfig {
    /// Numeric column the features are derived from (default: `revenue`).
    pub revenue_col: String,
}

impl Default for TimeSeriesConfig {
    fn default() -> Self {
        Self {
            revenue_col: DEFAULT_REVENUE_COLUMN.to_string(),
        }
    }
}

fn full_window(window_size: usize) -> RollingOptionsFixedWindow {
    RollingOptionsFixedWindow {
        window_size,
        min_periods: window_size,
        ..Default::default()
    }
}

/// Append lag, rolling-mean and change columns derived from `revenue_col`.
///
/// All derived columns are `Float64`. Rows without enough history hold null,
/// never zero. When `revenue_prev2` is zero, `revenue_pct_change` is ±inf
/// (or NaN for `0 / 0`); this is returned as is.
///
/// # Errors
///
/// Returns `MissingColumn` if `revenue_col` is absent and `ColumnType` if it
/// is not numeric.
pub fn add_time_series_features(df: &DataFrame, revenue_col: &str) -> Result<DataFrame> {
    require_column(df, revenue_col)?;
    let dtype = df.column(revenue_col)?.dtype();
    if !(dtype.is_integer() || dtype.is_float() || dtype == &DataType::Null) {
        return Err(PrepError::column_type(revenue_col, "a numeric column", dtype));
    }

    let revenue = col(revenue_col).strict_cast(DataType::Float64);
    let shifted = revenue.clone().shift(lit(1));

    let out = df
        .clone()
        .lazy()
        .with_columns([
            shifted.clone().alias(PREV1),
            revenue.shift(lit(2)).alias(PREV2),
            shifted.clone().rolling_mean(full_window(3)).alias(MEAN_3),
            shifted.rolling_mean(full_window(7)).alias(MEAN_7),
        ])
        .with_columns([
            (col(PREV1) - col(PREV2)).alias(DIFF),
            ((col(PREV1) - col(PREV2)) / col(PREV2)).alias(PCT_CHANGE),
            (col(PREV1) - col(MEAN_7)).alias(DEV_FROM_MEAN7),
        ])
        .collect()?;

    Ok(out)
}

/// [`add_time_series_features`] as a [`Transform`].
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesFeatures {
    config: TimeSeriesConfig,
}

impl TimeSeriesFeatures {
    /// Derive features from the configured column.
    pub const fn with_config(config: TimeSeriesConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub const fn config(&self) -> &TimeSeriesConfig {
        &self.config
    }
}

impl Transform for TimeSeriesFeatures {
    fn name(&self) -> &str {
        "time_series"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![self.config.revenue_col.as_str()]
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        add_time_series_features(df, &self.config.revenue_col)
    }
}
