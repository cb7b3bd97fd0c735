//! Feature Registry
//!
//! Static description of every transformation step: what it needs and
//! what it adds. Used for discovery (for example by the CLI).

use crate::calendar::{DATE_COLUMN, DAY_COLUMN, MONTH_COLUMN};
use crate::external::DEFAULT_JOIN_KEY;
use crate::time_series::{DEFAULT_REVENUE_COLUMN, DERIVED_COLUMNS};

/// Step metadata
#[derive(Debug, Clone)]
pub struct FeatureInfo {
    /// Step name (unique identifier, also the pipeline step tag)
    pub name: &'static str,
    /// Brief description of what the step does
    pub description: &'static str,
    /// Required column names in input data, with default settings
    pub required_columns: &'static [&'static str],
    /// Columns added to the output; empty when the set depends on the data
    pub produced_columns: &'static [&'static str],
}

/// Get all step info
pub fn available_features() -> Vec<FeatureInfo> {
    vec![
        FeatureInfo {
            name: "drop_nan",
            description: "Drop rows with a missing value in the selected (or all) columns",
            required_columns: &[],
            produced_columns: &[],
        },
        FeatureInfo {
            name: "time_features",
            description: "Date for year 2023 from Month/NGÀY plus one-hot weekday indicators",
            required_columns: &[MONTH_COLUMN, DAY_COLUMN],
            produced_columns: &[DATE_COLUMN],
        },
        FeatureInfo {
            name: "external",
            description: "Join a second table on a date key, then drop unwanted columns",
            required_columns: &[DEFAULT_JOIN_KEY],
            produced_columns: &[],
        },
        FeatureInfo {
            name: "time_series",
            description: "Lags, rolling means and changes of the revenue series",
            required_columns: &[DEFAULT_REVENUE_COLUMN],
            produced_columns: &DERIVED_COLUMNS,
        },
    ]
}

/// Get step info by name
pub fn get_feature_info(name: &str) -> Option<FeatureInfo> {
    available_features().into_iter().find(|f| f.name == name)
}

/// List all step names
pub fn list_feature_names() -> Vec<&'static str> {
    available_features().into_iter().map(|f| f.name).collect()
}
