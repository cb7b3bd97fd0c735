//! Merging a secondary table (weather, holidays, ...) into the main table.

use crate::transform::Transform;
use dataprep_data::{
    PrepError, Result,
    columns::{coerce_date_column, column_names, has_column, require_columns},
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Suffix for a main-table column whose name also exists in the external table.
pub const MAIN_SUFFIX: &str = "_main";

/// Suffix for an external-table column whose name also exists in the main table.
pub const EXTERNAL_SUFFIX: &str = "_external";

/// Default join key.
pub const DEFAULT_JOIN_KEY: &str = "date";

const MAIN_ROW: &str = "__dataprep_main_row";
const EXTERNAL_ROW: &str = "__dataprep_external_row";

/// Relational join kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    /// Only keys present in both tables.
    #[default]
    Inner,
    /// Every main row; unmatched external columns are null.
    Left,
    /// Every external row; unmatched main columns are null.
    Right,
    /// Union of keys; unmatched columns on either side are null.
    Outer,
}

impl JoinKind {
    const fn join_type(self) -> JoinType {
        match self {
            Self::Inner => JoinType::Inner,
            Self::Left => JoinType::Left,
            Self::Right => JoinType::Right,
            Self::Outer => JoinType::Full,
        }
    }

    /// Returns the tag used to select this join kind.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Inner => "inner",
            Self::Left => "left",
            Self::Right => "right",
            Self::Outer => "outer",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for JoinKind {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "inner" => Ok(Self::Inner),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "outer" => Ok(Self::Outer),
            other => Err(PrepError::Config(format!("unknown join kind: {other}"))),
        }
    }
}

/// Options for [`add_external_features`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalJoin {
    /// Join key column, present in both tables (default: `date`).
    pub on: String,
    /// Columns removed from the merged table.
    pub drop_cols: Option<Vec<String>>,
    /// Join kind (default: inner).
    pub how: JoinKind,
}

impl Default for ExternalJoin {
    fn default() -> Self {
        Self {
            on: DEFAULT_JOIN_KEY.to_string(),
            drop_cols: None,
            how: JoinKind::default(),
        }
    }
}

impl ExternalJoin {
    /// Join on `key` instead of `date`.
    pub fn on(mut self, key: impl Into<String>) -> Self {
        self.on = key.into();
        self
    }

    /// Remove these columns after merging.
    pub fn drop_cols<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drop_cols = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Use the given join kind.
    pub fn how(mut self, how: JoinKind) -> Self {
        self.how = how;
        self
    }
}

/// Merge `external` into `main` on a date key.
///
/// Both key columns are coerced to `Date` on private copies, so neither
/// input is modified. Non-key columns present in both tables are renamed
/// with [`MAIN_SUFFIX`] and [`EXTERNAL_SUFFIX`]. Output columns are main's
/// columns followed by external's non-key columns.
///
/// Row order: inner and left joins follow main's rows, right joins follow
/// external's rows, outer joins are sorted by key with null keys last.
///
/// # Errors
///
/// Returns `MissingColumn` if the key is absent from either table or a
/// `drop_cols` entry is not in the merged table, `InvalidDateValue` if a
/// key value cannot be read as a date, and `DuplicateColumn` if a suffixed
/// name (such as `temp_main`) already exists in either table. Repeated
/// `drop_cols` entries are dropped once.
pub fn add_external_features(
    main: &DataFrame,
    external: &DataFrame,
    options: &ExternalJoin,
) -> Result<DataFrame> {
    let on = options.on.as_str();
    let mut main = coerce_date_column(main, on)?;
    let mut external = coerce_date_column(external, on)?;
    disambiguate(&mut main, &mut external, on)?;

    let output_columns: Vec<String> = column_names(&main)
        .into_iter()
        .chain(column_names(&external).into_iter().filter(|name| name != on))
        .collect();

    let row_order = match options.how {
        JoinKind::Inner | JoinKind::Left => vec![MAIN_ROW, EXTERNAL_ROW],
        JoinKind::Right => vec![EXTERNAL_ROW, MAIN_ROW],
        JoinKind::Outer => vec![on, MAIN_ROW, EXTERNAL_ROW],
    };

    let args = JoinArgs::new(options.how.join_type()).with_coalesce(JoinCoalesce::CoalesceColumns);

    let merged = main
        .lazy()
        .with_row_index(MAIN_ROW, None)
        .join(
            external.lazy().with_row_index(EXTERNAL_ROW, None),
            [col(on)],
            [col(on)],
            args,
        )
        .sort(
            row_order,
            SortMultipleOptions::default()
                .with_nulls_last(true)
                .with_maintain_order(true),
        )
        .collect()?
        .select(output_columns)?;

    let merged = match &options.drop_cols {
        Some(drop_cols) => {
            require_columns(&merged, drop_cols)?;
            let mut seen = HashSet::new();
            drop_cols
                .iter()
                .filter(|name| seen.insert(name.as_str()))
                .try_fold(merged, |df, name| df.drop(name))?
        }
        None => merged,
    };

    tracing::debug!(
        key = on,
        how = %options.how,
        rows = merged.height(),
        columns = merged.width(),
        "merged external table"
    );
    Ok(merged)
}

/// Rename non-key columns that exist in both tables.
///
/// Fails with `DuplicateColumn` before renaming anything if a suffixed name
/// is already taken in either table.
fn disambiguate(main: &mut DataFrame, external: &mut DataFrame, on: &str) -> Result<()> {
    let shared: Vec<String> = column_names(main)
        .into_iter()
        .filter(|name| name != on && external.get_column_index(name).is_some())
        .collect();

    let taken = |name: &str| has_column(main, name) || has_column(external, name);
    for name in &shared {
        for renamed in [
            format!("{name}{MAIN_SUFFIX}"),
            format!("{name}{EXTERNAL_SUFFIX}"),
        ] {
            if taken(&renamed) {
                return Err(PrepError::DuplicateColumn(renamed));
            }
        }
    }

    for name in &shared {
        main.rename(name, format!("{name}{MAIN_SUFFIX}").into())?;
        external.rename(name, format!("{name}{EXTERNAL_SUFFIX}").into())?;
    }
    Ok(())
}

/// [`add_external_features`] with a fixed external table, as a [`Transform`].
#[derive(Debug, Clone)]
pub struct ExternalFeatures {
    table: DataFrame,
    options: ExternalJoin,
}

impl ExternalFeatures {
    /// Merge `table` into every input using `options`.
    pub fn new(table: DataFrame, options: ExternalJoin) -> Self {
        Self { table, options }
    }

    /// The external table.
    pub const fn table(&self) -> &DataFrame {
        &self.table
    }

    /// The join options.
    pub const fn options(&self) -> &ExternalJoin {
        &self.options
    }
}

impl Transform for ExternalFeatures {
    fn name(&self) -> &str {
        "external"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![self.options.on.as_str()]
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        add_external_features(df, &self.table, &self.options)
    }
}
