//! Missing-value row removal.

use crate::transform::Transform;
use dataprep_data::{
    Result,
    columns::{column_names, require_columns},
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Remove every row that has a missing value in one of `subset`, or in any
/// column when `subset` is `None`.
///
/// A value is missing when it is null, or NaN in a floating-point column.
/// Remaining rows keep their order and the input is left untouched.
///
/// # Errors
///
/// Returns `MissingColumn` if a name in `subset` is not a column of `df`.
pub fn drop_nan(df: &DataFrame, subset: Option<&[&str]>) -> Result<DataFrame> {
    let names: Vec<String> = match subset {
        Some(cols) => {
            require_columns(df, cols)?;
            cols.iter().map(|c| c.to_string()).collect()
        }
        None => column_names(df),
    };

    let predicate = names
        .iter()
        .map(|name| is_present(df, name))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .reduce(|acc, expr| acc.and(expr));

    let Some(predicate) = predicate else {
        return Ok(df.clone());
    };

    Ok(df.clone().lazy().filter(predicate).collect()?)
}

/// Expression that is true where `name` holds a usable value.
fn is_present(df: &DataFrame, name: &str) -> Result<Expr> {
    let present = col(name).is_not_null();
    if df.column(name)?.dtype().is_float() {
        Ok(present.and(col(name).is_not_nan()))
    } else {
        Ok(present)
    }
}

/// [`drop_nan`] as a [`Transform`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropMissing {
    /// Columns to inspect; all columns when `None`.
    pub subset: Option<Vec<String>>,
}

impl DropMissing {
    /// Inspect only the given columns.
    pub fn subset<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subset: Some(columns.into_iter().map(Into::into).collect()),
        }
    }
}

impl Transform for DropMissing {
    fn name(&self) -> &str {
        "drop_nan"
    }

    fn required_columns(&self) -> Vec<&str> {
        self.subset
            .as_deref()
            .map(|cols| cols.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        let subset = self.required_columns();
        drop_nan(df, self.subset.as_ref().map(|_| subset.as_slice()))
    }
}
