//! Common interface for table transformations.

use dataprep_data::{Result, columns::require_columns};
use polars::prelude::DataFrame;

/// A step that maps one table to a new table without touching its input.
pub trait Transform: std::fmt::Debug {
    /// Short identifier, matching the registry entry.
    fn name(&self) -> &str;

    /// Columns the input table must contain.
    fn required_columns(&self) -> Vec<&str>;

    /// Apply the step to `df`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required column is absent or the step itself fails.
    fn apply(&self, df: &DataFrame) -> Result<DataFrame>;

    /// Check the required columns, then apply.
    fn run(&self, df: &DataFrame) -> Result<DataFrame> {
        require_columns(df, &self.required_columns())?;
        let out = self.apply(df)?;
        tracing::debug!(
            step = self.name(),
            rows_in = df.height(),
            rows_out = out.height(),
            columns_out = out.width(),
            "applied transform"
        );
        Ok(out)
    }
}
