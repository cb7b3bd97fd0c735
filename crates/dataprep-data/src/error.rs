//! Error types for table preparation.

use thiserror::Error;

/// Result type for table preparation.
pub type Result<T> = std::result::Result<T, PrepError>;

/// Errors that can occur while loading, transforming or saving a table.
#[derive(Debug, Error)]
pub enum PrepError {
    /// Unknown load format tag
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Required column absent
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Unparseable or impossible calendar date
    #[error("Invalid date value in column '{column}': {value}")]
    InvalidDateValue {
        /// Column the value came from
        column: String,
        /// Offending value, as text
        value: String,
    },

    /// Column with a dtype the step cannot work with
    #[error("Column '{column}' has type {found}, expected {expected}")]
    ColumnType {
        /// Column name
        column: String,
        /// What the step accepts
        expected: String,
        /// Actual dtype, as text
        found: String,
    },

    /// Merging would produce two columns with the same name
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Spreadsheet reading error
    #[error("Excel error: {0}")]
    Excel(String),

    /// Invalid pipeline configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PrepError {
    /// Build a [`PrepError::MissingColumn`] for `name`.
    pub fn missing_column(name: impl Into<String>) -> Self {
        Self::MissingColumn(name.into())
    }

    /// Build a [`PrepError::InvalidDateValue`].
    pub fn invalid_date(column: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidDateValue {
            column: column.into(),
            value: value.to_string(),
        }
    }

    /// Build a [`PrepError::ColumnType`].
    pub fn column_type(
        column: impl Into<String>,
        expected: impl Into<String>,
        found: impl ToString,
    ) -> Self {
        Self::ColumnType {
            column: column.into(),
            expected: expected.into(),
            found: found.to_string(),
        }
    }
}

impl From<calamine::Error> for PrepError {
    fn from(err: calamine::Error) -> Self {
        match err {
            calamine::Error::Io(e) => Self::Io(e),
            other => Self::Excel(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PrepError::UnsupportedFormat("parquet".to_string());
        assert_eq!(err.to_string(), "Unsupported file type: parquet");

        let err = PrepError::missing_column("NGÀY");
        assert_eq!(err.to_string(), "Missing column: NGÀY");

        let err = PrepError::invalid_date("date", "2023-02-30");
        assert_eq!(
            err.to_string(),
            "Invalid date value in column 'date': 2023-02-30"
        );

        let err = PrepError::column_type("revenue", "a numeric column", "str");
        assert_eq!(
            err.to_string(),
            "Column 'revenue' has type str, expected a numeric column"
        );

        let err = PrepError::DuplicateColumn("temp_main".to_string());
        assert_eq!(err.to_string(), "Duplicate column: temp_main");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PrepError = io.into();
        assert!(matches!(err, PrepError::Io(_)));
    }
}
