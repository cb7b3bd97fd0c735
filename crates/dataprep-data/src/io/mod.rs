//! Reading and writing tables at the file boundary.
//!
//! Two input formats are supported: comma-separated text with a header row
//! and spreadsheet workbooks (first sheet only). Output is always CSV.

mod csv;
mod excel;

use crate::error::{PrepError, Result};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub use self::csv::{read_csv, write_csv};
pub use self::excel::read_excel;

/// Input file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Comma-separated values with a header row.
    Csv,

    /// Spreadsheet workbook (xlsx, xlsm, xls, xlsb, ods).
    Excel,
}

impl FileFormat {
    /// Returns the tag used to select this format.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "excel",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for FileFormat {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(Self::Csv),
            "excel" => Ok(Self::Excel),
            other => Err(PrepError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Load a table from `path`.
///
/// No schema validation is done; column names and types are whatever the
/// source file contains.
///
/// # Errors
///
/// Returns [`PrepError::Io`] if the file cannot be opened, or a parsing
/// error from the underlying reader.
pub fn load_data(path: impl AsRef<Path>, format: FileFormat) -> Result<DataFrame> {
    let path = path.as_ref();
    let df = match format {
        FileFormat::Csv => read_csv(path)?,
        FileFormat::Excel => read_excel(path)?,
    };
    tracing::debug!(
        path = %path.display(),
        %format,
        rows = df.height(),
        columns = df.width(),
        "loaded table"
    );
    Ok(df)
}

/// Load a table from `path`, selecting the reader by tag (`"csv"` or `"excel"`).
///
/// # Errors
///
/// Returns [`PrepError::UnsupportedFormat`] for any other tag.
pub fn load_data_tagged(path: impl AsRef<Path>, tag: &str) -> Result<DataFrame> {
    load_data(path, tag.parse()?)
}

/// Save `df` to `path` as CSV with a header row and no index column.
///
/// # Errors
///
/// Returns [`PrepError::Io`] if the path is not writable.
pub fn save_to_csv(df: &DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_csv(df, path)?;
    tracing::debug!(path = %path.display(), rows = df.height(), "saved table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("csv", FileFormat::Csv)]
    #[case("excel", FileFormat::Excel)]
    fn test_parse_known_tags(#[case] tag: &str, #[case] expected: FileFormat) {
        assert_eq!(tag.parse::<FileFormat>().unwrap(), expected);
        assert_eq!(expected.to_string(), tag);
    }

    #[rstest]
    #[case("parquet")]
    #[case("CSV")]
    #[case("")]
    fn test_unknown_tag(#[case] tag: &str) {
        let err = tag.parse::<FileFormat>().unwrap_err();
        assert!(matches!(err, PrepError::UnsupportedFormat(t) if t == tag));
    }

    #[test]
    fn test_load_rejects_unknown_tag_before_io() {
        let err = load_data_tagged("does/not/matter.json", "json").unwrap_err();
        assert!(matches!(err, PrepError::UnsupportedFormat(_)));
    }

    #[rstest]
    #[case("sales.csv", Some(FileFormat::Csv))]
    #[case("weather.XLSX", Some(FileFormat::Excel))]
    #[case("book.ods", Some(FileFormat::Excel))]
    #[case("notes.txt", None)]
    #[case("no_extension", None)]
    fn test_from_extension(#[case] path: &str, #[case] expected: Option<FileFormat>) {
        assert_eq!(FileFormat::from_extension(Path::new(path)), expected);
    }
}
