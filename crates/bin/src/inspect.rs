//! Table summaries for `dataprep inspect` and `dataprep run --show`.

use polars::prelude::*;
use serde_json::{Value, json};

/// Per-column summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColumnSummary {
    pub name: String,
    pub dtype: String,
    pub nulls: usize,
}

/// Shape and schema of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TableSummary {
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
}

impl TableSummary {
    pub(crate) fn from_frame(df: &DataFrame) -> Self {
        let columns = df
            .get_columns()
            .iter()
            .map(|column| ColumnSummary {
                name: column.name().to_string(),
                dtype: column.dtype().to_string(),
                nulls: column.null_count(),
            })
            .collect();

        Self {
            rows: df.height(),
            columns,
        }
    }

    pub(crate) fn to_text(&self) -> String {
        let width = self
            .columns
            .iter()
            .map(|c| c.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("column".len());

        let mut out = format!("{} rows x {} columns\n", self.rows, self.columns.len());
        out.push_str(&format!("{:<width$}  {:<12}  nulls\n", "column", "dtype"));
        for column in &self.columns {
            out.push_str(&format!(
                "{:<width$}  {:<12}  {}\n",
                column.name, column.dtype, column.nulls
            ));
        }
        out
    }

    pub(crate) fn to_json(&self) -> Value {
        json!({
            "rows": self.rows,
            "columns": self
                .columns
                .iter()
                .map(|c| json!({ "name": c.name, "dtype": c.dtype, "nulls": c.nulls }))
                .collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_nulls() {
        let df = df!(
            "revenue" => [Some(1.0), None, Some(3.0)],
            "NGÀY" => [1i64, 2, 3]
        )
        .unwrap();
        let summary = TableSummary::from_frame(&df);

        assert_eq!(summary.rows, 3);
        assert_eq!(summary.columns.len(), 2);
        assert_eq!(summary.columns[0].nulls, 1);
        assert_eq!(summary.columns[1].name, "NGÀY");
        assert_eq!(summary.columns[1].dtype, "i64");
    }

    #[test]
    fn test_text_and_json_output() {
        let df = df!("revenue" => [1.0, 2.0]).unwrap();
        let summary = TableSummary::from_frame(&df);

        let text = summary.to_text();
        assert!(text.starts_with("2 rows x 1 columns\n"));
        assert!(text.contains("revenue"));

        let value = summary.to_json();
        assert_eq!(value["rows"], 2);
        assert_eq!(value["columns"][0]["name"], "revenue");
        assert_eq!(value["columns"][0]["dtype"], "f64");
    }
}
