//! Error type for the command-line front end.

use dataprep::PrepError;

/// Errors surfaced by a CLI command.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    /// Loading, transforming or saving failed.
    #[error(transparent)]
    Prep(#[from] PrepError),
    /// JSON rendering failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Polars DataFrame error.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
