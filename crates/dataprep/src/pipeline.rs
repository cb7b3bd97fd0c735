//! Config-driven composition of the preparation steps.
//!
//! A [`PipelineConfig`] names an input file, an ordered list of [`Step`]s
//! and an optional output path. It is usually read from JSON.

use dataprep_data::{FileFormat, PrepError, Result, load_data, save_to_csv};
use dataprep_features::{
    CalendarFeatures, DropMissing, ExternalFeatures, ExternalJoin, JoinKind, TimeSeriesConfig,
    TimeSeriesFeatures, Transform, external::DEFAULT_JOIN_KEY,
    time_series::DEFAULT_REVENUE_COLUMN,
};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A file to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// File location.
    pub path: PathBuf,
    /// Reader to use; guessed from the extension when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FileFormat>,
}

impl Source {
    /// Source with an explicit format.
    pub fn new(path: impl Into<PathBuf>, format: FileFormat) -> Self {
        Self {
            path: path.into(),
            format: Some(format),
        }
    }

    /// Format to read with: the configured one, else the extension's.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` when neither is known.
    pub fn resolved_format(&self) -> Result<FileFormat> {
        match self.format {
            Some(format) => Ok(format),
            None => FileFormat::from_extension(&self.path)
                .ok_or_else(|| PrepError::UnsupportedFormat(self.path.display().to_string())),
        }
    }

    /// Load the table.
    pub fn load(&self) -> Result<DataFrame> {
        load_data(&self.path, self.resolved_format()?)
    }

    fn resolve(&mut self, base: &Path) {
        self.path = resolve_path(base, &self.path);
    }
}

fn default_join_key() -> String {
    DEFAULT_JOIN_KEY.to_string()
}

fn default_revenue_col() -> String {
    DEFAULT_REVENUE_COLUMN.to_string()
}

/// One pipeline step, tagged by `step` in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Drop rows with missing values.
    DropNan {
        /// Columns to inspect; all columns when absent.
        #[serde(default)]
        subset: Option<Vec<String>>,
    },

    /// Derive `date` and weekday indicators from `Month`/`NGÀY`.
    TimeFeatures,

    /// Merge a second table on a date key.
    External {
        /// Table to merge in.
        source: Source,
        /// Join key column.
        #[serde(default = "default_join_key")]
        on: String,
        /// Columns removed after merging.
        #[serde(default)]
        drop_cols: Option<Vec<String>>,
        /// Join kind.
        #[serde(default)]
        how: JoinKind,
    },

    /// Derive lag and rolling features from a numeric column.
    TimeSeries {
        /// Column to derive from.
        #[serde(default = "default_revenue_col")]
        revenue_col: String,
    },
}

impl Step {
    /// Build the transform for this step, loading any external table.
    ///
    /// # Errors
    ///
    /// Returns an error if an external table cannot be loaded.
    pub fn build(&self) -> Result<Box<dyn Transform>> {
        let transform: Box<dyn Transform> = match self {
            Self::DropNan { subset } => Box::new(DropMissing {
                subset: subset.clone(),
            }),
            Self::TimeFeatures => Box::new(CalendarFeatures),
            Self::External {
                source,
                on,
                drop_cols,
                how,
            } => {
                let options = ExternalJoin {
                    on: on.clone(),
                    drop_cols: drop_cols.clone(),
                    how: *how,
                };
                Box::new(ExternalFeatures::new(source.load()?, options))
            }
            Self::TimeSeries { revenue_col } => {
                Box::new(TimeSeriesFeatures::with_config(TimeSeriesConfig {
                    revenue_col: revenue_col.clone(),
                }))
            }
        };
        Ok(transform)
    }
}

/// Description of a full run: load, transform, save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Main table.
    pub input: Source,
    /// Steps, applied in order.
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Where to write the result, if anywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl PipelineConfig {
    /// Parse a config from JSON text. Paths are taken as written.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the JSON is malformed or does not match the schema.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PrepError::Config(e.to_string()))
    }

    /// Read a config file; relative paths inside it are resolved against the
    /// file's directory.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `Config` if it does not parse.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::from_json_str(&fs::read_to_string(path)?)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Serialize the config as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PrepError::Config(e.to_string()))
    }

    fn resolve_paths(&mut self, base: &Path) {
        self.input.resolve(base);
        for step in &mut self.steps {
            if let Step::External { source, .. } = step {
                source.resolve(base);
            }
        }
        if let Some(output) = &self.output {
            self.output = Some(resolve_path(base, output));
        }
    }

    /// Load the input, apply every step and write the output if configured.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by loading, any step, or saving.
    pub fn run(&self) -> Result<DataFrame> {
        let pipeline = Pipeline::from_config(self)?;
        let df = pipeline.apply(self.input.load()?)?;
        if let Some(output) = &self.output {
            save_to_csv(&df, output)?;
        }
        Ok(df)
    }
}

fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// An ordered list of transforms.
#[derive(Debug, Default)]
pub struct Pipeline {
    steps: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    /// Empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the transforms described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if an external table cannot be loaded.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let steps = config
            .steps
            .iter()
            .map(Step::build)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { steps })
    }

    /// Append a step.
    pub fn step(mut self, transform: impl Transform + 'static) -> Self {
        self.steps.push(Box::new(transform));
        self
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when there are no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names, in order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Apply every step in order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first failing step's error.
    pub fn apply(&self, df: DataFrame) -> Result<DataFrame> {
        self.steps.iter().try_fold(df, |df, step| {
            tracing::debug!(step = step.name(), "running step");
            step.run(&df)
        })
    }
}
