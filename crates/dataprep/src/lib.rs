#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/dataprep/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod pipeline;

// Re-export main types from sub-crates
pub use dataprep_data as data;
pub use dataprep_features as features;

pub use dataprep_data::{FileFormat, PrepError, Result, load_data, save_to_csv};
pub use dataprep_features::{
    ExternalJoin, JoinKind, add_external_features, add_time_feature, add_time_series_features,
    drop_nan,
};
pub use pipeline::{Pipeline, PipelineConfig, Source, Step};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
