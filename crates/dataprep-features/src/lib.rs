#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/dataprep/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod calendar;
pub mod clean;
pub mod external;
pub mod registry;
pub mod time_series;
pub mod transform;

pub use calendar::{CalendarFeatures, WeekdayEncoding, add_time_feature};
pub use clean::{DropMissing, drop_nan};
pub use external::{ExternalFeatures, ExternalJoin, JoinKind, add_external_features};
pub use registry::{FeatureInfo, available_features, get_feature_info};
pub use time_series::{TimeSeriesConfig, TimeSeriesFeatures, add_time_series_features};
pub use transform::Transform;
