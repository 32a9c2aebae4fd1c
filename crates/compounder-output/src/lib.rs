#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/compounder/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod summary;

pub use export::{
    ExportError, ExportFormat, Exporter, MetricRow, MetricsExport, TimeseriesExport,
    TimeseriesRow, ValuationExport,
};
pub use report::{Report, ReportBuilder, ReportError};
pub use summary::{ScoreCard, ScoreLine, metrics_table};
