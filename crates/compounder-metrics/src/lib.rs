#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/compounder/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod growth;
pub mod registry;
pub mod returns;
pub mod scoring;
pub mod series;
pub mod stats;
pub mod summary;
pub mod timeseries;
pub mod valuation;

pub use config::{
    BalanceSheetConfig, Band, ConfigError, ManagementConfig, MarginOfSafetyConfig, MetricsConfig,
    MoatConfig, ReturnsConfig, ValuationConfig,
};
pub use growth::{ExtendedGrowthMetrics, GrowthMetrics, cagr, windowed_cagr};
pub use registry::{
    MetricCategory, MetricInfo, available_metrics, get_metric_info, metrics_by_category,
};
pub use returns::{OwnerEarningsYear, QualityScores, ShareCountYear, quality_scores};
pub use scoring::{
    BalanceSheetScore, FourMs, ManagementScore, MarginOfSafety, MoatScore, four_ms,
};
pub use series::{CompanySeries, FiscalSeriesExtractor, YearValue};
pub use summary::{MetricSummary, metric_summary};
pub use timeseries::{Timeseries, timeseries_all};
pub use valuation::{
    GrowthSource, Scenario, ScenarioData, ScenarioParams, ValuationError, run_scenario,
};
