#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/compounder/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod alerts;
pub mod analyzer;
pub mod error;
pub mod ingest;
pub mod universe;

// Re-export main types from sub-crates
pub use compounder_data as data;
pub use compounder_metrics as metrics;
pub use compounder_output as output;

pub use alerts::{TriggeredAlert, add_rule, evaluate_alerts, evaluate_rule, validate_rule};
pub use analyzer::{
    CompanyAnalyzer, CompanyMetrics, CompanySummary, LatestIncome, valuation_snapshot,
};
pub use error::{AnalysisError, Result};
pub use ingest::{
    IngestSummary, SeedReport, ingest_document, ingest_file, missing_tickers, seed_directory,
    seed_file,
};
pub use universe::{DEFAULT_TICKERS, TickerList, Universe};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
