//! Error types for company analysis.

use compounder_data::DataError;
use compounder_output::ExportError;
use thiserror::Error;

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while analysing a company.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No company is stored under the ticker
    #[error("Unknown ticker {0}; ingest first")]
    UnknownTicker(String),

    /// No diluted EPS is stored, so no sticker price can be computed
    #[error("Missing EPS for {0}; cannot compute sticker, ingest fuller statements")]
    MissingEps(String),

    /// An alert rule is malformed
    #[error("Invalid alert rule: {0}")]
    InvalidRule(String),

    /// Storage or parsing error
    #[error(transparent)]
    Data(#[from] DataError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),
}
