//! Report envelope wrapping any computed record with its company and time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required field was not set on the builder.
    #[error("Missing report field: {0}")]
    MissingField(&'static str),
}

/// A computed record for one company, stamped with its generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Ticker symbol.
    pub ticker: String,

    /// Company CIK.
    pub cik: String,

    /// Report kind, e.g. `metrics` or `valuation`.
    pub kind: String,

    /// Report generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// Report contents.
    pub contents: serde_json::Value,
}

impl Report {
    /// Create a new report stamped with the current time.
    pub fn new(ticker: String, cik: String, kind: String, contents: serde_json::Value) -> Self {
        Self {
            ticker,
            cik,
            kind,
            generated_at: Utc::now(),
            contents,
        }
    }

    /// Convert report to a pretty JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the pretty JSON form to `path`.
    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    ticker: Option<String>,
    cik: Option<String>,
    kind: Option<String>,
    contents: Option<serde_json::Value>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ticker.
    pub fn ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = Some(ticker.into());
        self
    }

    /// Set the CIK.
    pub fn cik(mut self, cik: impl Into<String>) -> Self {
        self.cik = Some(cik.into());
        self
    }

    /// Set the report kind.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Serialize `value` as the report contents.
    pub fn contents<T: Serialize>(mut self, value: &T) -> Result<Self, ReportError> {
        self.contents = Some(serde_json::to_value(value)?);
        Ok(self)
    }

    /// Build the report.
    pub fn build(self) -> Result<Report, ReportError> {
        Ok(Report::new(
            self.ticker.ok_or(ReportError::MissingField("ticker"))?,
            self.cik.ok_or(ReportError::MissingField("cik"))?,
            self.kind.unwrap_or_else(|| "report".to_string()),
            self.contents.unwrap_or(serde_json::Value::Null),
        ))
    }
}
