//! Export functionality for computed company metrics.
//!
//! CSV and JSON renditions of the headline metrics, the per-year series and
//! valuation scenarios.

use compounder_metrics::{Scenario, Timeseries};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown export format name.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty" | "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

fn to_json<T: Serialize>(value: &T, format: ExportFormat) -> Result<String, ExportError> {
    Ok(match format {
        ExportFormat::PrettyJson => serde_json::to_string_pretty(value)?,
        _ => serde_json::to_string(value)?,
    })
}

fn finish_csv(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes)
        .map_err(|e| ExportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// One named metric value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricRow {
    /// Metric name.
    pub metric: String,

    /// Value, empty when unavailable.
    pub value: Option<f64>,
}

/// Headline metrics for one company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsExport {
    /// Ticker symbol.
    pub ticker: String,

    /// Metric rows in display order.
    pub metrics: Vec<MetricRow>,
}

impl MetricsExport {
    /// Build from `(name, value)` pairs.
    pub fn from_entries<'a, I>(ticker: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<f64>)>,
    {
        Self {
            ticker: ticker.to_string(),
            metrics: entries
                .into_iter()
                .map(|(metric, value)| MetricRow {
                    metric: metric.to_string(),
                    value,
                })
                .collect(),
        }
    }
}

/// One fiscal year across all per-year series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeseriesRow {
    /// Fiscal year.
    pub fiscal_year: i32,

    /// Revenue.
    pub revenue: Option<f64>,

    /// Diluted EPS.
    pub eps: Option<f64>,

    /// Owner earnings.
    pub owner_earnings: Option<f64>,

    /// Owner earnings per share.
    pub owner_earnings_ps: Option<f64>,

    /// ROIC.
    pub roic: Option<f64>,

    /// Interest coverage.
    pub coverage: Option<f64>,
}

impl TimeseriesRow {
    const fn empty(fiscal_year: i32) -> Self {
        Self {
            fiscal_year,
            revenue: None,
            eps: None,
            owner_earnings: None,
            owner_earnings_ps: None,
            roic: None,
            coverage: None,
        }
    }
}

/// Per-year series for one company, one row per fiscal year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeseriesExport {
    /// Ticker symbol.
    pub ticker: String,

    /// Rows ascending by fiscal year.
    pub rows: Vec<TimeseriesRow>,
}

impl TimeseriesExport {
    /// Flatten a series bundle into rows keyed by fiscal year.
    pub fn new(ticker: &str, ts: &Timeseries) -> Self {
        let mut rows: BTreeMap<i32, TimeseriesRow> = ts
            .fiscal_years()
            .into_iter()
            .map(|fy| (fy, TimeseriesRow::empty(fy)))
            .collect();

        for y in &ts.income {
            if let Some(row) = rows.get_mut(&y.fiscal_year) {
                row.revenue = y.revenue;
                row.eps = y.eps;
            }
        }
        for y in &ts.owner_earnings {
            if let Some(row) = rows.get_mut(&y.fiscal_year) {
                row.owner_earnings = y.owner_earnings;
                row.owner_earnings_ps = y.owner_earnings_ps;
            }
        }
        for p in &ts.roic {
            if let Some(row) = rows.get_mut(&p.fiscal_year) {
                row.roic = p.value;
            }
        }
        for p in &ts.coverage {
            if let Some(row) = rows.get_mut(&p.fiscal_year) {
                row.coverage = p.value;
            }
        }

        Self {
            ticker: ticker.to_string(),
            rows: rows.into_values().collect(),
        }
    }
}

/// A valuation scenario for one company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValuationExport {
    /// Ticker symbol.
    pub ticker: String,

    /// Company CIK.
    pub cik: String,

    /// Scenario inputs and results.
    #[serde(flatten)]
    pub scenario: Scenario,
}

impl ValuationExport {
    /// Create a new valuation export.
    pub fn new(ticker: &str, cik: &str, scenario: Scenario) -> Self {
        Self {
            ticker: ticker.to_string(),
            cik: cik.to_string(),
            scenario,
        }
    }

    fn to_metric_rows(&self) -> Vec<MetricRow> {
        let i = &self.scenario.inputs;
        let r = &self.scenario.results;
        [
            ("eps0", Some(i.eps0)),
            ("g", Some(i.g)),
            ("pe_cap", Some(i.pe_cap)),
            ("discount", Some(i.discount)),
            ("mos_pct", Some(i.mos_pct)),
            ("future_eps", Some(r.future_eps)),
            ("terminal_pe", Some(r.terminal_pe)),
            ("future_price", Some(r.future_price)),
            ("sticker", Some(r.sticker)),
            ("mos_price", Some(r.mos_price)),
            ("ten_cap_price", r.ten_cap_price),
            ("payback_years", r.payback_years.map(f64::from)),
            ("owner_earnings_ps", Some(r.owner_earnings_ps)),
            ("current_price", r.current_price),
        ]
        .into_iter()
        .map(|(metric, value)| MetricRow {
            metric: metric.to_string(),
            value,
        })
        .collect()
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn metric_rows_csv(rows: &[MetricRow]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["metric", "value"])?;
    for row in rows {
        let value = row.value.map(|v| v.to_string()).unwrap_or_default();
        wtr.write_record([row.metric.as_str(), value.as_str()])?;
    }
    finish_csv(wtr)
}

impl Exporter for MetricsExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => metric_rows_csv(&self.metrics),
            _ => to_json(self, format),
        }
    }
}

impl Exporter for TimeseriesExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for row in &self.rows {
                    wtr.serialize(row)?;
                }
                finish_csv(wtr)
            }
            _ => to_json(self, format),
        }
    }
}

impl Exporter for ValuationExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => metric_rows_csv(&self.to_metric_rows()),
            _ => to_json(self, format),
        }
    }
}
