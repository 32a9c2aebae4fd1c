//! Loading downloaded companyfacts documents into the store.

use crate::error::Result;
use crate::universe::Universe;
use compounder_data::edgar::{AnnualFactsExtractor, XbrlDocument};
use compounder_data::{AnnualFacts, Company, DataError, FactStore, SqliteStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of ingesting one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    /// Ticker, upper-case
    pub ticker: String,
    /// Zero-padded CIK
    pub cik: String,
    /// Fiscal years written
    pub years: Vec<i32>,
}

/// Store every annual fact in `doc` under `ticker`.
///
/// The company is registered with the document's CIK and entity name.
/// Fiscal years already stored are replaced.
pub fn ingest_document(
    store: &SqliteStore,
    ticker: &str,
    doc: &XbrlDocument,
) -> Result<IngestSummary> {
    let cik = doc.cik.as_deref().ok_or_else(|| DataError::MissingData {
        symbol: ticker.to_string(),
        reason: "companyfacts document has no CIK".to_string(),
    })?;
    let company = Company::new(cik, ticker, doc.entity_name.as_deref());
    store.upsert_company(&company)?;

    let rows = AnnualFactsExtractor::new().extract(doc);
    if rows.is_empty() {
        warn!(ticker = %company.ticker, "no annual revenue or EPS facts found");
    }
    store.put_annual_facts(&company.cik, &rows)?;

    let years: Vec<i32> = rows.iter().map(AnnualFacts::fiscal_year).collect();
    info!(
        ticker = %company.ticker,
        cik = %company.cik,
        years = years.len(),
        "ingested companyfacts"
    );
    Ok(IngestSummary {
        ticker: company.ticker,
        cik: company.cik,
        years,
    })
}

/// Read a companyfacts JSON file and ingest it.
pub fn ingest_file(store: &SqliteStore, ticker: &str, path: &Path) -> Result<IngestSummary> {
    let doc = XbrlDocument::from_file(path)?;
    ingest_document(store, ticker, &doc)
}

/// Location of a ticker's companyfacts file inside a seed directory.
pub fn seed_file(dir: &Path, ticker: &str) -> PathBuf {
    dir.join(format!("{}.json", ticker.trim().to_uppercase()))
}

/// Tickers from `universe` that have no company row in the store.
pub fn missing_tickers<S: FactStore, U: Universe>(store: &S, universe: &U) -> Result<Vec<String>> {
    let mut missing = Vec::new();
    for ticker in universe.symbols() {
        if store.company_by_ticker(&ticker)?.is_none() {
            missing.push(ticker);
        }
    }
    Ok(missing)
}

/// Outcome of seeding a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    /// Successfully ingested companies
    pub succeeded: Vec<IngestSummary>,
    /// Tickers that failed, with the error message
    pub failed: Vec<(String, String)>,
}

/// Ingest `<dir>/<TICKER>.json` for every ticker in `universe`.
///
/// A failing ticker is recorded and does not stop the run. `on_ticker` is
/// called after each ticker.
pub fn seed_directory<U, F>(
    store: &SqliteStore,
    dir: &Path,
    universe: &U,
    mut on_ticker: F,
) -> SeedReport
where
    U: Universe,
    F: FnMut(&str),
{
    let mut report = SeedReport::default();
    for ticker in universe.symbols() {
        match ingest_file(store, &ticker, &seed_file(dir, &ticker)) {
            Ok(summary) => report.succeeded.push(summary),
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "seed failed");
                report.failed.push((ticker.clone(), e.to_string()));
            }
        }
        on_ticker(&ticker);
    }
    info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "seeding complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_file_path() {
        let path = seed_file(Path::new("/data"), "brk-b");
        assert_eq!(path, PathBuf::from("/data/BRK-B.json"));
    }

    #[test]
    fn test_document_without_cik() {
        let store = SqliteStore::in_memory().unwrap();
        let err = ingest_document(&store, "MSFT", &XbrlDocument::new()).unwrap_err();
        assert!(err.to_string().contains("no CIK"));
    }

    #[test]
    fn test_summary_lists_ingested_years() {
        let json = r#"{"cik": 21344, "entityName": "COCA COLA CO", "facts": {"us-gaap": {
            "Revenues": {"label": null, "description": null, "units": {"USD": [
                {"start": "2022-01-01", "end": "2022-12-31", "val": 43004, "fy": 2022, "fp": "FY", "form": "10-K"},
                {"start": "2023-01-01", "end": "2023-12-31", "val": 45754, "fy": 2023, "fp": "FY", "form": "10-K"}
            ]}}}}}"#;
        let store = SqliteStore::in_memory().unwrap();
        let doc = XbrlDocument::parse_json(json).unwrap();
        let summary = ingest_document(&store, "ko", &doc).unwrap();
        assert_eq!(summary.ticker, "KO");
        assert_eq!(summary.cik, "0000021344");
        assert_eq!(summary.years, vec![2022, 2023]);
    }
}
