//! Storage layer for company facts.
//!
//! [`FactStore`] is the read surface the metric engines consume. Rows come
//! back ordered by fiscal year ascending, one row per fiscal year.

pub mod sqlite;

pub use sqlite::{SqliteStore, StoreStats};

use crate::error::Result;
use crate::facts::{BalanceSheetFact, CashFlowFact, Company, FiscalYearFact};

/// Read access to stored per-fiscal-year facts.
pub trait FactStore {
    /// Look up a company by ticker (case-insensitive).
    fn company_by_ticker(&self, ticker: &str) -> Result<Option<Company>>;

    /// Look up a company by CIK.
    fn company(&self, cik: &str) -> Result<Option<Company>>;

    /// Income-statement facts, ascending by fiscal year.
    fn fiscal_year_facts(&self, cik: &str) -> Result<Vec<FiscalYearFact>>;

    /// Balance-sheet facts, ascending by fiscal year.
    fn balance_sheet_facts(&self, cik: &str) -> Result<Vec<BalanceSheetFact>>;

    /// Cash-flow facts, ascending by fiscal year.
    fn cash_flow_facts(&self, cik: &str) -> Result<Vec<CashFlowFact>>;

    /// Most recent balance sheet, if any.
    fn latest_balance_sheet(&self, cik: &str) -> Result<Option<BalanceSheetFact>> {
        Ok(self.balance_sheet_facts(cik)?.pop())
    }

    /// Most recent recorded price, if any.
    fn latest_price(&self, cik: &str) -> Result<Option<f64>>;

    /// Resolve a ticker to its CIK.
    fn resolve_cik(&self, ticker: &str) -> Result<Option<String>> {
        Ok(self.company_by_ticker(ticker)?.map(|c| c.cik))
    }
}
