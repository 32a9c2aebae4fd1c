//! Fiscal series extraction
//!
//! Turns stored per-fiscal-year facts into the ordered sequences every engine
//! consumes. All sequences are ascending by fiscal year; windowing and trend
//! computations depend on that order.

use compounder_data::{
    BalanceSheetFact, CashFlowFact, DerivedYearRecord, FactStore, FiscalYearFact,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// A single optional value for one fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    /// Fiscal year
    pub fiscal_year: i32,
    /// Value, `None` when it could not be computed
    pub value: Option<f64>,
}

impl YearValue {
    /// Create a year/value pair.
    pub const fn new(fiscal_year: i32, value: Option<f64>) -> Self {
        Self { fiscal_year, value }
    }
}

/// Latest present value in a year/value series.
pub fn latest_value(series: &[YearValue]) -> Option<f64> {
    crate::stats::latest_some(series.iter().map(|p| p.value))
}

/// Present values of a series, oldest first.
pub fn present_values(series: &[YearValue]) -> Vec<f64> {
    series.iter().filter_map(|p| p.value).collect()
}

/// Everything the engines need for one company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanySeries {
    /// Income-statement rows
    pub facts: Vec<FiscalYearFact>,
    /// Balance-sheet rows
    pub balance_sheets: Vec<BalanceSheetFact>,
    /// Cash-flow rows
    pub cash_flows: Vec<CashFlowFact>,
    /// Joined rows
    pub derived: Vec<DerivedYearRecord>,
}

impl CompanySeries {
    /// Build a series bundle from the three statements, deriving the joined view.
    pub fn from_statements(
        facts: Vec<FiscalYearFact>,
        balance_sheets: Vec<BalanceSheetFact>,
        cash_flows: Vec<CashFlowFact>,
    ) -> Self {
        let facts = ordered(facts, |f| f.fiscal_year);
        let balance_sheets = ordered(balance_sheets, |b| b.fiscal_year);
        let cash_flows = ordered(cash_flows, |c| c.fiscal_year);
        let derived = join_derived_records(&facts, &balance_sheets, &cash_flows);
        Self {
            facts,
            balance_sheets,
            cash_flows,
            derived,
        }
    }

    /// True when no statement holds any row.
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty() && self.balance_sheets.is_empty() && self.cash_flows.is_empty()
    }

    /// Most recent balance sheet.
    pub fn latest_balance_sheet(&self) -> Option<&BalanceSheetFact> {
        self.balance_sheets.last()
    }

    /// Most recent income-statement row.
    pub fn latest_facts(&self) -> Option<&FiscalYearFact> {
        self.facts.last()
    }
}

/// Sort by fiscal year and keep the last row for any repeated year.
fn ordered<T>(rows: Vec<T>, year: impl Fn(&T) -> i32) -> Vec<T> {
    let total = rows.len();
    let mut by_year = BTreeMap::new();
    for row in rows {
        by_year.insert(year(&row), row);
    }
    if by_year.len() < total {
        warn!(
            dropped = total - by_year.len(),
            "Duplicate fiscal years in statement rows"
        );
    }
    by_year.into_values().collect()
}

/// Join the three statements on fiscal year.
///
/// The key set is the union of years present in any statement; a statement
/// missing for a year contributes `None` fields. Inputs need not be sorted.
pub fn join_derived_records(
    facts: &[FiscalYearFact],
    balance_sheets: &[BalanceSheetFact],
    cash_flows: &[CashFlowFact],
) -> Vec<DerivedYearRecord> {
    let income: BTreeMap<i32, &FiscalYearFact> =
        facts.iter().map(|f| (f.fiscal_year, f)).collect();
    let balance: BTreeMap<i32, &BalanceSheetFact> =
        balance_sheets.iter().map(|b| (b.fiscal_year, b)).collect();
    let cash: BTreeMap<i32, &CashFlowFact> =
        cash_flows.iter().map(|c| (c.fiscal_year, c)).collect();

    let years: BTreeSet<i32> = income
        .keys()
        .chain(balance.keys())
        .chain(cash.keys())
        .copied()
        .collect();

    years
        .into_iter()
        .map(|fy| {
            let i = income.get(&fy);
            let b = balance.get(&fy);
            let c = cash.get(&fy);
            DerivedYearRecord {
                fiscal_year: fy,
                cfo: c.and_then(|c| c.cfo),
                capex: c.and_then(|c| c.capex),
                shares: i.and_then(|i| i.shares_diluted),
                ebit: i.and_then(|i| i.ebit),
                taxes: i.and_then(|i| i.taxes),
                debt: b.and_then(|b| b.total_debt),
                equity: b.and_then(|b| b.shareholder_equity),
                cash: b.and_then(|b| b.cash),
                revenue: i.and_then(|i| i.revenue),
            }
        })
        .collect()
}

/// Reads a company's statements through a [`FactStore`].
#[derive(Debug)]
pub struct FiscalSeriesExtractor<'a, S: FactStore> {
    store: &'a S,
}

impl<'a, S: FactStore> FiscalSeriesExtractor<'a, S> {
    /// Create an extractor over a store.
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Income-statement facts, ascending. Empty when the company has none.
    pub fn fiscal_year_facts(&self, cik: &str) -> compounder_data::Result<Vec<FiscalYearFact>> {
        self.store.fiscal_year_facts(cik)
    }

    /// Joined records across the three statements, ascending.
    pub fn derived_year_records(
        &self,
        cik: &str,
    ) -> compounder_data::Result<Vec<DerivedYearRecord>> {
        Ok(self.load(cik)?.derived)
    }

    /// Load all statements for a company.
    pub fn load(&self, cik: &str) -> compounder_data::Result<CompanySeries> {
        let series = CompanySeries::from_statements(
            self.store.fiscal_year_facts(cik)?,
            self.store.balance_sheet_facts(cik)?,
            self.store.cash_flow_facts(cik)?,
        );
        debug!(
            cik,
            income_rows = series.facts.len(),
            derived_rows = series.derived.len(),
            "Loaded fiscal series"
        );
        Ok(series)
    }
}
