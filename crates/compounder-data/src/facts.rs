//! Per-company, per-fiscal-year financial facts.
//!
//! Every numeric field is optional: `None` means the filer did not report the
//! corresponding US-GAAP tag for that fiscal year. Sequences returned by the
//! store are ordered by fiscal year ascending and hold at most one row per
//! fiscal year.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A company known to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Central Index Key, zero-padded to 10 digits
    pub cik: String,
    /// Ticker symbol (stored upper-case)
    pub ticker: String,
    /// Entity name as reported to the SEC
    pub name: Option<String>,
}

impl Company {
    /// Create a company record, normalizing the ticker to upper-case and
    /// padding the CIK to 10 digits.
    pub fn new(cik: &str, ticker: &str, name: Option<&str>) -> Self {
        Self {
            cik: pad_cik(cik),
            ticker: ticker.trim().to_uppercase(),
            name: name.map(str::to_string),
        }
    }
}

/// Pad a CIK to the 10-digit form used by SEC EDGAR.
pub fn pad_cik(cik: &str) -> String {
    format!("{:0>10}", cik.trim())
}

/// Income-statement facts for one fiscal year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FiscalYearFact {
    /// Fiscal year
    pub fiscal_year: i32,
    /// Total revenue
    pub revenue: Option<f64>,
    /// Cost of goods sold / cost of revenue
    pub cogs: Option<f64>,
    /// Gross profit
    pub gross_profit: Option<f64>,
    /// Selling, general and administrative expense
    pub sga: Option<f64>,
    /// Research and development expense
    pub rnd: Option<f64>,
    /// Depreciation and amortization
    pub depreciation: Option<f64>,
    /// Operating income, used as EBIT
    pub ebit: Option<f64>,
    /// Interest expense
    pub interest_expense: Option<f64>,
    /// Income tax expense
    pub taxes: Option<f64>,
    /// Net income
    pub net_income: Option<f64>,
    /// Diluted earnings per share
    pub eps_diluted: Option<f64>,
    /// Weighted average diluted shares outstanding
    pub shares_diluted: Option<f64>,
}

impl FiscalYearFact {
    /// Create an empty row for a fiscal year.
    pub fn new(fiscal_year: i32) -> Self {
        Self {
            fiscal_year,
            ..Self::default()
        }
    }
}

/// Balance-sheet facts for one fiscal year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetFact {
    /// Fiscal year
    pub fiscal_year: i32,
    /// Cash and cash equivalents
    pub cash: Option<f64>,
    /// Receivables
    pub receivables: Option<f64>,
    /// Inventory
    pub inventory: Option<f64>,
    /// Total assets
    pub total_assets: Option<f64>,
    /// Total liabilities
    pub total_liabilities: Option<f64>,
    /// Total debt
    pub total_debt: Option<f64>,
    /// Shareholder equity
    pub shareholder_equity: Option<f64>,
}

impl BalanceSheetFact {
    /// Create an empty row for a fiscal year.
    pub fn new(fiscal_year: i32) -> Self {
        Self {
            fiscal_year,
            ..Self::default()
        }
    }
}

/// Cash-flow facts for one fiscal year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowFact {
    /// Fiscal year
    pub fiscal_year: i32,
    /// Cash flow from operations
    pub cfo: Option<f64>,
    /// Capital expenditures (reported as a positive outflow)
    pub capex: Option<f64>,
    /// Share repurchases
    pub buybacks: Option<f64>,
    /// Dividends paid
    pub dividends: Option<f64>,
    /// Acquisitions, net of cash acquired
    pub acquisitions: Option<f64>,
}

impl CashFlowFact {
    /// Create an empty row for a fiscal year.
    pub fn new(fiscal_year: i32) -> Self {
        Self {
            fiscal_year,
            ..Self::default()
        }
    }
}

/// All three statements for one fiscal year, as produced by ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnualFacts {
    /// Income statement
    pub income: FiscalYearFact,
    /// Balance sheet
    pub balance_sheet: BalanceSheetFact,
    /// Cash-flow statement
    pub cash_flow: CashFlowFact,
}

impl AnnualFacts {
    /// Create empty statements for a fiscal year.
    pub fn new(fiscal_year: i32) -> Self {
        Self {
            income: FiscalYearFact::new(fiscal_year),
            balance_sheet: BalanceSheetFact::new(fiscal_year),
            cash_flow: CashFlowFact::new(fiscal_year),
        }
    }

    /// Fiscal year these statements cover.
    pub const fn fiscal_year(&self) -> i32 {
        self.income.fiscal_year
    }
}

/// Joined view across the three statements used by the return engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedYearRecord {
    /// Fiscal year
    pub fiscal_year: i32,
    /// Cash flow from operations
    pub cfo: Option<f64>,
    /// Capital expenditures
    pub capex: Option<f64>,
    /// Diluted shares
    pub shares: Option<f64>,
    /// EBIT
    pub ebit: Option<f64>,
    /// Income tax expense
    pub taxes: Option<f64>,
    /// Total debt
    pub debt: Option<f64>,
    /// Shareholder equity
    pub equity: Option<f64>,
    /// Cash and equivalents
    pub cash: Option<f64>,
    /// Revenue
    pub revenue: Option<f64>,
}

/// A stored market price observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    /// Company CIK
    pub cik: String,
    /// Observation time
    pub ts: DateTime<Utc>,
    /// Price per share
    pub price: f64,
    /// Where the price came from
    pub source: Option<String>,
    /// Currency code
    pub currency: Option<String>,
}

/// A persisted valuation scenario, kept for audit and history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationSnapshot {
    /// Row id (None before insertion)
    pub id: Option<i64>,
    /// Company CIK
    pub cik: String,
    /// When the scenario was computed
    pub ts: DateTime<Utc>,
    /// Starting EPS
    pub eps0: f64,
    /// Growth assumption
    pub growth: f64,
    /// Terminal P/E cap
    pub pe_cap: f64,
    /// Discount rate
    pub discount: f64,
    /// Sticker price
    pub sticker: f64,
    /// Margin of safety fraction
    pub mos_pct: f64,
    /// Margin-of-safety price
    pub mos_price: f64,
    /// Owner earnings per share basis
    pub owner_earnings_ps: Option<f64>,
    /// Payback time in years
    pub payback_years: Option<u32>,
    /// Ten-cap price
    pub ten_cap_price: Option<f64>,
    /// Free-form label for the scenario
    pub strategy: Option<String>,
}

/// Price alert rule kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Trigger when the latest price is below a fixed threshold
    PriceBelowThreshold,
    /// Trigger when the latest price is below the default scenario's MOS price
    PriceBelowMos,
}

impl AlertKind {
    /// Convert to database string representation.
    pub const fn to_db_str(&self) -> &'static str {
        match self {
            Self::PriceBelowThreshold => "price_below_threshold",
            Self::PriceBelowMos => "price_below_mos",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> crate::Result<Self> {
        match s {
            "price_below_threshold" => Ok(Self::PriceBelowThreshold),
            "price_below_mos" => Ok(Self::PriceBelowMos),
            _ => Err(crate::DataError::Parse(format!("Invalid alert kind: {}", s))),
        }
    }
}

/// A stored price alert rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    /// Row id
    pub id: i64,
    /// Company CIK
    pub cik: String,
    /// Rule kind
    pub kind: AlertKind,
    /// Price threshold (required for [`AlertKind::PriceBelowThreshold`])
    pub threshold: Option<f64>,
    /// Whether the rule is evaluated
    pub enabled: bool,
}
