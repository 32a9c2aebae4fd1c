//! Return & coverage engine
//!
//! Per-year owner earnings, ROIC, coverage, margins, net debt and share
//! count, plus the single-number summaries derived from them. Every function
//! returns `None` for a metric whose inputs are missing rather than failing.

pub mod leverage;
pub mod margins;
pub mod owner_earnings;
pub mod quality;
pub mod roic;
pub mod shares;

pub use leverage::{coverage_series, debt_to_equity, net_debt_series};
pub use margins::{
    ebit_margins, gross_margin, gross_margin_series, gross_margin_stability, gross_margin_trend,
    margin_stability, revenue_volatility,
};
pub use owner_earnings::{
    OwnerEarningsYear, latest_owner_earnings_ps, owner_earnings_growth, owner_earnings_series,
};
pub use quality::{QualityScores, quality_scores};
pub use roic::{
    effective_tax_rate, recent_roic, roic, roic_average, roic_persistence_score, roic_series,
};
pub use shares::{ShareCountYear, average_share_dilution, share_count_trend};

use compounder_data::FiscalYearFact;

/// Most recent reported diluted EPS.
pub fn latest_eps(facts: &[FiscalYearFact]) -> Option<f64> {
    crate::stats::latest_some(facts.iter().map(|f| f.eps_diluted))
}
