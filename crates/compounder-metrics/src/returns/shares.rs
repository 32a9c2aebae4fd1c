//! Diluted share count trend

use crate::stats::{mean, recent_present};
use compounder_data::FiscalYearFact;
use serde::{Deserialize, Serialize};

/// Diluted shares and year-over-year change for one fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShareCountYear {
    /// Fiscal year
    pub fiscal_year: i32,
    /// Weighted average diluted shares
    pub shares: Option<f64>,
    /// Fractional change from the prior year
    pub yoy_change: Option<f64>,
}

/// Share count per fiscal year with year-over-year change.
///
/// The first year, and any year whose prior count is zero or missing, has no
/// change.
pub fn share_count_trend(facts: &[FiscalYearFact]) -> Vec<ShareCountYear> {
    let mut prev: Option<f64> = None;
    facts
        .iter()
        .map(|f| {
            let yoy_change = match (prev, f.shares_diluted) {
                (Some(p), Some(cur)) if p != 0.0 => Some((cur - p) / p),
                _ => None,
            };
            prev = f.shares_diluted;
            ShareCountYear {
                fiscal_year: f.fiscal_year,
                shares: f.shares_diluted,
                yoy_change,
            }
        })
        .collect()
}

/// Mean of the last three year-over-year changes. Negative means buybacks.
pub fn average_share_dilution(trend: &[ShareCountYear]) -> Option<f64> {
    mean(&recent_present(trend.iter().map(|y| y.yoy_change), 3))
}
