//! Recommended margin of safety

use crate::config::MarginOfSafetyConfig;
use crate::growth::GrowthMetrics;
use serde::{Deserialize, Serialize};

/// Inputs that moved the recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MosDrivers {
    /// Growth assumption used
    pub growth: f64,
    /// Moat score used (neutral when unavailable)
    pub moat_score: f64,
    /// Management score used (neutral when unavailable)
    pub mgmt_score: f64,
    /// Balance-sheet score, if available
    pub balance_sheet_score: Option<f64>,
}

/// A recommended margin of safety and its drivers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginOfSafety {
    /// Fraction in `[min, max]`
    pub recommended_mos: f64,
    /// Inputs used
    pub drivers: MosDrivers,
}

/// Recommend a margin of safety.
///
/// Low growth, a weak moat, weak management and a fragile balance sheet each
/// raise the margin. Growth prefers the 5y EPS CAGR, then the 5y revenue CAGR.
pub fn recommend_margin_of_safety(
    growth: &GrowthMetrics,
    moat_score: Option<f64>,
    mgmt_score: Option<f64>,
    balance_sheet_score: Option<f64>,
    config: &MarginOfSafetyConfig,
) -> MarginOfSafety {
    let g = growth
        .eps_cagr_5y
        .or(growth.rev_cagr_5y)
        .unwrap_or(config.default_growth);
    let moat = moat_score.unwrap_or(config.neutral_score);
    let mgmt = mgmt_score.unwrap_or(config.neutral_score);

    let mut mos = config.base;
    mos += config.growth_hurdle - g.min(config.growth_hurdle);
    mos += (config.neutral_score - moat.max(0.0)) * config.moat_sensitivity;
    mos += (config.neutral_score - mgmt.max(0.0)) * config.management_sensitivity;
    if let Some(bs) = balance_sheet_score {
        mos += (config.neutral_score - bs / 5.0) * config.balance_sheet_sensitivity;
    }

    MarginOfSafety {
        recommended_mos: mos.clamp(config.min, config.max),
        drivers: MosDrivers {
            growth: g,
            moat_score: moat,
            mgmt_score: mgmt,
            balance_sheet_score,
        },
    }
}
