//! Composite scoring engine ("Four Ms")
//!
//! Moat, management and balance-sheet scores built on the return engine,
//! and the margin of safety they recommend. Moat and management scores lie in
//! `[0, 1]`; balance-sheet resilience uses a 0-5 scale.

pub mod balance_sheet;
pub mod management;
pub mod margin_of_safety;
pub mod moat;
pub mod normalize;

pub use balance_sheet::{
    BalanceSheetScore, compute_balance_sheet, coverage_score, debt_equity_score, net_debt_trend,
    net_debt_trend_score, score_balance_sheet,
};
pub use management::{
    CapitalAllocationYear, ManagementScore, capital_allocation_series, compute_management,
};
pub use margin_of_safety::{MarginOfSafety, MosDrivers, recommend_margin_of_safety};
pub use moat::{MoatScore, blend_moat, compute_moat, pricing_power};
pub use normalize::{band_score, normalize, range_normalize, weighted_average};

use crate::config::MetricsConfig;
use crate::growth::growth_metrics;
use crate::series::CompanySeries;
use serde::{Deserialize, Serialize};

/// All Four Ms scores for one company.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FourMs {
    /// Moat
    pub moat: MoatScore,
    /// Management
    pub management: ManagementScore,
    /// Balance-sheet resilience
    pub balance_sheet: BalanceSheetScore,
    /// Recommended margin of safety
    pub margin_of_safety: MarginOfSafety,
}

/// Compute every composite score.
pub fn four_ms(series: &CompanySeries, config: &MetricsConfig) -> FourMs {
    let moat = compute_moat(series, &config.returns, &config.moat);
    let management = compute_management(&series.cash_flows, &config.management);
    let balance_sheet = compute_balance_sheet(series, &config.balance_sheet);
    let margin_of_safety = recommend_margin_of_safety(
        &growth_metrics(&series.facts),
        moat.score,
        management.score,
        balance_sheet.score,
        &config.margin_of_safety,
    );
    FourMs {
        moat,
        management,
        balance_sheet,
        margin_of_safety,
    }
}
