//! Valuation engine
//!
//! Discounted sticker price, margin-of-safety price, ten-cap price and payback
//! time, plus the scenario runner that resolves a growth assumption and
//! computes them together.

pub mod scenario;
pub mod sticker;

pub use scenario::{
    GrowthSource, Scenario, ScenarioData, ScenarioInputs, ScenarioParams, ScenarioResults,
    resolve_growth, run_scenario,
};
pub use sticker::{StickerPrice, payback_time, sticker_price, ten_cap_price};

use thiserror::Error;

/// Errors from scenario orchestration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuationError {
    /// No diluted EPS has been reported for the company
    #[error("No EPS available for valuation")]
    MissingEps,
}
