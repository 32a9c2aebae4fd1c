//! Valuation scenario orchestration

use super::ValuationError;
use super::sticker::{payback_time, sticker_price, ten_cap_price};
use crate::config::ValuationConfig;
use crate::growth::GrowthMetrics;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Where a scenario's growth assumption came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthSource {
    /// Supplied by the caller
    Override,
    /// 5y EPS CAGR
    EpsCagr5y,
    /// 5y revenue CAGR
    RevCagr5y,
    /// 10y EPS CAGR
    EpsCagr10y,
    /// 10y revenue CAGR
    RevCagr10y,
    /// Configured default
    Default,
}

impl fmt::Display for GrowthSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Override => "override",
            Self::EpsCagr5y => "eps_cagr_5y",
            Self::RevCagr5y => "rev_cagr_5y",
            Self::EpsCagr10y => "eps_cagr_10y",
            Self::RevCagr10y => "rev_cagr_10y",
            Self::Default => "default",
        };
        f.write_str(name)
    }
}

/// Pick the growth assumption.
///
/// Order: override, 5y EPS, 5y revenue, 10y EPS, 10y revenue, then the
/// configured default. A present zero is a valid choice.
pub fn resolve_growth(
    growth_override: Option<f64>,
    growth: &GrowthMetrics,
    default_growth: f64,
) -> (f64, GrowthSource) {
    [
        (growth_override, GrowthSource::Override),
        (growth.eps_cagr_5y, GrowthSource::EpsCagr5y),
        (growth.rev_cagr_5y, GrowthSource::RevCagr5y),
        (growth.eps_cagr_10y, GrowthSource::EpsCagr10y),
        (growth.rev_cagr_10y, GrowthSource::RevCagr10y),
    ]
    .into_iter()
    .find_map(|(g, source)| g.map(|g| (g, source)))
    .unwrap_or((default_growth, GrowthSource::Default))
}

/// Caller-chosen scenario parameters. `None` takes the configured default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    /// Growth override
    pub growth: Option<f64>,
    /// Terminal P/E cap
    pub pe_cap: Option<f64>,
    /// Discount rate
    pub discount: Option<f64>,
    /// Margin of safety fraction
    pub mos_pct: Option<f64>,
}

/// Company data a scenario is run against.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScenarioData {
    /// Most recent diluted EPS
    pub latest_eps: Option<f64>,
    /// Growth metrics for fallback selection
    pub growth: GrowthMetrics,
    /// Most recent owner earnings per share
    pub owner_earnings_ps: Option<f64>,
    /// Most recent stored price
    pub current_price: Option<f64>,
}

/// Resolved scenario inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInputs {
    /// Starting EPS
    pub eps0: f64,
    /// Growth assumption
    pub g: f64,
    /// Terminal P/E cap
    pub pe_cap: f64,
    /// Discount rate
    pub discount: f64,
    /// Margin of safety fraction
    pub mos_pct: f64,
}

/// Scenario outputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResults {
    /// EPS at the end of the horizon
    pub future_eps: f64,
    /// Terminal P/E
    pub terminal_pe: f64,
    /// Terminal price
    pub future_price: f64,
    /// Discounted sticker price
    pub sticker: f64,
    /// Sticker after the margin of safety
    pub mos_price: f64,
    /// Ten-cap price
    pub ten_cap_price: Option<f64>,
    /// Payback time in years
    pub payback_years: Option<u32>,
    /// Cash-flow basis used for ten-cap and payback
    pub owner_earnings_ps: f64,
    /// Latest stored price
    pub current_price: Option<f64>,
}

/// A complete valuation scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Resolved inputs
    pub inputs: ScenarioInputs,
    /// Where the growth assumption came from
    pub growth_source: GrowthSource,
    /// Results
    pub results: ScenarioResults,
}

/// Run a valuation scenario.
///
/// Owner earnings per share fall back to EPS as the cash-flow basis. Payback
/// is measured against the current price when one is known, otherwise the MOS
/// price.
pub fn run_scenario(
    data: &ScenarioData,
    params: &ScenarioParams,
    config: &ValuationConfig,
) -> Result<Scenario, ValuationError> {
    let eps0 = data.latest_eps.ok_or(ValuationError::MissingEps)?;
    let (g, growth_source) = resolve_growth(params.growth, &data.growth, config.default_growth);
    debug!(eps0, g, %growth_source, "Resolved scenario growth");

    let pe_cap = params.pe_cap.unwrap_or(config.pe_cap);
    let discount = params.discount.unwrap_or(config.discount);
    let mos_pct = params.mos_pct.unwrap_or(config.mos_pct);
    let sticker = sticker_price(eps0, g, pe_cap, discount, mos_pct, config);

    let basis = data.owner_earnings_ps.unwrap_or(eps0);
    let purchase_price = data
        .current_price
        .filter(|p| *p != 0.0)
        .unwrap_or(sticker.mos_price);

    Ok(Scenario {
        inputs: ScenarioInputs {
            eps0,
            g,
            pe_cap,
            discount,
            mos_pct,
        },
        growth_source,
        results: ScenarioResults {
            future_eps: sticker.future_eps,
            terminal_pe: sticker.terminal_pe,
            future_price: sticker.future_price,
            sticker: sticker.sticker,
            mos_price: sticker.mos_price,
            ten_cap_price: ten_cap_price(Some(basis), config),
            payback_years: payback_time(purchase_price, Some(basis), g, config.payback_max_years),
            owner_earnings_ps: basis,
            current_price: data.current_price,
        },
    })
}
