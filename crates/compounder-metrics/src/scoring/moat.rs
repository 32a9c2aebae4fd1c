//! Moat score and the pricing-power indicator feeding it

use super::normalize::{normalize, range_normalize, weighted_average};
use crate::config::{MoatConfig, ReturnsConfig};
use crate::returns::{
    gross_margin_series, gross_margin_stability, gross_margin_trend, margin_stability,
    recent_roic, roic_persistence_score, roic_series,
};
use crate::series::{CompanySeries, latest_value};
use crate::stats::{mean, pstdev};
use serde::{Deserialize, Serialize};

/// Pricing power in `[0, 1]` from gross-margin level, stability and trend.
///
/// Level and trend are mapped through their bands; stability passes through.
/// Missing components drop out and the weights renormalize.
pub fn pricing_power(
    latest_gross_margin: Option<f64>,
    gross_margin_stability: Option<f64>,
    gross_margin_trend: Option<f64>,
    config: &MoatConfig,
) -> Option<f64> {
    weighted_average(&[
        (
            latest_gross_margin.map(|gm| normalize(gm, config.gross_margin_level_band)),
            config.gross_margin_level_weight,
        ),
        (
            gross_margin_stability.map(|s| s.clamp(0.0, 1.0)),
            config.gross_margin_stability_weight,
        ),
        (
            gross_margin_trend.map(|t| normalize(t, config.gross_margin_trend_band)),
            config.gross_margin_trend_weight,
        ),
    ])
}

/// Moat components and the blended score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoatScore {
    /// Mean of recent ROIC
    pub roic_avg: Option<f64>,
    /// Standard deviation of recent ROIC
    pub roic_sd: Option<f64>,
    /// EBIT-margin stability
    pub margin_stability: Option<f64>,
    /// Most recent gross margin
    pub latest_gross_margin: Option<f64>,
    /// Gross-margin direction
    pub gross_margin_trend: Option<f64>,
    /// Pricing-power indicator
    pub pricing_power_score: Option<f64>,
    /// ROIC persistence on a 0-5 scale
    pub roic_persistence_score: Option<u8>,
    /// Final score in `[0, 1]`
    pub score: Option<f64>,
}

/// Blend the base moat score with the secondary indicators.
///
/// The base keeps the remaining weight only when at least one secondary
/// indicator is present.
pub fn blend_moat(
    base: f64,
    pricing_power: Option<f64>,
    persistence: Option<u8>,
    config: &MoatConfig,
) -> f64 {
    if pricing_power.is_none() && persistence.is_none() {
        return base;
    }
    let base_weight = 1.0 - config.pricing_power_weight - config.persistence_weight;
    let mut score = base * base_weight;
    if let Some(pp) = pricing_power {
        score += pp * config.pricing_power_weight;
    }
    if let Some(p) = persistence {
        score += f64::from(p) / 5.0 * config.persistence_weight;
    }
    score
}

/// Compute the moat score for a company.
pub fn compute_moat(
    series: &CompanySeries,
    returns: &ReturnsConfig,
    config: &MoatConfig,
) -> MoatScore {
    let roic = roic_series(&series.derived, returns);
    let recent = recent_roic(&roic, returns);
    let roic_avg = mean(&recent);
    let roic_sd = if recent.len() >= 2 { pstdev(&recent) } else { None };
    let ebit_stability = margin_stability(&series.facts);

    let base = range_normalize(&[
        (roic_avg, config.roic_average_band),
        (roic_sd.map(|sd| 1.0 / (1.0 + sd)), config.roic_consistency_band),
        (ebit_stability, config.margin_stability_band),
    ]);

    let gross_margins = gross_margin_series(&series.facts);
    let latest_gross_margin = latest_value(&gross_margins);
    let trend = gross_margin_trend(&gross_margins);
    let pricing_power_score = pricing_power(
        latest_gross_margin,
        gross_margin_stability(&gross_margins),
        trend,
        config,
    );
    let persistence = roic_persistence_score(&roic, returns);

    MoatScore {
        roic_avg,
        roic_sd,
        margin_stability: ebit_stability,
        latest_gross_margin,
        gross_margin_trend: trend,
        pricing_power_score,
        roic_persistence_score: persistence,
        score: base.map(|b| blend_moat(b, pricing_power_score, persistence, config)),
    }
}
