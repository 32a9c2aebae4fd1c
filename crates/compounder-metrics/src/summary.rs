//! Headline metrics for one company

use crate::config::ReturnsConfig;
use crate::growth::{GrowthMetrics, growth_metrics};
use crate::returns::{
    coverage_series, debt_to_equity, latest_eps, latest_owner_earnings_ps, margin_stability,
    owner_earnings_growth, owner_earnings_series, roic_average, roic_series,
};
use crate::series::{CompanySeries, latest_value};
use serde::{Deserialize, Serialize};

/// Growth, return and leverage headline numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    /// 5y / 10y growth
    #[serde(flatten)]
    pub growth: GrowthMetrics,
    /// Most recent diluted EPS
    pub latest_eps: Option<f64>,
    /// Most recent owner earnings per share
    pub latest_owner_earnings_ps: Option<f64>,
    /// Owner-earnings CAGR over the configured window
    pub owner_earnings_growth: Option<f64>,
    /// Mean of recent ROIC
    pub roic_avg: Option<f64>,
    /// Most recent interest coverage
    pub latest_coverage: Option<f64>,
    /// EBIT-margin stability
    pub margin_stability: Option<f64>,
    /// Latest debt-to-equity
    pub debt_to_equity: Option<f64>,
}

impl MetricSummary {
    /// Named values in display order.
    pub fn entries(&self) -> Vec<(&'static str, Option<f64>)> {
        let mut entries = self.growth.entries();
        entries.extend([
            ("latest_eps", self.latest_eps),
            ("latest_owner_earnings_ps", self.latest_owner_earnings_ps),
            ("owner_earnings_growth", self.owner_earnings_growth),
            ("roic_avg", self.roic_avg),
            ("latest_coverage", self.latest_coverage),
            ("margin_stability", self.margin_stability),
            ("debt_to_equity", self.debt_to_equity),
        ]);
        entries
    }
}

/// Compute the headline metrics.
pub fn metric_summary(series: &CompanySeries, config: &ReturnsConfig) -> MetricSummary {
    let owner_earnings = owner_earnings_series(&series.derived);
    MetricSummary {
        growth: growth_metrics(&series.facts),
        latest_eps: latest_eps(&series.facts),
        latest_owner_earnings_ps: latest_owner_earnings_ps(&owner_earnings),
        owner_earnings_growth: owner_earnings_growth(
            &owner_earnings,
            config.owner_earnings_growth_window,
        ),
        roic_avg: roic_average(&roic_series(&series.derived, config), config),
        latest_coverage: latest_value(&coverage_series(&series.facts)),
        margin_stability: margin_stability(&series.facts),
        debt_to_equity: debt_to_equity(series.latest_balance_sheet()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_cover_every_field() {
        let summary = MetricSummary::default();
        let names: Vec<&str> = summary.entries().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names.len(), 11);
        assert_eq!(names[0], "rev_cagr_5y");
        assert!(names.contains(&"debt_to_equity"));
        assert!(summary.entries().iter().all(|(_, v)| v.is_none()));
    }

    #[test]
    fn test_entries_are_registered() {
        for (name, _) in MetricSummary::default().entries() {
            assert!(crate::registry::get_metric_info(name).is_some(), "{name} not registered");
        }
    }
}
