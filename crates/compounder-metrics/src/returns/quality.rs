//! Quality aggregate

use super::leverage::net_debt_series;
use super::margins::{gross_margin_series, gross_margin_trend, revenue_volatility};
use super::roic::{roic_persistence_score, roic_series};
use super::shares::{ShareCountYear, average_share_dilution, share_count_trend};
use crate::config::ReturnsConfig;
use crate::growth::{ExtendedGrowthMetrics, growth_metrics_extended};
use crate::series::{CompanySeries, YearValue, latest_value};
use serde::{Deserialize, Serialize};

/// Margin, leverage, dilution and persistence indicators for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScores {
    /// Gross margin per fiscal year
    pub gross_margin_series: Vec<YearValue>,
    /// Most recent gross margin
    pub latest_gross_margin: Option<f64>,
    /// Gross-margin direction
    pub gross_margin_trend: Option<f64>,
    /// Standard deviation of YoY revenue growth
    pub revenue_volatility: Option<f64>,
    /// 1y / 3y / 5y / 10y growth
    pub growth_metrics: ExtendedGrowthMetrics,
    /// Net debt per fiscal year
    pub net_debt_series: Vec<YearValue>,
    /// Most recent net debt
    pub latest_net_debt: Option<f64>,
    /// Diluted share count per fiscal year
    pub share_count_trend: Vec<ShareCountYear>,
    /// Mean of the last three YoY share-count changes
    pub avg_share_dilution_3y: Option<f64>,
    /// ROIC persistence on a 0-5 scale
    pub roic_persistence_score: Option<u8>,
}

/// Compute the quality aggregate.
pub fn quality_scores(series: &CompanySeries, config: &ReturnsConfig) -> QualityScores {
    let gross_margins = gross_margin_series(&series.facts);
    let net_debt = net_debt_series(&series.balance_sheets);
    let shares = share_count_trend(&series.facts);
    let roic = roic_series(&series.derived, config);

    QualityScores {
        latest_gross_margin: latest_value(&gross_margins),
        gross_margin_trend: gross_margin_trend(&gross_margins),
        revenue_volatility: revenue_volatility(&series.facts),
        growth_metrics: growth_metrics_extended(&series.facts),
        latest_net_debt: latest_value(&net_debt),
        avg_share_dilution_3y: average_share_dilution(&shares),
        roic_persistence_score: roic_persistence_score(&roic, config),
        gross_margin_series: gross_margins,
        net_debt_series: net_debt,
        share_count_trend: shares,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compounder_data::{BalanceSheetFact, FiscalYearFact};

    #[test]
    fn test_empty_company() {
        let scores = quality_scores(&CompanySeries::default(), &ReturnsConfig::default());
        assert!(scores.gross_margin_series.is_empty());
        assert!(scores.latest_gross_margin.is_none());
        assert!(scores.roic_persistence_score.is_none());
        assert_eq!(scores.growth_metrics, ExtendedGrowthMetrics::default());
    }

    #[test]
    fn test_latest_values() {
        let facts = vec![
            FiscalYearFact {
                revenue: Some(100.0),
                gross_profit: Some(40.0),
                ..FiscalYearFact::new(2022)
            },
            FiscalYearFact {
                revenue: Some(120.0),
                gross_profit: Some(54.0),
                ..FiscalYearFact::new(2023)
            },
        ];
        let balance = vec![
            BalanceSheetFact {
                total_debt: Some(10e9),
                cash: Some(5e9),
                ..BalanceSheetFact::new(2022)
            },
            BalanceSheetFact::new(2023),
        ];
        let series = CompanySeries::from_statements(facts, balance, vec![]);
        let scores = quality_scores(&series, &ReturnsConfig::default());
        assert_eq!(scores.latest_gross_margin, Some(0.45));
        assert_eq!(scores.latest_net_debt, Some(5e9));
        assert!(scores.revenue_volatility.is_none());
    }
}
