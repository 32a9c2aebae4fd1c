//! Balance-sheet resilience on a 0-5 scale

use super::normalize::weighted_average;
use crate::config::BalanceSheetConfig;
use crate::returns::{coverage_series, debt_to_equity, net_debt_series};
use crate::series::{CompanySeries, latest_value, present_values};
use serde::{Deserialize, Serialize};

/// Score interest coverage.
pub fn coverage_score(coverage: f64) -> f64 {
    if coverage >= 10.0 {
        5.0
    } else if coverage >= 5.0 {
        3.0 + (coverage - 5.0) / 5.0 * 2.0
    } else if coverage >= 2.0 {
        1.0 + (coverage - 2.0) / 3.0 * 2.0
    } else {
        (coverage / 2.0).max(0.0)
    }
}

/// Score debt-to-equity.
pub fn debt_equity_score(de: f64) -> f64 {
    if de <= 0.3 {
        5.0
    } else if de <= 0.7 {
        3.0 + (0.7 - de) / 0.4 * 2.0
    } else if de <= 1.5 {
        1.0 + (1.5 - de) / 0.8 * 2.0
    } else {
        (1.0 - (de - 1.5) / 1.5).max(0.0)
    }
}

/// Score the relative change in net debt. Shrinking debt scores high.
pub fn net_debt_trend_score(trend: f64) -> f64 {
    if trend <= -0.10 {
        5.0
    } else if trend <= 0.0 {
        3.0 + (-trend) / 0.10 * 2.0
    } else if trend <= 0.10 {
        1.0 + (0.10 - trend) / 0.10 * 2.0
    } else {
        (1.0 - (trend - 0.10) / 0.20).max(0.0)
    }
}

/// Relative change between the two most recent and the two earliest net-debt
/// values. Needs at least three values.
pub fn net_debt_trend(net_debt: &[f64]) -> Option<f64> {
    if net_debt.len() < 3 {
        return None;
    }
    let older = (net_debt[0] + net_debt[1]) / 2.0;
    let n = net_debt.len();
    let recent = (net_debt[n - 2] + net_debt[n - 1]) / 2.0;
    if older == 0.0 {
        return Some(if recent == 0.0 { 0.0 } else { recent.signum() });
    }
    Some((recent - older) / older.abs())
}

/// Balance-sheet resilience components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetScore {
    /// Most recent interest coverage
    pub latest_coverage: Option<f64>,
    /// Latest debt-to-equity
    pub debt_to_equity: Option<f64>,
    /// Most recent net debt
    pub latest_net_debt: Option<f64>,
    /// Coverage component, 0-5
    pub coverage_score: Option<f64>,
    /// Debt-to-equity component, 0-5
    pub debt_equity_score: Option<f64>,
    /// Net-debt trend component, 0-5
    pub net_debt_trend_score: Option<f64>,
    /// Weighted score, 0-5
    pub score: Option<f64>,
}

/// Weighted balance-sheet score from raw inputs.
pub fn score_balance_sheet(
    latest_coverage: Option<f64>,
    debt_to_equity: Option<f64>,
    net_debt: &[f64],
    config: &BalanceSheetConfig,
) -> BalanceSheetScore {
    let cov = latest_coverage.map(coverage_score);
    let de = debt_to_equity.map(debt_equity_score);
    let trend = net_debt_trend(net_debt).map(net_debt_trend_score);

    BalanceSheetScore {
        latest_coverage,
        debt_to_equity,
        latest_net_debt: net_debt.last().copied(),
        coverage_score: cov,
        debt_equity_score: de,
        net_debt_trend_score: trend,
        score: weighted_average(&[
            (cov, config.coverage_weight),
            (de, config.debt_equity_weight),
            (trend, config.net_debt_trend_weight),
        ]),
    }
}

/// Compute balance-sheet resilience for a company.
pub fn compute_balance_sheet(series: &CompanySeries, config: &BalanceSheetConfig) -> BalanceSheetScore {
    let coverage = coverage_series(&series.facts);
    let net_debt = present_values(&net_debt_series(&series.balance_sheets));
    score_balance_sheet(
        latest_value(&coverage),
        debt_to_equity(series.latest_balance_sheet()),
        &net_debt,
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[rstest]
    #[case(15.0, 5.0)]
    #[case(10.0, 5.0)]
    #[case(7.5, 4.0)]
    #[case(3.5, 2.0)]
    #[case(1.0, 0.5)]
    #[case(-3.0, 0.0)]
    fn test_coverage_score(#[case] coverage: f64, #[case] expected: f64) {
        assert_abs_diff_eq!(coverage_score(coverage), expected, epsilon = 1e-12);
    }

    #[rstest]
    #[case(0.2, 5.0)]
    #[case(0.5, 4.0)]
    #[case(1.1, 2.0)]
    #[case(2.25, 0.5)]
    #[case(4.0, 0.0)]
    fn test_debt_equity_score(#[case] de: f64, #[case] expected: f64) {
        assert_abs_diff_eq!(debt_equity_score(de), expected, epsilon = 1e-12);
    }

    #[rstest]
    #[case(-0.2, 5.0)]
    #[case(-0.05, 4.0)]
    #[case(0.0, 3.0)]
    #[case(0.05, 2.0)]
    #[case(0.2, 0.5)]
    #[case(0.5, 0.0)]
    fn test_net_debt_trend_score(#[case] trend: f64, #[case] expected: f64) {
        assert_abs_diff_eq!(net_debt_trend_score(trend), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_net_debt_trend() {
        assert_abs_diff_eq!(
            net_debt_trend(&[10.0, 10.0, 8.0, 8.0]).unwrap(),
            -0.2,
            epsilon = 1e-12
        );
        // Net cash growing more negative reads as shrinking debt
        assert_abs_diff_eq!(
            net_debt_trend(&[-10.0, -10.0, -12.0]).unwrap(),
            -0.1,
            epsilon = 1e-12
        );
        assert_eq!(net_debt_trend(&[0.0, 0.0, 5.0]), Some(1.0));
        assert_eq!(net_debt_trend(&[0.0, 0.0, 0.0]), Some(0.0));
        assert_eq!(net_debt_trend(&[1.0, 2.0]), None);
    }

    #[test]
    fn test_excellent_balance_sheet() {
        let score = score_balance_sheet(
            Some(15.0),
            Some(0.2),
            &[10e9, 9e9, 7e9, 6e9],
            &BalanceSheetConfig::default(),
        );
        assert_abs_diff_eq!(score.score.unwrap(), 5.0, epsilon = 1e-12);
        assert_eq!(score.latest_net_debt, Some(6e9));
    }

    #[test]
    fn test_poor_balance_sheet() {
        // coverage 0.5, d/e 2/3, trend 0
        let score = score_balance_sheet(
            Some(1.0),
            Some(2.0),
            &[10e9, 10e9, 13e9, 13e9],
            &BalanceSheetConfig::default(),
        );
        assert_abs_diff_eq!(score.score.unwrap(), 0.4, epsilon = 1e-9);
    }

    #[test]
    fn test_partial_components_renormalize() {
        let score = score_balance_sheet(Some(7.5), None, &[], &BalanceSheetConfig::default());
        assert_abs_diff_eq!(score.score.unwrap(), 4.0, epsilon = 1e-12);
        assert!(score.net_debt_trend_score.is_none());

        let empty = score_balance_sheet(None, None, &[], &BalanceSheetConfig::default());
        assert!(empty.score.is_none());
    }
}
