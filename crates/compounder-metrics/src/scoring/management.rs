//! Management capital-allocation score

use super::normalize::band_score;
use crate::config::ManagementConfig;
use crate::stats::mean;
use compounder_data::CashFlowFact;
use serde::{Deserialize, Serialize};

/// Reinvestment and payout ratios for one fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapitalAllocationYear {
    /// Fiscal year
    pub fiscal_year: i32,
    /// `capex / cfo`
    pub reinvest_ratio: Option<f64>,
    /// `(buybacks + dividends) / cfo`
    pub payout_ratio: Option<f64>,
}

/// Capital-allocation ratios per fiscal year.
///
/// Both ratios need non-zero operating cash flow. Unreported buybacks and
/// dividends count as zero.
pub fn capital_allocation_series(cash_flows: &[CashFlowFact]) -> Vec<CapitalAllocationYear> {
    cash_flows
        .iter()
        .map(|cf| {
            let cfo = cf.cfo.filter(|c| *c != 0.0);
            CapitalAllocationYear {
                fiscal_year: cf.fiscal_year,
                reinvest_ratio: cfo.and_then(|cfo| cf.capex.map(|capex| capex / cfo)),
                payout_ratio: cfo.map(|cfo| {
                    (cf.buybacks.unwrap_or(0.0) + cf.dividends.unwrap_or(0.0)) / cfo
                }),
            }
        })
        .collect()
}

/// Management score components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagementScore {
    /// Mean reinvestment ratio
    pub reinvest_ratio_avg: Option<f64>,
    /// Mean payout ratio
    pub payout_ratio_avg: Option<f64>,
    /// Score in `[0, 1]`
    pub score: Option<f64>,
}

/// Score capital allocation.
///
/// Each year's ratio is band-scored; the score is the mean of the averaged
/// reinvestment and payout band scores that are available.
pub fn compute_management(cash_flows: &[CashFlowFact], config: &ManagementConfig) -> ManagementScore {
    let years = capital_allocation_series(cash_flows);
    let reinvest: Vec<f64> = years.iter().filter_map(|y| y.reinvest_ratio).collect();
    let payout: Vec<f64> = years.iter().filter_map(|y| y.payout_ratio).collect();

    let banded = |ratios: &[f64], band| {
        let scores: Vec<f64> = ratios
            .iter()
            .map(|&r| band_score(r, band, config.below_band_ceiling))
            .collect();
        mean(&scores)
    };
    let components: Vec<f64> = [
        banded(&reinvest, config.reinvestment_band),
        banded(&payout, config.payout_band),
    ]
    .into_iter()
    .flatten()
    .collect();

    ManagementScore {
        reinvest_ratio_avg: mean(&reinvest),
        payout_ratio_avg: mean(&payout),
        score: mean(&components),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn cash_flow(fy: i32, cfo: Option<f64>, capex: Option<f64>, bb: Option<f64>, div: Option<f64>) -> CashFlowFact {
        CashFlowFact {
            cfo,
            capex,
            buybacks: bb,
            dividends: div,
            ..CashFlowFact::new(fy)
        }
    }

    #[test]
    fn test_ratios_default_missing_returns_to_zero() {
        let years = capital_allocation_series(&[
            cash_flow(2022, Some(100.0), Some(40.0), None, Some(20.0)),
            cash_flow(2023, Some(0.0), Some(40.0), Some(10.0), None),
            cash_flow(2024, Some(100.0), None, None, None),
        ]);
        assert_eq!(years[0].reinvest_ratio, Some(0.4));
        assert_eq!(years[0].payout_ratio, Some(0.2));
        assert_eq!(years[1].reinvest_ratio, None);
        assert_eq!(years[1].payout_ratio, None);
        assert_eq!(years[2].reinvest_ratio, None);
        assert_eq!(years[2].payout_ratio, Some(0.0));
    }

    #[test]
    fn test_disciplined_allocator_scores_one() {
        let score = compute_management(
            &[
                cash_flow(2022, Some(100.0), Some(40.0), Some(10.0), Some(20.0)),
                cash_flow(2023, Some(100.0), Some(50.0), Some(10.0), Some(20.0)),
            ],
            &ManagementConfig::default(),
        );
        assert_abs_diff_eq!(score.reinvest_ratio_avg.unwrap(), 0.45, epsilon = 1e-12);
        assert_abs_diff_eq!(score.payout_ratio_avg.unwrap(), 0.30, epsilon = 1e-12);
        assert_abs_diff_eq!(score.score.unwrap(), 1.0);
    }

    #[test]
    fn test_scores_are_averaged_per_year() {
        // Reinvestment 0.15 scores 0.35 and 0.5 scores 1.0
        let score = compute_management(
            &[
                cash_flow(2022, Some(100.0), Some(15.0), Some(90.0), None),
                cash_flow(2023, Some(100.0), Some(50.0), Some(30.0), None),
            ],
            &ManagementConfig::default(),
        );
        // Payout 0.9 scores 0.5 and 0.3 scores 1.0
        let expected = ((0.35 + 1.0) / 2.0 + (0.5 + 1.0) / 2.0) / 2.0;
        assert_abs_diff_eq!(score.score.unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_no_cash_flow_data() {
        let score = compute_management(&[], &ManagementConfig::default());
        assert_eq!(score, ManagementScore::default());
    }
}
