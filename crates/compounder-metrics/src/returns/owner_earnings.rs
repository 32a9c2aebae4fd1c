//! Owner earnings (`cfo - capex`) and its per-share form

use crate::growth::windowed_cagr;
use crate::series::YearValue;
use compounder_data::DerivedYearRecord;
use serde::{Deserialize, Serialize};

/// Owner earnings for one fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OwnerEarningsYear {
    /// Fiscal year
    pub fiscal_year: i32,
    /// `cfo - capex`
    pub owner_earnings: Option<f64>,
    /// Owner earnings per diluted share
    pub owner_earnings_ps: Option<f64>,
}

/// Owner earnings for every joined year.
pub fn owner_earnings_series(records: &[DerivedYearRecord]) -> Vec<OwnerEarningsYear> {
    records
        .iter()
        .map(|r| {
            let owner_earnings = match (r.cfo, r.capex) {
                (Some(cfo), Some(capex)) => Some(cfo - capex),
                _ => None,
            };
            let owner_earnings_ps = match (owner_earnings, r.shares) {
                (Some(oe), Some(shares)) if shares != 0.0 => Some(oe / shares),
                _ => None,
            };
            OwnerEarningsYear {
                fiscal_year: r.fiscal_year,
                owner_earnings,
                owner_earnings_ps,
            }
        })
        .collect()
}

/// Most recent per-share owner earnings.
pub fn latest_owner_earnings_ps(series: &[OwnerEarningsYear]) -> Option<f64> {
    crate::stats::latest_some(series.iter().map(|y| y.owner_earnings_ps))
}

/// CAGR of total owner earnings over a trailing window.
pub fn owner_earnings_growth(series: &[OwnerEarningsYear], window: usize) -> Option<f64> {
    let points: Vec<YearValue> = series
        .iter()
        .map(|y| YearValue::new(y.fiscal_year, y.owner_earnings))
        .collect();
    windowed_cagr(&points, window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn record(fy: i32, cfo: Option<f64>, capex: Option<f64>, shares: Option<f64>) -> DerivedYearRecord {
        DerivedYearRecord {
            fiscal_year: fy,
            cfo,
            capex,
            shares,
            ..Default::default()
        }
    }

    #[test]
    fn test_owner_earnings_per_share() {
        let series = owner_earnings_series(&[
            record(2022, Some(120.0), Some(20.0), Some(50.0)),
            record(2023, Some(150.0), None, Some(50.0)),
            record(2024, Some(150.0), Some(30.0), Some(0.0)),
        ]);
        assert_eq!(series[0].owner_earnings, Some(100.0));
        assert_eq!(series[0].owner_earnings_ps, Some(2.0));
        assert_eq!(series[1].owner_earnings, None);
        assert_eq!(series[1].owner_earnings_ps, None);
        assert_eq!(series[2].owner_earnings, Some(120.0));
        assert_eq!(series[2].owner_earnings_ps, None);
    }

    #[test]
    fn test_latest_skips_missing_years() {
        let series = owner_earnings_series(&[
            record(2022, Some(120.0), Some(20.0), Some(50.0)),
            record(2023, Some(150.0), None, Some(50.0)),
        ]);
        assert_eq!(latest_owner_earnings_ps(&series), Some(2.0));
        assert_eq!(latest_owner_earnings_ps(&[]), None);
    }

    #[test]
    fn test_owner_earnings_growth_five_year_window() {
        let records: Vec<DerivedYearRecord> = (0..8)
            .map(|i| {
                let oe = 100.0 * 1.12_f64.powi(i);
                record(2016 + i, Some(oe + 10.0), Some(10.0), Some(1.0))
            })
            .collect();
        let series = owner_earnings_series(&records);
        assert_abs_diff_eq!(owner_earnings_growth(&series, 5).unwrap(), 0.12, epsilon = 1e-9);
    }
}
