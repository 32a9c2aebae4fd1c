//! Revenue and EPS growth over fixed windows

use super::cagr::windowed_cagr;
use crate::series::YearValue;
use compounder_data::FiscalYearFact;
use serde::{Deserialize, Serialize};

/// Revenue series from income-statement rows.
pub fn revenue_series(facts: &[FiscalYearFact]) -> Vec<YearValue> {
    facts
        .iter()
        .map(|f| YearValue::new(f.fiscal_year, f.revenue))
        .collect()
}

/// Diluted EPS series from income-statement rows.
pub fn eps_series(facts: &[FiscalYearFact]) -> Vec<YearValue> {
    facts
        .iter()
        .map(|f| YearValue::new(f.fiscal_year, f.eps_diluted))
        .collect()
}

/// 5y and 10y revenue / EPS CAGR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthMetrics {
    /// Revenue CAGR, 5y window
    pub rev_cagr_5y: Option<f64>,
    /// Revenue CAGR, 10y window
    pub rev_cagr_10y: Option<f64>,
    /// EPS CAGR, 5y window
    pub eps_cagr_5y: Option<f64>,
    /// EPS CAGR, 10y window
    pub eps_cagr_10y: Option<f64>,
}

impl GrowthMetrics {
    /// Named values in display order.
    pub fn entries(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("rev_cagr_5y", self.rev_cagr_5y),
            ("rev_cagr_10y", self.rev_cagr_10y),
            ("eps_cagr_5y", self.eps_cagr_5y),
            ("eps_cagr_10y", self.eps_cagr_10y),
        ]
    }
}

/// 1y, 3y, 5y and 10y revenue / EPS CAGR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedGrowthMetrics {
    /// Revenue CAGR, 1y window
    pub rev_cagr_1y: Option<f64>,
    /// Revenue CAGR, 3y window
    pub rev_cagr_3y: Option<f64>,
    /// Revenue CAGR, 5y window
    pub rev_cagr_5y: Option<f64>,
    /// Revenue CAGR, 10y window
    pub rev_cagr_10y: Option<f64>,
    /// EPS CAGR, 1y window
    pub eps_cagr_1y: Option<f64>,
    /// EPS CAGR, 3y window
    pub eps_cagr_3y: Option<f64>,
    /// EPS CAGR, 5y window
    pub eps_cagr_5y: Option<f64>,
    /// EPS CAGR, 10y window
    pub eps_cagr_10y: Option<f64>,
}

impl ExtendedGrowthMetrics {
    /// The 5y / 10y subset.
    pub const fn base(&self) -> GrowthMetrics {
        GrowthMetrics {
            rev_cagr_5y: self.rev_cagr_5y,
            rev_cagr_10y: self.rev_cagr_10y,
            eps_cagr_5y: self.eps_cagr_5y,
            eps_cagr_10y: self.eps_cagr_10y,
        }
    }

    /// Named values in display order.
    pub fn entries(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("rev_cagr_1y", self.rev_cagr_1y),
            ("rev_cagr_3y", self.rev_cagr_3y),
            ("rev_cagr_5y", self.rev_cagr_5y),
            ("rev_cagr_10y", self.rev_cagr_10y),
            ("eps_cagr_1y", self.eps_cagr_1y),
            ("eps_cagr_3y", self.eps_cagr_3y),
            ("eps_cagr_5y", self.eps_cagr_5y),
            ("eps_cagr_10y", self.eps_cagr_10y),
        ]
    }
}

/// Compute 5y / 10y growth. Fewer than two fiscal years yields all `None`.
pub fn growth_metrics(facts: &[FiscalYearFact]) -> GrowthMetrics {
    growth_metrics_extended(facts).base()
}

/// Compute 1y / 3y / 5y / 10y growth. Fewer than two fiscal years yields all `None`.
pub fn growth_metrics_extended(facts: &[FiscalYearFact]) -> ExtendedGrowthMetrics {
    if facts.len() < 2 {
        return ExtendedGrowthMetrics::default();
    }
    let rev = revenue_series(facts);
    let eps = eps_series(facts);
    ExtendedGrowthMetrics {
        rev_cagr_1y: windowed_cagr(&rev, 1),
        rev_cagr_3y: windowed_cagr(&rev, 3),
        rev_cagr_5y: windowed_cagr(&rev, 5),
        rev_cagr_10y: windowed_cagr(&rev, 10),
        eps_cagr_1y: windowed_cagr(&eps, 1),
        eps_cagr_3y: windowed_cagr(&eps, 3),
        eps_cagr_5y: windowed_cagr(&eps, 5),
        eps_cagr_10y: windowed_cagr(&eps, 10),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn history(years: std::ops::RangeInclusive<i32>, growth: f64) -> Vec<FiscalYearFact> {
        let start = *years.start();
        years
            .map(|fy| {
                let k = fy - start;
                FiscalYearFact {
                    revenue: Some(1_000.0 * (1.0 + growth).powi(k)),
                    eps_diluted: Some(1.0 * (1.0 + growth).powi(k)),
                    ..FiscalYearFact::new(fy)
                }
            })
            .collect()
    }

    #[test]
    fn test_single_year_is_all_none() {
        let metrics = growth_metrics_extended(&history(2023..=2023, 0.1));
        assert_eq!(metrics, ExtendedGrowthMetrics::default());
        assert_eq!(growth_metrics(&[]), GrowthMetrics::default());
    }

    #[test]
    fn test_steady_growth_all_windows() {
        let metrics = growth_metrics_extended(&history(2012..=2023, 0.08));
        for (name, value) in metrics.entries() {
            if name.ends_with("_1y") {
                assert!(value.is_none());
            } else {
                assert_abs_diff_eq!(value.unwrap(), 0.08, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_one_year_window_is_undefined() {
        // A 1y window floors the start at the final year, so start == end
        let metrics = growth_metrics_extended(&history(2019..=2023, 0.1));
        assert!(metrics.rev_cagr_1y.is_none());
        assert!(metrics.eps_cagr_1y.is_none());
        assert_abs_diff_eq!(metrics.rev_cagr_3y.unwrap(), 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_eps_base_is_none() {
        let mut facts = history(2019..=2023, 0.1);
        facts[0].eps_diluted = Some(-0.5);
        let metrics = growth_metrics(&facts);
        assert!(metrics.eps_cagr_5y.is_none());
        assert_abs_diff_eq!(metrics.rev_cagr_5y.unwrap(), 0.1, epsilon = 1e-9);
    }
}
