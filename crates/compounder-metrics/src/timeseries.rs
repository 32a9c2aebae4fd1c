//! Per-year series bundle for charting and export

use crate::config::ReturnsConfig;
use crate::returns::{OwnerEarningsYear, coverage_series, owner_earnings_series, roic_series};
use crate::series::{CompanySeries, YearValue};
use serde::{Deserialize, Serialize};

/// Revenue and diluted EPS for one fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenueEpsYear {
    /// Fiscal year
    pub fiscal_year: i32,
    /// Revenue
    pub revenue: Option<f64>,
    /// Diluted EPS
    pub eps: Option<f64>,
}

/// All per-year series for one company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeseries {
    /// Revenue and EPS
    pub income: Vec<RevenueEpsYear>,
    /// Owner earnings
    pub owner_earnings: Vec<OwnerEarningsYear>,
    /// ROIC
    pub roic: Vec<YearValue>,
    /// Interest coverage
    pub coverage: Vec<YearValue>,
}

/// Collect every per-year series.
pub fn timeseries_all(series: &CompanySeries, config: &ReturnsConfig) -> Timeseries {
    Timeseries {
        income: series
            .facts
            .iter()
            .map(|f| RevenueEpsYear {
                fiscal_year: f.fiscal_year,
                revenue: f.revenue,
                eps: f.eps_diluted,
            })
            .collect(),
        owner_earnings: owner_earnings_series(&series.derived),
        roic: roic_series(&series.derived, config),
        coverage: coverage_series(&series.facts),
    }
}

impl Timeseries {
    /// Fiscal years covered by any series, ascending.
    pub fn fiscal_years(&self) -> Vec<i32> {
        let years: std::collections::BTreeSet<i32> = self
            .income
            .iter()
            .map(|y| y.fiscal_year)
            .chain(self.owner_earnings.iter().map(|y| y.fiscal_year))
            .chain(self.roic.iter().map(|y| y.fiscal_year))
            .chain(self.coverage.iter().map(|y| y.fiscal_year))
            .collect();
        years.into_iter().collect()
    }
}
