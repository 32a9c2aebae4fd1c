//! Metric Registry
//!
//! Static catalogue of every metric the engines produce, with the statement
//! fields each one reads.

use std::collections::HashMap;

/// Metric categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricCategory {
    /// Revenue and EPS growth
    Growth,
    /// Owner earnings and ROIC
    Returns,
    /// Margins, volatility and dilution
    Quality,
    /// Moat and pricing power
    Moat,
    /// Capital allocation
    Management,
    /// Coverage and leverage
    BalanceSheet,
    /// Sticker price and friends
    Valuation,
}

impl MetricCategory {
    /// Display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Growth => "growth",
            Self::Returns => "returns",
            Self::Quality => "quality",
            Self::Moat => "moat",
            Self::Management => "management",
            Self::BalanceSheet => "balance_sheet",
            Self::Valuation => "valuation",
        }
    }
}

/// Metric metadata
#[derive(Debug, Clone)]
pub struct MetricInfo {
    /// Metric name (unique identifier)
    pub name: &'static str,
    /// Metric category
    pub category: MetricCategory,
    /// Brief description
    pub description: &'static str,
    /// Statement fields read
    pub inputs: &'static [&'static str],
}

const fn info(
    name: &'static str,
    category: MetricCategory,
    description: &'static str,
    inputs: &'static [&'static str],
) -> MetricInfo {
    MetricInfo {
        name,
        category,
        description,
        inputs,
    }
}

/// Get all available metric info
pub fn available_metrics() -> Vec<MetricInfo> {
    use MetricCategory::*;
    vec![
        // Growth
        info("rev_cagr_1y", Growth, "Revenue CAGR over a 1-year window", &["revenue"]),
        info("rev_cagr_3y", Growth, "Revenue CAGR over a 3-year window", &["revenue"]),
        info("rev_cagr_5y", Growth, "Revenue CAGR over a 5-year window", &["revenue"]),
        info("rev_cagr_10y", Growth, "Revenue CAGR over a 10-year window", &["revenue"]),
        info("eps_cagr_1y", Growth, "Diluted EPS CAGR over a 1-year window", &["eps_diluted"]),
        info("eps_cagr_3y", Growth, "Diluted EPS CAGR over a 3-year window", &["eps_diluted"]),
        info("eps_cagr_5y", Growth, "Diluted EPS CAGR over a 5-year window", &["eps_diluted"]),
        info("eps_cagr_10y", Growth, "Diluted EPS CAGR over a 10-year window", &["eps_diluted"]),
        info("latest_eps", Growth, "Most recent reported diluted EPS", &["eps_diluted"]),
        // Returns
        info(
            "owner_earnings",
            Returns,
            "Operating cash flow less capital expenditures",
            &["cfo", "capex"],
        ),
        info(
            "latest_owner_earnings_ps",
            Returns,
            "Most recent owner earnings per diluted share",
            &["cfo", "capex", "shares_diluted"],
        ),
        info(
            "owner_earnings_growth",
            Returns,
            "Owner earnings CAGR over a 5-year window",
            &["cfo", "capex"],
        ),
        info(
            "roic",
            Returns,
            "Return on invested capital with an estimated tax rate",
            &["ebit", "taxes", "total_debt", "shareholder_equity", "cash"],
        ),
        info(
            "roic_avg",
            Returns,
            "Mean of the most recent ROIC values",
            &["ebit", "taxes", "total_debt", "shareholder_equity", "cash"],
        ),
        info(
            "roic_persistence_score",
            Returns,
            "0-5 score for ROIC clearing 15% with low variation",
            &["ebit", "taxes", "total_debt", "shareholder_equity", "cash"],
        ),
        // Quality
        info(
            "gross_margin",
            Quality,
            "Gross profit over revenue",
            &["revenue", "gross_profit", "cogs"],
        ),
        info(
            "gross_margin_trend",
            Quality,
            "Recent minus older average gross margin",
            &["revenue", "gross_profit", "cogs"],
        ),
        info(
            "margin_stability",
            Quality,
            "Stability of EBIT margin in [0, 1]",
            &["revenue", "ebit"],
        ),
        info(
            "revenue_volatility",
            Quality,
            "Standard deviation of year-over-year revenue growth",
            &["revenue"],
        ),
        info(
            "avg_share_dilution_3y",
            Quality,
            "Mean of the last three year-over-year share count changes",
            &["shares_diluted"],
        ),
        // Moat
        info(
            "pricing_power_score",
            Moat,
            "Gross-margin level, stability and trend blended into [0, 1]",
            &["revenue", "gross_profit", "cogs"],
        ),
        info(
            "moat_score",
            Moat,
            "ROIC level and consistency with margin stability",
            &["ebit", "taxes", "revenue", "total_debt", "shareholder_equity", "cash"],
        ),
        // Management
        info(
            "mgmt_score",
            Management,
            "Reinvestment and payout ratios scored against healthy bands",
            &["cfo", "capex", "buybacks", "dividends"],
        ),
        // Balance sheet
        info(
            "latest_coverage",
            BalanceSheet,
            "Most recent EBIT over interest expense",
            &["ebit", "interest_expense"],
        ),
        info(
            "debt_to_equity",
            BalanceSheet,
            "Latest total debt over shareholder equity",
            &["total_debt", "shareholder_equity"],
        ),
        info(
            "net_debt",
            BalanceSheet,
            "Total debt less cash",
            &["total_debt", "cash"],
        ),
        info(
            "balance_sheet_score",
            BalanceSheet,
            "0-5 resilience from coverage, leverage and net-debt trend",
            &["ebit", "interest_expense", "total_debt", "shareholder_equity", "cash"],
        ),
        // Valuation
        info(
            "recommended_mos",
            Valuation,
            "Margin of safety implied by growth and the Four Ms scores",
            &["revenue", "eps_diluted"],
        ),
        info(
            "sticker_price",
            Valuation,
            "Ten-year EPS projection discounted to today",
            &["eps_diluted"],
        ),
        info(
            "ten_cap_price",
            Valuation,
            "Price at a 10% owner-earnings yield",
            &["cfo", "capex", "shares_diluted"],
        ),
        info(
            "payback_years",
            Valuation,
            "Years of growing owner earnings to recover the price",
            &["cfo", "capex", "shares_diluted"],
        ),
    ]
}

/// Get metrics by category
pub fn metrics_by_category(category: MetricCategory) -> Vec<MetricInfo> {
    available_metrics()
        .into_iter()
        .filter(|m| m.category == category)
        .collect()
}

/// Get metric info by name
pub fn get_metric_info(name: &str) -> Option<MetricInfo> {
    available_metrics().into_iter().find(|m| m.name == name)
}

/// Get a map of all metrics indexed by name
pub fn metric_map() -> HashMap<&'static str, MetricInfo> {
    available_metrics()
        .into_iter()
        .map(|m| (m.name, m))
        .collect()
}

/// List all metric names
pub fn list_metric_names() -> Vec<&'static str> {
    available_metrics().into_iter().map(|m| m.name).collect()
}

/// Count metrics by category
pub fn count_by_category() -> HashMap<MetricCategory, usize> {
    let mut counts = HashMap::new();
    for metric in available_metrics() {
        *counts.entry(metric.category).or_insert(0) += 1;
    }
    counts
}
