//! Per-company orchestration over a [`FactStore`].
//!
//! [`CompanyAnalyzer`] resolves a ticker to its stored company, loads the
//! fiscal series once per call and hands it to the metric engines.

use crate::error::{AnalysisError, Result};
use chrono::Utc;
use compounder_data::{Company, FactStore, FiscalYearFact, ValuationSnapshot};
use compounder_metrics::{
    CompanySeries, FiscalSeriesExtractor, FourMs, MetricSummary, MetricsConfig, QualityScores,
    Scenario, ScenarioData, ScenarioParams, Timeseries, ValuationError, four_ms, metric_summary,
    quality_scores, run_scenario, timeseries_all,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Latest income-statement facts shown with a company.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatestIncome {
    /// Fiscal year
    pub fiscal_year: i32,
    /// Revenue
    pub revenue: Option<f64>,
    /// Diluted EPS
    pub eps_diluted: Option<f64>,
    /// Operating income
    pub ebit: Option<f64>,
    /// Net income
    pub net_income: Option<f64>,
}

impl From<&FiscalYearFact> for LatestIncome {
    fn from(fact: &FiscalYearFact) -> Self {
        Self {
            fiscal_year: fact.fiscal_year,
            revenue: fact.revenue,
            eps_diluted: fact.eps_diluted,
            ebit: fact.ebit,
            net_income: fact.net_income,
        }
    }
}

/// Company identity plus its latest income statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySummary {
    /// Stored company
    pub company: Company,
    /// Latest fiscal year's income statement, if any
    pub latest_income: Option<LatestIncome>,
}

/// Headline metrics for a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyMetrics {
    /// Company CIK
    pub cik: String,
    /// Computed metrics
    pub metrics: MetricSummary,
}

/// Analyses stored companies with one metric configuration.
#[derive(Debug)]
pub struct CompanyAnalyzer<'a, S: FactStore> {
    store: &'a S,
    config: MetricsConfig,
}

impl<'a, S: FactStore> CompanyAnalyzer<'a, S> {
    /// Create an analyzer with the default configuration.
    pub fn new(store: &'a S) -> Self {
        Self::with_config(store, MetricsConfig::default())
    }

    /// Create an analyzer with a custom configuration.
    pub const fn with_config(store: &'a S, config: MetricsConfig) -> Self {
        Self { store, config }
    }

    /// The active configuration.
    pub const fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// The underlying store.
    pub const fn store(&self) -> &'a S {
        self.store
    }

    /// Resolve a ticker to its stored company.
    pub fn resolve(&self, ticker: &str) -> Result<Company> {
        self.store
            .company_by_ticker(ticker)?
            .ok_or_else(|| AnalysisError::UnknownTicker(ticker.trim().to_uppercase()))
    }

    /// Load the fiscal series for a stored company.
    pub fn series(&self, company: &Company) -> Result<CompanySeries> {
        let series = FiscalSeriesExtractor::new(self.store).load(&company.cik)?;
        if series.is_empty() {
            debug!(ticker = %company.ticker, "no stored fiscal years");
        }
        Ok(series)
    }

    fn load(&self, ticker: &str) -> Result<(Company, CompanySeries)> {
        let company = self.resolve(ticker)?;
        let series = self.series(&company)?;
        Ok((company, series))
    }

    /// Company identity and its latest income statement.
    pub fn company_summary(&self, ticker: &str) -> Result<CompanySummary> {
        let company = self.resolve(ticker)?;
        let latest_income = self
            .store
            .fiscal_year_facts(&company.cik)?
            .last()
            .map(LatestIncome::from);
        Ok(CompanySummary {
            company,
            latest_income,
        })
    }

    /// Headline growth, return and coverage metrics.
    pub fn metrics(&self, ticker: &str) -> Result<CompanyMetrics> {
        let (company, series) = self.load(ticker)?;
        Ok(CompanyMetrics {
            cik: company.cik,
            metrics: metric_summary(&series, &self.config.returns),
        })
    }

    /// Quality aggregate.
    pub fn quality(&self, ticker: &str) -> Result<QualityScores> {
        let (_, series) = self.load(ticker)?;
        Ok(quality_scores(&series, &self.config.returns))
    }

    /// Every per-year series.
    pub fn timeseries(&self, ticker: &str) -> Result<Timeseries> {
        let (_, series) = self.load(ticker)?;
        Ok(timeseries_all(&series, &self.config.returns))
    }

    /// Moat, management, balance-sheet and margin-of-safety scores.
    pub fn four_ms(&self, ticker: &str) -> Result<FourMs> {
        let (_, series) = self.load(ticker)?;
        Ok(four_ms(&series, &self.config))
    }

    /// Run a valuation scenario for a ticker.
    pub fn scenario(&self, ticker: &str, params: &ScenarioParams) -> Result<Scenario> {
        let company = self.resolve(ticker)?;
        self.scenario_for(&company, params)
    }

    /// Run the default valuation scenario for a ticker.
    pub fn default_scenario(&self, ticker: &str) -> Result<Scenario> {
        self.scenario(ticker, &ScenarioParams::default())
    }

    /// Run a valuation scenario for a stored company.
    pub fn scenario_for(&self, company: &Company, params: &ScenarioParams) -> Result<Scenario> {
        let series = self.series(company)?;
        let summary = metric_summary(&series, &self.config.returns);
        let data = ScenarioData {
            latest_eps: summary.latest_eps,
            growth: summary.growth,
            owner_earnings_ps: summary.latest_owner_earnings_ps,
            current_price: self.store.latest_price(&company.cik)?,
        };

        let scenario =
            run_scenario(&data, params, &self.config.valuation).map_err(|e| match e {
                ValuationError::MissingEps => AnalysisError::MissingEps(company.ticker.clone()),
            })?;

        info!(
            ticker = %company.ticker,
            growth_source = %scenario.growth_source,
            sticker = scenario.results.sticker,
            mos_price = scenario.results.mos_price,
            "valuation scenario"
        );
        Ok(scenario)
    }
}

/// Convert a scenario into a storable snapshot stamped with the current time.
pub fn valuation_snapshot(
    cik: &str,
    scenario: &Scenario,
    strategy: Option<&str>,
) -> ValuationSnapshot {
    let inputs = &scenario.inputs;
    let results = &scenario.results;
    ValuationSnapshot {
        id: None,
        cik: cik.to_string(),
        ts: Utc::now(),
        eps0: inputs.eps0,
        growth: inputs.g,
        pe_cap: inputs.pe_cap,
        discount: inputs.discount,
        sticker: results.sticker,
        mos_pct: inputs.mos_pct,
        mos_price: results.mos_price,
        owner_earnings_ps: Some(results.owner_earnings_ps),
        payback_years: results.payback_years,
        ten_cap_price: results.ten_cap_price,
        strategy: strategy.map(str::to_string),
    }
}
