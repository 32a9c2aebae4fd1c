//! Metric configuration
//!
//! Every threshold, band and weight used by the return, scoring and valuation
//! engines lives in [`MetricsConfig`]. The defaults reproduce the standard
//! Four Ms calibration; a JSON file can override any subset of fields.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for [`MetricsConfig`]
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the engines cannot use
    #[error("Invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

/// A closed `[low, high]` interval used for normalization and band scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Lower edge
    pub low: f64,
    /// Upper edge
    pub high: f64,
}

impl Band {
    /// Create a band.
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    fn check(&self, field: &str) -> Result<(), ConfigError> {
        if !(self.low.is_finite() && self.high.is_finite()) || self.low >= self.high {
            return Err(invalid(field, format!("low {} must be below high {}", self.low, self.high)));
        }
        Ok(())
    }
}

/// Return & coverage engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReturnsConfig {
    /// Tax rate assumed when the effective rate cannot be estimated (default: 0.21)
    pub default_tax_rate: f64,
    /// Upper clamp for the effective tax rate (default: 0.35)
    pub max_tax_rate: f64,
    /// Number of recent ROIC values averaged (default: 10)
    pub roic_average_years: usize,
    /// Number of recent ROIC values scored for persistence (default: 5)
    pub persistence_years: usize,
    /// ROIC a year must reach to count towards persistence (default: 0.15)
    pub persistence_threshold: f64,
    /// Coefficient of variation above which one point is deducted (default: 0.3)
    pub persistence_cv_penalty: f64,
    /// Coefficient of variation below which a clean record earns a point (default: 0.15)
    pub persistence_cv_bonus: f64,
    /// Window for owner-earnings growth in years (default: 5)
    pub owner_earnings_growth_window: usize,
}

impl Default for ReturnsConfig {
    fn default() -> Self {
        Self {
            default_tax_rate: 0.21,
            max_tax_rate: 0.35,
            roic_average_years: 10,
            persistence_years: 5,
            persistence_threshold: 0.15,
            persistence_cv_penalty: 0.3,
            persistence_cv_bonus: 0.15,
            owner_earnings_growth_window: 5,
        }
    }
}

/// Moat and pricing-power settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MoatConfig {
    /// Normalization band for average ROIC
    pub roic_average_band: Band,
    /// Normalization band for ROIC consistency `1 / (1 + stdev)`
    pub roic_consistency_band: Band,
    /// Normalization band for EBIT-margin stability
    pub margin_stability_band: Band,
    /// Weight of the pricing-power indicator in the final blend (default: 0.1)
    pub pricing_power_weight: f64,
    /// Weight of the scaled ROIC persistence score in the final blend (default: 0.1)
    pub persistence_weight: f64,
    /// Pricing power: weight of gross-margin level (default: 0.4)
    pub gross_margin_level_weight: f64,
    /// Pricing power: weight of gross-margin stability (default: 0.3)
    pub gross_margin_stability_weight: f64,
    /// Pricing power: weight of gross-margin trend (default: 0.3)
    pub gross_margin_trend_weight: f64,
    /// Pricing power: band mapping gross-margin level to `[0, 1]`
    pub gross_margin_level_band: Band,
    /// Pricing power: band mapping gross-margin trend to `[0, 1]`
    pub gross_margin_trend_band: Band,
}

impl Default for MoatConfig {
    fn default() -> Self {
        Self {
            roic_average_band: Band::new(0.10, 0.25),
            roic_consistency_band: Band::new(0.40, 0.90),
            margin_stability_band: Band::new(0.30, 0.90),
            pricing_power_weight: 0.1,
            persistence_weight: 0.1,
            gross_margin_level_weight: 0.4,
            gross_margin_stability_weight: 0.3,
            gross_margin_trend_weight: 0.3,
            gross_margin_level_band: Band::new(0.20, 0.50),
            gross_margin_trend_band: Band::new(-0.05, 0.05),
        }
    }
}

/// Management capital-allocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagementConfig {
    /// Healthy `capex / cfo` range
    pub reinvestment_band: Band,
    /// Healthy `(buybacks + dividends) / cfo` range
    pub payout_band: Band,
    /// Score reached just below the band's lower edge (default: 0.7)
    pub below_band_ceiling: f64,
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            reinvestment_band: Band::new(0.30, 0.70),
            payout_band: Band::new(0.0, 0.60),
            below_band_ceiling: 0.7,
        }
    }
}

/// Balance-sheet resilience weights
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceSheetConfig {
    /// Interest coverage weight (default: 0.4)
    pub coverage_weight: f64,
    /// Debt-to-equity weight (default: 0.3)
    pub debt_equity_weight: f64,
    /// Net-debt trend weight (default: 0.3)
    pub net_debt_trend_weight: f64,
}

impl Default for BalanceSheetConfig {
    fn default() -> Self {
        Self {
            coverage_weight: 0.4,
            debt_equity_weight: 0.3,
            net_debt_trend_weight: 0.3,
        }
    }
}

/// Recommended margin-of-safety settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginOfSafetyConfig {
    /// Starting margin of safety (default: 0.5)
    pub base: f64,
    /// Growth below this raises the margin one-for-one (default: 0.15)
    pub growth_hurdle: f64,
    /// Sensitivity to the moat score (default: 0.2)
    pub moat_sensitivity: f64,
    /// Sensitivity to the management score (default: 0.2)
    pub management_sensitivity: f64,
    /// Sensitivity to the scaled balance-sheet score (default: 0.1)
    pub balance_sheet_sensitivity: f64,
    /// Score assumed for an unavailable moat or management score (default: 0.5)
    pub neutral_score: f64,
    /// Growth assumed when no 5y CAGR is available (default: 0.10)
    pub default_growth: f64,
    /// Lowest recommendation (default: 0.30)
    pub min: f64,
    /// Highest recommendation (default: 0.70)
    pub max: f64,
}

impl Default for MarginOfSafetyConfig {
    fn default() -> Self {
        Self {
            base: 0.5,
            growth_hurdle: 0.15,
            moat_sensitivity: 0.2,
            management_sensitivity: 0.2,
            balance_sheet_sensitivity: 0.1,
            neutral_score: 0.5,
            default_growth: 0.10,
            min: 0.30,
            max: 0.70,
        }
    }
}

/// Sticker price, ten-cap and payback settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// Projection horizon in years (default: 10)
    pub horizon_years: u32,
    /// Terminal P/E cap (default: 20)
    pub pe_cap: f64,
    /// Lowest terminal P/E (default: 5)
    pub min_terminal_pe: f64,
    /// Annual discount rate (default: 0.15)
    pub discount: f64,
    /// Margin of safety applied to the sticker price (default: 0.5)
    pub mos_pct: f64,
    /// Growth is clamped to `[0, max_growth]` (default: 0.5)
    pub max_growth: f64,
    /// Owner-earnings yield defining the ten-cap price (default: 0.10)
    pub ten_cap_yield: f64,
    /// Payback simulation horizon in years (default: 10)
    pub payback_max_years: u32,
    /// Growth used when no CAGR is available (default: 0.10)
    pub default_growth: f64,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            horizon_years: 10,
            pe_cap: 20.0,
            min_terminal_pe: 5.0,
            discount: 0.15,
            mos_pct: 0.5,
            max_growth: 0.5,
            ten_cap_yield: 0.10,
            payback_max_years: 10,
            default_growth: 0.10,
        }
    }
}

/// All engine settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Return & coverage engine
    pub returns: ReturnsConfig,
    /// Moat and pricing power
    pub moat: MoatConfig,
    /// Management score
    pub management: ManagementConfig,
    /// Balance-sheet resilience
    pub balance_sheet: BalanceSheetConfig,
    /// Recommended margin of safety
    pub margin_of_safety: MarginOfSafetyConfig,
    /// Valuation engine
    pub valuation: ValuationConfig,
}

impl MetricsConfig {
    /// Load a config from a JSON file and validate it.
    ///
    /// Missing fields take their default values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check band ordering, weight positivity and rate ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.returns;
        unit_interval("returns.default_tax_rate", r.default_tax_rate)?;
        unit_interval("returns.max_tax_rate", r.max_tax_rate)?;
        if r.roic_average_years == 0 {
            return Err(invalid("returns.roic_average_years", "must be at least 1"));
        }
        if r.persistence_years < 2 {
            return Err(invalid("returns.persistence_years", "must be at least 2"));
        }
        if r.owner_earnings_growth_window < 2 {
            return Err(invalid(
                "returns.owner_earnings_growth_window",
                "must be at least 2",
            ));
        }
        if r.persistence_cv_bonus > r.persistence_cv_penalty {
            return Err(invalid(
                "returns.persistence_cv_bonus",
                "must not exceed persistence_cv_penalty",
            ));
        }

        let m = &self.moat;
        m.roic_average_band.check("moat.roic_average_band")?;
        m.roic_consistency_band.check("moat.roic_consistency_band")?;
        m.margin_stability_band.check("moat.margin_stability_band")?;
        m.gross_margin_level_band.check("moat.gross_margin_level_band")?;
        m.gross_margin_trend_band.check("moat.gross_margin_trend_band")?;
        for (field, weight) in [
            ("moat.pricing_power_weight", m.pricing_power_weight),
            ("moat.persistence_weight", m.persistence_weight),
            ("moat.gross_margin_level_weight", m.gross_margin_level_weight),
            ("moat.gross_margin_stability_weight", m.gross_margin_stability_weight),
            ("moat.gross_margin_trend_weight", m.gross_margin_trend_weight),
        ] {
            positive(field, weight)?;
        }
        if m.pricing_power_weight + m.persistence_weight >= 1.0 {
            return Err(invalid(
                "moat.pricing_power_weight",
                "secondary weights must sum to less than 1",
            ));
        }

        let mg = &self.management;
        mg.reinvestment_band.check("management.reinvestment_band")?;
        mg.payout_band.check("management.payout_band")?;
        unit_interval("management.below_band_ceiling", mg.below_band_ceiling)?;

        let b = &self.balance_sheet;
        positive("balance_sheet.coverage_weight", b.coverage_weight)?;
        positive("balance_sheet.debt_equity_weight", b.debt_equity_weight)?;
        positive("balance_sheet.net_debt_trend_weight", b.net_debt_trend_weight)?;

        let mos = &self.margin_of_safety;
        unit_interval("margin_of_safety.min", mos.min)?;
        unit_interval("margin_of_safety.max", mos.max)?;
        if mos.min > mos.max {
            return Err(invalid("margin_of_safety.min", "must not exceed max"));
        }

        let v = &self.valuation;
        if v.horizon_years == 0 {
            return Err(invalid("valuation.horizon_years", "must be at least 1"));
        }
        positive("valuation.pe_cap", v.pe_cap)?;
        positive("valuation.ten_cap_yield", v.ten_cap_yield)?;
        unit_interval("valuation.mos_pct", v.mos_pct)?;
        if v.discount <= -1.0 {
            return Err(invalid("valuation.discount", "must be greater than -1"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(field, format!("{value} must be positive")));
    }
    Ok(())
}

fn unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(field, format!("{value} must lie in [0, 1]")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = MetricsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.returns.default_tax_rate, 0.21);
        assert_eq!(config.valuation.pe_cap, 20.0);
        assert_eq!(config.moat.roic_average_band, Band::new(0.10, 0.25));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"valuation": {{"discount": 0.12}}, "returns": {{"persistence_threshold": 0.2}}}}"#
        )
        .unwrap();

        let config = MetricsConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.valuation.discount, 0.12);
        assert_eq!(config.valuation.pe_cap, 20.0);
        assert_eq!(config.returns.persistence_threshold, 0.2);
        assert_eq!(config.returns.persistence_years, 5);
    }

    #[test]
    fn test_inverted_band_rejected() {
        let mut config = MetricsConfig::default();
        config.moat.roic_average_band = Band::new(0.25, 0.10);
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "moat.roic_average_band"),
            other => panic!("expected invalid band, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_weight_rejected() {
        let mut config = MetricsConfig::default();
        config.balance_sheet.coverage_weight = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            MetricsConfig::from_json_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            MetricsConfig::from_json_file("/nonexistent/compounder.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
