//! Price-alert rule evaluation.
//!
//! Rules are checked against the latest stored price. A rule without a price
//! to compare against is skipped, as is a `price_below_mos` rule whose company
//! has no diluted EPS. Triggered rules are returned; delivering them is left
//! to the caller.

use crate::analyzer::CompanyAnalyzer;
use crate::error::{AnalysisError, Result};
use compounder_data::{AlertKind, AlertRule, FactStore, SqliteStore};
use compounder_metrics::ScenarioParams;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A rule whose condition held at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggeredAlert {
    /// Rule id
    pub rule_id: i64,
    /// Company ticker
    pub ticker: String,
    /// Rule kind
    pub kind: AlertKind,
    /// Latest stored price
    pub price: f64,
    /// Level the price fell below
    pub trigger_price: f64,
}

impl TriggeredAlert {
    /// One-line description for logs and terminals.
    pub fn message(&self) -> String {
        format!(
            "ALERT {}: {} price {:.2} below {:.2}",
            self.kind.to_db_str(),
            self.ticker,
            self.price,
            self.trigger_price
        )
    }
}

/// Check that a rule carries what its kind needs.
pub fn validate_rule(kind: AlertKind, threshold: Option<f64>) -> Result<()> {
    match (kind, threshold) {
        (AlertKind::PriceBelowThreshold, None) => Err(AnalysisError::InvalidRule(
            "price_below_threshold requires a threshold".to_string(),
        )),
        (_, Some(t)) if !t.is_finite() || t <= 0.0 => Err(AnalysisError::InvalidRule(format!(
            "threshold must be a positive number, got {t}"
        ))),
        _ => Ok(()),
    }
}

/// Validate and store a rule for a ticker, returning its id.
pub fn add_rule(
    store: &SqliteStore,
    ticker: &str,
    kind: AlertKind,
    threshold: Option<f64>,
) -> Result<i64> {
    validate_rule(kind, threshold)?;
    let company = CompanyAnalyzer::new(store).resolve(ticker)?;
    let id = store.add_alert_rule(&company.cik, kind, threshold)?;
    info!(ticker = %company.ticker, id, kind = kind.to_db_str(), "added alert rule");
    Ok(id)
}

/// Evaluate one rule; `None` when it did not trigger or could not be checked.
pub fn evaluate_rule<S: FactStore>(
    analyzer: &CompanyAnalyzer<'_, S>,
    rule: &AlertRule,
) -> Result<Option<TriggeredAlert>> {
    let store = analyzer.store();
    let Some(company) = store.company(&rule.cik)? else {
        debug!(rule = rule.id, cik = %rule.cik, "alert rule for unknown company");
        return Ok(None);
    };
    let Some(price) = store.latest_price(&company.cik)? else {
        debug!(rule = rule.id, ticker = %company.ticker, "no stored price");
        return Ok(None);
    };

    let trigger_price = match rule.kind {
        AlertKind::PriceBelowThreshold => rule.threshold,
        AlertKind::PriceBelowMos => {
            match analyzer.scenario_for(&company, &ScenarioParams::default()) {
                Ok(scenario) => Some(scenario.results.mos_price),
                Err(AnalysisError::MissingEps(_)) => {
                    debug!(rule = rule.id, ticker = %company.ticker, "no EPS for MOS price");
                    None
                }
                Err(e) => return Err(e),
            }
        }
    };

    Ok(trigger_price
        .filter(|&level| price < level)
        .map(|trigger_price| TriggeredAlert {
            rule_id: rule.id,
            ticker: company.ticker,
            kind: rule.kind,
            price,
            trigger_price,
        }))
}

/// Evaluate every enabled rule in the store.
pub fn evaluate_alerts(analyzer: &CompanyAnalyzer<'_, SqliteStore>) -> Result<Vec<TriggeredAlert>> {
    let rules = analyzer.store().enabled_alert_rules()?;
    let mut triggered = Vec::new();
    for rule in &rules {
        if let Some(alert) = evaluate_rule(analyzer, rule)? {
            info!("{}", alert.message());
            triggered.push(alert);
        }
    }
    debug!(rules = rules.len(), triggered = triggered.len(), "evaluated alert rules");
    Ok(triggered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AlertKind::PriceBelowThreshold, Some(100.0), true)]
    #[case(AlertKind::PriceBelowThreshold, None, false)]
    #[case(AlertKind::PriceBelowThreshold, Some(-1.0), false)]
    #[case(AlertKind::PriceBelowMos, None, true)]
    #[case(AlertKind::PriceBelowMos, Some(f64::NAN), false)]
    fn test_validate_rule(
        #[case] kind: AlertKind,
        #[case] threshold: Option<f64>,
        #[case] valid: bool,
    ) {
        assert_eq!(validate_rule(kind, threshold).is_ok(), valid);
    }

    #[test]
    fn test_message() {
        let alert = TriggeredAlert {
            rule_id: 1,
            ticker: "KO".to_string(),
            kind: AlertKind::PriceBelowThreshold,
            price: 55.0,
            trigger_price: 60.0,
        };
        assert_eq!(alert.message(), "ALERT price_below_threshold: KO price 55.00 below 60.00");
    }
}
