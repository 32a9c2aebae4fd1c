//! Return on invested capital
//!
//! `ROIC = EBIT * (1 - tax_rate) / (equity + debt - cash)`, with the tax rate
//! estimated from reported taxes and clamped to `[0, max_tax_rate]`.

use crate::config::ReturnsConfig;
use crate::series::YearValue;
use crate::stats::{coefficient_of_variation, mean, recent_present};
use compounder_data::DerivedYearRecord;

/// Effective tax rate for one year.
///
/// Falls back to the configured default when taxes are unreported or EBIT is
/// zero.
pub fn effective_tax_rate(ebit: f64, taxes: Option<f64>, config: &ReturnsConfig) -> f64 {
    match taxes {
        Some(taxes) if ebit != 0.0 => (taxes / ebit.abs()).clamp(0.0, config.max_tax_rate),
        _ => config.default_tax_rate,
    }
}

/// ROIC for a single joined record.
pub fn roic(record: &DerivedYearRecord, config: &ReturnsConfig) -> Option<f64> {
    let ebit = record.ebit?;
    let invested_capital = record.equity? + record.debt? - record.cash?;
    if invested_capital == 0.0 {
        return None;
    }
    let nopat = ebit * (1.0 - effective_tax_rate(ebit, record.taxes, config));
    Some(nopat / invested_capital)
}

/// ROIC for every joined year.
pub fn roic_series(records: &[DerivedYearRecord], config: &ReturnsConfig) -> Vec<YearValue> {
    records
        .iter()
        .map(|r| YearValue::new(r.fiscal_year, roic(r, config)))
        .collect()
}

/// The most recent `roic_average_years` ROIC values, oldest first.
pub fn recent_roic(series: &[YearValue], config: &ReturnsConfig) -> Vec<f64> {
    recent_present(series.iter().map(|p| p.value), config.roic_average_years)
}

/// Mean of the recent ROIC window.
pub fn roic_average(series: &[YearValue], config: &ReturnsConfig) -> Option<f64> {
    mean(&recent_roic(series, config))
}

/// ROIC persistence on a 0-5 scale.
///
/// Counts recent years clearing the threshold, then deducts a point for an
/// unstable record (high coefficient of variation) or adds one when every year
/// cleared the bar with low variation. An undefined CV (zero mean) counts as
/// unstable. Needs at least two ROIC values.
pub fn roic_persistence_score(series: &[YearValue], config: &ReturnsConfig) -> Option<u8> {
    let recent = recent_present(series.iter().map(|p| p.value), config.persistence_years);
    if recent.len() < 2 {
        return None;
    }

    let cleared = recent
        .iter()
        .filter(|&&r| r >= config.persistence_threshold)
        .count();
    let mut score = cleared.min(5) as u8;

    let cv = coefficient_of_variation(&recent);
    match cv {
        Some(cv) if cv < config.persistence_cv_bonus && cleared == recent.len() => {
            score = (score + 1).min(5);
        }
        Some(cv) if cv <= config.persistence_cv_penalty => {}
        _ => score = score.saturating_sub(1),
    }
    Some(score)
}
