//! Gross and EBIT margins, their stability and trend, and revenue volatility

use crate::series::{YearValue, present_values};
use crate::stats::{mean, pstdev, stability};
use compounder_data::FiscalYearFact;

/// Minimum number of margins for a stability score.
const MIN_STABILITY_POINTS: usize = 3;

/// Margins needed before the trend compares 3-year averages.
const TREND_AVERAGE_POINTS: usize = 6;

/// Gross margin for one year.
///
/// Prefers reported gross profit and falls back to `revenue - cogs`.
pub fn gross_margin(fact: &FiscalYearFact) -> Option<f64> {
    let revenue = fact.revenue.filter(|r| *r != 0.0)?;
    let gross_profit = fact
        .gross_profit
        .or_else(|| fact.cogs.map(|cogs| revenue - cogs))?;
    Some(gross_profit / revenue)
}

/// Gross margin per fiscal year.
pub fn gross_margin_series(facts: &[FiscalYearFact]) -> Vec<YearValue> {
    facts
        .iter()
        .map(|f| YearValue::new(f.fiscal_year, gross_margin(f)))
        .collect()
}

/// `clamp(1 - stdev / |mean|, 0, 1)` over gross margins.
pub fn gross_margin_stability(series: &[YearValue]) -> Option<f64> {
    stability(&present_values(series), MIN_STABILITY_POINTS)
}

/// Direction of gross margin.
///
/// With six or more margins this is the average of the last three minus the
/// average of the first three; otherwise last minus first.
pub fn gross_margin_trend(series: &[YearValue]) -> Option<f64> {
    let margins = present_values(series);
    if margins.len() < 2 {
        return None;
    }
    if margins.len() >= TREND_AVERAGE_POINTS {
        let older = mean(&margins[..3])?;
        let recent = mean(&margins[margins.len() - 3..])?;
        return Some(recent - older);
    }
    Some(margins[margins.len() - 1] - margins[0])
}

/// EBIT margins for years with non-zero revenue and reported EBIT.
pub fn ebit_margins(facts: &[FiscalYearFact]) -> Vec<f64> {
    facts
        .iter()
        .filter_map(|f| match (f.revenue, f.ebit) {
            (Some(revenue), Some(ebit)) if revenue != 0.0 => Some(ebit / revenue),
            _ => None,
        })
        .collect()
}

/// Stability of EBIT margin in `[0, 1]`.
pub fn margin_stability(facts: &[FiscalYearFact]) -> Option<f64> {
    stability(&ebit_margins(facts), MIN_STABILITY_POINTS)
}

/// Population standard deviation of year-over-year revenue growth.
///
/// Needs three fiscal years and two computable growth rates.
pub fn revenue_volatility(facts: &[FiscalYearFact]) -> Option<f64> {
    if facts.len() < 3 {
        return None;
    }
    let growth: Vec<f64> = facts
        .windows(2)
        .filter_map(|pair| match (pair[0].revenue, pair[1].revenue) {
            (Some(prev), Some(cur)) if prev != 0.0 => Some((cur - prev) / prev),
            _ => None,
        })
        .collect();
    if growth.len() < 2 {
        return None;
    }
    pstdev(&growth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn fact(fy: i32, revenue: f64, gross_profit: Option<f64>, cogs: Option<f64>) -> FiscalYearFact {
        FiscalYearFact {
            revenue: Some(revenue),
            gross_profit,
            cogs,
            ..FiscalYearFact::new(fy)
        }
    }

    fn margins(values: &[f64]) -> Vec<YearValue> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| YearValue::new(2018 + i as i32, Some(v)))
            .collect()
    }

    #[test]
    fn test_gross_margin_sources() {
        assert_eq!(gross_margin(&fact(2023, 100.0, Some(40.0), Some(70.0))), Some(0.40));
        assert_eq!(gross_margin(&fact(2023, 100.0, None, Some(60.0))), Some(0.40));
        assert_eq!(gross_margin(&fact(2023, 100.0, None, None)), None);
        assert_eq!(gross_margin(&fact(2023, 0.0, Some(10.0), None)), None);
        assert_eq!(gross_margin(&FiscalYearFact::new(2023)), None);
    }

    #[test]
    fn test_gross_margin_trend_six_years() {
        let series = margins(&[0.38, 0.39, 0.40, 0.42, 0.44, 0.45]);
        assert_abs_diff_eq!(gross_margin_trend(&series).unwrap(), 0.0467, epsilon = 1e-4);
    }

    #[test]
    fn test_gross_margin_trend_short_history() {
        let series = margins(&[0.40, 0.41, 0.43]);
        assert_abs_diff_eq!(gross_margin_trend(&series).unwrap(), 0.03, epsilon = 1e-12);
        assert!(gross_margin_trend(&margins(&[0.40])).is_none());
    }

    #[test]
    fn test_gross_margin_stability() {
        assert_abs_diff_eq!(
            gross_margin_stability(&margins(&[0.4, 0.4, 0.4])).unwrap(),
            1.0
        );
        assert!(gross_margin_stability(&margins(&[0.4, 0.4])).is_none());
    }

    #[test]
    fn test_margin_stability_in_unit_interval() {
        let facts: Vec<FiscalYearFact> = [(100.0, 20.0), (110.0, 23.0), (120.0, 24.0), (130.0, -10.0)]
            .iter()
            .enumerate()
            .map(|(i, &(revenue, ebit))| FiscalYearFact {
                revenue: Some(revenue),
                ebit: Some(ebit),
                ..FiscalYearFact::new(2020 + i as i32)
            })
            .collect();
        let stable = margin_stability(&facts[..3]).unwrap();
        assert!(stable > 0.9 && stable <= 1.0);
        let volatile = margin_stability(&facts).unwrap();
        assert!((0.0..=1.0).contains(&volatile));
        assert!(volatile < stable);
        assert!(margin_stability(&facts[..2]).is_none());
    }

    #[test]
    fn test_revenue_volatility() {
        let steady: Vec<FiscalYearFact> = [100.0, 110.0, 121.0, 133.1, 146.41]
            .iter()
            .enumerate()
            .map(|(i, &r)| fact(2019 + i as i32, r, None, None))
            .collect();
        assert_abs_diff_eq!(revenue_volatility(&steady).unwrap(), 0.0, epsilon = 1e-9);

        let choppy: Vec<FiscalYearFact> = [100.0, 120.0, 108.0, 140.4, 147.42]
            .iter()
            .enumerate()
            .map(|(i, &r)| fact(2019 + i as i32, r, None, None))
            .collect();
        assert!(revenue_volatility(&choppy).unwrap() > 0.1);

        assert!(revenue_volatility(&steady[..2]).is_none());
    }
}
