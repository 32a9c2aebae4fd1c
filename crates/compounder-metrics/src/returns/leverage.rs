//! Interest coverage, net debt and debt-to-equity

use crate::series::YearValue;
use compounder_data::{BalanceSheetFact, FiscalYearFact};

/// `ebit / interest_expense` per fiscal year.
pub fn coverage_series(facts: &[FiscalYearFact]) -> Vec<YearValue> {
    facts
        .iter()
        .map(|f| {
            let coverage = match (f.ebit, f.interest_expense) {
                (Some(ebit), Some(interest)) if interest != 0.0 => Some(ebit / interest),
                _ => None,
            };
            YearValue::new(f.fiscal_year, coverage)
        })
        .collect()
}

/// `total_debt - cash` per fiscal year. Negative means net cash.
pub fn net_debt_series(balance_sheets: &[BalanceSheetFact]) -> Vec<YearValue> {
    balance_sheets
        .iter()
        .map(|b| {
            let net_debt = match (b.total_debt, b.cash) {
                (Some(debt), Some(cash)) => Some(debt - cash),
                _ => None,
            };
            YearValue::new(b.fiscal_year, net_debt)
        })
        .collect()
}

/// `total_debt / shareholder_equity` for one balance sheet.
pub fn debt_to_equity(balance_sheet: Option<&BalanceSheetFact>) -> Option<f64> {
    let bs = balance_sheet?;
    match (bs.total_debt, bs.shareholder_equity) {
        (Some(debt), Some(equity)) if equity != 0.0 => Some(debt / equity),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_guards_zero_interest() {
        let facts = vec![
            FiscalYearFact {
                ebit: Some(100.0),
                interest_expense: Some(10.0),
                ..FiscalYearFact::new(2022)
            },
            FiscalYearFact {
                ebit: Some(100.0),
                interest_expense: Some(0.0),
                ..FiscalYearFact::new(2023)
            },
            FiscalYearFact {
                ebit: None,
                interest_expense: Some(5.0),
                ..FiscalYearFact::new(2024)
            },
        ];
        let series = coverage_series(&facts);
        assert_eq!(series[0].value, Some(10.0));
        assert_eq!(series[1].value, None);
        assert_eq!(series[2].value, None);
    }

    #[test]
    fn test_net_debt_sign() {
        let series = net_debt_series(&[
            BalanceSheetFact {
                total_debt: Some(50.0),
                cash: Some(80.0),
                ..BalanceSheetFact::new(2023)
            },
            BalanceSheetFact {
                total_debt: Some(50.0),
                ..BalanceSheetFact::new(2024)
            },
        ]);
        assert_eq!(series[0].value, Some(-30.0));
        assert_eq!(series[1].value, None);
    }

    #[test]
    fn test_debt_to_equity() {
        let bs = BalanceSheetFact {
            total_debt: Some(40.0),
            shareholder_equity: Some(100.0),
            ..BalanceSheetFact::new(2023)
        };
        assert_eq!(debt_to_equity(Some(&bs)), Some(0.4));

        let no_equity = BalanceSheetFact {
            shareholder_equity: Some(0.0),
            ..bs.clone()
        };
        assert_eq!(debt_to_equity(Some(&no_equity)), None);
        assert_eq!(debt_to_equity(None), None);
    }
}
