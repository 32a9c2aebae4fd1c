//! Annual statement extraction from companyfacts documents.
//!
//! Filers use different US-GAAP tags for the same line item, and the same
//! filer may switch tags over time. [`XbrlTagMapper`] lists the candidate
//! tags for every stored field in priority order; the first tag the document
//! reports at all is used for that field across every fiscal year.

use crate::edgar::xbrl::XbrlDocument;
use crate::facts::AnnualFacts;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

const US_GAAP: &str = "us-gaap";

/// A stored fact field and the statement it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactField {
    /// Revenue
    Revenue,
    /// Cost of revenue
    Cogs,
    /// Gross profit
    GrossProfit,
    /// SG&A expense
    Sga,
    /// R&D expense
    Rnd,
    /// Depreciation and amortization
    Depreciation,
    /// Operating income
    Ebit,
    /// Interest expense
    InterestExpense,
    /// Income tax expense
    Taxes,
    /// Net income
    NetIncome,
    /// Diluted EPS
    EpsDiluted,
    /// Diluted weighted average shares
    SharesDiluted,
    /// Cash and equivalents
    Cash,
    /// Receivables
    Receivables,
    /// Inventory
    Inventory,
    /// Total assets
    TotalAssets,
    /// Total liabilities
    TotalLiabilities,
    /// Total debt
    TotalDebt,
    /// Shareholder equity
    ShareholderEquity,
    /// Operating cash flow
    Cfo,
    /// Capital expenditures
    Capex,
    /// Share repurchases
    Buybacks,
    /// Dividends paid
    Dividends,
    /// Acquisitions
    Acquisitions,
}

impl FactField {
    /// Every field, in statement order.
    pub const ALL: [Self; 24] = [
        Self::Revenue,
        Self::Cogs,
        Self::GrossProfit,
        Self::Sga,
        Self::Rnd,
        Self::Depreciation,
        Self::Ebit,
        Self::InterestExpense,
        Self::Taxes,
        Self::NetIncome,
        Self::EpsDiluted,
        Self::SharesDiluted,
        Self::Cash,
        Self::Receivables,
        Self::Inventory,
        Self::TotalAssets,
        Self::TotalLiabilities,
        Self::TotalDebt,
        Self::ShareholderEquity,
        Self::Cfo,
        Self::Capex,
        Self::Buybacks,
        Self::Dividends,
        Self::Acquisitions,
    ];

    /// Unit key the value is reported in.
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::EpsDiluted => "USD/shares",
            Self::SharesDiluted => "shares",
            _ => "USD",
        }
    }

    /// Write a value into the matching slot of an annual record.
    pub fn set(&self, facts: &mut AnnualFacts, value: Option<f64>) {
        let is = &mut facts.income;
        let bs = &mut facts.balance_sheet;
        let cf = &mut facts.cash_flow;
        match self {
            Self::Revenue => is.revenue = value,
            Self::Cogs => is.cogs = value,
            Self::GrossProfit => is.gross_profit = value,
            Self::Sga => is.sga = value,
            Self::Rnd => is.rnd = value,
            Self::Depreciation => is.depreciation = value,
            Self::Ebit => is.ebit = value,
            Self::InterestExpense => is.interest_expense = value,
            Self::Taxes => is.taxes = value,
            Self::NetIncome => is.net_income = value,
            Self::EpsDiluted => is.eps_diluted = value,
            Self::SharesDiluted => is.shares_diluted = value,
            Self::Cash => bs.cash = value,
            Self::Receivables => bs.receivables = value,
            Self::Inventory => bs.inventory = value,
            Self::TotalAssets => bs.total_assets = value,
            Self::TotalLiabilities => bs.total_liabilities = value,
            Self::TotalDebt => bs.total_debt = value,
            Self::ShareholderEquity => bs.shareholder_equity = value,
            Self::Cfo => cf.cfo = value,
            Self::Capex => cf.capex = value,
            Self::Buybacks => cf.buybacks = value,
            Self::Dividends => cf.dividends = value,
            Self::Acquisitions => cf.acquisitions = value,
        }
    }
}

/// Maps fact fields to their candidate US-GAAP tags.
#[derive(Debug, Clone)]
pub struct XbrlTagMapper {
    tags: BTreeMap<&'static str, (FactField, &'static [&'static str])>,
}

impl XbrlTagMapper {
    /// Create a mapper with the standard tag lists.
    pub fn new() -> Self {
        let entries: [(&'static str, FactField, &'static [&'static str]); 24] = [
            (
                "revenue",
                FactField::Revenue,
                &[
                    "Revenues",
                    "SalesRevenueNet",
                    "RevenueFromContractWithCustomerExcludingAssessedTax",
                ],
            ),
            (
                "cogs",
                FactField::Cogs,
                &["CostOfRevenue", "CostOfGoodsAndServicesSold"],
            ),
            ("gross_profit", FactField::GrossProfit, &["GrossProfit"]),
            (
                "sga",
                FactField::Sga,
                &["SellingGeneralAndAdministrativeExpense"],
            ),
            ("rnd", FactField::Rnd, &["ResearchAndDevelopmentExpense"]),
            (
                "depreciation",
                FactField::Depreciation,
                &[
                    "DepreciationDepletionAndAmortization",
                    "DepreciationAndAmortization",
                ],
            ),
            ("ebit", FactField::Ebit, &["OperatingIncomeLoss"]),
            (
                "interest_expense",
                FactField::InterestExpense,
                &["InterestExpense"],
            ),
            ("taxes", FactField::Taxes, &["IncomeTaxExpenseBenefit"]),
            ("net_income", FactField::NetIncome, &["NetIncomeLoss"]),
            (
                "eps_diluted",
                FactField::EpsDiluted,
                &["EarningsPerShareDiluted"],
            ),
            (
                "shares_diluted",
                FactField::SharesDiluted,
                &["WeightedAverageNumberOfDilutedSharesOutstanding"],
            ),
            (
                "cash",
                FactField::Cash,
                &["CashAndCashEquivalentsAtCarryingValue"],
            ),
            (
                "receivables",
                FactField::Receivables,
                &["ReceivablesNetCurrent", "AccountsReceivableNetCurrent"],
            ),
            ("inventory", FactField::Inventory, &["InventoryNet"]),
            ("total_assets", FactField::TotalAssets, &["Assets"]),
            (
                "total_liabilities",
                FactField::TotalLiabilities,
                &["Liabilities"],
            ),
            (
                "total_debt",
                FactField::TotalDebt,
                &["LongTermDebtNoncurrent", "LongTermDebtCurrent", "DebtCurrent"],
            ),
            (
                "shareholder_equity",
                FactField::ShareholderEquity,
                &[
                    "StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest",
                    "StockholdersEquity",
                ],
            ),
            (
                "cfo",
                FactField::Cfo,
                &["NetCashProvidedByUsedInOperatingActivities"],
            ),
            (
                "capex",
                FactField::Capex,
                &[
                    "PaymentsToAcquirePropertyPlantAndEquipment",
                    "CapitalExpenditures",
                ],
            ),
            (
                "buybacks",
                FactField::Buybacks,
                &["PaymentsForRepurchaseOfCommonStock"],
            ),
            ("dividends", FactField::Dividends, &["PaymentsOfDividends"]),
            (
                "acquisitions",
                FactField::Acquisitions,
                &["PaymentsToAcquireBusinessesNetOfCashAcquired"],
            ),
        ];

        let tags = entries
            .into_iter()
            .map(|(name, field, tags)| (name, (field, tags)))
            .collect();

        Self { tags }
    }

    /// Candidate tags for a field name, in priority order.
    pub fn get_tags(&self, name: &str) -> Option<&'static [&'static str]> {
        self.tags.get(name).map(|(_, tags)| *tags)
    }

    /// Candidate tags for a field, in priority order.
    pub fn tags_for(&self, field: FactField) -> &'static [&'static str] {
        self.tags
            .values()
            .find(|(f, _)| *f == field)
            .map(|(_, tags)| *tags)
            .unwrap_or_default()
    }

    /// The concept used for a field: the first candidate tag the document reports.
    pub fn resolve_concept(&self, doc: &XbrlDocument, field: FactField) -> Option<String> {
        self.tags_for(field)
            .iter()
            .map(|tag| format!("{US_GAAP}:{tag}"))
            .find(|concept| doc.has_concept(concept))
    }
}

impl Default for XbrlTagMapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns a companyfacts document into one [`AnnualFacts`] per fiscal year.
#[derive(Debug, Default)]
pub struct AnnualFactsExtractor {
    tag_mapper: XbrlTagMapper,
}

impl AnnualFactsExtractor {
    /// Create an extractor with the standard tag lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fiscal years with an annual revenue or diluted EPS fact.
    pub fn fiscal_years(&self, doc: &XbrlDocument) -> Vec<i32> {
        let mut years = BTreeSet::new();
        for field in [FactField::Revenue, FactField::EpsDiluted] {
            if let Some(concept) = self.tag_mapper.resolve_concept(doc, field) {
                years.extend(doc.annual_values(&concept, field.unit()).into_keys());
            }
        }
        years.into_iter().collect()
    }

    /// Extract annual statements, ascending by fiscal year.
    pub fn extract(&self, doc: &XbrlDocument) -> Vec<AnnualFacts> {
        let years = self.fiscal_years(doc);
        let mut rows: Vec<AnnualFacts> = years.iter().map(|fy| AnnualFacts::new(*fy)).collect();

        for field in FactField::ALL {
            let Some(concept) = self.tag_mapper.resolve_concept(doc, field) else {
                debug!(?field, "no candidate tag reported");
                continue;
            };
            let values = doc.annual_values(&concept, field.unit());
            for row in &mut rows {
                field.set(row, values.get(&row.fiscal_year()).copied());
            }
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edgar::xbrl::XbrlFact;
    use chrono::NaiveDate;

    fn fact(concept: &str, unit: &str, fy: i32, value: f64, form: &str) -> XbrlFact {
        XbrlFact {
            concept: format!("us-gaap:{concept}"),
            value,
            unit: unit.to_string(),
            period_end: NaiveDate::from_ymd_opt(fy, 12, 31).unwrap(),
            period_start: None,
            form: Some(form.to_string()),
            fiscal_year: Some(fy),
            fiscal_period: Some("FY".to_string()),
        }
    }

    #[test]
    fn test_xbrl_tag_mapper() {
        let mapper = XbrlTagMapper::new();

        assert_eq!(mapper.get_tags("revenue").unwrap()[0], "Revenues");
        assert_eq!(mapper.get_tags("total_debt").unwrap().len(), 3);
        assert!(mapper.get_tags("nonexistent").is_none());
        for field in FactField::ALL {
            assert!(!mapper.tags_for(field).is_empty(), "{field:?} has no tags");
        }
    }

    #[test]
    fn test_first_reported_tag_wins_for_every_year() {
        let mut doc = XbrlDocument::new();
        doc.facts.push(fact("SalesRevenueNet", "USD", 2020, 90.0, "10-K"));
        doc.facts.push(fact("Revenues", "USD", 2021, 100.0, "10-K"));
        doc.facts.push(fact(
            "RevenueFromContractWithCustomerExcludingAssessedTax",
            "USD",
            2022,
            110.0,
            "10-K",
        ));

        let mapper = XbrlTagMapper::new();
        assert_eq!(
            mapper.resolve_concept(&doc, FactField::Revenue).as_deref(),
            Some("us-gaap:Revenues")
        );

        let rows = AnnualFactsExtractor::new().extract(&doc);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fiscal_year(), 2021);
        assert_eq!(rows[0].income.revenue, Some(100.0));
    }

    #[test]
    fn test_extract_statements() {
        let mut doc = XbrlDocument::new();
        doc.facts.push(fact("Revenues", "USD", 2022, 1000.0, "10-K"));
        doc.facts.push(fact("Revenues", "USD", 2023, 1200.0, "10-K"));
        doc.facts.push(fact("Revenues", "USD", 2023, 300.0, "10-Q"));
        doc.facts.push(fact("EarningsPerShareDiluted", "USD/shares", 2024, 2.5, "20-F"));
        doc.facts.push(fact("StockholdersEquity", "USD", 2023, 500.0, "10-K"));
        doc.facts.push(fact("PaymentsToAcquirePropertyPlantAndEquipment", "USD", 2022, 80.0, "10-K"));
        doc.facts.push(fact("PaymentsToAcquirePropertyPlantAndEquipment", "USD", 2022, 85.0, "10-K"));

        let rows = AnnualFactsExtractor::new().extract(&doc);
        let years: Vec<i32> = rows.iter().map(AnnualFacts::fiscal_year).collect();
        assert_eq!(years, vec![2022, 2023, 2024]);

        assert_eq!(rows[1].income.revenue, Some(1200.0));
        assert_eq!(rows[2].income.revenue, None);
        assert_eq!(rows[2].income.eps_diluted, Some(2.5));
        assert_eq!(rows[1].balance_sheet.shareholder_equity, Some(500.0));
        assert_eq!(rows[0].cash_flow.capex, Some(85.0));
        assert_eq!(rows[0].cash_flow.cfo, None);
    }

    #[test]
    fn test_wrong_unit_yields_none() {
        let mut doc = XbrlDocument::new();
        doc.facts.push(fact("Revenues", "USD", 2023, 1000.0, "10-K"));
        doc.facts.push(fact("EarningsPerShareDiluted", "USD", 2023, 4.0, "10-K"));

        let rows = AnnualFactsExtractor::new().extract(&doc);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].income.eps_diluted, None);
    }
}
