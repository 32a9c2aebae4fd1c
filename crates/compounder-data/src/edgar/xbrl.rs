//! XBRL parsing for SEC EDGAR companyfacts documents.
//!
//! The SEC publishes every XBRL fact a company has filed as one JSON document
//! at `https://data.sec.gov/api/xbrl/companyfacts/CIK{cik_padded}.json`.
//! This module parses a downloaded copy of that document; fetching it is left
//! to the caller.
//!
//! # Example
//!
//! ```no_run
//! use compounder_data::edgar::XbrlDocument;
//!
//! let doc = XbrlDocument::from_file("CIK0000789019.json")?;
//! let revenue = doc.annual_values("us-gaap:Revenues", "USD");
//! for (fiscal_year, value) in revenue {
//!     println!("{fiscal_year}: {value}");
//! }
//! # Ok::<(), compounder_data::DataError>(())
//! ```

use crate::error::{DataError, Result};
use crate::facts::pad_cik;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Forms whose facts count as annual figures.
pub const ANNUAL_FORMS: [&str; 2] = ["10-K", "20-F"];

/// Represents a single XBRL fact (data point).
///
/// An XBRL fact is a financial data point with context about the reporting period,
/// unit of measure, and the specific financial concept being reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XbrlFact {
    /// The XBRL concept name (e.g., "us-gaap:NetIncomeLoss")
    pub concept: String,

    /// The numeric value of the fact
    pub value: f64,

    /// Unit of measure (e.g., "USD", "shares", "USD/shares")
    pub unit: String,

    /// End date of the reporting period
    pub period_end: NaiveDate,

    /// Start date of the reporting period (None for instant facts like balance sheet items)
    pub period_start: Option<NaiveDate>,

    /// Form type (e.g., "10-K", "10-Q")
    pub form: Option<String>,

    /// Fiscal year of the filing that reported the fact
    pub fiscal_year: Option<i32>,

    /// Fiscal period (e.g., "FY", "Q1")
    pub fiscal_period: Option<String>,
}

impl XbrlFact {
    /// Returns true if this is an instant fact (point-in-time, like balance sheet items)
    pub const fn is_instant(&self) -> bool {
        self.period_start.is_none()
    }

    /// Returns true if the fact was reported on an annual form (10-K or 20-F).
    pub fn is_annual(&self) -> bool {
        self.form
            .as_deref()
            .is_some_and(|form| ANNUAL_FORMS.contains(&form))
    }
}

/// All facts from one companyfacts document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XbrlDocument {
    /// All facts in the document, in document order within each concept/unit
    pub facts: Vec<XbrlFact>,

    /// Company name
    pub entity_name: Option<String>,

    /// CIK (Central Index Key), zero-padded to 10 digits
    pub cik: Option<String>,
}

impl XbrlDocument {
    /// Creates a new empty XBRL document
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses a companyfacts JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::parse_json(&json)
    }

    /// Parses XBRL data from SEC companyfacts JSON.
    ///
    /// The format is documented at: https://www.sec.gov/edgar/sec-api-documentation
    pub fn parse_json(json: &str) -> Result<Self> {
        let api_response: SecApiResponse = serde_json::from_str(json)
            .map_err(|e| DataError::XbrlParse(format!("Failed to parse SEC JSON: {}", e)))?;

        let cik = match &api_response.cik {
            Some(serde_json::Value::Number(n)) => Some(pad_cik(&n.to_string())),
            Some(serde_json::Value::String(s)) => Some(pad_cik(s)),
            _ => None,
        };

        let mut facts = Vec::new();

        for (taxonomy, concepts) in &api_response.facts {
            for (concept_name, concept_data) in concepts {
                let full_concept = format!("{}:{}", taxonomy, concept_name);

                for (unit, unit_facts) in &concept_data.units {
                    for fact_data in unit_facts {
                        let period_end = parse_date(&fact_data.end)?;
                        let period_start = fact_data.start.as_deref().map(parse_date).transpose()?;

                        facts.push(XbrlFact {
                            concept: full_concept.clone(),
                            value: fact_data.val,
                            unit: unit.clone(),
                            period_end,
                            period_start,
                            form: fact_data.form.clone(),
                            fiscal_year: fact_data.fy,
                            fiscal_period: fact_data.fp.clone(),
                        });
                    }
                }
            }
        }

        Ok(Self {
            facts,
            entity_name: api_response.entity_name,
            cik,
        })
    }

    /// Returns true if any fact was reported for the concept, in any unit.
    pub fn has_concept(&self, concept: &str) -> bool {
        self.facts.iter().any(|f| f.concept == concept)
    }

    /// Annual values for a concept in one unit, keyed by fiscal year.
    ///
    /// Only facts from annual forms with a fiscal year are considered. When a
    /// fiscal year has several such facts, the last one in document order wins.
    pub fn annual_values(&self, concept: &str, unit: &str) -> BTreeMap<i32, f64> {
        let mut values = BTreeMap::new();
        for fact in self
            .facts
            .iter()
            .filter(|f| f.concept == concept && f.unit == unit && f.is_annual())
        {
            if let Some(fy) = fact.fiscal_year {
                values.insert(fy, fact.value);
            }
        }
        values
    }

    /// Gets all facts for a given concept, sorted by period end date (newest first)
    pub fn get_facts_by_concept(&self, concept: &str) -> Vec<&XbrlFact> {
        let mut facts: Vec<&XbrlFact> =
            self.facts.iter().filter(|f| f.concept == concept).collect();
        facts.sort_by(|a, b| b.period_end.cmp(&a.period_end));
        facts
    }

    /// Gets all available concepts in the document
    pub fn get_concepts(&self) -> Vec<String> {
        let mut concepts: Vec<String> = self.facts.iter().map(|f| f.concept.clone()).collect();
        concepts.sort();
        concepts.dedup();
        concepts
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DataError::XbrlParse(format!("Invalid date {}: {}", s, e)))
}

// SEC API JSON structure
// Based on: https://www.sec.gov/edgar/sec-api-documentation

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecApiResponse {
    #[serde(default)]
    cik: Option<serde_json::Value>,
    #[serde(default)]
    entity_name: Option<String>,
    #[serde(default)]
    facts: HashMap<String, HashMap<String, ConceptData>>,
}

#[derive(Debug, Deserialize)]
struct ConceptData {
    #[serde(default)]
    units: HashMap<String, Vec<FactData>>,
}

#[derive(Debug, Deserialize)]
struct FactData {
    end: String,
    val: f64,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    fy: Option<i32>,
    #[serde(default)]
    fp: Option<String>,
    #[serde(default)]
    form: Option<String>,
}
