//! SEC EDGAR companyfacts parsing.
//!
//! Turns a downloaded companyfacts JSON document into per-fiscal-year
//! [`AnnualFacts`](crate::facts::AnnualFacts):
//! - [`XbrlDocument`] flattens the document into individual facts
//! - [`AnnualFactsExtractor`] picks annual (10-K / 20-F) values per field
//!
//! # Example
//!
//! ```no_run
//! use compounder_data::edgar::{AnnualFactsExtractor, XbrlDocument};
//!
//! let doc = XbrlDocument::from_file("MSFT.json")?;
//! let years = AnnualFactsExtractor::new().extract(&doc);
//! println!("{} fiscal years for {:?}", years.len(), doc.entity_name);
//! # Ok::<(), compounder_data::DataError>(())
//! ```

pub mod fundamentals;
pub mod xbrl;

pub use fundamentals::{AnnualFactsExtractor, FactField, XbrlTagMapper};
pub use xbrl::{ANNUAL_FORMS, XbrlDocument, XbrlFact};
