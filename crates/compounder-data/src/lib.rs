#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/compounder/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod edgar;
pub mod error;
pub mod facts;
pub mod store;

pub use error::{DataError, Result};
pub use facts::{
    AlertKind, AlertRule, AnnualFacts, BalanceSheetFact, CashFlowFact, Company, DerivedYearRecord,
    FiscalYearFact, PriceSnapshot, ValuationSnapshot, pad_cik,
};
pub use store::{FactStore, SqliteStore, StoreStats};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
