//! Growth & CAGR engine
//!
//! Compound annual growth rates for revenue and diluted EPS over trailing
//! windows that tolerate missing fiscal years.

pub mod cagr;
pub mod metrics;

pub use cagr::{cagr, windowed_cagr};
pub use metrics::{
    ExtendedGrowthMetrics, GrowthMetrics, eps_series, growth_metrics, growth_metrics_extended,
    revenue_series,
};
