//! Sticker price, ten-cap price and payback time

use crate::config::ValuationConfig;
use serde::{Deserialize, Serialize};

/// A discounted EPS projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StickerPrice {
    /// EPS at the end of the horizon
    pub future_eps: f64,
    /// P/E applied at the end of the horizon
    pub terminal_pe: f64,
    /// `future_eps * terminal_pe`
    pub future_price: f64,
    /// Future price discounted to today
    pub sticker: f64,
    /// Sticker after the margin of safety
    pub mos_price: f64,
}

/// Project EPS over the horizon and discount the terminal price back.
///
/// Growth is clamped to `[0, max_growth]`; the terminal P/E is twice the
/// growth percentage, bounded by `[min_terminal_pe, pe_cap]`.
pub fn sticker_price(
    eps0: f64,
    growth: f64,
    pe_cap: f64,
    discount: f64,
    mos_pct: f64,
    config: &ValuationConfig,
) -> StickerPrice {
    let g = growth.clamp(0.0, config.max_growth);
    let horizon = config.horizon_years as i32;
    let future_eps = eps0 * (1.0 + g).powi(horizon);
    let terminal_pe = pe_cap.min(config.min_terminal_pe.max(2.0 * g * 100.0));
    let future_price = future_eps * terminal_pe;
    let sticker = future_price / (1.0 + discount).powi(horizon);
    StickerPrice {
        future_eps,
        terminal_pe,
        future_price,
        sticker,
        mos_price: sticker * (1.0 - mos_pct),
    }
}

/// Price at which owner earnings yield `ten_cap_yield`.
pub fn ten_cap_price(owner_earnings_ps: Option<f64>, config: &ValuationConfig) -> Option<f64> {
    let oe = owner_earnings_ps.filter(|oe| *oe > 0.0)?;
    Some(oe / config.ten_cap_yield)
}

/// Years of growing owner earnings needed to recover a purchase price.
///
/// `None` when the price or earnings are not positive, or the price is not
/// recovered within `max_years`.
pub fn payback_time(
    purchase_price: f64,
    owner_earnings_ps: Option<f64>,
    growth: f64,
    max_years: u32,
) -> Option<u32> {
    let mut contribution = owner_earnings_ps.filter(|oe| *oe > 0.0)?;
    if purchase_price <= 0.0 {
        return None;
    }
    let growth = growth.max(0.0);
    let mut cumulative = 0.0;
    for year in 1..=max_years {
        cumulative += contribution;
        if cumulative >= purchase_price {
            return Some(year);
        }
        contribution *= 1.0 + growth;
    }
    None
}
