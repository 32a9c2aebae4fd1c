//! Normalization helpers shared by the composite scores

use crate::config::Band;

/// Map a value onto `[0, 1]` across a band, clamping outside it.
pub fn normalize(value: f64, band: Band) -> f64 {
    if value <= band.low {
        0.0
    } else if value >= band.high {
        1.0
    } else {
        (value - band.low) / (band.high - band.low)
    }
}

/// Average of the normalized values that are present.
pub fn range_normalize(signals: &[(Option<f64>, Band)]) -> Option<f64> {
    let normalized: Vec<f64> = signals
        .iter()
        .filter_map(|&(value, band)| value.map(|v| normalize(v, band)))
        .collect();
    crate::stats::mean(&normalized)
}

/// Weighted average over the components that are present.
///
/// Weights renormalize over the available components.
pub fn weighted_average(components: &[(Option<f64>, f64)]) -> Option<f64> {
    let (sum, weights) = components
        .iter()
        .filter_map(|&(score, weight)| score.map(|s| (s * weight, weight)))
        .fold((0.0, 0.0), |(sum, weights), (s, w)| (sum + s, weights + w));
    if weights <= 0.0 {
        return None;
    }
    Some(sum / weights)
}

/// Score how well a ratio sits inside a healthy band.
///
/// Inside the band scores 1. Below it the score ramps from 0 at zero up to
/// `ceiling` at the lower edge. Above it the score decays linearly, reaching 0
/// at twice the upper edge.
pub fn band_score(value: f64, band: Band, ceiling: f64) -> f64 {
    if value < band.low {
        if band.low <= 0.0 || value <= 0.0 {
            return 0.0;
        }
        return value / band.low * ceiling;
    }
    if value > band.high {
        if band.high <= 0.0 {
            return 0.0;
        }
        return (1.0 - (value - band.high) / band.high).max(0.0);
    }
    1.0
}
