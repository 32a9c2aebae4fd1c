//! Small numeric helpers over sparse yearly series.

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation; `None` for an empty slice.
pub fn pstdev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// `pstdev / |mean|`; `None` when empty or the mean is zero.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    if m == 0.0 {
        return None;
    }
    Some(pstdev(values)? / m.abs())
}

/// `clamp(1 - pstdev / |mean|, 0, 1)`, requiring at least `min_len` values.
pub fn stability(values: &[f64], min_len: usize) -> Option<f64> {
    if values.len() < min_len {
        return None;
    }
    let cv = coefficient_of_variation(values)?;
    Some((1.0 - cv).clamp(0.0, 1.0))
}

/// Last present value of a series.
pub fn latest_some<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
    I::IntoIter: DoubleEndedIterator,
{
    values.into_iter().rev().flatten().next()
}

/// The most recent `n` present values, oldest first.
pub fn recent_present<I>(values: I, n: usize) -> Vec<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let present: Vec<f64> = values.into_iter().flatten().collect();
    let skip = present.len().saturating_sub(n);
    present[skip..].to_vec()
}

/// Divide, returning `None` for a zero denominator or a non-finite quotient.
pub fn safe_div(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let q = numerator / denominator;
    q.is_finite().then_some(q)
}
