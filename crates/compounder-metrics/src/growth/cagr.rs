//! Compound annual growth rate primitives

use crate::series::YearValue;

/// `(last / first)^(1 / years) - 1`.
///
/// Undefined (`None`) for missing endpoints, non-positive endpoints or a
/// non-positive span.
pub fn cagr(first: Option<f64>, last: Option<f64>, years: f64) -> Option<f64> {
    let (first, last) = (first?, last?);
    if years <= 0.0 || first <= 0.0 || last <= 0.0 {
        return None;
    }
    let rate = (last / first).powf(1.0 / years) - 1.0;
    rate.is_finite().then_some(rate)
}

/// CAGR over the trailing `window` fiscal years of an ascending series.
///
/// The window ends at the final fiscal year of the series and starts at
/// `last_year - (window - 1)`, floored at the first year. Within it, the start
/// is the earliest year with a value and the end is the latest year with a
/// value, so gaps shorten the measured span instead of being skipped over.
pub fn windowed_cagr(series: &[YearValue], window: usize) -> Option<f64> {
    let first = series.first()?;
    let last = series.last()?;
    if window == 0 {
        return None;
    }

    let floor = last.fiscal_year - (window as i32 - 1);
    let first_year = first.fiscal_year.max(floor);

    let start = series
        .iter()
        .position(|p| p.fiscal_year >= first_year && p.value.is_some())?;
    let end = series.iter().rposition(|p| p.value.is_some())?;
    if end <= start {
        return None;
    }

    let span = series[end].fiscal_year - series[start].fiscal_year;
    if span <= 0 {
        return None;
    }
    cagr(series[start].value, series[end].value, f64::from(span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    fn series(points: &[(i32, Option<f64>)]) -> Vec<YearValue> {
        points.iter().map(|&(y, v)| YearValue::new(y, v)).collect()
    }

    #[rstest]
    #[case(1.0)]
    #[case(5.0)]
    #[case(10.0)]
    fn test_flat_growth_is_zero(#[case] years: f64) {
        assert_abs_diff_eq!(cagr(Some(100.0), Some(100.0), years).unwrap(), 0.0);
    }

    #[test]
    fn test_doubling_over_five_years() {
        assert_abs_diff_eq!(
            cagr(Some(100.0), Some(200.0), 5.0).unwrap(),
            0.1487,
            epsilon = 1e-4
        );
    }

    #[rstest]
    #[case(None, Some(100.0), 5.0)]
    #[case(Some(100.0), None, 5.0)]
    #[case(Some(0.0), Some(100.0), 5.0)]
    #[case(Some(-10.0), Some(100.0), 5.0)]
    #[case(Some(100.0), Some(-1.0), 5.0)]
    #[case(Some(100.0), Some(200.0), 0.0)]
    #[case(Some(100.0), Some(200.0), -2.0)]
    fn test_undefined_cagr(#[case] first: Option<f64>, #[case] last: Option<f64>, #[case] years: f64) {
        assert!(cagr(first, last, years).is_none());
    }

    #[test]
    fn test_dense_window_matches_endpoints() {
        let points: Vec<(i32, Option<f64>)> = (0..10)
            .map(|i| (2014 + i, Some(100.0 * 1.07_f64.powi(i))))
            .collect();
        let s = series(&points);
        let direct = cagr(s[0].value, s[9].value, 9.0).unwrap();
        assert_abs_diff_eq!(windowed_cagr(&s, 10).unwrap(), direct, epsilon = 1e-12);
        assert_abs_diff_eq!(direct, 0.07, epsilon = 1e-12);
    }

    #[test]
    fn test_window_skips_missing_start() {
        // 5y window over 2019..2023 with 2019 missing starts at 2020
        let s = series(&[
            (2018, Some(50.0)),
            (2019, None),
            (2020, Some(100.0)),
            (2021, Some(110.0)),
            (2022, Some(120.0)),
            (2023, Some(133.1)),
        ]);
        let expected = cagr(Some(100.0), Some(133.1), 3.0).unwrap();
        assert_abs_diff_eq!(windowed_cagr(&s, 5).unwrap(), expected, epsilon = 1e-12);
        assert_abs_diff_eq!(expected, 0.10, epsilon = 1e-9);
    }

    #[test]
    fn test_window_ends_at_latest_present_value() {
        let s = series(&[
            (2019, Some(100.0)),
            (2020, None),
            (2021, Some(121.0)),
            (2022, None),
        ]);
        // 2019 to 2021, not 2019 to 2022
        assert_abs_diff_eq!(windowed_cagr(&s, 5).unwrap(), 0.10, epsilon = 1e-9);
    }

    #[test]
    fn test_single_point_window_is_none() {
        let s = series(&[(2020, Some(100.0)), (2021, None), (2022, Some(90.0))]);
        // Only 2022 inside a 1y window
        assert!(windowed_cagr(&s, 1).is_none());
        assert!(windowed_cagr(&series(&[(2022, Some(90.0))]), 5).is_none());
        assert!(windowed_cagr(&[], 5).is_none());
    }

    #[test]
    fn test_short_history_uses_earliest_year() {
        let s = series(&[(2021, Some(100.0)), (2022, Some(110.0)), (2023, Some(121.0))]);
        assert_abs_diff_eq!(windowed_cagr(&s, 10).unwrap(), 0.10, epsilon = 1e-9);
    }
}
