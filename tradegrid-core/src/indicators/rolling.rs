//! Rolling-window primitives with NaN warmup prefixes.
//!
//! Every output has the same length as its input. Positions before the
//! window fills are NaN, and any NaN inside the window poisons that output
//! value, so insufficient history propagates as "unknown" instead of being
//! silently treated as zero.

/// Trailing sum over `window` values.
pub fn rolling_sum(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window >= 1, "window must be >= 1");
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if n < window {
        return out;
    }
    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[i] = slice.iter().sum();
    }
    out
}

/// Trailing mean over `window` values.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = rolling_sum(values, window);
    for v in &mut out {
        *v /= window as f64;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn rolling_mean_basic() {
        let values = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0];
        let result = rolling_mean(&values, 5);

        assert_eq!(result.len(), 7);
        for (i, v) in result.iter().take(4).enumerate() {
            assert!(v.is_nan(), "expected NaN at index {i}");
        }
        assert_approx(result[4], 12.0, DEFAULT_EPSILON);
        assert_approx(result[5], 13.0, DEFAULT_EPSILON);
        assert_approx(result[6], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rolling_mean_window_1_is_identity() {
        let values = [100.0, 200.0, 300.0];
        let result = rolling_mean(&values, 1);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rolling_sum_nan_poisons_window() {
        let values = [10.0, 11.0, f64::NAN, 13.0, 14.0, 15.0];
        let result = rolling_sum(&values, 3);
        // Windows containing index 2 are NaN.
        assert!(result[2].is_nan());
        assert!(result[3].is_nan());
        assert!(result[4].is_nan());
        assert_approx(result[5], 42.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rolling_sum_too_few_values() {
        let values = [10.0, 11.0];
        let result = rolling_sum(&values, 5);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
