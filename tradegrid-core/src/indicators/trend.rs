//! Trend strength and direction from directional movement.
//!
//! Steps:
//! 1. True range and +DM/-DM per bar (undefined on the first bar)
//! 2. Smooth +DM, -DM, and TR with a trailing sum over `window` bars
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR), -DI symmetric
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 5. ADX = trailing mean of DX over `window` bars
//! 6. Direction: bullish when +DI > -DI + threshold, bearish symmetric,
//!    else neutral; unknown (None) while the DI inputs are undefined
//!
//! First valid ADX lands at index `2 * window - 1`. A flat market drives
//! smoothed TR (or the DI sum) to zero; both cases yield NaN, never a
//! division fault or a silent zero.

use crate::domain::{Bar, TrendDirection};
use crate::indicators::rolling::{rolling_mean, rolling_sum};

/// Per-bar trend state derived from a bar sequence.
#[derive(Debug, Clone)]
pub struct TrendIndicators {
    /// Average directional index, NaN until `2 * window - 1` bars have passed.
    pub adx: Vec<f64>,
    /// Trend direction, `None` while unknown.
    pub direction: Vec<Option<TrendDirection>>,
}

/// True range per bar: max(high - low, |high - prev close|, |low - prev close|).
///
/// The first bar has no previous close and is NaN.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = vec![f64::NAN; n];
    for i in 1..n {
        let prev_close = bars[i - 1].close;
        let range = bars[i].high - bars[i].low;
        let high_gap = (bars[i].high - prev_close).abs();
        let low_gap = (bars[i].low - prev_close).abs();
        tr[i] = range.max(high_gap).max(low_gap);
    }
    tr
}

/// Directional movement per bar: (+DM, -DM). NaN on the first bar.
///
/// +DM is the high delta when it exceeds the low delta and is positive,
/// else 0; -DM symmetric on the low delta.
pub fn directional_movement(bars: &[Bar]) -> (Vec<f64>, Vec<f64>) {
    let n = bars.len();
    let mut plus_dm = vec![f64::NAN; n];
    let mut minus_dm = vec![f64::NAN; n];
    for i in 1..n {
        let high_delta = bars[i].high - bars[i - 1].high;
        let low_delta = bars[i - 1].low - bars[i].low;

        plus_dm[i] = if high_delta > low_delta && high_delta > 0.0 {
            high_delta
        } else {
            0.0
        };
        minus_dm[i] = if low_delta > high_delta && low_delta > 0.0 {
            low_delta
        } else {
            0.0
        };
    }
    (plus_dm, minus_dm)
}

/// Compute ADX and trend direction over a trailing window.
pub fn compute_trend(bars: &[Bar], window: usize, direction_threshold: f64) -> TrendIndicators {
    assert!(window >= 1, "trend window must be >= 1");
    let n = bars.len();

    let tr = true_range(bars);
    let (plus_dm, minus_dm) = directional_movement(bars);

    let smooth_tr = rolling_sum(&tr, window);
    let smooth_plus_dm = rolling_sum(&plus_dm, window);
    let smooth_minus_dm = rolling_sum(&minus_dm, window);

    let mut dx = vec![f64::NAN; n];
    let mut direction = vec![None; n];

    for i in 0..n {
        if smooth_tr[i].is_nan()
            || smooth_plus_dm[i].is_nan()
            || smooth_minus_dm[i].is_nan()
            || smooth_tr[i] == 0.0
        {
            continue;
        }

        let plus_di = 100.0 * smooth_plus_dm[i] / smooth_tr[i];
        let minus_di = 100.0 * smooth_minus_dm[i] / smooth_tr[i];

        direction[i] = Some(if plus_di > minus_di + direction_threshold {
            TrendDirection::Bullish
        } else if minus_di > plus_di + direction_threshold {
            TrendDirection::Bearish
        } else {
            TrendDirection::Neutral
        });

        let di_sum = plus_di + minus_di;
        if di_sum != 0.0 {
            dx[i] = 100.0 * (plus_di - minus_di).abs() / di_sum;
        }
    }

    TrendIndicators {
        adx: rolling_mean(&dx, window),
        direction,
    }
}
