//! Bar: the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar for a single symbol.
///
/// Bars arrive as an ordered sequence with strictly increasing dates.
/// Calendar gaps (non-trading days) are simply absent, never null-filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Basic OHLCV sanity check: high >= low, prices bracketed, no negatives.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open >= 0.0
            && self.close >= 0.0
            && self.volume >= 0.0
    }
}

/// Verify that bar dates are strictly increasing (no duplicates, no reordering).
pub fn dates_strictly_increasing(bars: &[Bar]) -> bool {
    bars.windows(2).all(|w| w[0].date < w[1].date)
}
