//! Signal-series types emitted by the strategy layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Discrete per-bar trading decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Enter,
    Hold,
    Exit,
}

impl Signal {
    /// Wire value used by tabular exports: 1 enter, 0 hold, -1 exit.
    pub fn as_i8(self) -> i8 {
        match self {
            Signal::Enter => 1,
            Signal::Hold => 0,
            Signal::Exit => -1,
        }
    }
}

/// Direction of the prevailing trend, classified from the DI separation.
///
/// The per-bar series is `Option<TrendDirection>`: `None` means the value is
/// unknown (window not yet filled, or a degenerate flat market). Unknown is
/// distinct from `Neutral` and must fail every scoring comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Bullish,
    Bearish,
    Neutral,
}

/// One row of the generated signal series.
///
/// `short_ma`, `long_ma`, and `volume_ratio` are NaN until their rolling
/// windows fill. `exit_score` is the weighted exit score, NaN on bars where
/// no position was held. The exit flags are mutually exclusive and set only
/// on exit bars; an exit fired purely by the MA crossover carries no flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalRecord {
    pub date: NaiveDate,
    pub price: f64,
    pub short_ma: f64,
    pub long_ma: f64,
    pub volume_ratio: f64,
    pub volume_score: f64,
    pub signal: Signal,
    pub stop_loss: bool,
    pub take_profit: bool,
    pub bearish: bool,
    pub exit_score: f64,
}

impl SignalRecord {
    /// At most one exit-reason flag may be set.
    pub fn flags_exclusive(&self) -> bool {
        u8::from(self.stop_loss) + u8::from(self.take_profit) + u8::from(self.bearish) <= 1
    }
}
