//! Strategy parameters with serde defaults and upfront validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid parameter combinations, rejected before any backtest runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("short_window ({short}) must be strictly less than long_window ({long})")]
    WindowOrder { short: usize, long: usize },

    #[error("{name} must be >= 1")]
    ZeroWindow { name: &'static str },
}

/// All tunable knobs of the strategy.
///
/// Defaults match the documented baseline configuration. Each field is
/// serde-defaulted individually so a TOML config may override any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// Period for the short-term moving average.
    pub short_window: usize,
    /// Period for the long-term moving average.
    pub long_window: usize,
    /// ADX level confirming trend strength.
    pub adx_threshold: f64,
    /// DI separation required to call a trend bullish or bearish.
    pub trend_direction_threshold: f64,
    /// Window for the directional-movement smoothing and the ADX mean.
    pub trend_window: usize,
    /// Fractional loss from entry that forces an exit (0.05 = 5%).
    pub stop_loss_pct: f64,
    /// Fractional gain from entry that takes profit (0.1 = 10%).
    pub take_profit_pct: f64,
    /// Minimum entry score required to open a position.
    pub enter_trade_threshold: f64,
    /// Threshold for the weighted exit score. Tracked for reporting; exits
    /// fire on the hard trigger gate (see `strategy::generate_signals`).
    pub exit_trade_threshold: f64,
    /// Window for the volume moving average.
    pub volume_ma_period: usize,
    /// Volume ratio counting as strong confirmation.
    pub volume_threshold: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            short_window: 10,
            long_window: 30,
            adx_threshold: 20.0,
            trend_direction_threshold: 5.0,
            trend_window: 14,
            stop_loss_pct: 0.05,
            take_profit_pct: 0.1,
            enter_trade_threshold: 4.0,
            exit_trade_threshold: 4.0,
            volume_ma_period: 20,
            volume_threshold: 1.5,
        }
    }
}

impl StrategyParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        for (name, value) in [
            ("short_window", self.short_window),
            ("long_window", self.long_window),
            ("trend_window", self.trend_window),
            ("volume_ma_period", self.volume_ma_period),
        ] {
            if value == 0 {
                return Err(ParamError::ZeroWindow { name });
            }
        }
        if self.short_window >= self.long_window {
            return Err(ParamError::WindowOrder {
                short: self.short_window,
                long: self.long_window,
            });
        }
        Ok(())
    }

    /// Deterministic content-addressable identifier for this parameter set.
    ///
    /// Two runs with identical parameters share an id, which lets sweep
    /// results be keyed and deduplicated.
    pub fn run_id(&self) -> String {
        let json = serde_json::to_string(self).expect("StrategyParams serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
