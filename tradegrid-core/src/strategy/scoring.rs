//! Pure scoring functions: indicator values and parameters in, score out.
//!
//! These hold no loop state and do no I/O. NaN inputs fail every comparison,
//! so an unknown indicator value contributes nothing to a score and never
//! satisfies a trigger.

use super::params::StrategyParams;
use crate::domain::TrendDirection;

/// Volume confirmation score in {0, 0.5, 1}.
///
/// 0 when the average volume is undefined or zero.
pub fn volume_score(current_volume: f64, avg_volume: f64, volume_threshold: f64) -> f64 {
    if !avg_volume.is_finite() || avg_volume <= 0.0 {
        return 0.0;
    }
    let ratio = current_volume / avg_volume;
    if ratio >= volume_threshold {
        1.0
    } else if ratio >= 1.0 {
        0.5
    } else {
        0.0
    }
}

/// Entry score: trend strength + trend direction + lagged crossover + volume.
pub fn enter_score(
    adx: f64,
    trend: Option<TrendDirection>,
    crossover_long: bool,
    volume_score: f64,
    params: &StrategyParams,
) -> f64 {
    let mut score = 0.0;

    if adx > params.adx_threshold {
        score += 2.0;
    } else if adx > params.adx_threshold * 0.8 {
        score += 1.0;
    }

    match trend {
        Some(TrendDirection::Bullish) => score += 2.0,
        Some(TrendDirection::Neutral) => score += 0.5,
        Some(TrendDirection::Bearish) | None => {}
    }

    if crossover_long {
        score += 2.0;
    }

    score + volume_score
}

/// The four independent exit triggers, in attribution priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitTriggers {
    pub stop_loss: bool,
    pub take_profit: bool,
    pub ma_cross: bool,
    pub bearish: bool,
}

impl ExitTriggers {
    /// The hard gate: an exit fires when any trigger is true.
    pub fn any(&self) -> bool {
        self.stop_loss || self.take_profit || self.ma_cross || self.bearish
    }

    /// Exit-reason flags (stop_loss, take_profit, bearish) under the
    /// attribution priority stop-loss, then take-profit, then bearish.
    /// An exit fired only by the MA crossover carries no flag.
    pub fn attribution(&self) -> (bool, bool, bool) {
        if self.stop_loss {
            (true, false, false)
        } else if self.take_profit {
            (false, true, false)
        } else if self.bearish {
            (false, false, true)
        } else {
            (false, false, false)
        }
    }
}

/// Evaluate the exit triggers for an open position.
///
/// `price_change` is the fractional move from the entry price. NaN moving
/// averages make the crossover comparison false.
pub fn exit_triggers(
    price_change: f64,
    short_ma: f64,
    long_ma: f64,
    trend: Option<TrendDirection>,
    params: &StrategyParams,
) -> ExitTriggers {
    ExitTriggers {
        stop_loss: price_change <= -params.stop_loss_pct,
        take_profit: price_change >= params.take_profit_pct,
        ma_cross: short_ma < long_ma,
        bearish: trend == Some(TrendDirection::Bearish),
    }
}

/// Weighted exit score: stop-loss 4, take-profit 3, MA crossover 2,
/// bearish trend 1.5.
///
/// Computed alongside the trigger gate for reporting and threshold tuning;
/// it does not fire exits.
pub fn exit_score(triggers: ExitTriggers) -> f64 {
    let mut score = 0.0;
    if triggers.stop_loss {
        score += 4.0;
    }
    if triggers.take_profit {
        score += 3.0;
    }
    if triggers.ma_cross {
        score += 2.0;
    }
    if triggers.bearish {
        score += 1.5;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> StrategyParams {
        StrategyParams::default()
    }

    #[test]
    fn volume_score_tiers() {
        // threshold 1.5: strong at 1.5x, moderate at 1.0x, else nothing
        assert_eq!(volume_score(1_500.0, 1_000.0, 1.5), 1.0);
        assert_eq!(volume_score(1_200.0, 1_000.0, 1.5), 0.5);
        assert_eq!(volume_score(900.0, 1_000.0, 1.5), 0.0);
    }

    #[test]
    fn volume_score_undefined_or_zero_average() {
        assert_eq!(volume_score(1_000.0, f64::NAN, 1.5), 0.0);
        assert_eq!(volume_score(1_000.0, 0.0, 1.5), 0.0);
    }

    #[test]
    fn enter_score_full_house() {
        // ADX above threshold (2) + bullish (2) + crossover (2) + volume (1)
        let score = enter_score(30.0, Some(TrendDirection::Bullish), true, 1.0, &params());
        assert_eq!(score, 7.0);
    }

    #[test]
    fn enter_score_partial_adx_band() {
        // 0.8 * 20 = 16 < adx <= 20 scores 1
        assert_eq!(enter_score(18.0, None, false, 0.0, &params()), 1.0);
        assert_eq!(enter_score(16.0, None, false, 0.0, &params()), 0.0);
    }

    #[test]
    fn enter_score_unknown_inputs_contribute_nothing() {
        // NaN ADX fails both band comparisons; unknown trend is not neutral.
        assert_eq!(enter_score(f64::NAN, None, false, 0.0, &params()), 0.0);
        assert_eq!(
            enter_score(f64::NAN, Some(TrendDirection::Neutral), false, 0.0, &params()),
            0.5
        );
    }

    #[test]
    fn exit_gate_fires_on_any_trigger() {
        let t = exit_triggers(0.0, 9.0, 10.0, None, &params());
        assert!(t.ma_cross && !t.stop_loss && !t.take_profit && !t.bearish);
        assert!(t.any());

        let quiet = exit_triggers(0.0, 11.0, 10.0, None, &params());
        assert!(!quiet.any());
    }

    #[test]
    fn exit_trigger_boundaries_are_inclusive() {
        let p = params();
        assert!(exit_triggers(-p.stop_loss_pct, 11.0, 10.0, None, &p).stop_loss);
        assert!(exit_triggers(p.take_profit_pct, 11.0, 10.0, None, &p).take_profit);
    }

    #[test]
    fn nan_moving_averages_do_not_trigger_crossover_exit() {
        let t = exit_triggers(0.0, f64::NAN, f64::NAN, None, &params());
        assert!(!t.ma_cross);
        assert!(!t.any());
    }

    #[test]
    fn attribution_priority_stop_loss_first() {
        // Simultaneous stop-loss and bearish trend: stop-loss wins.
        let t = exit_triggers(-0.10, 9.0, 10.0, Some(TrendDirection::Bearish), &params());
        assert!(t.stop_loss && t.bearish);
        assert_eq!(t.attribution(), (true, false, false));
    }

    #[test]
    fn attribution_take_profit_over_bearish() {
        let t = exit_triggers(0.15, 11.0, 10.0, Some(TrendDirection::Bearish), &params());
        assert!(t.take_profit && t.bearish);
        assert_eq!(t.attribution(), (false, true, false));
    }

    #[test]
    fn ma_cross_only_exit_carries_no_flag() {
        let t = exit_triggers(0.0, 9.0, 10.0, None, &params());
        assert!(t.any());
        assert_eq!(t.attribution(), (false, false, false));
    }

    #[test]
    fn weighted_exit_score_sums_components() {
        let t = ExitTriggers {
            stop_loss: true,
            take_profit: false,
            ma_cross: true,
            bearish: true,
        };
        assert_eq!(exit_score(t), 7.5);
    }
}
