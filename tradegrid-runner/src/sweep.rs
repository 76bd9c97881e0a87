//! Parameter grid search over the strategy knobs.
//!
//! Each grid point runs as a fully isolated task: its own parameter set,
//! its own engine state, no shared mutable state. Failed combinations are
//! filtered out instead of aborting the sweep, and invalid ones (short
//! window at or above the long window) are skipped upfront.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tradegrid_core::domain::Bar;
use tradegrid_core::strategy::StrategyParams;

use crate::metrics::PerformanceMetrics;
use crate::runner::run_backtest;

/// Parameter grid: one list of candidate values per strategy knob.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamGrid {
    pub short_windows: Vec<usize>,
    pub long_windows: Vec<usize>,
    pub adx_thresholds: Vec<f64>,
    pub trend_direction_thresholds: Vec<f64>,
    pub stop_loss_pcts: Vec<f64>,
    pub take_profit_pcts: Vec<f64>,
    pub enter_trade_thresholds: Vec<f64>,
    pub exit_trade_thresholds: Vec<f64>,
    pub volume_ma_periods: Vec<usize>,
    pub volume_thresholds: Vec<f64>,
}

impl Default for ParamGrid {
    /// The standard search grid.
    fn default() -> Self {
        Self {
            short_windows: vec![5, 10, 15],
            long_windows: vec![20, 50, 80],
            adx_thresholds: vec![10.0, 15.0, 20.0, 25.0],
            trend_direction_thresholds: vec![2.0, 5.0],
            stop_loss_pcts: vec![0.01, 0.02],
            take_profit_pcts: vec![0.02, 0.03, 0.05],
            enter_trade_thresholds: vec![3.0, 4.0, 5.0],
            exit_trade_thresholds: vec![5.0, 6.0, 7.0, 8.0, 9.0],
            volume_ma_periods: vec![5, 10, 20],
            volume_thresholds: vec![1.0, 1.5, 2.0],
        }
    }
}

impl ParamGrid {
    /// Total number of combinations before validity filtering.
    pub fn size(&self) -> usize {
        self.short_windows.len()
            * self.long_windows.len()
            * self.adx_thresholds.len()
            * self.trend_direction_thresholds.len()
            * self.stop_loss_pcts.len()
            * self.take_profit_pcts.len()
            * self.enter_trade_thresholds.len()
            * self.exit_trade_thresholds.len()
            * self.volume_ma_periods.len()
            * self.volume_thresholds.len()
    }

    /// Expand the cartesian product, skipping invalid window orderings.
    pub fn expand(&self) -> Vec<StrategyParams> {
        let mut params = Vec::new();
        for &short_window in &self.short_windows {
            for &long_window in &self.long_windows {
                if short_window >= long_window {
                    continue;
                }
                for &adx_threshold in &self.adx_thresholds {
                    for &trend_direction_threshold in &self.trend_direction_thresholds {
                        for &stop_loss_pct in &self.stop_loss_pcts {
                            for &take_profit_pct in &self.take_profit_pcts {
                                for &enter_trade_threshold in &self.enter_trade_thresholds {
                                    for &exit_trade_threshold in &self.exit_trade_thresholds {
                                        for &volume_ma_period in &self.volume_ma_periods {
                                            for &volume_threshold in &self.volume_thresholds {
                                                params.push(StrategyParams {
                                                    short_window,
                                                    long_window,
                                                    adx_threshold,
                                                    trend_direction_threshold,
                                                    stop_loss_pct,
                                                    take_profit_pct,
                                                    enter_trade_threshold,
                                                    exit_trade_threshold,
                                                    volume_ma_period,
                                                    volume_threshold,
                                                    ..Default::default()
                                                });
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        params
    }
}

/// One grid point's outcome: parameters plus headline metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRecord {
    pub run_id: String,
    pub params: StrategyParams,
    pub total_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub total_trades: usize,
    pub win_rate: f64,
    pub expectancy: f64,
    pub composite_score: f64,
}

impl SweepRecord {
    fn from_metrics(run_id: String, params: StrategyParams, metrics: &PerformanceMetrics) -> Self {
        let (total_trades, win_rate, expectancy) = match &metrics.trades {
            Some(t) => (t.total_trades, t.win_rate, t.expectancy),
            None => (0, 0.0, 0.0),
        };
        let composite_score = composite_score(
            metrics.sharpe_ratio,
            metrics.total_return,
            win_rate,
            expectancy,
            metrics.max_drawdown,
        );
        Self {
            run_id,
            params,
            total_return: metrics.total_return,
            sharpe_ratio: metrics.sharpe_ratio,
            max_drawdown: metrics.max_drawdown,
            total_trades,
            win_rate,
            expectancy,
            composite_score,
        }
    }
}

/// Weighted ranking score. Non-finite components (undefined Sharpe on a
/// flat run) count as zero; drawdown is negative and acts as a penalty.
pub fn composite_score(
    sharpe_ratio: f64,
    total_return: f64,
    win_rate: f64,
    expectancy: f64,
    max_drawdown: f64,
) -> f64 {
    let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
    finite(sharpe_ratio) * 0.25
        + finite(total_return) * 0.25
        + finite(win_rate) * 0.1
        + finite(expectancy) * 0.3
        + finite(max_drawdown) * 0.1
}

/// Grid search executor.
pub struct Sweep {
    initial_cash: f64,
    risk_free_rate: f64,
    parallel: bool,
}

impl Sweep {
    pub fn new(initial_cash: f64, risk_free_rate: f64) -> Self {
        Self {
            initial_cash,
            risk_free_rate,
            parallel: true,
        }
    }

    /// Enable or disable parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run every grid point against the same bars.
    ///
    /// Each task owns a private engine; results from failed tasks are
    /// dropped rather than failing the sweep.
    pub fn run(&self, grid: &ParamGrid, bars: &[Bar]) -> SweepResults {
        self.run_with_progress(grid, bars, |_, _, _| {})
    }

    /// Run a sweep, invoking the callback after each completed grid point
    /// with (index, total, record).
    pub fn run_with_progress<F>(&self, grid: &ParamGrid, bars: &[Bar], progress: F) -> SweepResults
    where
        F: Fn(usize, usize, &SweepRecord) + Send + Sync,
    {
        let candidates = grid.expand();
        let total = candidates.len();

        let one = |(idx, params): (usize, StrategyParams)| -> Option<SweepRecord> {
            let result = run_backtest(bars, &params, self.initial_cash, self.risk_free_rate).ok()?;
            let record = SweepRecord::from_metrics(result.run_id, params, &result.metrics);
            progress(idx, total, &record);
            Some(record)
        };

        let records: Vec<SweepRecord> = if self.parallel {
            candidates
                .into_par_iter()
                .enumerate()
                .filter_map(one)
                .collect()
        } else {
            candidates.into_iter().enumerate().filter_map(one).collect()
        };

        SweepResults::new(records)
    }
}

/// Results of a sweep, keyed by run id.
#[derive(Debug, Clone)]
pub struct SweepResults {
    records: Vec<SweepRecord>,
    by_run_id: HashMap<String, usize>,
}

impl SweepResults {
    fn new(records: Vec<SweepRecord>) -> Self {
        let by_run_id = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.run_id.clone(), i))
            .collect();
        Self { records, by_run_id }
    }

    pub fn all(&self) -> &[SweepRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, run_id: &str) -> Option<&SweepRecord> {
        self.by_run_id.get(run_id).map(|&i| &self.records[i])
    }

    /// Records sorted by composite score, best first.
    pub fn ranked(&self) -> Vec<&SweepRecord> {
        let mut sorted: Vec<&SweepRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));
        sorted
    }

    /// The best-scoring record, if any run completed.
    pub fn best(&self) -> Option<&SweepRecord> {
        self.records
            .iter()
            .max_by(|a, b| a.composite_score.total_cmp(&b.composite_score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_size_matches_product() {
        let grid = ParamGrid::default();
        assert_eq!(grid.size(), 3 * 3 * 4 * 2 * 2 * 3 * 3 * 5 * 3 * 3);
    }

    #[test]
    fn expand_skips_short_at_or_above_long() {
        let grid = ParamGrid {
            short_windows: vec![10, 20, 30],
            long_windows: vec![20],
            adx_thresholds: vec![20.0],
            trend_direction_thresholds: vec![5.0],
            stop_loss_pcts: vec![0.05],
            take_profit_pcts: vec![0.1],
            enter_trade_thresholds: vec![4.0],
            exit_trade_thresholds: vec![4.0],
            volume_ma_periods: vec![20],
            volume_thresholds: vec![1.5],
        };
        let expanded = grid.expand();
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].short_window, 10);
        assert!(expanded.iter().all(|p| p.validate().is_ok()));
    }

    #[test]
    fn composite_score_treats_non_finite_as_zero() {
        let with_nan = composite_score(f64::NAN, 0.2, 0.5, 10.0, -0.1);
        let with_zero = composite_score(0.0, 0.2, 0.5, 10.0, -0.1);
        assert_eq!(with_nan, with_zero);
        assert!((with_zero - (0.05 + 0.05 + 3.0 - 0.01)).abs() < 1e-12);
    }
}
