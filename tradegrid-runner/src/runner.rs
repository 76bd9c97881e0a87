//! Backtest runner: wires parameters, bars, signals, simulation, and
//! metrics into a single result.
//!
//! Two entry points:
//! - `run_backtest()`: takes pre-loaded bars, does no I/O. Used by the
//!   sweep layer, where each parallel task owns its own run.
//! - `run_single_backtest()`: loads bars per the config, then runs. Used
//!   by the CLI.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tradegrid_core::domain::{Bar, PortfolioSnapshot, Trade};
use tradegrid_core::engine::simulate;
use tradegrid_core::strategy::{generate_signals, ParamError, StrategyParams};

use crate::config::BacktestConfig;
use crate::data_loader::{load_bars, LoadError, LoadOptions};
use crate::metrics::PerformanceMetrics;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid parameters: {0}")]
    Param(#[from] ParamError),

    #[error("data error: {0}")]
    Data(#[from] LoadError),
}

/// Complete result of a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Content-addressable id of the parameter set.
    pub run_id: String,
    pub params: StrategyParams,
    pub initial_cash: f64,
    pub bar_count: usize,
    pub metrics: PerformanceMetrics,
    pub snapshots: Vec<PortfolioSnapshot>,
    pub trades: Vec<Trade>,
}

/// Run a backtest over pre-loaded bars. No I/O.
pub fn run_backtest(
    bars: &[Bar],
    params: &StrategyParams,
    initial_cash: f64,
    risk_free_rate: f64,
) -> Result<BacktestResult, RunError> {
    params.validate()?;

    let signals = generate_signals(bars, params);
    let result = simulate(&signals, initial_cash);
    let metrics = PerformanceMetrics::compute(
        &result.snapshots,
        Some(result.trades.as_slice()),
        risk_free_rate,
    );

    Ok(BacktestResult {
        run_id: params.run_id(),
        params: params.clone(),
        initial_cash,
        bar_count: bars.len(),
        metrics,
        snapshots: result.snapshots,
        trades: result.trades,
    })
}

/// Load bars per the config, honor the train/test split, and run.
///
/// Returns the result together with the held-out slice (empty when no
/// split is configured) so the caller can validate on unseen data.
pub fn run_single_backtest(
    config: &BacktestConfig,
    opts: &LoadOptions,
) -> Result<(BacktestResult, Vec<Bar>), RunError> {
    let loaded = load_bars(&config.data, opts)?;

    let (train, holdout) = split_train_test(&loaded.bars, config.backtest.train_frac.unwrap_or(1.0));

    let result = run_backtest(
        train,
        &config.strategy,
        config.backtest.initial_cash,
        config.backtest.risk_free_rate,
    )?;
    Ok((result, holdout.to_vec()))
}

/// Split a bar series into a leading training slice and a trailing test
/// slice. The fraction is clamped to [0, 1].
pub fn split_train_test(bars: &[Bar], train_frac: f64) -> (&[Bar], &[Bar]) {
    let frac = train_frac.clamp(0.0, 1.0);
    let split = (bars.len() as f64 * frac) as usize;
    bars.split_at(split.min(bars.len()))
}
