//! tradegrid runner: backtest orchestration on top of `tradegrid-core`.
//!
//! This crate provides:
//! - Performance metrics (pure functions over snapshots and ledgers)
//! - A single-backtest runner with typed errors
//! - Grid search with parallel dispatch and composite-score ranking
//! - Bar loading with cache/download/synthetic fallback
//! - TOML configuration and CSV artifact writers

pub mod config;
pub mod data_loader;
pub mod export;
pub mod metrics;
pub mod runner;
pub mod sweep;

pub use config::{BacktestConfig, ConfigError, DataConfig};
pub use data_loader::{load_bars, DataSource, LoadError, LoadOptions, LoadedData};
pub use export::{format_metrics, write_equity_csv, write_sweep_csv, write_trades_csv};
pub use metrics::{PerformanceMetrics, TradeMetrics};
pub use runner::{run_backtest, run_single_backtest, split_train_test, BacktestResult, RunError};
pub use sweep::{composite_score, ParamGrid, Sweep, SweepRecord, SweepResults};
