//! tradegrid core: the backtesting engine.
//!
//! This crate contains the path-dependent heart of the system:
//! - Domain types (bars, signals, trades, portfolio snapshots)
//! - Trend indicator calculator (directional movement, ADX, direction)
//! - Signal generator (score-gated entries, trigger-gated exits)
//! - Portfolio simulator (bar-by-bar cash/share replay)
//! - Data acquisition (CSV, Yahoo Finance, synthetic fallback)
//!
//! The simulation is strictly sequential: each bar's decision depends on
//! state carried from earlier bars, so parallelism lives one layer up, in
//! the sweep orchestration of `tradegrid-runner`.

pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod strategy;
