//! PortfolioSnapshot: one row of the simulated portfolio time series.

use super::signal::Signal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Portfolio state after processing one bar.
///
/// The accounting identity `portfolio_value == cash + holdings` holds on
/// every row, and `holdings == position as f64 * price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub date: NaiveDate,
    pub price: f64,
    pub signal: Signal,
    pub cash: f64,
    pub position: u64,
    pub holdings: f64,
    pub portfolio_value: f64,
}
