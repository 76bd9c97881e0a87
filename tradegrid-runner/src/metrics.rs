//! Performance metrics: pure functions that compute strategy statistics.
//!
//! Every metric is a pure function: portfolio series and/or trade ledger
//! in, scalar out. Undefined values (too few points, zero variance) come
//! back as NaN and propagate; nothing here panics or divides by zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tradegrid_core::domain::{PortfolioSnapshot, Trade};

/// Trading days per year, used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Aggregate performance metrics for a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub volatility: f64,
    /// Trade-derived statistics; `None` when the ledger is empty.
    pub trades: Option<TradeMetrics>,
}

/// Statistics over completed (sell-side) trades.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeMetrics {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub total_profit_loss: f64,
    pub avg_profit_loss: f64,
    /// Mean profit over winning trades, 0 when there are none.
    pub avg_win: f64,
    /// Mean (signed, non-positive) loss over losing trades, 0 when none.
    pub avg_loss: f64,
    pub expectancy: f64,
    /// Completed trades counted by exit reason (display string keyed).
    pub by_reason: BTreeMap<String, usize>,
}

impl PerformanceMetrics {
    /// Compute all metrics from the snapshot series and (optionally) the
    /// trade ledger.
    pub fn compute(
        snapshots: &[PortfolioSnapshot],
        trades: Option<&[Trade]>,
        risk_free_rate: f64,
    ) -> Self {
        let equity: Vec<f64> = snapshots.iter().map(|s| s.portfolio_value).collect();
        Self {
            total_return: total_return(&equity),
            sharpe_ratio: sharpe_ratio(&equity, risk_free_rate),
            max_drawdown: max_drawdown(&equity),
            volatility: volatility(&equity),
            trades: trades
                .filter(|t| !t.is_empty())
                .map(trade_metrics),
        }
    }

    /// Flatten scalar metrics into an ordered name -> value mapping.
    ///
    /// The exit-reason breakdown is not a scalar and stays on
    /// `trades.by_reason`.
    pub fn to_map(&self) -> Vec<(&'static str, f64)> {
        let mut map = vec![
            ("total_return", self.total_return),
            ("sharpe_ratio", self.sharpe_ratio),
            ("max_drawdown", self.max_drawdown),
            ("volatility", self.volatility),
        ];
        if let Some(t) = &self.trades {
            map.push(("expectancy", t.expectancy));
            map.push(("total_trades", t.total_trades as f64));
            map.push(("winning_trades", t.winning_trades as f64));
            map.push(("losing_trades", t.losing_trades as f64));
            map.push(("win_rate", t.win_rate));
            map.push(("total_profit_loss", t.total_profit_loss));
            map.push(("avg_profit_loss", t.avg_profit_loss));
            map.push(("avg_win", t.avg_win));
            map.push(("avg_loss", t.avg_loss));
        }
        map
    }
}

// --- Individual metric functions -------------------------------------

/// Total return as a fraction: (final - initial) / initial.
pub fn total_return(equity: &[f64]) -> f64 {
    if equity.len() < 2 {
        return 0.0;
    }
    let initial = equity[0];
    let final_eq = *equity.last().unwrap();
    if initial <= 0.0 {
        return 0.0;
    }
    (final_eq - initial) / initial
}

/// Percentage change between consecutive equity points (first point dropped).
pub fn daily_returns(equity: &[f64]) -> Vec<f64> {
    equity
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// Annualized Sharpe ratio from daily returns.
///
/// Sharpe = mean(daily return - rf/252) / std(same) * sqrt(252).
/// NaN when the return series has fewer than 2 points or zero variance.
pub fn sharpe_ratio(equity: &[f64], risk_free_rate: f64) -> f64 {
    let returns = daily_returns(equity);
    if returns.len() < 2 {
        return f64::NAN;
    }
    let daily_rf = risk_free_rate / TRADING_DAYS_PER_YEAR;
    let excess: Vec<f64> = returns.iter().map(|r| r - daily_rf).collect();
    let mean = mean_f64(&excess);
    let std = std_dev(&excess);
    if std < 1e-15 {
        return f64::NAN;
    }
    (mean / std) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Maximum drawdown as a non-positive fraction (e.g. -0.15 = 15% drawdown).
pub fn max_drawdown(equity: &[f64]) -> f64 {
    if equity.len() < 2 {
        return 0.0;
    }
    let mut peak = equity[0];
    let mut max_dd = 0.0_f64;
    for &eq in equity {
        if eq > peak {
            peak = eq;
        }
        if peak > 0.0 {
            let dd = (eq - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Annualized volatility of daily returns. NaN with fewer than 2 returns.
pub fn volatility(equity: &[f64]) -> f64 {
    let returns = daily_returns(equity);
    if returns.len() < 2 {
        return f64::NAN;
    }
    std_dev(&returns) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Statistics over the sell side of a trade ledger.
pub fn trade_metrics(trades: &[Trade]) -> TradeMetrics {
    let sells: Vec<&Trade> = trades.iter().filter(|t| t.is_sell()).collect();
    let total_trades = sells.len();

    let pnls: Vec<f64> = sells.iter().filter_map(|t| t.profit_loss).collect();
    let wins: Vec<f64> = pnls.iter().copied().filter(|&p| p > 0.0).collect();
    let losses: Vec<f64> = pnls.iter().copied().filter(|&p| p <= 0.0).collect();

    let winning_trades = wins.len();
    let losing_trades = losses.len();
    let win_rate = if total_trades > 0 {
        winning_trades as f64 / total_trades as f64
    } else {
        0.0
    };
    let avg_win = if wins.is_empty() { 0.0 } else { mean_f64(&wins) };
    let avg_loss = if losses.is_empty() { 0.0 } else { mean_f64(&losses) };
    let expectancy = if win_rate > 0.0 {
        win_rate * avg_win - (1.0 - win_rate) * avg_loss.abs()
    } else {
        0.0
    };

    let mut by_reason = BTreeMap::new();
    for trade in &sells {
        *by_reason.entry(trade.reason.to_string()).or_insert(0) += 1;
    }

    TradeMetrics {
        total_trades,
        winning_trades,
        losing_trades,
        win_rate,
        total_profit_loss: pnls.iter().sum(),
        avg_profit_loss: if pnls.is_empty() { 0.0 } else { mean_f64(&pnls) },
        avg_win,
        avg_loss,
        expectancy,
        by_reason,
    }
}

// --- Helpers ----------------------------------------------------------

fn mean_f64(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1).
fn std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let mean = mean_f64(values);
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    var.sqrt()
}
