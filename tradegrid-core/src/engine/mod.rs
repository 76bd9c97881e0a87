//! Portfolio simulator: replays a signal series bar-by-bar against
//! cash/share state.
//!
//! The loop is a fold over the signal series. Each step sees only state
//! produced by earlier bars, which keeps the simulation deterministic and
//! replayable: identical inputs always produce identical ledgers and
//! snapshot series.

use serde::{Deserialize, Serialize};

use crate::domain::{PortfolioSnapshot, Signal, SignalRecord, Trade, TradeReason, TradeSide};

/// Mutable position state threaded through the simulation fold.
///
/// Invariants after every step: `cash >= 0`, `shares` is a whole number,
/// and `entry_price` is meaningful only while `shares > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionState {
    pub cash: f64,
    pub shares: u64,
    pub entry_price: f64,
}

impl PositionState {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            cash: initial_cash,
            shares: 0,
            entry_price: 0.0,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.shares == 0
    }
}

/// Output of a simulation run: one snapshot per bar plus the trade ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub snapshots: Vec<PortfolioSnapshot>,
    pub trades: Vec<Trade>,
}

impl SimulationResult {
    pub fn final_value(&self) -> f64 {
        self.snapshots.last().map_or(0.0, |s| s.portfolio_value)
    }
}

/// Resolve a sell reason from the signal's exit flags.
///
/// Priority: stop-loss, then take-profit, then bearish trend; an exit with
/// no flag set was a plain MA crossover reversal.
fn sell_reason(record: &SignalRecord) -> TradeReason {
    if record.stop_loss {
        TradeReason::StopLoss
    } else if record.take_profit {
        TradeReason::TakeProfit
    } else if record.bearish {
        TradeReason::Bearish
    } else {
        TradeReason::SellMaCrossover
    }
}

/// Replay a signal series against `initial_cash`.
///
/// Buys spend the maximum whole-share quantity affordable at the bar price
/// (floor division), leaving a cash remainder; sells liquidate the whole
/// position. Prices must be positive; malformed bars are a caller
/// precondition, not an engine concern.
pub fn simulate(signals: &[SignalRecord], initial_cash: f64) -> SimulationResult {
    let mut state = PositionState::new(initial_cash);
    let mut snapshots = Vec::with_capacity(signals.len());
    let mut trades = Vec::new();

    for record in signals {
        let price = record.price;

        match record.signal {
            Signal::Enter => {
                let shares = (state.cash / price).floor() as u64;
                let value = shares as f64 * price;
                state.cash -= value;
                state.shares = shares;
                state.entry_price = price;

                trades.push(Trade {
                    side: TradeSide::Buy,
                    date: record.date,
                    price,
                    shares,
                    value,
                    profit_loss: None,
                    profit_loss_pct: None,
                    reason: TradeReason::BuyMaCrossover,
                });
            }
            Signal::Exit => {
                let proceeds = state.shares as f64 * price;
                let profit_loss = state.shares as f64 * (price - state.entry_price);
                // Guard against uninitialized entry state.
                let profit_loss_pct = if state.entry_price > 0.0 {
                    (price / state.entry_price - 1.0) * 100.0
                } else {
                    0.0
                };

                trades.push(Trade {
                    side: TradeSide::Sell,
                    date: record.date,
                    price,
                    shares: state.shares,
                    value: proceeds,
                    profit_loss: Some(profit_loss),
                    profit_loss_pct: Some(profit_loss_pct),
                    reason: sell_reason(record),
                });

                state.cash += proceeds;
                state.shares = 0;
                state.entry_price = 0.0;
            }
            Signal::Hold => {}
        }

        let holdings = state.shares as f64 * price;
        snapshots.push(PortfolioSnapshot {
            date: record.date,
            price,
            signal: record.signal,
            cash: state.cash,
            position: state.shares,
            holdings,
            portfolio_value: state.cash + holdings,
        });
    }

    SimulationResult { snapshots, trades }
}
