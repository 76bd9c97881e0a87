//! Trade: append-only ledger entry for every position transition.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Why a transition happened.
///
/// Display strings match the legacy ledger format so exported reports stay
/// comparable across tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeReason {
    BuyMaCrossover,
    StopLoss,
    TakeProfit,
    Bearish,
    SellMaCrossover,
}

impl TradeReason {
    pub fn as_str(self) -> &'static str {
        match self {
            TradeReason::BuyMaCrossover => "BUY MA CROSSOVER",
            TradeReason::StopLoss => "STOP LOSS",
            TradeReason::TakeProfit => "TAKE PROFIT",
            TradeReason::Bearish => "BEARISH",
            TradeReason::SellMaCrossover => "SELL MA CROSSOVER",
        }
    }
}

impl fmt::Display for TradeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single ledger entry. Created once per enter/exit transition and never
/// mutated afterward; the full ledger is the audit trail of a simulation.
///
/// `profit_loss` and `profit_loss_pct` are populated on sells only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub side: TradeSide,
    pub date: NaiveDate,
    pub price: f64,
    pub shares: u64,
    pub value: f64,
    pub profit_loss: Option<f64>,
    pub profit_loss_pct: Option<f64>,
    pub reason: TradeReason,
}

impl Trade {
    /// A completed trade with positive realized profit.
    pub fn is_winner(&self) -> bool {
        self.profit_loss.is_some_and(|p| p > 0.0)
    }

    pub fn is_sell(&self) -> bool {
        self.side == TradeSide::Sell
    }
}
