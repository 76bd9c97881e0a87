//! Domain types: bars, signals, trades, portfolio snapshots.

pub mod bar;
pub mod signal;
pub mod snapshot;
pub mod trade;

pub use bar::{dates_strictly_increasing, Bar};
pub use signal::{Signal, SignalRecord, TrendDirection};
pub use snapshot::PortfolioSnapshot;
pub use trade::{Trade, TradeReason, TradeSide};
