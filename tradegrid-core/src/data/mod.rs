//! Data acquisition and persistence: CSV files, Yahoo Finance download,
//! and synthetic bars for offline use.
//!
//! The engine only requires the bar shape; where the bars come from is a
//! collaborator concern, so everything here stays outside the simulation
//! path.

pub mod csv;
pub mod synthetic;
pub mod yahoo;

pub use csv::{read_bars_csv, write_bars_csv};
pub use synthetic::generate_synthetic_bars;
pub use yahoo::YahooProvider;

use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
