//! Bar loading for the runner.
//!
//! Resolution policy for a symbol:
//! 1. If a CSV file is cached in the data directory -> use it
//! 2. If not cached and network is allowed -> download and cache
//! 3. If `synthetic` is set -> generate synthetic bars (tagged)
//! 4. Otherwise -> fail with a clear error
//!
//! An explicit CSV path in the config bypasses the policy entirely.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;
use tradegrid_core::data::{
    generate_synthetic_bars, read_bars_csv, write_bars_csv, DataError, YahooProvider,
};
use tradegrid_core::domain::Bar;

use crate::config::DataConfig;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("config names neither a csv file nor a symbol")]
    NoSource,

    #[error("no cached data for '{symbol}' and network access is disabled \
             (use --synthetic for synthetic data)")]
    NoCachedDataOffline { symbol: String },

    #[error("empty bar series from {0}")]
    EmptyData(String),

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Options controlling how bars are loaded.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// If true, never make network requests.
    pub offline: bool,
    /// If true, generate synthetic bars when real data is unavailable.
    pub synthetic: bool,
    /// Force re-download even if cached.
    pub force: bool,
}

/// Where loaded bars came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    CsvFile,
    Cache,
    Download,
    Synthetic,
}

/// Result of loading bars, with provenance for reporting.
#[derive(Debug)]
pub struct LoadedData {
    pub bars: Vec<Bar>,
    pub source: DataSource,
}

/// Cache path for a symbol, matching the downloader's layout.
pub fn cache_path(data_dir: &std::path::Path, symbol: &str) -> PathBuf {
    data_dir.join(format!("{}.csv", symbol.to_lowercase()))
}

/// Default download range: ten years back from `today`.
pub fn default_date_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - chrono::Duration::days(3_652), today)
}

/// Load bars per the data config and fallback policy.
pub fn load_bars(data: &DataConfig, opts: &LoadOptions) -> Result<LoadedData, LoadError> {
    if let Some(path) = &data.csv {
        let bars = read_bars_csv(path)?;
        if bars.is_empty() {
            return Err(LoadError::EmptyData(path.display().to_string()));
        }
        return Ok(LoadedData {
            bars,
            source: DataSource::CsvFile,
        });
    }

    let symbol = data.symbol.as_deref().ok_or(LoadError::NoSource)?;
    let path = cache_path(&data.data_dir, symbol);

    if !opts.force && path.exists() {
        let bars = read_bars_csv(&path)?;
        if !bars.is_empty() {
            return Ok(LoadedData {
                bars,
                source: DataSource::Cache,
            });
        }
    }

    let today = chrono::Local::now().date_naive();
    let (default_start, default_end) = default_date_range(today);
    let start = data.start.unwrap_or(default_start);
    let end = data.end.unwrap_or(default_end);

    if !opts.offline {
        let provider = YahooProvider::new();
        match provider.fetch(symbol, start, end) {
            Ok(bars) => {
                write_bars_csv(&path, &bars)?;
                return Ok(LoadedData {
                    bars,
                    source: DataSource::Download,
                });
            }
            Err(e) if opts.synthetic => {
                eprintln!("WARNING: download failed ({e}); falling back to synthetic data");
            }
            Err(e) => return Err(e.into()),
        }
    }

    if opts.synthetic {
        eprintln!("WARNING: generating synthetic data for {symbol}; results are not market data");
        let bars = generate_synthetic_bars(symbol, start, end);
        return Ok(LoadedData {
            bars,
            source: DataSource::Synthetic,
        });
    }

    Err(LoadError::NoCachedDataOffline {
        symbol: symbol.to_string(),
    })
}
