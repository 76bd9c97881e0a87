//! TOML configuration for the run and sweep commands.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradegrid_core::strategy::{ParamError, StrategyParams};

use crate::sweep::ParamGrid;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid strategy parameters: {0}")]
    Param(#[from] ParamError),
}

/// Complete configuration for a backtest or a sweep.
///
/// Every section and field has a default, so a config file only needs to
/// state what it overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    pub backtest: BacktestSection,
    pub data: DataConfig,
    pub strategy: StrategyParams,
    pub grid: ParamGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSection {
    pub initial_cash: f64,
    pub risk_free_rate: f64,
    /// Optional leading fraction of the bar series used for the sweep;
    /// the remainder validates the winning parameters.
    pub train_frac: Option<f64>,
}

impl Default for BacktestSection {
    fn default() -> Self {
        Self {
            initial_cash: 10_000.0,
            risk_free_rate: 0.01,
            train_frac: None,
        }
    }
}

/// Where bars come from: an explicit CSV file, or a symbol resolved
/// against the data directory (with download and synthetic fallbacks).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub csv: Option<PathBuf>,
    pub symbol: Option<String>,
    pub data_dir: PathBuf,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv: None,
            symbol: None,
            data_dir: PathBuf::from("data"),
            start: None,
            end: None,
        }
    }
}

impl BacktestConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.strategy.validate()?;
        Ok(config)
    }
}
