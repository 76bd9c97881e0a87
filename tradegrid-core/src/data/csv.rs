//! CSV bar persistence: the data directory format.
//!
//! One file per symbol with a `Date,Open,High,Low,Close,Volume` header,
//! the same shape the downloader writes. Reads validate that dates are
//! strictly increasing so downstream rolling windows can trust ordering.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DataError;
use crate::domain::Bar;

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume")]
    volume: f64,
}

/// Read a bar series from a CSV file.
pub fn read_bars_csv(path: &Path) -> Result<Vec<Bar>, DataError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut bars = Vec::new();

    for row in reader.deserialize() {
        let row: CsvRow = row?;
        bars.push(Bar {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }

    if let Some(w) = bars.windows(2).find(|w| w[0].date >= w[1].date) {
        return Err(DataError::Validation(format!(
            "bar dates must be strictly increasing: {} followed by {}",
            w[0].date, w[1].date
        )));
    }

    Ok(bars)
}

/// Write a bar series to a CSV file, creating parent directories as needed.
pub fn write_bars_csv(path: &Path, bars: &[Bar]) -> Result<(), DataError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for bar in bars {
        writer.serialize(CsvRow {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        })?;
    }
    writer.flush()?;
    Ok(())
}
