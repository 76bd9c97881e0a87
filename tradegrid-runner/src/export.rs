//! CSV artifacts and metric formatting for external consumers.
//!
//! Writers take read-only slices of the engine's output structures; the
//! plotting/reporting side never reaches back into engine state.

use std::path::Path;

use anyhow::{Context, Result};
use tradegrid_core::domain::{PortfolioSnapshot, Trade, TradeSide};

use crate::metrics::PerformanceMetrics;
use crate::sweep::SweepRecord;

/// Write ranked sweep records (parameters + headline metrics) to CSV.
pub fn write_sweep_csv(path: &Path, records: &[&SweepRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create sweep CSV {}", path.display()))?;

    writer.write_record([
        "rank",
        "run_id",
        "short_window",
        "long_window",
        "adx_threshold",
        "trend_direction_threshold",
        "stop_loss_pct",
        "take_profit_pct",
        "enter_trade_threshold",
        "exit_trade_threshold",
        "volume_ma_period",
        "volume_threshold",
        "total_return",
        "sharpe_ratio",
        "max_drawdown",
        "total_trades",
        "win_rate",
        "expectancy",
        "composite_score",
    ])?;

    for (rank, record) in records.iter().enumerate() {
        let p = &record.params;
        writer.write_record([
            (rank + 1).to_string(),
            record.run_id.clone(),
            p.short_window.to_string(),
            p.long_window.to_string(),
            p.adx_threshold.to_string(),
            p.trend_direction_threshold.to_string(),
            p.stop_loss_pct.to_string(),
            p.take_profit_pct.to_string(),
            p.enter_trade_threshold.to_string(),
            p.exit_trade_threshold.to_string(),
            p.volume_ma_period.to_string(),
            p.volume_threshold.to_string(),
            format!("{:.6}", record.total_return),
            format!("{:.6}", record.sharpe_ratio),
            format!("{:.6}", record.max_drawdown),
            record.total_trades.to_string(),
            format!("{:.6}", record.win_rate),
            format!("{:.6}", record.expectancy),
            format!("{:.6}", record.composite_score),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the trade ledger to CSV.
pub fn write_trades_csv(path: &Path, trades: &[Trade]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create trades CSV {}", path.display()))?;

    writer.write_record([
        "type", "date", "price", "shares", "value", "profit_loss", "profit_loss_pct", "reason",
    ])?;

    for trade in trades {
        let side = match trade.side {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        };
        writer.write_record([
            side.to_string(),
            trade.date.to_string(),
            format!("{:.4}", trade.price),
            trade.shares.to_string(),
            format!("{:.4}", trade.value),
            trade.profit_loss.map(|v| format!("{v:.4}")).unwrap_or_default(),
            trade
                .profit_loss_pct
                .map(|v| format!("{v:.4}"))
                .unwrap_or_default(),
            trade.reason.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the portfolio snapshot series to CSV.
pub fn write_equity_csv(path: &Path, snapshots: &[PortfolioSnapshot]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create equity CSV {}", path.display()))?;

    writer.write_record([
        "date",
        "price",
        "signal",
        "cash",
        "position",
        "holdings",
        "portfolio_value",
    ])?;

    for snap in snapshots {
        writer.write_record([
            snap.date.to_string(),
            format!("{:.4}", snap.price),
            snap.signal.as_i8().to_string(),
            format!("{:.4}", snap.cash),
            snap.position.to_string(),
            format!("{:.4}", snap.holdings),
            format!("{:.4}", snap.portfolio_value),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Render metrics for terminal output, one `Title Case: value` line per
/// metric, with the exit-reason breakdown indented underneath.
pub fn format_metrics(metrics: &PerformanceMetrics) -> String {
    let mut out = String::new();
    for (name, value) in metrics.to_map() {
        out.push_str(&format!("{}: {:.4}\n", title_case(name), value));
    }
    if let Some(trades) = &metrics.trades {
        if !trades.by_reason.is_empty() {
            out.push_str("By Reason:\n");
            for (reason, count) in &trades.by_reason {
                out.push_str(&format!("  - {reason}: {count}\n"));
            }
        }
    }
    out
}

fn title_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
