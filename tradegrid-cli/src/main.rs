//! tradegrid CLI: download, run, and sweep commands.
//!
//! Commands:
//! - `download`: fetch daily bars from Yahoo Finance into the data directory
//! - `run`: execute a single backtest and print its metrics
//! - `sweep`: grid-search strategy parameters and rank the results

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use tradegrid_core::data::{write_bars_csv, YahooProvider};
use tradegrid_runner::data_loader::{cache_path, default_date_range};
use tradegrid_runner::{
    format_metrics, load_bars, run_backtest, run_single_backtest, split_train_test,
    write_equity_csv, write_sweep_csv, write_trades_csv, BacktestConfig, LoadOptions, Sweep,
};

#[derive(Parser)]
#[command(name = "tradegrid", about = "tradegrid: score-gated trend backtesting")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download daily bars from Yahoo Finance into the data directory.
    Download {
        /// Symbols to download (e.g. AAPL MSFT SPY).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 10 years ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Overwrite existing files.
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Data directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Execute a single backtest and print its metrics.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// CSV file with bars (overrides the config's data section).
        #[arg(long)]
        data: Option<PathBuf>,

        /// Symbol resolved against the data directory.
        #[arg(long)]
        symbol: Option<String>,

        /// Data directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Offline mode: no network access.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Use synthetic data as a fallback.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Directory for trades/equity CSV artifacts (skipped if absent).
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
    /// Grid-search strategy parameters and rank the results.
    Sweep {
        /// Path to a TOML config file (grid section included).
        #[arg(long)]
        config: Option<PathBuf>,

        /// CSV file with bars (overrides the config's data section).
        #[arg(long)]
        data: Option<PathBuf>,

        /// Symbol resolved against the data directory.
        #[arg(long)]
        symbol: Option<String>,

        /// Data directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Offline mode: no network access.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Use synthetic data as a fallback.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Run grid points sequentially instead of in parallel.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// How many top results to print.
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Output CSV for the full ranking.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Download {
            symbols,
            start,
            end,
            force,
            data_dir,
        } => run_download(symbols, start, end, force, data_dir),
        Commands::Run {
            config,
            data,
            symbol,
            data_dir,
            offline,
            synthetic,
            export_dir,
        } => run_run(config, data, symbol, data_dir, offline, synthetic, export_dir),
        Commands::Sweep {
            config,
            data,
            symbol,
            data_dir,
            offline,
            synthetic,
            sequential,
            top,
            output,
        } => run_sweep(
            config, data, symbol, data_dir, offline, synthetic, sequential, top, output,
        ),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

/// Merge CLI data flags over the config's data section.
fn resolve_config(
    config: Option<PathBuf>,
    data: Option<PathBuf>,
    symbol: Option<String>,
    data_dir: PathBuf,
) -> Result<BacktestConfig> {
    let mut config = match config {
        Some(path) => BacktestConfig::load(&path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => BacktestConfig::default(),
    };
    if data.is_some() {
        config.data.csv = data;
    }
    if symbol.is_some() {
        config.data.symbol = symbol;
    }
    if data_dir != PathBuf::from("data") || config.data.data_dir.as_os_str().is_empty() {
        config.data.data_dir = data_dir;
    }
    if config.data.csv.is_none() && config.data.symbol.is_none() {
        bail!("no data source: pass --data <csv> or --symbol <SYM> (or set them in the config)");
    }
    Ok(config)
}

fn run_download(
    symbols: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    force: bool,
    data_dir: PathBuf,
) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let (default_start, default_end) = default_date_range(today);
    let start = start.as_deref().map(parse_date).transpose()?.unwrap_or(default_start);
    let end = end.as_deref().map(parse_date).transpose()?.unwrap_or(default_end);
    if start >= end {
        bail!("start date must be before end date");
    }

    let provider = YahooProvider::new();
    let total = symbols.len();
    let mut failed = 0usize;

    for (i, symbol) in symbols.iter().enumerate() {
        let path = cache_path(&data_dir, symbol);
        if path.exists() && !force {
            println!("[{}/{total}] {symbol}: already cached (use --force to refresh)", i + 1);
            continue;
        }
        print!("[{}/{total}] {symbol}: downloading {start}..{end} ... ", i + 1);
        match provider.fetch(symbol, start, end) {
            Ok(bars) => {
                write_bars_csv(&path, &bars)?;
                println!("{} bars -> {}", bars.len(), path.display());
            }
            Err(e) => {
                println!("FAILED ({e})");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed}/{total} downloads failed");
    }
    Ok(())
}

fn run_run(
    config: Option<PathBuf>,
    data: Option<PathBuf>,
    symbol: Option<String>,
    data_dir: PathBuf,
    offline: bool,
    synthetic: bool,
    export_dir: Option<PathBuf>,
) -> Result<()> {
    let config = resolve_config(config, data, symbol, data_dir)?;
    let opts = LoadOptions {
        offline,
        synthetic,
        force: false,
    };

    let (result, holdout) = run_single_backtest(&config, &opts)?;

    println!(
        "Backtest over {} bars (initial cash {:.2})",
        result.bar_count, result.initial_cash
    );
    println!("Run id: {}", result.run_id);
    println!();
    print!("{}", format_metrics(&result.metrics));

    if !holdout.is_empty() {
        let held = run_backtest(
            &holdout,
            &config.strategy,
            config.backtest.initial_cash,
            config.backtest.risk_free_rate,
        )?;
        println!();
        println!("Held-out validation over {} bars:", held.bar_count);
        print!("{}", format_metrics(&held.metrics));
    }

    if let Some(dir) = export_dir {
        std::fs::create_dir_all(&dir)?;
        let trades_path = dir.join("trades.csv");
        let equity_path = dir.join("equity.csv");
        let result_path = dir.join("result.json");
        write_trades_csv(&trades_path, &result.trades)?;
        write_equity_csv(&equity_path, &result.snapshots)?;
        std::fs::write(&result_path, serde_json::to_string_pretty(&result)?)?;
        println!();
        println!(
            "Wrote {}, {}, and {}",
            trades_path.display(),
            equity_path.display(),
            result_path.display()
        );
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_sweep(
    config: Option<PathBuf>,
    data: Option<PathBuf>,
    symbol: Option<String>,
    data_dir: PathBuf,
    offline: bool,
    synthetic: bool,
    sequential: bool,
    top: usize,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = resolve_config(config, data, symbol, data_dir)?;
    let opts = LoadOptions {
        offline,
        synthetic,
        force: false,
    };

    let loaded = load_bars(&config.data, &opts)?;
    let train_frac = config.backtest.train_frac.unwrap_or(1.0);
    let (train, holdout) = split_train_test(&loaded.bars, train_frac);

    let grid = &config.grid;
    println!(
        "Sweeping {} combinations over {} bars ({} held out)...",
        grid.size(),
        train.len(),
        holdout.len()
    );

    let sweep = Sweep::new(config.backtest.initial_cash, config.backtest.risk_free_rate)
        .with_parallelism(!sequential);
    let started = std::time::Instant::now();
    let results = sweep.run(grid, train);
    println!(
        "Completed {} runs in {:.2}s",
        results.len(),
        started.elapsed().as_secs_f64()
    );

    let ranked = results.ranked();
    println!();
    println!("Top {} by composite score:", top.min(ranked.len()));
    println!(
        "{:<5} {:>5} {:>5} {:>6} {:>8} {:>8} {:>7} {:>8} {:>7} {:>9}",
        "rank", "short", "long", "adx", "stop", "take", "trades", "return", "sharpe", "composite"
    );
    for (i, r) in ranked.iter().take(top).enumerate() {
        println!(
            "{:<5} {:>5} {:>5} {:>6} {:>8.3} {:>8.3} {:>7} {:>8.4} {:>7.3} {:>9.4}",
            i + 1,
            r.params.short_window,
            r.params.long_window,
            r.params.adx_threshold,
            r.params.stop_loss_pct,
            r.params.take_profit_pct,
            r.total_trades,
            r.total_return,
            r.sharpe_ratio,
            r.composite_score,
        );
    }

    if let Some(best) = results.best() {
        if !holdout.is_empty() {
            let held = run_backtest(
                holdout,
                &best.params,
                config.backtest.initial_cash,
                config.backtest.risk_free_rate,
            )?;
            println!();
            println!(
                "Best parameters validated on {} held-out bars:",
                held.bar_count
            );
            print!("{}", format_metrics(&held.metrics));
        }
    }

    if let Some(path) = output {
        write_sweep_csv(&path, &ranked)?;
        println!();
        println!("Wrote full ranking to {}", path.display());
    }

    Ok(())
}
