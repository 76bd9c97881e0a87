//! End-to-end engine invariants on realistic bar series.

use chrono::NaiveDate;
use tradegrid_core::data::generate_synthetic_bars;
use tradegrid_core::domain::{Signal, TradeSide};
use tradegrid_core::engine::simulate;
use tradegrid_core::strategy::{generate_signals, StrategyParams};

fn active_params() -> StrategyParams {
    // Small windows and a low threshold so a multi-year series produces a
    // healthy number of round trips.
    StrategyParams {
        short_window: 5,
        long_window: 20,
        trend_window: 14,
        adx_threshold: 10.0,
        trend_direction_threshold: 2.0,
        stop_loss_pct: 0.03,
        take_profit_pct: 0.05,
        enter_trade_threshold: 3.0,
        volume_ma_period: 10,
        volume_threshold: 1.2,
        ..Default::default()
    }
}

fn test_bars() -> Vec<tradegrid_core::domain::Bar> {
    generate_synthetic_bars(
        "ENGINE",
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
    )
}

#[test]
fn state_invariants_hold_on_every_bar() {
    let bars = test_bars();
    let records = generate_signals(&bars, &active_params());
    let result = simulate(&records, 10_000.0);

    assert_eq!(result.snapshots.len(), bars.len());
    for snap in &result.snapshots {
        assert!(snap.cash >= 0.0, "cash went negative on {}", snap.date);
        assert!(
            (snap.holdings - snap.position as f64 * snap.price).abs() < 1e-9,
            "holdings identity broken on {}",
            snap.date
        );
        assert!(
            (snap.portfolio_value - (snap.cash + snap.holdings)).abs() < 1e-9,
            "value identity broken on {}",
            snap.date
        );
    }
}

#[test]
fn ledger_alternates_buy_sell() {
    let bars = test_bars();
    let records = generate_signals(&bars, &active_params());
    let result = simulate(&records, 10_000.0);

    assert!(
        result.trades.len() >= 2,
        "expected the active parameter set to trade"
    );
    for (i, trade) in result.trades.iter().enumerate() {
        let expected = if i % 2 == 0 { TradeSide::Buy } else { TradeSide::Sell };
        assert_eq!(trade.side, expected, "ledger out of order at entry {i}");
    }
}

#[test]
fn notional_reconciles_with_final_state() {
    let bars = test_bars();
    let records = generate_signals(&bars, &active_params());
    let initial_cash = 10_000.0;
    let result = simulate(&records, initial_cash);

    let bought: f64 = result
        .trades
        .iter()
        .filter(|t| t.side == TradeSide::Buy)
        .map(|t| t.value)
        .sum();
    let sold: f64 = result
        .trades
        .iter()
        .filter(|t| t.side == TradeSide::Sell)
        .map(|t| t.value)
        .sum();

    let last = result.snapshots.last().unwrap();
    let expected_cash = initial_cash - bought + sold;
    assert!(
        (last.cash - expected_cash).abs() < 1e-6,
        "cash does not reconcile: {} vs {}",
        last.cash,
        expected_cash
    );
    assert!(
        (last.portfolio_value - (expected_cash + last.holdings)).abs() < 1e-6,
        "portfolio value does not reconcile"
    );
}

#[test]
fn simulation_is_idempotent() {
    let bars = test_bars();
    let params = active_params();

    let first = simulate(&generate_signals(&bars, &params), 10_000.0);
    let second = simulate(&generate_signals(&bars, &params), 10_000.0);

    assert_eq!(first.trades, second.trades);
    assert_eq!(first.snapshots, second.snapshots);
}

#[test]
fn signals_respect_position_state() {
    let bars = test_bars();
    let records = generate_signals(&bars, &active_params());

    let mut open = false;
    for rec in &records {
        match rec.signal {
            Signal::Enter => {
                assert!(!open, "enter emitted while in position on {}", rec.date);
                open = true;
            }
            Signal::Exit => {
                assert!(open, "exit emitted while flat on {}", rec.date);
                open = false;
            }
            Signal::Hold => {}
        }
    }
}

#[test]
fn sells_carry_realized_pnl_and_buys_do_not() {
    let bars = test_bars();
    let records = generate_signals(&bars, &active_params());
    let result = simulate(&records, 10_000.0);

    for trade in &result.trades {
        match trade.side {
            TradeSide::Buy => {
                assert!(trade.profit_loss.is_none());
                assert!(trade.profit_loss_pct.is_none());
            }
            TradeSide::Sell => {
                assert!(trade.profit_loss.is_some());
                assert!(trade.profit_loss_pct.is_some());
            }
        }
    }
}
