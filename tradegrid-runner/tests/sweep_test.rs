//! Integration tests for the sweep layer on synthetic data.

use chrono::NaiveDate;
use tradegrid_core::data::generate_synthetic_bars;
use tradegrid_runner::sweep::{ParamGrid, Sweep};

fn bars() -> Vec<tradegrid_core::domain::Bar> {
    generate_synthetic_bars(
        "SWEEP",
        NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
    )
}

fn small_grid() -> ParamGrid {
    ParamGrid {
        short_windows: vec![5, 10],
        long_windows: vec![20],
        adx_thresholds: vec![10.0, 20.0],
        trend_direction_thresholds: vec![2.0],
        stop_loss_pcts: vec![0.02],
        take_profit_pcts: vec![0.05],
        enter_trade_thresholds: vec![3.0],
        exit_trade_thresholds: vec![6.0],
        volume_ma_periods: vec![10],
        volume_thresholds: vec![1.2],
    }
}

#[test]
fn sweep_covers_every_valid_combination() {
    let grid = small_grid();
    let results = Sweep::new(10_000.0, 0.01).run(&grid, &bars());

    assert_eq!(results.len(), grid.expand().len());
    assert_eq!(results.len(), 4);
}

#[test]
fn ranked_results_are_descending_and_finite() {
    let results = Sweep::new(10_000.0, 0.01).run(&small_grid(), &bars());
    let ranked = results.ranked();

    assert!(ranked
        .windows(2)
        .all(|w| w[0].composite_score >= w[1].composite_score));
    assert!(ranked.iter().all(|r| r.composite_score.is_finite()));
    assert_eq!(
        results.best().unwrap().run_id,
        ranked.first().unwrap().run_id
    );
}

#[test]
fn records_are_addressable_by_run_id() {
    let results = Sweep::new(10_000.0, 0.01).run(&small_grid(), &bars());
    for record in results.all() {
        let found = results.get(&record.run_id).unwrap();
        assert_eq!(found.params, record.params);
    }
    assert!(results.get("not-a-run-id").is_none());
}

#[test]
fn parallel_and_sequential_agree() {
    let grid = small_grid();
    let bars = bars();

    let parallel = Sweep::new(10_000.0, 0.01).run(&grid, &bars);
    let sequential = Sweep::new(10_000.0, 0.01)
        .with_parallelism(false)
        .run(&grid, &bars);

    let mut par: Vec<_> = parallel.all().to_vec();
    let mut seq: Vec<_> = sequential.all().to_vec();
    par.sort_by(|a, b| a.run_id.cmp(&b.run_id));
    seq.sort_by(|a, b| a.run_id.cmp(&b.run_id));

    assert_eq!(par.len(), seq.len());
    for (p, s) in par.iter().zip(&seq) {
        assert_eq!(p.run_id, s.run_id);
        assert_eq!(p.composite_score, s.composite_score);
        assert_eq!(p.total_trades, s.total_trades);
    }
}

#[test]
fn progress_callback_sees_every_run() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let counter = AtomicUsize::new(0);
    let grid = small_grid();
    let results = Sweep::new(10_000.0, 0.01).run_with_progress(&grid, &bars(), |_, total, _| {
        assert_eq!(total, 4);
        counter.fetch_add(1, Ordering::Relaxed);
    });

    assert_eq!(counter.load(Ordering::Relaxed), results.len());
}

#[test]
fn flat_market_sweep_scores_zero() {
    // Constant prices: no crossover, no trades, degenerate metrics. The
    // composite score must come out at exactly zero, not NaN.
    let base_date = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    let flat: Vec<_> = (0..200)
        .map(|i| tradegrid_core::domain::Bar {
            date: base_date + chrono::Duration::days(i),
            open: 100.0,
            high: 100.0,
            low: 100.0,
            close: 100.0,
            volume: 1_000.0,
        })
        .collect();

    let results = Sweep::new(10_000.0, 0.01).run(&small_grid(), &flat);
    for record in results.all() {
        assert_eq!(record.total_trades, 0);
        assert_eq!(record.total_return, 0.0);
        assert_eq!(record.max_drawdown, 0.0);
        assert_eq!(record.composite_score, 0.0);
    }
}
