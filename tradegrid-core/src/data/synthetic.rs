//! Synthetic bar generation for offline development and tests.

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::Bar;

/// Generate a deterministic random-walk bar series.
///
/// The seed derives from the symbol name, so the same symbol always yields
/// the same series. Weekends are skipped to mimic a trading calendar.
pub fn generate_synthetic_bars(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        let weekday = current.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000.0..5_000_000.0);

        bars.push(Bar {
            date: current,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    bars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dates_strictly_increasing;

    fn range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        )
    }

    #[test]
    fn deterministic_per_symbol() {
        let (start, end) = range();
        let a = generate_synthetic_bars("TEST", start, end);
        let b = generate_synthetic_bars("TEST", start, end);
        assert_eq!(a, b);

        let c = generate_synthetic_bars("OTHER", start, end);
        assert_ne!(a, c);
    }

    #[test]
    fn bars_are_sane_and_ordered() {
        let (start, end) = range();
        let bars = generate_synthetic_bars("TEST", start, end);
        assert!(!bars.is_empty());
        assert!(bars.iter().all(|b| b.is_sane()));
        assert!(dates_strictly_increasing(&bars));
    }

    #[test]
    fn weekends_are_skipped() {
        let (start, end) = range();
        let bars = generate_synthetic_bars("TEST", start, end);
        assert!(bars.iter().all(|b| {
            b.date.weekday() != chrono::Weekday::Sat && b.date.weekday() != chrono::Weekday::Sun
        }));
    }
}
