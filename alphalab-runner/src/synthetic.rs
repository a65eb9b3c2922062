//! Deterministic synthetic bar generation.
//!
//! Used for demos and tests when no real data is at hand. The same symbol
//! and seed always produce the same bars.

use alphalab_core::data::{BarSource, InMemoryProvider};
use alphalab_core::domain::{Bar, InstrumentSeries, SeriesError};
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

/// Generate `n` daily bars starting at `start`, skipping weekends.
///
/// Prices follow a random walk; volume reacts to the size of each move so
/// that open/volume rank correlation varies over time.
pub fn synthetic_bars(symbol: &str, start: NaiveDate, n: usize, seed: u64) -> Vec<Bar> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(symbol.as_bytes());
    hasher.update(&seed.to_le_bytes());
    let mut rng = StdRng::from_seed(*hasher.finalize().as_bytes());

    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0_f64;
    let mut volume_base = 1_000_000.0_f64;
    let mut day = start;

    while bars.len() < n {
        if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            day += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = (price * (1.0 + daily_return)).max(0.01);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));

        // Volume drifts slowly and spikes on large moves.
        volume_base = (volume_base * (1.0 + rng.gen_range(-0.1..0.1))).clamp(50_000.0, 1e8);
        let volume = (volume_base * (1.0 + 20.0 * daily_return.abs())).round();

        bars.push(Bar {
            timestamp: day.and_time(NaiveTime::MIN),
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        day += chrono::Duration::days(1);
    }
    bars
}

pub fn synthetic_series(
    symbol: &str,
    start: NaiveDate,
    n: usize,
    seed: u64,
) -> Result<InstrumentSeries, SeriesError> {
    InstrumentSeries::new(symbol, synthetic_bars(symbol, start, n, seed))
}

/// Symbol of the `i`-th generated instrument.
pub fn synthetic_symbol(i: usize) -> String {
    format!("SYN{i:02}")
}

/// In-memory provider holding `count` synthetic instruments of `n` bars,
/// with the sources to load them in symbol order.
pub fn synthetic_universe(
    count: usize,
    start: NaiveDate,
    n: usize,
    seed: u64,
) -> (InMemoryProvider, Vec<BarSource>) {
    let mut provider = InMemoryProvider::new();
    for i in 0..count {
        let symbol = synthetic_symbol(i);
        let bars = synthetic_bars(&symbol, start, n, seed);
        provider.insert(symbol, bars);
    }
    let sources = provider.sources();
    (provider, sources)
}

/// Write a series as a CSV file readable by `CsvProvider`.
pub fn write_csv(series: &InstrumentSeries, path: impl AsRef<Path>) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["timestamp", "open", "high", "low", "close", "volume"])?;
    for bar in series.bars() {
        wtr.write_record([
            bar.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.4}", bar.open),
            format!("{:.4}", bar.high),
            format!("{:.4}", bar.low),
            format!("{:.4}", bar.close),
            format!("{}", bar.volume),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
