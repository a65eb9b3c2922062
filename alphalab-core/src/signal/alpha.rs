//! Rank-correlation alpha.
//!
//! signal[t] = -spearman(open[t-L+1..=t], volume[t-L+1..=t])
//! Lookback: L bars including the current one.
//!
//! Rising prices on falling volume score towards +1, prices and volume
//! rising together score towards -1. Undefined windows (short history, or a
//! flat open or volume window) produce NaN.

use super::rank::spearman;
use crate::domain::{Bar, InstrumentSeries};

/// Smallest lookback for which a rank correlation is defined.
pub const MIN_LOOKBACK: usize = 2;

/// Score the bar at `current_index` of `series` over a window of `lookback` bars.
///
/// Returns NaN ("no signal") when fewer than `lookback` bars end at
/// `current_index`, when `current_index` is past the end of the series, or
/// when either ranked window has zero variance.
pub fn signal(series: &InstrumentSeries, current_index: usize, lookback: usize) -> f64 {
    signal_at(series.bars(), current_index, lookback)
}

/// Slice form of [`signal`]. Only `bars[..=current_index]` is read.
pub fn signal_at(bars: &[Bar], current_index: usize, lookback: usize) -> f64 {
    if lookback < MIN_LOOKBACK || current_index >= bars.len() || current_index + 1 < lookback {
        return f64::NAN;
    }
    let window = &bars[current_index + 1 - lookback..=current_index];
    let opens: Vec<f64> = window.iter().map(|b| b.open).collect();
    let volumes: Vec<f64> = window.iter().map(|b| b.volume).collect();

    match spearman(&opens, &volumes) {
        Some(rho) => (-rho).clamp(-1.0, 1.0),
        None => f64::NAN,
    }
}

/// Precomputes the alpha over a whole bar history.
#[derive(Debug, Clone)]
pub struct RankCorrelationAlpha {
    lookback: usize,
    name: String,
}

impl RankCorrelationAlpha {
    /// Panics if `lookback < MIN_LOOKBACK`; `Engine::new` rejects such
    /// configs before building one.
    pub fn new(lookback: usize) -> Self {
        assert!(
            lookback >= MIN_LOOKBACK,
            "alpha lookback must be >= {MIN_LOOKBACK}"
        );
        Self {
            lookback,
            name: format!("open_volume_rank_corr_{lookback}"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    /// Number of leading bars that can never carry a signal.
    pub fn warmup_bars(&self) -> usize {
        self.lookback - 1
    }

    /// Signal for the bar at `bar_index`, reading only `bars[..=bar_index]`.
    pub fn evaluate(&self, bars: &[Bar], bar_index: usize) -> f64 {
        signal_at(bars, bar_index, self.lookback)
    }

    pub fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        (0..bars.len()).map(|i| self.evaluate(bars, i)).collect()
    }
}
