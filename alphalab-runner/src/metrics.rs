//! Performance metrics — pure functions that compute strategy statistics.
//!
//! The headline ratios are computed from the closed-trade P&L list, each
//! trade's P&L normalized by starting capital, not from daily returns. No
//! dependencies on the runner, data pipeline, or engine state.

use alphalab_core::domain::Trade;
use serde::{Deserialize, Serialize};

/// Aggregate performance report for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub initial_value: f64,
    pub final_value: f64,
    pub total_return_pct: f64,
    /// Mean over population standard deviation of per-trade returns.
    pub sharpe: f64,
    /// The same ratio restricted to winning trades.
    pub sortino: f64,
    /// Trade-level ratio `1 - min/max` of per-trade returns, in percent.
    /// Not a peak-to-trough equity drawdown and may exceed 100.
    pub max_drawdown_pct: f64,
    /// Peak-to-trough decline of the per-bar equity curve, in percent.
    pub equity_drawdown_pct: f64,
    pub trade_count: usize,
    pub hit_ratio_pct: f64,
}

impl PerformanceReport {
    /// Compute all metrics from start/end value and the closed trades.
    pub fn compute(initial_value: f64, final_value: f64, trades: &[Trade]) -> Self {
        let sample = trade_returns(trades, initial_value);
        Self {
            initial_value,
            final_value,
            total_return_pct: total_return_pct(initial_value, final_value),
            sharpe: sharpe_ratio(&sample),
            sortino: sortino_ratio(&sample),
            max_drawdown_pct: max_drawdown_pct(&sample),
            equity_drawdown_pct: 0.0,
            trade_count: trades.len(),
            hit_ratio_pct: hit_ratio_pct(trades),
        }
    }

    /// Attach the equity-curve drawdown.
    pub fn with_equity_curve(mut self, equity_curve: &[f64]) -> Self {
        self.equity_drawdown_pct = equity_drawdown_pct(equity_curve);
        self
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return in percent. Zero when the initial value is not positive.
pub fn total_return_pct(initial_value: f64, final_value: f64) -> f64 {
    if initial_value <= 0.0 {
        return 0.0;
    }
    (final_value - initial_value) / initial_value * 100.0
}

/// Per-trade return sample: each trade's P&L over starting capital.
pub fn trade_returns(trades: &[Trade], initial_value: f64) -> Vec<f64> {
    if initial_value <= 0.0 {
        return Vec::new();
    }
    trades.iter().map(|t| t.pnl / initial_value).collect()
}

/// Spread at or below this fraction of `|mean|` is rounding noise.
const RELATIVE_SPREAD_FLOOR: f64 = 1e-12;

/// Sharpe-like ratio: mean / population std of the sample.
///
/// Returns 0.0 for an empty sample or zero spread. A spread within
/// `RELATIVE_SPREAD_FLOOR * |mean|` counts as zero.
pub fn sharpe_ratio(sample: &[f64]) -> f64 {
    let std = population_std_dev(sample);
    let mean = mean_f64(sample);
    if std <= RELATIVE_SPREAD_FLOOR * mean.abs() {
        return 0.0;
    }
    mean / std
}

/// Sortino-like ratio: the Sharpe-like ratio over the strictly positive
/// subset of the sample.
pub fn sortino_ratio(sample: &[f64]) -> f64 {
    let positive: Vec<f64> = sample.iter().copied().filter(|&r| r > 0.0).collect();
    sharpe_ratio(&positive)
}

/// Trade-level "drawdown": `max(1 - min/max, 0) * 100`.
///
/// This is a ratio between the worst and best trade return, not a running
/// peak-to-trough measure; it exceeds 100 whenever the worst trade lost.
/// Returns 0.0 for an empty sample or a zero best trade.
pub fn max_drawdown_pct(sample: &[f64]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    let max = sample.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = sample.iter().copied().fold(f64::INFINITY, f64::min);
    if max == 0.0 {
        return 0.0;
    }
    (1.0 - min / max).max(0.0) * 100.0
}

/// Largest peak-to-trough decline of an equity curve, in percent (>= 0).
pub fn equity_drawdown_pct(equity_curve: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &equity in equity_curve {
        if equity > peak {
            peak = equity;
        }
        if peak > 0.0 {
            worst = worst.max((peak - equity) / peak);
        }
    }
    worst * 100.0
}

/// Share of trades with positive P&L, in percent. Zero with no trades.
pub fn hit_ratio_pct(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64 * 100.0
}

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by N).
pub(crate) fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
