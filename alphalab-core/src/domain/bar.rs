//! Bar — the fundamental market data unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single instrument at a single point in time.
///
/// Prices must be finite and strictly positive; volume must be finite and
/// non-negative. A bar that violates this never reaches the engine: providers
/// drop such rows at load time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Returns true if any OHLCV field is NaN (a hole left by a broken source).
    pub fn is_void(&self) -> bool {
        self.open.is_nan()
            || self.high.is_nan()
            || self.low.is_nan()
            || self.close.is_nan()
            || self.volume.is_nan()
    }

    /// Presence check for every required field.
    ///
    /// OHLC finite and > 0, volume finite and >= 0. High/low ordering is
    /// not checked.
    pub fn is_valid(&self) -> bool {
        let price_ok = |p: f64| p.is_finite() && p > 0.0;
        price_ok(self.open)
            && price_ok(self.high)
            && price_ok(self.low)
            && price_ok(self.close)
            && self.volume.is_finite()
            && self.volume >= 0.0
    }

    /// Price used for fills and mark-to-market.
    pub fn reference_price(&self) -> f64 {
        self.close
    }
}
