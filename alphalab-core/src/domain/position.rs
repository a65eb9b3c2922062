//! Position — per-instrument holding state.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Long-only position state of one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionState {
    Flat,
    Long,
}

/// An open long holding.
///
/// Exists only while the instrument is LONG; the portfolio drops it on the
/// SELL fill that closes the trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: f64,
    /// Raw reference price of the entry bar.
    pub entry_price: f64,
    pub entry_commission: f64,
    pub entry_slippage: f64,
    pub opened_at: NaiveDateTime,
    pub entry_index: usize,
}

impl Position {
    pub fn market_value(&self, current_price: f64) -> f64 {
        self.quantity * current_price
    }

    pub fn unrealized_pnl(&self, current_price: f64) -> f64 {
        self.quantity * (current_price - self.entry_price) - self.entry_costs()
    }

    pub fn entry_costs(&self) -> f64 {
        self.entry_commission + self.entry_slippage
    }

    /// Entry price with the entry leg's costs folded in.
    pub fn effective_entry_price(&self) -> f64 {
        self.entry_price + self.entry_costs() / self.quantity
    }
}
