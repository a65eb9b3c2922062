//! Trade — a closed FLAT→LONG→FLAT round trip.

use super::position::Position;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A complete round-trip trade: entry → exit.
///
/// `entry_price` and `exit_price` carry their leg's costs (entry is marked
/// up, exit marked down), so `pnl > 0` exactly when `exit_price >
/// entry_price`. The raw bar prices are kept as `*_fill_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: String,
    pub quantity: f64,

    // ── Entry ──
    pub entry_index: usize,
    pub opened_at: NaiveDateTime,
    pub entry_fill_price: f64,
    pub entry_price: f64,
    pub entry_commission: f64,
    pub entry_slippage: f64,

    // ── Exit ──
    pub exit_index: usize,
    pub closed_at: NaiveDateTime,
    pub exit_fill_price: f64,
    pub exit_price: f64,
    pub exit_commission: f64,
    pub exit_slippage: f64,

    /// Realized P&L net of all four cost legs.
    pub pnl: f64,
}

impl Trade {
    /// Close `position` with a fill at `exit_fill_price`.
    pub fn close(
        position: Position,
        exit_index: usize,
        closed_at: NaiveDateTime,
        exit_fill_price: f64,
        exit_commission: f64,
        exit_slippage: f64,
    ) -> Self {
        let quantity = position.quantity;
        let entry_price = position.effective_entry_price();
        let exit_price = exit_fill_price - (exit_commission + exit_slippage) / quantity;
        Self {
            symbol: position.symbol,
            quantity,
            entry_index: position.entry_index,
            opened_at: position.opened_at,
            entry_fill_price: position.entry_price,
            entry_price,
            entry_commission: position.entry_commission,
            entry_slippage: position.entry_slippage,
            exit_index,
            closed_at,
            exit_fill_price,
            exit_price,
            exit_commission,
            exit_slippage,
            pnl: (exit_price - entry_price) * quantity,
        }
    }

    /// P&L of the raw fills, before costs.
    pub fn gross_pnl(&self) -> f64 {
        (self.exit_fill_price - self.entry_fill_price) * self.quantity
    }

    pub fn total_costs(&self) -> f64 {
        self.entry_commission + self.entry_slippage + self.exit_commission + self.exit_slippage
    }

    pub fn bars_held(&self) -> usize {
        self.exit_index.saturating_sub(self.entry_index)
    }

    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }
}
