//! Portfolio — shared cash plus all open positions.

use super::position::{Position, PositionState};
use std::collections::{BTreeMap, HashMap};

/// Aggregate portfolio state.
///
/// A single cash balance is shared by every instrument. Only the execution
/// simulator mutates it; everything else reads.
#[derive(Debug, Clone)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_capital: f64,
    pub positions: BTreeMap<String, Position>,
    pub total_commission: f64,
    pub total_slippage: f64,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            cash: initial_capital,
            initial_capital,
            positions: BTreeMap::new(),
            total_commission: 0.0,
            total_slippage: 0.0,
        }
    }

    /// Total equity = cash + sum of all position market values.
    ///
    /// Symbols missing from `prices` are valued at their entry price.
    pub fn equity(&self, prices: &HashMap<String, f64>) -> f64 {
        let position_value: f64 = self
            .positions
            .iter()
            .map(|(sym, pos)| {
                let price = prices.get(sym).copied().unwrap_or(pos.entry_price);
                pos.market_value(price)
            })
            .sum();
        self.cash + position_value
    }

    pub fn state(&self, symbol: &str) -> PositionState {
        if self.positions.contains_key(symbol) {
            PositionState::Long
        } else {
            PositionState::Flat
        }
    }

    pub fn get_position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }
}
