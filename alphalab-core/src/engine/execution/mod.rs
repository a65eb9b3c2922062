//! Execution simulator — fills orders at the signal bar's reference price.
//!
//! The simulator is stateless: it carries only the cost model and the order
//! size. It borrows the portfolio and the trade ledger from `EngineState`
//! and is the only code that mutates either.

pub mod cost_model;

pub use cost_model::{CostModel, FillCosts, DEFAULT_COMMISSION_RATE, DEFAULT_SLIPPAGE_RATE};

use crate::domain::{Bar, Fill, OrderSide, Portfolio, Position, Trade};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ExecutionError {
    #[error("{symbol}: BUY while already long")]
    AlreadyLong { symbol: String },
    #[error("{symbol}: SELL with no open position")]
    NotLong { symbol: String },
}

#[derive(Debug, Clone)]
pub struct ExecutionSimulator {
    cost_model: CostModel,
    quantity: f64,
}

impl ExecutionSimulator {
    pub fn new(cost_model: CostModel, quantity: f64) -> Self {
        Self {
            cost_model,
            quantity,
        }
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    /// Fill one order for `symbol` on `bar`.
    ///
    /// BUY opens a position and pays notional plus costs. SELL closes the
    /// open position, receives notional minus costs and appends the closed
    /// trade to `ledger`.
    pub fn fill(
        &self,
        side: OrderSide,
        symbol: &str,
        bar_index: usize,
        bar: &Bar,
        portfolio: &mut Portfolio,
        ledger: &mut Vec<Trade>,
    ) -> Result<Fill, ExecutionError> {
        let price = bar.reference_price();
        let fill = match side {
            OrderSide::Buy => {
                if portfolio.positions.contains_key(symbol) {
                    return Err(ExecutionError::AlreadyLong {
                        symbol: symbol.to_string(),
                    });
                }
                let costs = self.cost_model.costs(price, self.quantity);
                portfolio.positions.insert(
                    symbol.to_string(),
                    Position {
                        symbol: symbol.to_string(),
                        quantity: self.quantity,
                        entry_price: price,
                        entry_commission: costs.commission,
                        entry_slippage: costs.slippage,
                        opened_at: bar.timestamp,
                        entry_index: bar_index,
                    },
                );
                self.make_fill(side, symbol, bar_index, bar, self.quantity, costs)
            }
            OrderSide::Sell => {
                let position =
                    portfolio
                        .positions
                        .remove(symbol)
                        .ok_or_else(|| ExecutionError::NotLong {
                            symbol: symbol.to_string(),
                        })?;
                let quantity = position.quantity;
                let costs = self.cost_model.costs(price, quantity);
                ledger.push(Trade::close(
                    position,
                    bar_index,
                    bar.timestamp,
                    price,
                    costs.commission,
                    costs.slippage,
                ));
                self.make_fill(side, symbol, bar_index, bar, quantity, costs)
            }
        };

        portfolio.cash += fill.cash_delta();
        portfolio.total_commission += fill.commission;
        portfolio.total_slippage += fill.slippage;

        tracing::debug!(
            symbol,
            side = ?fill.side,
            bar_index,
            price = fill.price,
            cash = portfolio.cash,
            "fill"
        );
        Ok(fill)
    }

    fn make_fill(
        &self,
        side: OrderSide,
        symbol: &str,
        bar_index: usize,
        bar: &Bar,
        quantity: f64,
        costs: FillCosts,
    ) -> Fill {
        Fill {
            symbol: symbol.to_string(),
            side,
            bar_index,
            timestamp: bar.timestamp,
            price: bar.reference_price(),
            quantity,
            commission: costs.commission,
            slippage: costs.slippage,
        }
    }
}
