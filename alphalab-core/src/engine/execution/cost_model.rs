//! Cost model — commission and slippage as fractions of notional.
//!
//! Both costs are charged on every fill and both reduce realized value,
//! whichever side the fill is on. Slippage here is a percentage charge on
//! notional, not a bid/ask-aware price shift: the fill price itself stays at
//! the bar's reference price.

use serde::{Deserialize, Serialize};

pub const DEFAULT_COMMISSION_RATE: f64 = 0.001;
pub const DEFAULT_SLIPPAGE_RATE: f64 = 0.001;

/// Cost model for execution friction (slippage + commission).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    /// Commission as a fraction of notional (0.001 = 10 bps).
    pub commission_rate: f64,
    /// Slippage as a fraction of notional.
    pub slippage_rate: f64,
}

/// Cost legs charged on one fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillCosts {
    pub commission: f64,
    pub slippage: f64,
}

impl FillCosts {
    pub fn total(&self) -> f64 {
        self.commission + self.slippage
    }
}

impl CostModel {
    pub fn new(commission_rate: f64, slippage_rate: f64) -> Self {
        Self {
            commission_rate,
            slippage_rate,
        }
    }

    pub fn frictionless() -> Self {
        Self::new(0.0, 0.0)
    }

    /// `commission = commission_rate * notional`
    pub fn compute_commission(&self, notional: f64) -> f64 {
        notional * self.commission_rate
    }

    /// `slippage = slippage_rate * notional`
    pub fn compute_slippage(&self, notional: f64) -> f64 {
        notional * self.slippage_rate
    }

    pub fn costs(&self, price: f64, quantity: f64) -> FillCosts {
        let notional = price * quantity;
        FillCosts {
            commission: self.compute_commission(notional),
            slippage: self.compute_slippage(notional),
        }
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::new(DEFAULT_COMMISSION_RATE, DEFAULT_SLIPPAGE_RATE)
    }
}
