use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

/// Fill record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub symbol: String,
    pub side: OrderSide,
    pub bar_index: usize,
    pub timestamp: NaiveDateTime,
    pub price: f64,
    pub quantity: f64,
    pub commission: f64,
    pub slippage: f64,
}

impl Fill {
    pub fn notional(&self) -> f64 {
        self.price * self.quantity
    }

    /// Signed cash impact of this fill, costs included.
    pub fn cash_delta(&self) -> f64 {
        let costs = self.commission + self.slippage;
        match self.side {
            OrderSide::Buy => -(self.notional() + costs),
            OrderSide::Sell => self.notional() - costs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fill(side: OrderSide) -> Fill {
        Fill {
            symbol: "SPY".into(),
            side,
            bar_index: 3,
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 5)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            price: 100.0,
            quantity: 10.0,
            commission: 1.0,
            slippage: 1.0,
        }
    }

    #[test]
    fn buy_pays_notional_plus_costs() {
        assert_eq!(fill(OrderSide::Buy).cash_delta(), -1_002.0);
    }

    #[test]
    fn sell_receives_notional_minus_costs() {
        assert_eq!(fill(OrderSide::Sell).cash_delta(), 998.0);
    }
}
