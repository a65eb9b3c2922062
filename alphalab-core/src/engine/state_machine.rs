//! Long-only position state machine.
//!
//! Rules, evaluated once per bar in this priority:
//! 1. signal < ENTRY_THRESHOLD and FLAT → BUY
//! 2. signal > EXIT_THRESHOLD and LONG  → SELL
//! 3. otherwise                          → HOLD
//!
//! NaN never satisfies a comparison, so a missing signal always holds.

use crate::domain::{OrderSide, PositionState};
use serde::{Deserialize, Serialize};

pub const ENTRY_THRESHOLD: f64 = -0.5;
pub const EXIT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl Action {
    /// Order side to submit, `None` for HOLD.
    pub fn side(self) -> Option<OrderSide> {
        match self {
            Action::Buy => Some(OrderSide::Buy),
            Action::Sell => Some(OrderSide::Sell),
            Action::Hold => None,
        }
    }

    /// State after this action is filled from `state`.
    pub fn next_state(self, state: PositionState) -> PositionState {
        match self {
            Action::Buy => PositionState::Long,
            Action::Sell => PositionState::Flat,
            Action::Hold => state,
        }
    }
}

pub fn decide(signal: f64, state: PositionState) -> Action {
    if signal < ENTRY_THRESHOLD && state == PositionState::Flat {
        Action::Buy
    } else if signal > EXIT_THRESHOLD && state == PositionState::Long {
        Action::Sell
    } else {
        Action::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buys_when_flat_below_entry() {
        assert_eq!(decide(-0.51, PositionState::Flat), Action::Buy);
        assert_eq!(decide(-1.0, PositionState::Flat), Action::Buy);
    }

    #[test]
    fn no_pyramiding() {
        assert_eq!(decide(-0.9, PositionState::Long), Action::Hold);
    }

    #[test]
    fn sells_when_long_above_exit() {
        assert_eq!(decide(0.51, PositionState::Long), Action::Sell);
        assert_eq!(decide(1.0, PositionState::Long), Action::Sell);
    }

    #[test]
    fn no_sell_when_flat() {
        assert_eq!(decide(0.9, PositionState::Flat), Action::Hold);
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(decide(-0.5, PositionState::Flat), Action::Hold);
        assert_eq!(decide(0.5, PositionState::Long), Action::Hold);
    }

    #[test]
    fn nan_always_holds() {
        assert_eq!(decide(f64::NAN, PositionState::Flat), Action::Hold);
        assert_eq!(decide(f64::NAN, PositionState::Long), Action::Hold);
    }

    #[test]
    fn next_state_follows_action() {
        assert_eq!(
            Action::Buy.next_state(PositionState::Flat),
            PositionState::Long
        );
        assert_eq!(
            Action::Sell.next_state(PositionState::Long),
            PositionState::Flat
        );
        assert_eq!(
            Action::Hold.next_state(PositionState::Long),
            PositionState::Long
        );
        assert_eq!(Action::Hold.side(), None);
    }
}
