//! Engine configuration, mutable state, and run result types.

use crate::domain::{Fill, Portfolio, Position, Trade};
use crate::engine::execution::CostModel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_LOOKBACK: usize = 10;
pub const DEFAULT_STARTING_CASH: f64 = 1_000_000.0;
pub const DEFAULT_TRADE_QUANTITY: f64 = 1.0;

/// Which instruments the alpha is evaluated and traded on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalScope {
    /// Only the first loaded instrument is scored and traded. The others are
    /// walked bar by bar but never acted on.
    #[default]
    Primary,
    /// Every instrument is scored on its own bars and holds its own position.
    PerInstrument,
}

/// Configuration for a single backtest run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub lookback_period: usize,
    pub cost_model: CostModel,
    pub starting_cash: f64,
    /// Units bought on every BUY.
    pub trade_quantity: f64,
    pub signal_scope: SignalScope,
}

impl EngineConfig {
    pub fn new(starting_cash: f64, lookback_period: usize) -> Self {
        Self {
            lookback_period,
            cost_model: CostModel::default(),
            starting_cash,
            trade_quantity: DEFAULT_TRADE_QUANTITY,
            signal_scope: SignalScope::Primary,
        }
    }

    pub fn with_costs(mut self, cost_model: CostModel) -> Self {
        self.cost_model = cost_model;
        self
    }

    pub fn with_quantity(mut self, trade_quantity: f64) -> Self {
        self.trade_quantity = trade_quantity;
        self
    }

    pub fn with_scope(mut self, signal_scope: SignalScope) -> Self {
        self.signal_scope = signal_scope;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_STARTING_CASH, DEFAULT_LOOKBACK)
    }
}

/// Simulation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnginePhase {
    Initialized,
    Running,
    Finished,
}

/// Mutable state that evolves bar-by-bar during the engine loop.
#[derive(Debug, Clone)]
pub struct EngineState {
    pub portfolio: Portfolio,
    /// Closed trades in closing order.
    pub ledger: Vec<Trade>,
    pub fills: Vec<Fill>,
    /// Next bar index to process.
    pub bar_index: usize,
    /// Last observed close per symbol, for mark-to-market.
    pub last_close: HashMap<String, f64>,
    /// Bars processed per symbol.
    pub bar_counts: BTreeMap<String, usize>,
    /// Bars on which the alpha produced a defined value.
    pub signal_count: usize,
    /// Equity after each bar step.
    pub equity_curve: Vec<f64>,
}

impl EngineState {
    pub fn new(starting_cash: f64) -> Self {
        Self {
            portfolio: Portfolio::new(starting_cash),
            ledger: Vec::new(),
            fills: Vec::new(),
            bar_index: 0,
            last_close: HashMap::new(),
            bar_counts: BTreeMap::new(),
            signal_count: 0,
            equity_curve: Vec::new(),
        }
    }

    /// Cash plus open positions marked at their last seen close.
    pub fn equity(&self) -> f64 {
        self.portfolio.equity(&self.last_close)
    }
}

/// Result of a complete backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub starting_cash: f64,
    pub final_cash: f64,
    /// Final cash plus positions still open, marked at their last close.
    pub final_value: f64,
    /// Closed round-trip trades, in closing order.
    pub trades: Vec<Trade>,
    pub fills: Vec<Fill>,
    /// Positions never closed before the data ran out.
    pub open_positions: Vec<Position>,
    pub equity_curve: Vec<f64>,
    pub bar_counts: BTreeMap<String, usize>,
    /// Number of bar steps (the longest series length).
    pub steps: usize,
    pub signal_count: usize,
    pub total_commission: f64,
    pub total_slippage: f64,
}
