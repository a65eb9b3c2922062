//! Backtesting engine — bar-by-bar simulation loop and supporting pieces.
//!
//! The engine consumes immutable instrument series and runs, per bar:
//!
//! 1. Signal: rank-correlation alpha (`crate::signal`)
//! 2. Decision: long-only state machine (`state_machine`)
//! 3. Execution: cost-aware fills against the shared portfolio (`execution`)

pub mod execution;
pub mod loop_runner;
pub mod state;
pub mod state_machine;

pub use execution::{
    CostModel, ExecutionError, ExecutionSimulator, FillCosts, DEFAULT_COMMISSION_RATE,
    DEFAULT_SLIPPAGE_RATE,
};
pub use loop_runner::{run_backtest, Engine, EngineError};
pub use state::{
    EngineConfig, EnginePhase, EngineState, RunResult, SignalScope, DEFAULT_LOOKBACK,
    DEFAULT_STARTING_CASH, DEFAULT_TRADE_QUANTITY,
};
pub use state_machine::{decide, Action, ENTRY_THRESHOLD, EXIT_THRESHOLD};
