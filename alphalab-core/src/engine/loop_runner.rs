//! Bar-by-bar simulation loop — the heart of the backtesting engine.
//!
//! Per bar step `t`, for every instrument that still has a bar at `t`:
//! 1. Precondition: the bar carries every required field
//! 2. Signal: rank-correlation alpha over the trailing lookback window
//! 3. Decision: position state machine maps signal + state to an action
//! 4. Execution: BUY/SELL are filled at the same bar's reference price
//!
//! Series are not aligned by timestamp: each one is walked at its own pace
//! and the loop finishes once the longest series is exhausted.

use crate::domain::InstrumentSeries;
use crate::signal::{RankCorrelationAlpha, MIN_LOOKBACK};

use super::execution::{ExecutionError, ExecutionSimulator};
use super::state::{EngineConfig, EnginePhase, EngineState, RunResult, SignalScope};
use super::state_machine::decide;

use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed bar reached the engine: {symbol} at index {index}")]
    MalformedBar { symbol: String, index: usize },

    #[error("execution failed: {0}")]
    Execution(#[from] ExecutionError),
}

/// Pull-based simulation engine.
///
/// Owns every piece of mutable state for one run, so independent runs never
/// share anything.
pub struct Engine {
    series: Vec<InstrumentSeries>,
    config: EngineConfig,
    alpha: RankCorrelationAlpha,
    simulator: ExecutionSimulator,
    state: EngineState,
    phase: EnginePhase,
    steps: usize,
}

impl Engine {
    pub fn new(series: Vec<InstrumentSeries>, config: EngineConfig) -> Result<Self, EngineError> {
        if config.lookback_period < MIN_LOOKBACK {
            return Err(EngineError::InvalidConfig(format!(
                "lookback_period must be >= {MIN_LOOKBACK}, got {}",
                config.lookback_period
            )));
        }
        if !(config.trade_quantity.is_finite() && config.trade_quantity > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "trade_quantity must be positive, got {}",
                config.trade_quantity
            )));
        }

        let mut symbols = HashSet::new();
        for s in &series {
            if !symbols.insert(s.symbol()) {
                return Err(EngineError::InvalidConfig(format!(
                    "duplicate instrument symbol '{}'",
                    s.symbol()
                )));
            }
        }

        let steps = series.iter().map(InstrumentSeries::len).max().unwrap_or(0);
        Ok(Self {
            alpha: RankCorrelationAlpha::new(config.lookback_period),
            simulator: ExecutionSimulator::new(config.cost_model, config.trade_quantity),
            state: EngineState::new(config.starting_cash),
            phase: EnginePhase::Initialized,
            series,
            config,
            steps,
        })
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process bar step `state.bar_index` across all instruments.
    ///
    /// Returns `Ok(true)` while more bars remain and `Ok(false)` once the
    /// engine is `Finished`.
    pub fn step(&mut self) -> Result<bool, EngineError> {
        match self.phase {
            EnginePhase::Finished => return Ok(false),
            EnginePhase::Initialized => {
                tracing::debug!(
                    instruments = self.series.len(),
                    steps = self.steps,
                    lookback = self.config.lookback_period,
                    "engine running"
                );
                self.phase = EnginePhase::Running;
            }
            EnginePhase::Running => {}
        }

        let t = self.state.bar_index;
        if t >= self.steps {
            self.phase = EnginePhase::Finished;
            return Ok(false);
        }

        for (i, series) in self.series.iter().enumerate() {
            let Some(bar) = series.get(t) else {
                continue;
            };
            let symbol = series.symbol();
            if !bar.is_valid() {
                return Err(EngineError::MalformedBar {
                    symbol: symbol.to_string(),
                    index: t,
                });
            }

            self.state.last_close.insert(symbol.to_string(), bar.close);
            *self.state.bar_counts.entry(symbol.to_string()).or_default() += 1;

            if self.config.signal_scope == SignalScope::Primary && i != 0 {
                continue;
            }

            let signal = self.alpha.evaluate(series.bars(), t);
            if !signal.is_nan() {
                self.state.signal_count += 1;
            }

            let action = decide(signal, self.state.portfolio.state(symbol));
            if let Some(side) = action.side() {
                let fill = self.simulator.fill(
                    side,
                    symbol,
                    t,
                    bar,
                    &mut self.state.portfolio,
                    &mut self.state.ledger,
                )?;
                self.state.fills.push(fill);
            }
        }

        let equity = self.state.equity();
        self.state.equity_curve.push(equity);
        self.state.bar_index += 1;

        if self.state.bar_index >= self.steps {
            self.phase = EnginePhase::Finished;
        }
        Ok(self.phase != EnginePhase::Finished)
    }

    /// Drive `step` until every series is exhausted.
    pub fn run(mut self) -> Result<RunResult, EngineError> {
        while self.step()? {}

        let state = self.state;
        let final_value = state.equity();
        tracing::debug!(
            trades = state.ledger.len(),
            final_value,
            "engine finished"
        );

        Ok(RunResult {
            starting_cash: self.config.starting_cash,
            final_cash: state.portfolio.cash,
            final_value,
            open_positions: state.portfolio.positions.into_values().collect(),
            trades: state.ledger,
            fills: state.fills,
            equity_curve: state.equity_curve,
            bar_counts: state.bar_counts,
            steps: self.steps,
            signal_count: state.signal_count,
            total_commission: state.portfolio.total_commission,
            total_slippage: state.portfolio.total_slippage,
        })
    }
}

/// Run a backtest over `series` to completion.
pub fn run_backtest(
    series: Vec<InstrumentSeries>,
    config: &EngineConfig,
) -> Result<RunResult, EngineError> {
    Engine::new(series, config.clone())?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;
    use chrono::{Duration, NaiveDate};

    fn series(symbol: &str, opens: &[f64], volumes: &[f64]) -> InstrumentSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let bars = opens
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&open, &volume))| Bar {
                timestamp: base + Duration::days(i as i64),
                open,
                high: open * 1.1,
                low: open * 0.9,
                close: open,
                volume,
            })
            .collect();
        InstrumentSeries::new(symbol, bars).unwrap()
    }

    #[test]
    fn lifecycle_initialized_running_finished() {
        let s = series("AAA", &[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        let mut engine = Engine::new(vec![s], EngineConfig::new(1_000.0, 2)).unwrap();
        assert_eq!(engine.phase(), EnginePhase::Initialized);
        assert!(engine.step().unwrap());
        assert_eq!(engine.phase(), EnginePhase::Running);
        assert!(engine.step().unwrap());
        assert!(!engine.step().unwrap());
        assert_eq!(engine.phase(), EnginePhase::Finished);
        assert!(!engine.step().unwrap());
        assert_eq!(engine.state().equity_curve.len(), 3);
    }

    #[test]
    fn no_instruments_finishes_immediately() {
        let mut engine = Engine::new(vec![], EngineConfig::default()).unwrap();
        assert!(!engine.step().unwrap());
        assert_eq!(engine.phase(), EnginePhase::Finished);
        let result = Engine::new(vec![], EngineConfig::default())
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(result.final_value, 1_000_000.0);
        assert!(result.trades.is_empty());
    }

    #[test]
    fn rejects_short_lookback() {
        let err = Engine::new(vec![], EngineConfig::new(1_000.0, 1)).err().unwrap();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_duplicate_symbols() {
        let a = series("AAA", &[1.0, 2.0], &[1.0, 2.0]);
        let b = series("AAA", &[5.0, 6.0], &[2.0, 1.0]);
        let err = Engine::new(vec![a, b], EngineConfig::new(1_000.0, 2))
            .err()
            .unwrap();
        assert!(matches!(err, EngineError::InvalidConfig(msg) if msg.contains("AAA")));
    }

    #[test]
    fn malformed_bar_is_fatal() {
        let mut s = series("AAA", &[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        let mut bars = s.bars().to_vec();
        bars[1].close = f64::NAN;
        s = InstrumentSeries::new("AAA", bars).unwrap();
        let err = run_backtest(vec![s], &EngineConfig::new(1_000.0, 2)).unwrap_err();
        assert_eq!(
            err,
            EngineError::MalformedBar {
                symbol: "AAA".into(),
                index: 1
            }
        );
    }

    #[test]
    fn uneven_series_walked_to_completion() {
        let a = series("AAA", &[1.0, 2.0], &[1.0, 1.0]);
        let b = series("BBB", &[1.0, 2.0, 3.0, 4.0, 5.0], &[1.0; 5]);
        let result = run_backtest(vec![a, b], &EngineConfig::new(1_000.0, 2)).unwrap();
        assert_eq!(result.steps, 5);
        assert_eq!(result.bar_counts["AAA"], 2);
        assert_eq!(result.bar_counts["BBB"], 5);
    }

    #[test]
    fn buy_then_sell_on_signal_flip() {
        // Bars 0-2: open and volume rise together → signal -1 → BUY at bar 1.
        // Bars 3-4: open rises while volume collapses → signal +1 → SELL.
        let s = series(
            "AAA",
            &[10.0, 11.0, 12.0, 13.0, 14.0],
            &[100.0, 200.0, 300.0, 50.0, 10.0],
        );
        let config = EngineConfig::new(1_000.0, 2);
        let result = run_backtest(vec![s], &config).unwrap();
        assert_eq!(result.trades.len(), 1);
        let trade = &result.trades[0];
        assert_eq!(trade.entry_index, 1);
        assert_eq!(trade.exit_index, 3);
        assert_eq!(trade.entry_fill_price, 11.0);
        assert_eq!(trade.exit_fill_price, 13.0);
        assert!((result.final_cash - 1_000.0 - trade.pnl).abs() < 1e-9);
        assert!(result.open_positions.is_empty());
    }

    #[test]
    fn primary_scope_ignores_secondary_instruments() {
        let flat = series("AAA", &[1.0; 4], &[1.0; 4]);
        let trending = series("BBB", &[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0]);

        let primary = run_backtest(
            vec![flat.clone(), trending.clone()],
            &EngineConfig::new(1_000.0, 2),
        )
        .unwrap();
        assert!(primary.fills.is_empty());

        let per_instrument = run_backtest(
            vec![flat, trending],
            &EngineConfig::new(1_000.0, 2).with_scope(SignalScope::PerInstrument),
        )
        .unwrap();
        assert_eq!(per_instrument.fills.len(), 1);
        assert_eq!(per_instrument.fills[0].symbol, "BBB");
        assert_eq!(per_instrument.open_positions.len(), 1);
    }

    #[test]
    fn open_position_is_marked_to_market() {
        let s = series("AAA", &[10.0, 11.0, 12.0], &[1.0, 2.0, 3.0]);
        let config = EngineConfig::new(1_000.0, 2);
        let result = run_backtest(vec![s], &config).unwrap();
        assert!(result.trades.is_empty());
        assert_eq!(result.open_positions.len(), 1);
        // bought 1 unit at 11 with 0.022 costs, marked at 12
        assert!((result.final_cash - (1_000.0 - 11.0 - 0.022)).abs() < 1e-9);
        assert!((result.final_value - (result.final_cash + 12.0)).abs() < 1e-9);
    }
}
