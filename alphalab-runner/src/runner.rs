//! Backtest runner — wires together sources, engine, and metrics.
//!
//! Entry points:
//! - `run()`: CSV sources plus the four reference parameters, report only.
//! - `run_with_config()`: any provider and a full `BacktestConfig`. Used by CLI.
//! - `run_loaded()`: pre-loaded data, no I/O. Used by the lookback sweep.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use alphalab_core::data::{BarDataProvider, BarSource, CsvProvider};
use alphalab_core::domain::{Position, Trade};
use alphalab_core::engine::{run_backtest, EngineError};

use crate::config::{BacktestConfig, ConfigError};
use crate::data_loader::{load_sources, LoadedData, SkippedSource};
use crate::metrics::PerformanceReport;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Current schema version for serialized results.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub report: PerformanceReport,
    pub config: BacktestConfig,
    pub trades: Vec<Trade>,
    /// Positions still open when the data ran out, marked to market in
    /// `report.final_value`.
    pub open_positions: Vec<Position>,
    pub equity_curve: Vec<f64>,
    /// Loaded symbols in source order; the first is the primary instrument.
    pub symbols: Vec<String>,
    pub skipped: Vec<SkippedSource>,
    pub dataset_hash: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub bar_counts: BTreeMap<String, usize>,
    pub steps: usize,
    pub signal_count: usize,
    pub final_cash: f64,
    pub total_commission: f64,
    pub total_slippage: f64,
}

impl BacktestResult {
    pub fn primary_symbol(&self) -> Option<&str> {
        self.symbols.first().map(String::as_str)
    }
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Run over CSV sources with the given parameters and default sizing.
pub fn run(
    sources: &[BarSource],
    lookback_period: usize,
    commission_rate: f64,
    slippage_rate: f64,
    starting_cash: f64,
) -> Result<PerformanceReport, RunError> {
    let config = BacktestConfig {
        lookback_period,
        commission_rate,
        slippage_rate,
        starting_cash,
        ..BacktestConfig::default()
    };
    Ok(run_with_config(&CsvProvider::new(), sources, &config)?.report)
}

/// Validate `config`, load `sources` and run a backtest.
///
/// Sources that fail to load are listed in `BacktestResult::skipped`; the
/// run continues with the rest, and with none at all the report is flat.
pub fn run_with_config(
    provider: &dyn BarDataProvider,
    sources: &[BarSource],
    config: &BacktestConfig,
) -> Result<BacktestResult, RunError> {
    config.validate()?;
    let loaded = load_sources(provider, sources);
    run_loaded(&loaded, config)
}

/// Run a backtest on pre-loaded data — no I/O.
pub fn run_loaded(loaded: &LoadedData, config: &BacktestConfig) -> Result<BacktestResult, RunError> {
    config.validate()?;
    let engine_config = config.to_engine_config();

    tracing::info!(
        instruments = loaded.series.len(),
        lookback = config.lookback_period,
        scope = ?config.signal_scope,
        "running backtest"
    );
    let result = run_backtest(loaded.series.clone(), &engine_config)?;

    let report = PerformanceReport::compute(config.starting_cash, result.final_value, &result.trades)
        .with_equity_curve(&result.equity_curve);
    tracing::info!(
        trades = report.trade_count,
        open = result.open_positions.len(),
        final_value = report.final_value,
        total_return_pct = report.total_return_pct,
        "backtest finished"
    );

    let start = loaded
        .series
        .iter()
        .filter_map(|s| s.span())
        .map(|(first, _)| first)
        .min();
    let end = loaded
        .series
        .iter()
        .filter_map(|s| s.span())
        .map(|(_, last)| last)
        .max();

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        report,
        config: config.clone(),
        trades: result.trades,
        open_positions: result.open_positions,
        equity_curve: result.equity_curve,
        symbols: loaded.symbols(),
        skipped: loaded.skipped.clone(),
        dataset_hash: loaded.dataset_hash.clone(),
        start,
        end,
        bar_counts: result.bar_counts,
        steps: result.steps,
        signal_count: result.signal_count,
        final_cash: result.final_cash,
        total_commission: result.total_commission,
        total_slippage: result.total_slippage,
    })
}
