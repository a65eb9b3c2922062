//! AlphaLab Runner — backtest orchestration, metrics, sweeps, synthetic data.
//!
//! This crate builds on `alphalab-core` to provide:
//! - Validated TOML configuration
//! - Source loading with skip-and-continue and a dataset hash
//! - Single-backtest runner returning a performance report
//! - Trade-level performance metrics
//! - Parallel lookback sweeps
//! - Deterministic synthetic instruments
//! - Plain-text summaries

pub mod config;
pub mod data_loader;
pub mod metrics;
pub mod runner;
pub mod summary;
pub mod sweep;
pub mod synthetic;

pub use config::{BacktestConfig, ConfigError};
pub use data_loader::{compute_dataset_hash, load_sources, LoadedData, SkippedSource};
pub use metrics::PerformanceReport;
pub use runner::{run, run_loaded, run_with_config, BacktestResult, RunError, SCHEMA_VERSION};
pub use summary::{render_summary, render_sweep};
pub use sweep::{best_by_sharpe, sweep_loaded, sweep_lookbacks, SweepRow};
pub use synthetic::{synthetic_bars, synthetic_series, synthetic_universe, write_csv};
