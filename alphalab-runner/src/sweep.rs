//! Lookback sweep: the same data run at several lookback periods.
//!
//! Sources are loaded once; each lookback gets its own engine, so the runs
//! share nothing and execute in parallel on the rayon pool.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use alphalab_core::data::{BarDataProvider, BarSource};

use crate::config::BacktestConfig;
use crate::data_loader::{load_sources, LoadedData};
use crate::metrics::PerformanceReport;
use crate::runner::{run_loaded, RunError};

/// One sweep row: a lookback and the report it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub lookback_period: usize,
    pub report: PerformanceReport,
}

/// Load `sources` and run `base_config` once per entry of `lookbacks`.
///
/// Rows come back sorted by lookback; duplicate lookbacks are run once.
/// Any invalid lookback fails the whole sweep before anything runs.
pub fn sweep_lookbacks(
    provider: &dyn BarDataProvider,
    sources: &[BarSource],
    base_config: &BacktestConfig,
    lookbacks: &[usize],
) -> Result<Vec<SweepRow>, RunError> {
    let loaded = load_sources(provider, sources);
    sweep_loaded(&loaded, base_config, lookbacks)
}

/// Sweep over pre-loaded data.
pub fn sweep_loaded(
    loaded: &LoadedData,
    base_config: &BacktestConfig,
    lookbacks: &[usize],
) -> Result<Vec<SweepRow>, RunError> {
    let mut lookbacks = lookbacks.to_vec();
    lookbacks.sort_unstable();
    lookbacks.dedup();

    let configs: Vec<BacktestConfig> = lookbacks
        .iter()
        .map(|&lookback_period| BacktestConfig {
            lookback_period,
            ..base_config.clone()
        })
        .collect();
    for config in &configs {
        config.validate()?;
    }

    tracing::info!(runs = configs.len(), "starting lookback sweep");
    configs
        .par_iter()
        .map(|config| {
            let result = run_loaded(loaded, config)?;
            Ok(SweepRow {
                lookback_period: config.lookback_period,
                report: result.report,
            })
        })
        .collect()
}

/// Row with the highest Sharpe-like ratio; ties keep the shorter lookback.
pub fn best_by_sharpe(rows: &[SweepRow]) -> Option<&SweepRow> {
    rows.iter().fold(None, |best: Option<&SweepRow>, row| match best {
        Some(b) if b.report.sharpe >= row.report.sharpe => Some(b),
        _ => Some(row),
    })
}
