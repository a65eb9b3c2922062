//! Source loading for the runner.
//!
//! Loads every source through a `BarDataProvider`. A source that fails to
//! load (missing column, no time column, unreadable file, no usable rows) is
//! recorded as skipped and logged; the remaining sources still run. So is a
//! source whose symbol was already loaded from an earlier source.

use alphalab_core::data::{BarDataProvider, BarSource};
use alphalab_core::domain::InstrumentSeries;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A source that could not be loaded, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSource {
    pub symbol: String,
    pub reason: String,
}

/// Result of loading sources, including provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    /// Loaded series, in source order. The first one is the primary instrument.
    pub series: Vec<InstrumentSeries>,
    pub skipped: Vec<SkippedSource>,
    /// Dataset hash for fingerprinting (BLAKE3 over all bar data).
    pub dataset_hash: String,
}

impl LoadedData {
    pub fn from_series(series: Vec<InstrumentSeries>) -> Self {
        let dataset_hash = compute_dataset_hash(&series);
        Self {
            series,
            skipped: Vec::new(),
            dataset_hash,
        }
    }

    pub fn symbols(&self) -> Vec<String> {
        self.series.iter().map(|s| s.symbol().to_string()).collect()
    }
}

/// Load `sources` in order, skipping the ones that fail.
pub fn load_sources(provider: &dyn BarDataProvider, sources: &[BarSource]) -> LoadedData {
    let mut series = Vec::with_capacity(sources.len());
    let mut skipped = Vec::new();
    let mut loaded = HashSet::new();

    for source in sources {
        if loaded.contains(source.symbol.as_str()) {
            tracing::warn!(
                symbol = %source.symbol,
                path = %source.path.display(),
                "skipping source with duplicate symbol"
            );
            skipped.push(SkippedSource {
                symbol: source.symbol.clone(),
                reason: format!("duplicate symbol ({})", source.path.display()),
            });
            continue;
        }
        match provider.load(source) {
            Ok(s) => {
                tracing::debug!(
                    symbol = %source.symbol,
                    provider = provider.name(),
                    bars = s.len(),
                    "loaded source"
                );
                loaded.insert(source.symbol.as_str());
                series.push(s);
            }
            Err(e) => {
                tracing::warn!(symbol = %source.symbol, error = %e, "skipping source");
                skipped.push(SkippedSource {
                    symbol: source.symbol.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let dataset_hash = compute_dataset_hash(&series);
    tracing::info!(
        loaded = series.len(),
        skipped = skipped.len(),
        dataset_hash = %dataset_hash,
        "sources loaded"
    );

    LoadedData {
        series,
        skipped,
        dataset_hash,
    }
}

/// Compute a deterministic BLAKE3 hash over all bar data.
///
/// The hash covers timestamps and all OHLCV values in sorted symbol order,
/// so it does not depend on the order sources were given in.
pub fn compute_dataset_hash(series: &[InstrumentSeries]) -> String {
    let mut hasher = blake3::Hasher::new();

    let mut sorted: Vec<&InstrumentSeries> = series.iter().collect();
    sorted.sort_by(|a, b| a.symbol().cmp(b.symbol()));

    for s in sorted {
        hasher.update(s.symbol().as_bytes());
        for bar in s.bars() {
            hasher.update(&bar.timestamp.and_utc().timestamp().to_le_bytes());
            hasher.update(&bar.open.to_le_bytes());
            hasher.update(&bar.high.to_le_bytes());
            hasher.update(&bar.low.to_le_bytes());
            hasher.update(&bar.close.to_le_bytes());
            hasher.update(&bar.volume.to_le_bytes());
        }
    }

    hasher.finalize().to_hex().to_string()
}
