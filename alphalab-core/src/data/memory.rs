//! In-memory bar provider for tests and generated data.

use super::provider::{BarDataProvider, BarSource, DataError};
use crate::domain::{Bar, InstrumentSeries};
use std::collections::HashMap;

/// Serves bars registered by symbol; the source path is ignored.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    bars: HashMap<String, Vec<Bar>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: impl Into<String>, bars: Vec<Bar>) {
        self.bars.insert(symbol.into(), bars);
    }

    pub fn with_series(mut self, symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        self.insert(symbol, bars);
        self
    }

    /// Sources for every registered symbol, sorted by symbol.
    pub fn sources(&self) -> Vec<BarSource> {
        let mut symbols: Vec<&String> = self.bars.keys().collect();
        symbols.sort();
        symbols
            .into_iter()
            .map(|s| BarSource::new(s.clone(), format!("memory://{s}")))
            .collect()
    }
}

impl BarDataProvider for InMemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self, source: &BarSource) -> Result<InstrumentSeries, DataError> {
        let bars = self
            .bars
            .get(&source.symbol)
            .ok_or_else(|| DataError::UnknownSource {
                symbol: source.symbol.clone(),
            })?;
        if bars.is_empty() {
            return Err(DataError::Empty {
                symbol: source.symbol.clone(),
                dropped: 0,
            });
        }
        Ok(InstrumentSeries::new(source.symbol.clone(), bars.clone())?)
    }
}
