//! InstrumentSeries — the immutable, time-ordered bar history of one symbol.

use super::bar::Bar;
use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("{symbol}: bar {index} at {timestamp} is not after the previous bar")]
    NotIncreasing {
        symbol: String,
        index: usize,
        timestamp: NaiveDateTime,
    },
}

/// Ordered bars for one tradable symbol.
///
/// Built once before the simulation starts and never mutated afterwards.
/// Construction enforces strictly increasing timestamps, so duplicates are
/// rejected too.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl InstrumentSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        let symbol = symbol.into();
        for (i, pair) in bars.windows(2).enumerate() {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(SeriesError::NotIncreasing {
                    symbol,
                    index: i + 1,
                    timestamp: pair[1].timestamp,
                });
            }
        }
        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// First and last timestamp, if any bars are present.
    pub fn span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((self.bars.first()?.timestamp, self.bars.last()?.timestamp))
    }
}
