//! Bar data provider trait and structured error types.
//!
//! The BarDataProvider trait abstracts over where bars come from (CSV files,
//! in-memory fixtures, synthetic generators) so the engine never touches I/O.

use crate::domain::{InstrumentSeries, SeriesError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Columns every source must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = ["open", "high", "low", "close", "volume"];

/// One loadable source: a symbol and where its bars live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarSource {
    pub symbol: String,
    pub path: PathBuf,
}

impl BarSource {
    pub fn new(symbol: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            symbol: symbol.into(),
            path: path.into(),
        }
    }

    /// Source whose symbol is the file stem (`data/AAPL.csv` → `AAPL`).
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let symbol = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::new(symbol, path)
    }
}

/// Structured error types for data operations.
///
/// Every variant is scoped to a single source: callers skip that source and
/// carry on with the rest.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("{symbol}: missing required column '{column}'")]
    MissingColumn { symbol: String, column: String },

    #[error("{symbol}: no timestamp or date column")]
    NoTimeColumn { symbol: String },

    #[error("{symbol}: no usable bars ({dropped} rows dropped)")]
    Empty { symbol: String, dropped: usize },

    #[error("{symbol}: I/O error: {source}")]
    Io {
        symbol: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{symbol}: CSV error: {source}")]
    Csv {
        symbol: String,
        #[source]
        source: csv::Error,
    },

    #[error("{symbol}: unknown source")]
    UnknownSource { symbol: String },

    #[error(transparent)]
    Series(#[from] SeriesError),
}

impl DataError {
    /// Symbol of the source that failed.
    pub fn symbol(&self) -> &str {
        match self {
            DataError::MissingColumn { symbol, .. }
            | DataError::NoTimeColumn { symbol }
            | DataError::Empty { symbol, .. }
            | DataError::Io { symbol, .. }
            | DataError::Csv { symbol, .. }
            | DataError::UnknownSource { symbol } => symbol,
            DataError::Series(SeriesError::NotIncreasing { symbol, .. }) => symbol,
        }
    }
}

/// Trait for bar data providers.
///
/// Implementations must return a series that is strictly increasing in time
/// and contains only bars with every required field present.
pub trait BarDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    fn load(&self, source: &BarSource) -> Result<InstrumentSeries, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_from_file_stem() {
        let source = BarSource::from_path("data/daily/AAPL.csv");
        assert_eq!(source.symbol, "AAPL");
        assert_eq!(source.path, PathBuf::from("data/daily/AAPL.csv"));
    }

    #[test]
    fn error_carries_symbol() {
        let err = DataError::MissingColumn {
            symbol: "MSFT".into(),
            column: "volume".into(),
        };
        assert_eq!(err.symbol(), "MSFT");
        assert_eq!(err.to_string(), "MSFT: missing required column 'volume'");
    }
}
