//! CSV bar provider.
//!
//! Reads one instrument per file. Headers are matched case-insensitively;
//! the time column is auto-detected. Rows whose time or required fields do
//! not parse (invalid UTF-8 included), or whose prices are not positive, are
//! dropped at load time so the engine only ever sees complete bars.

use super::provider::{BarDataProvider, BarSource, DataError, REQUIRED_COLUMNS};
use super::timestamp::{find_time_column, parse_timestamp};
use crate::domain::{Bar, InstrumentSeries};
use std::fs::File;
use std::io::Read;

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvProvider;

impl CsvProvider {
    pub fn new() -> Self {
        Self
    }
}

impl BarDataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn load(&self, source: &BarSource) -> Result<InstrumentSeries, DataError> {
        let file = File::open(&source.path).map_err(|e| DataError::Io {
            symbol: source.symbol.clone(),
            source: e,
        })?;
        read_series(&source.symbol, file)
    }
}

/// Parse CSV content from any reader into an instrument series.
pub fn read_series<R: Read>(symbol: &str, reader: R) -> Result<InstrumentSeries, DataError> {
    let csv_err = |e: csv::Error| DataError::Csv {
        symbol: symbol.to_string(),
        source: e,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_ascii_lowercase())
        .collect();

    let mut cols = [0usize; 5];
    for (slot, name) in cols.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::MissingColumn {
                symbol: symbol.to_string(),
                column: name.to_string(),
            })?;
    }
    let time_col = find_time_column(&headers).ok_or_else(|| DataError::NoTimeColumn {
        symbol: symbol.to_string(),
    })?;

    let mut bars = Vec::new();
    let mut dropped = 0usize;
    for record in rdr.byte_records() {
        let record = record.map_err(csv_err)?;
        let text = |i: usize| record.get(i).and_then(|v| std::str::from_utf8(v).ok());
        let field = |i: usize| text(i).and_then(|v| v.parse::<f64>().ok());

        let bar = match (
            text(time_col).and_then(parse_timestamp),
            field(cols[0]),
            field(cols[1]),
            field(cols[2]),
            field(cols[3]),
            field(cols[4]),
        ) {
            (Some(timestamp), Some(open), Some(high), Some(low), Some(close), Some(volume)) => {
                Bar {
                    timestamp,
                    open,
                    high,
                    low,
                    close,
                    volume,
                }
            }
            _ => {
                dropped += 1;
                continue;
            }
        };
        if !bar.is_valid() {
            dropped += 1;
            continue;
        }
        bars.push(bar);
    }

    // Normalize to a strictly increasing index: stable sort, first row wins.
    let before_dedup = bars.len();
    bars.sort_by_key(|b| b.timestamp);
    bars.dedup_by_key(|b| b.timestamp);
    dropped += before_dedup - bars.len();

    if bars.is_empty() {
        return Err(DataError::Empty {
            symbol: symbol.to_string(),
            dropped,
        });
    }
    if dropped > 0 {
        tracing::debug!(symbol, dropped, kept = bars.len(), "dropped unusable rows");
    }

    Ok(InstrumentSeries::new(symbol, bars)?)
}
