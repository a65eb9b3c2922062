//! Bar data providers and source discovery

pub mod csv_provider;
pub mod discover;
pub mod memory;
pub mod provider;
pub mod timestamp;

pub use csv_provider::{read_series, CsvProvider};
pub use discover::{discover_sources, resolve_sources};
pub use memory::InMemoryProvider;
pub use provider::{BarDataProvider, BarSource, DataError, REQUIRED_COLUMNS};
pub use timestamp::{find_time_column, parse_timestamp};
