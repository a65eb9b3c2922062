//! Domain types for AlphaLab

pub mod bar;
pub mod fill;
pub mod instrument;
pub mod portfolio;
pub mod position;
pub mod trade;

pub use bar::Bar;
pub use fill::{Fill, OrderSide};
pub use instrument::{InstrumentSeries, SeriesError};
pub use portfolio::Portfolio;
pub use position::{Position, PositionState};
pub use trade::Trade;
