//! Signal computation.
//!
//! Signals are portfolio-agnostic: they read bar history only, never
//! position or cash state.

pub mod alpha;
pub mod rank;

pub use alpha::{signal, signal_at, RankCorrelationAlpha, MIN_LOOKBACK};
pub use rank::{average_ranks, pearson, spearman};
