//! AlphaLab Core — domain types, rank-correlation alpha, position state
//! machine, execution simulator and bar providers.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, instrument series, fills, positions, trades, portfolio)
//! - Alpha signal: negated Spearman correlation of open vs volume
//! - Long-only BUY/SELL/HOLD state machine
//! - Execution simulator with proportional commission and slippage
//! - Pull-based bar-by-bar engine
//! - Bar data providers (CSV, in-memory) and source discovery

pub mod data;
pub mod domain;
pub mod engine;
pub mod signal;
