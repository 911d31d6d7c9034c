//! Deterministic historical replay.
//!
//! The harness walks an ordered candle series strictly sequentially, asking
//! the scorer for a signal at each step with only the candles seen so far,
//! driving one position at a time through the risk machine, and folding the
//! closed trades into aggregate statistics. Identical inputs produce
//! byte-identical results.

pub mod fingerprint;
pub mod harness;
pub mod stats;

pub use fingerprint::{run_fingerprint, Fingerprint};
pub use harness::{
    run_backtest, BacktestParams, BacktestReport, FactorProvider, NoExternalFactors, SkippedTick,
};
pub use stats::BacktestResult;
