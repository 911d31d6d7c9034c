//! TrendSig Core — signal scoring and risk lifecycle for perpetual futures.
//!
//! This crate contains the decision core of the trading system:
//! - Domain types (candles, positions, trades, symbol categories)
//! - NaN-aware indicator kernels (MA, ATR, ADX, MACD, VWAP, order-flow delta)
//! - Harmonic pattern matcher (Cypher, Bat, Shark) over rolling pivot windows
//! - Three-layer weighted scorer fusing trend, factor and entry reads
//! - Per-position risk state machine with dynamic stop management
//! - Deterministic backtest harness with fingerprinted, reproducible runs

pub mod backtest;
pub mod domain;
pub mod error;
pub mod harmonic;
pub mod indicators;
pub mod risk;
pub mod scoring;
