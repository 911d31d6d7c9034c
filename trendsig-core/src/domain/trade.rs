//! TradeRecord — immutable snapshot of a closed position.

use super::position::{Position, Side};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    /// Forced out: held past the time threshold without being profitable.
    TimeStop,
    /// A gated signal in the opposite direction replaced the position.
    OppositeSignal,
    /// Forced close at end of replay / early termination.
    Manual,
}

/// A complete round-trip trade: entry → exit, per-unit PnL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub symbol: String,
    pub side: Side,
    pub entry_price: f64,
    pub entry_time: DateTime<Utc>,
    pub exit_price: f64,
    pub exit_time: DateTime<Utc>,
    pub exit_reason: ExitReason,
    pub pnl: f64,
    pub duration_ms: i64,
}

impl TradeRecord {
    /// Build the record from a closed position.
    pub fn from_closed(
        position: &Position,
        exit_price: f64,
        exit_time: DateTime<Utc>,
        exit_reason: ExitReason,
    ) -> Self {
        TradeRecord {
            symbol: position.symbol.clone(),
            side: position.side,
            entry_price: position.entry_price,
            entry_time: position.entry_time,
            exit_price,
            exit_time,
            exit_reason,
            pnl: position.side.sign() * (exit_price - position.entry_price),
            duration_ms: (exit_time - position.entry_time).num_milliseconds(),
        }
    }

    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }
}
