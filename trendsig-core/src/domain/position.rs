//! Position — a single open trade with evolving risk levels.
//!
//! A `Position` is created when a gated signal is accepted, mutated only by
//! the risk state machine (`risk::PositionRisk`), and archived as a
//! [`TradeRecord`](super::trade::TradeRecord) on exit. No other component
//! writes `current_stop_loss`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// +1 for long, -1 for short. Collapses most side-dependent arithmetic.
    pub fn sign(&self) -> f64 {
        match self {
            Side::Long => 1.0,
            Side::Short => -1.0,
        }
    }
}

/// Trailing-stop lifecycle of the position.
///
/// `Armed` means the profit trigger price is set but not yet crossed;
/// `Active` means every favorable tick may ratchet the stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrailingState {
    None,
    Armed,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub side: Side,
    pub entry_price: f64,
    pub entry_time: DateTime<Utc>,
    pub initial_stop_loss: f64,
    pub take_profit: f64,
    pub trailing: TrailingState,
    pub current_stop_loss: f64,
    pub status: PositionStatus,
}

impl Position {
    /// Per-unit unrealized PnL at `price`.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.side.sign() * (price - self.entry_price)
    }

    /// Strictly profitable at `price` — breakeven does not count.
    pub fn is_profitable(&self, price: f64) -> bool {
        self.unrealized_pnl(price) > 0.0
    }

    pub fn is_open(&self) -> bool {
        self.status == PositionStatus::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_position(side: Side) -> Position {
        Position {
            symbol: "BTCUSDT".into(),
            side,
            entry_price: 100.0,
            entry_time: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            initial_stop_loss: if side == Side::Long { 97.0 } else { 103.0 },
            take_profit: if side == Side::Long { 103.9 } else { 96.1 },
            trailing: TrailingState::Armed,
            current_stop_loss: if side == Side::Long { 97.0 } else { 103.0 },
            status: PositionStatus::Open,
        }
    }

    #[test]
    fn long_pnl_sign() {
        let pos = sample_position(Side::Long);
        assert!(pos.is_profitable(101.0));
        assert!(!pos.is_profitable(100.0)); // breakeven is not profit
        assert!(!pos.is_profitable(99.0));
    }

    #[test]
    fn short_pnl_sign() {
        let pos = sample_position(Side::Short);
        assert!(pos.is_profitable(99.0));
        assert!(!pos.is_profitable(101.0));
        assert_eq!(pos.unrealized_pnl(98.0), 2.0);
    }
}
