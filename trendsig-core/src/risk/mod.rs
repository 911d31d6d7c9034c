//! Position risk lifecycle.
//!
//! One `PositionRisk` per open position. It owns all stop-loss mutation:
//! initial placement by confidence tier, breakeven moves on trend
//! confirmation, ratcheting trailing stops, and the exit checks. Every
//! stop move is appended to an audit trail.

pub mod machine;
pub mod params;

pub use machine::{stop_loss_hit, take_profit_hit, PositionRisk, StopEvent, StopTransition};
pub use params::{Confidence, RiskParams};
