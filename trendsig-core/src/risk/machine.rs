//! The per-position risk state machine.
//!
//! Lifecycle: open → (trend confirmation)? → (trailing armed → active)? →
//! closed. Invariants enforced here:
//! - once trailing is active, the stop only ever tightens (ratchet);
//! - trend confirmation never moves the stop past breakeven and never
//!   loosens it beyond the initial stop;
//! - the time stop fires only on unprofitable positions;
//! - operations on a closed position are state violations.

use super::params::{Confidence, RiskParams};
use crate::domain::{
    ExitReason, Position, PositionStatus, Side, TradeRecord, TrailingState,
};
use crate::error::SignalError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stop-loss touch is boundary inclusive: equality counts as triggered.
pub fn stop_loss_hit(side: Side, price: f64, stop_loss: f64) -> bool {
    match side {
        Side::Long => price <= stop_loss,
        Side::Short => price >= stop_loss,
    }
}

/// Take-profit touch, boundary inclusive.
pub fn take_profit_hit(side: Side, price: f64, take_profit: f64) -> bool {
    match side {
        Side::Long => price >= take_profit,
        Side::Short => price <= take_profit,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopTransition {
    Opened,
    TrendConfirmed,
    TrailingActivated,
    TrailingAdvanced,
    Closed,
}

/// Audit record for one stop transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopEvent {
    pub timestamp: DateTime<Utc>,
    pub transition: StopTransition,
    pub from_sl: f64,
    pub to_sl: f64,
}

/// Owns a `Position` and all of its stop mutation.
#[derive(Debug, Clone)]
pub struct PositionRisk {
    position: Position,
    params: RiskParams,
    trail_step: f64,
    profit_trigger_price: f64,
    events: Vec<StopEvent>,
}

fn check_price(price: f64, what: &str) -> Result<(), SignalError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(SignalError::InvalidParameter(format!(
            "{what} must be positive and finite, got {price}"
        )));
    }
    Ok(())
}

impl PositionRisk {
    /// Open a position: size the initial stop and take profit from ATR and
    /// the confidence tier, and precompute the trailing parameters.
    pub fn open(
        symbol: &str,
        side: Side,
        entry_price: f64,
        entry_time: DateTime<Utc>,
        atr: f64,
        confidence: Confidence,
        params: &RiskParams,
    ) -> Result<Self, SignalError> {
        check_price(entry_price, "entry price")?;
        if !atr.is_finite() || atr <= 0.0 {
            return Err(SignalError::InvalidParameter(format!(
                "atr must be positive and finite, got {atr}"
            )));
        }
        params.validate()?;

        let k = params.k_entry(confidence);
        let sign = side.sign();
        let initial_stop_loss = entry_price - sign * atr * k;
        let take_profit = entry_price + sign * atr * k * params.tp_factor;
        let stop_distance = (entry_price - initial_stop_loss).abs();
        let profit_trigger_price = entry_price + sign * stop_distance * params.profit_trigger;
        let trail_step = atr * params.trail_step;

        let position = Position {
            symbol: symbol.to_string(),
            side,
            entry_price,
            entry_time,
            initial_stop_loss,
            take_profit,
            trailing: TrailingState::Armed,
            current_stop_loss: initial_stop_loss,
            status: PositionStatus::Open,
        };

        tracing::debug!(
            symbol,
            ?side,
            ?confidence,
            entry_price,
            initial_stop_loss,
            take_profit,
            profit_trigger_price,
            "position opened"
        );

        Ok(PositionRisk {
            position,
            params: params.clone(),
            trail_step,
            profit_trigger_price,
            events: vec![StopEvent {
                timestamp: entry_time,
                transition: StopTransition::Opened,
                from_sl: initial_stop_loss,
                to_sl: initial_stop_loss,
            }],
        })
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn events(&self) -> &[StopEvent] {
        &self.events
    }

    pub fn profit_trigger_price(&self) -> f64 {
        self.profit_trigger_price
    }

    pub fn trail_step(&self) -> f64 {
        self.trail_step
    }

    fn ensure_open(&self, op: &str) -> Result<(), SignalError> {
        if !self.position.is_open() {
            return Err(SignalError::StateViolation(format!(
                "{op} on closed position {}",
                self.position.symbol
            )));
        }
        Ok(())
    }

    fn record(&mut self, timestamp: DateTime<Utc>, transition: StopTransition, to_sl: f64) {
        let from_sl = self.position.current_stop_loss;
        self.events.push(StopEvent {
            timestamp,
            transition,
            from_sl,
            to_sl,
        });
        self.position.current_stop_loss = to_sl;
    }

    /// Move the stop toward breakeven after higher-timeframe momentum
    /// strengthens (MACD histogram grew by more than 30% and directional
    /// strength is rising).
    ///
    /// The new stop is clamped between the initial stop and entry: never
    /// past breakeven, never looser than the original stop. Returns whether
    /// the stop moved.
    pub fn confirm_trend(
        &mut self,
        current_atr: f64,
        macd_hist_increase: f64,
        adx_rising: bool,
        timestamp: DateTime<Utc>,
    ) -> Result<bool, SignalError> {
        self.ensure_open("trend confirmation")?;
        if !current_atr.is_finite() || current_atr <= 0.0 {
            return Err(SignalError::InvalidParameter(format!(
                "atr must be positive and finite, got {current_atr}"
            )));
        }

        if !(macd_hist_increase > 0.3 && adx_rising) {
            return Ok(false);
        }

        let entry = self.position.entry_price;
        let initial = self.position.initial_stop_loss;
        let widened = entry - self.position.side.sign() * current_atr * self.params.k_hold;

        let new_sl = match self.position.side {
            Side::Long => widened.max(initial).min(entry),
            Side::Short => widened.min(initial).max(entry),
        };

        let current = self.position.current_stop_loss;
        let tightens = match self.position.side {
            Side::Long => new_sl > current,
            Side::Short => new_sl < current,
        };
        if !tightens {
            return Ok(false);
        }

        self.record(timestamp, StopTransition::TrendConfirmed, new_sl);
        Ok(true)
    }

    /// Per-tick trailing update.
    ///
    /// Activates once price crosses the profit trigger favorably (boundary
    /// inclusive); while active, proposes `price ∓ trail_step` and accepts
    /// only tightening moves. Returns whether the stop moved.
    pub fn update_trailing(
        &mut self,
        price: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<bool, SignalError> {
        self.ensure_open("trailing update")?;
        check_price(price, "price")?;

        let side = self.position.side;

        if self.position.trailing != TrailingState::Active {
            let triggered = match side {
                Side::Long => price >= self.profit_trigger_price,
                Side::Short => price <= self.profit_trigger_price,
            };
            if !triggered {
                return Ok(false);
            }
            self.position.trailing = TrailingState::Active;
            self.record(
                timestamp,
                StopTransition::TrailingActivated,
                self.position.current_stop_loss,
            );
        }

        let candidate = price - side.sign() * self.trail_step;
        let current = self.position.current_stop_loss;
        let tightened = match side {
            Side::Long => candidate > current,
            Side::Short => candidate < current,
        };
        if !tightened {
            return Ok(false);
        }

        self.record(timestamp, StopTransition::TrailingAdvanced, candidate);
        Ok(true)
    }

    /// Exit checks in fixed priority: stop loss, take profit, time stop.
    ///
    /// The time stop fires only when the holding time has reached the
    /// threshold AND the position is not profitable; a profitable position
    /// is never time-stopped. Returns the trade record when an exit fired.
    pub fn check_exit(
        &mut self,
        price: f64,
        now: DateTime<Utc>,
    ) -> Result<Option<TradeRecord>, SignalError> {
        self.ensure_open("exit check")?;
        check_price(price, "price")?;

        let side = self.position.side;

        if stop_loss_hit(side, price, self.position.current_stop_loss) {
            return Ok(Some(self.close(price, now, ExitReason::StopLoss)));
        }

        if take_profit_hit(side, price, self.position.take_profit) {
            return Ok(Some(self.close(price, now, ExitReason::TakeProfit)));
        }

        let held_minutes = (now - self.position.entry_time).num_minutes();
        if held_minutes >= self.params.time_stop_minutes && !self.position.is_profitable(price) {
            return Ok(Some(self.close(price, now, ExitReason::TimeStop)));
        }

        Ok(None)
    }

    /// Close unconditionally with the given reason (end-of-replay, opposite
    /// signal, live manual close).
    pub fn force_close(
        &mut self,
        price: f64,
        now: DateTime<Utc>,
        reason: ExitReason,
    ) -> Result<TradeRecord, SignalError> {
        self.ensure_open("close")?;
        check_price(price, "price")?;
        Ok(self.close(price, now, reason))
    }

    fn close(&mut self, price: f64, now: DateTime<Utc>, reason: ExitReason) -> TradeRecord {
        self.record(now, StopTransition::Closed, self.position.current_stop_loss);
        self.position.status = PositionStatus::Closed;
        let record = TradeRecord::from_closed(&self.position, price, now, reason);
        tracing::debug!(
            symbol = %record.symbol,
            ?reason,
            pnl = record.pnl,
            "position closed"
        );
        record
    }
}
