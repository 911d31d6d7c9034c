//! Structured error types for the scoring/risk core.
//!
//! Three fatal-or-degradable classes, matching how callers are expected to
//! react:
//! - `InsufficientData` — the component's minimum candle count is not met.
//!   Pipelines degrade the affected layer to a neutral result instead of
//!   aborting the whole scoring pass.
//! - `InvalidParameter` — a programming-contract violation (unknown side,
//!   non-finite price, non-positive ATR). Fatal for the call.
//! - `StateViolation` — an operation applied to a position in the wrong
//!   state (e.g. closing a closed position). Fatal for that operation only;
//!   the backtest harness records it as a skipped tick and continues.
//!
//! A failed external factor fetch is deliberately NOT an error: missing
//! factors enter the scorer as `None` and contribute zero.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("insufficient data: needed {needed} candles, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("state violation: {0}")]
    StateViolation(String),
}

impl SignalError {
    /// True when the scoring pipeline may substitute a neutral result and
    /// keep going rather than propagate.
    pub fn is_degradable(&self) -> bool {
        matches!(self, SignalError::InsufficientData { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_is_degradable() {
        let err = SignalError::InsufficientData { needed: 50, got: 3 };
        assert!(err.is_degradable());
        assert!(!SignalError::InvalidParameter("bad side".into()).is_degradable());
    }

    #[test]
    fn display_includes_counts() {
        let err = SignalError::InsufficientData { needed: 200, got: 17 };
        let msg = err.to_string();
        assert!(msg.contains("200"));
        assert!(msg.contains("17"));
    }
}
