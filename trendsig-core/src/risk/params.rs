//! Risk parameters: confidence tiers and stop sizing.

use crate::error::SignalError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Signal confidence tier; selects the initial stop width.
///
/// Closed enum: unknown strings are rejected at the boundary rather than
/// silently defaulting to a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Med,
    Low,
}

impl FromStr for Confidence {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Confidence::High),
            "med" => Ok(Confidence::Med),
            "low" => Ok(Confidence::Low),
            other => Err(SignalError::InvalidParameter(format!(
                "unknown confidence tier: {other}"
            ))),
        }
    }
}

/// Immutable risk configuration for one run.
///
/// Defaults follow the tuned live parameters; alternates load from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskParams {
    /// Initial stop ATR multiple per confidence tier. Lower confidence gets
    /// a wider stop.
    pub k_entry_high: f64,
    pub k_entry_med: f64,
    pub k_entry_low: f64,
    /// ATR multiple used when trend confirmation widens the reference stop.
    pub k_hold: f64,
    /// Take profit at k_entry * tp_factor ATRs from entry.
    pub tp_factor: f64,
    /// Trailing arms when unrealized profit reaches this multiple of the
    /// stop distance.
    pub profit_trigger: f64,
    /// Trailing step in ATR multiples.
    pub trail_step: f64,
    /// Unprofitable positions are force-closed after this holding time.
    pub time_stop_minutes: i64,
}

impl Default for RiskParams {
    fn default() -> Self {
        RiskParams {
            k_entry_high: 1.5,
            k_entry_med: 2.0,
            k_entry_low: 2.6,
            k_hold: 2.8,
            tp_factor: 1.3,
            profit_trigger: 1.0,
            trail_step: 0.5,
            time_stop_minutes: 60,
        }
    }
}

impl RiskParams {
    pub fn from_toml(text: &str) -> Result<Self, SignalError> {
        let params: RiskParams = toml::from_str(text)
            .map_err(|e| SignalError::InvalidParameter(format!("risk params: {e}")))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), SignalError> {
        let positive = [
            self.k_entry_high,
            self.k_entry_med,
            self.k_entry_low,
            self.k_hold,
            self.tp_factor,
            self.profit_trigger,
            self.trail_step,
        ];
        if positive.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(SignalError::InvalidParameter(
                "risk multipliers must be positive and finite".into(),
            ));
        }
        if self.time_stop_minutes <= 0 {
            return Err(SignalError::InvalidParameter(
                "time_stop_minutes must be positive".into(),
            ));
        }
        Ok(())
    }

    /// ATR multiple for the initial stop at `confidence`.
    pub fn k_entry(&self, confidence: Confidence) -> f64 {
        match confidence {
            Confidence::High => self.k_entry_high,
            Confidence::Med => self.k_entry_med,
            Confidence::Low => self.k_entry_low,
        }
    }
}
