//! Per-factor normalization and the two weighted confirmation layers.
//!
//! Each factor yields a `FactorScore` carrying the raw reading and its
//! normalized contribution in [0, 1]. External factors (funding rate, open
//! interest, order-flow delta) arrive as `Option`s: a missing value is not
//! an error, it simply contributes zero.

use super::trend::TrendDirection;
use super::weights::{EntryWeights, TrendFactorWeights};
use serde::{Deserialize, Serialize};

/// Thresholds shared with the original strategy tuning.
const DELTA_IMBALANCE: f64 = 0.1;
const OI_LONG_MIN: f64 = 0.02;
const OI_SHORT_MAX: f64 = -0.03;
const OI_ENTRY_MIN: f64 = 0.02;
const FUNDING_NEUTRAL_BAND: f64 = 0.0005;
const VOLUME_FULL_RATIO: f64 = 1.2;
const VOLUME_HALF_RATIO: f64 = 1.0;

/// Externally fetched factor readings; every field may be absent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ExternalFactors {
    /// Latest funding rate (e.g. 0.0001 = 0.01%).
    pub funding_rate: Option<f64>,
    /// Relative open-interest change over the recent window.
    pub oi_change: Option<f64>,
    /// Order-flow delta ratio in [-1, 1]; computed from candles when absent.
    pub order_flow_delta: Option<f64>,
}

/// One factor's reading and its normalized contribution.
#[derive(Debug, Clone, Serialize)]
pub struct FactorScore {
    pub factor_name: &'static str,
    pub raw_value: Option<f64>,
    pub normalized_contribution: f64,
}

impl FactorScore {
    fn new(name: &'static str, raw: Option<f64>, contribution: f64) -> Self {
        FactorScore {
            factor_name: name,
            raw_value: raw,
            normalized_contribution: contribution,
        }
    }
}

/// Volume expansion: ratio >= 1.2 counts full, >= 1.0 half, below nothing.
pub fn volume_contribution(ratio: Option<f64>) -> f64 {
    match ratio {
        Some(r) if r >= VOLUME_FULL_RATIO => 1.0,
        Some(r) if r >= VOLUME_HALF_RATIO => 0.5,
        _ => 0.0,
    }
}

fn bool_contribution(v: bool) -> f64 {
    if v {
        1.0
    } else {
        0.0
    }
}

/// Readings the factor layer consumes, all computed by the scorer.
#[derive(Debug, Clone, Copy)]
pub struct FactorReadings {
    pub price: f64,
    pub ema20: f64,
    pub ema50: f64,
    pub vwap: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub delta: Option<f64>,
    pub external: ExternalFactors,
}

/// Result of one weighted layer evaluation.
#[derive(Debug, Clone)]
pub struct LayerEvaluation {
    /// Weighted sum after gating; zero when the gate failed.
    pub score: f64,
    pub passed_gate: bool,
    pub factors: Vec<FactorScore>,
}

/// Directional VWAP gate: price must sit on the trend's side of VWAP.
fn vwap_aligned(direction: TrendDirection, price: f64, vwap: Option<f64>) -> bool {
    match (direction, vwap) {
        (TrendDirection::Up, Some(v)) => price > v,
        (TrendDirection::Down, Some(v)) => price < v,
        _ => false,
    }
}

/// Factor layer: confirmation factors behind the established trend.
///
/// The VWAP direction gate is a hard precondition; when it fails the layer
/// score is forced to zero regardless of the weighted sum.
pub fn evaluate_factor_layer(
    direction: TrendDirection,
    readings: &FactorReadings,
    weights: &TrendFactorWeights,
) -> LayerEvaluation {
    let ext = readings.external;
    let delta = readings.delta;

    let breakout = match direction {
        TrendDirection::Up => {
            readings.price > readings.ema20 && readings.ema20 > readings.ema50
        }
        TrendDirection::Down => {
            readings.price < readings.ema20 && readings.ema20 < readings.ema50
        }
        TrendDirection::Range => false,
    };

    let volume = volume_contribution(readings.volume_ratio);

    let oi = match (direction, ext.oi_change) {
        (TrendDirection::Up, Some(oi)) => oi > OI_LONG_MIN,
        (TrendDirection::Down, Some(oi)) => oi < OI_SHORT_MAX,
        _ => false,
    };

    let delta_aligned = match (direction, delta) {
        (TrendDirection::Up, Some(d)) => d > DELTA_IMBALANCE,
        (TrendDirection::Down, Some(d)) => d < -DELTA_IMBALANCE,
        _ => false,
    };

    // Neutral funding means no crowded positioning against the move.
    let funding = matches!(ext.funding_rate, Some(f) if f.abs() <= FUNDING_NEUTRAL_BAND);

    let factors = vec![
        FactorScore::new("breakout", None, bool_contribution(breakout)),
        FactorScore::new("volume", readings.volume_ratio, volume),
        FactorScore::new("oi_change", ext.oi_change, bool_contribution(oi)),
        FactorScore::new("delta", delta, bool_contribution(delta_aligned)),
        FactorScore::new("funding_rate", ext.funding_rate, bool_contribution(funding)),
    ];

    let weighted = weights.breakout * bool_contribution(breakout)
        + weights.volume * volume
        + weights.oi_change * bool_contribution(oi)
        + weights.delta * bool_contribution(delta_aligned)
        + weights.funding_rate * bool_contribution(funding);

    let passed_gate = vwap_aligned(direction, readings.price, readings.vwap);

    LayerEvaluation {
        score: if passed_gate { weighted } else { 0.0 },
        passed_gate,
        factors,
    }
}

/// Entry layer: short-timeframe execution factors.
///
/// Shares the VWAP direction gate with the factor layer.
pub fn evaluate_entry_layer(
    direction: TrendDirection,
    readings: &FactorReadings,
    weights: &EntryWeights,
) -> LayerEvaluation {
    let vwap_side = vwap_aligned(direction, readings.price, readings.vwap);

    let delta_aligned = match (direction, readings.delta) {
        (TrendDirection::Up, Some(d)) => d > DELTA_IMBALANCE,
        (TrendDirection::Down, Some(d)) => d < -DELTA_IMBALANCE,
        _ => false,
    };

    let oi_moving = matches!(
        readings.external.oi_change,
        Some(oi) if oi.abs() > OI_ENTRY_MIN
    );

    let volume = volume_contribution(readings.volume_ratio);

    let factors = vec![
        FactorScore::new("vwap", readings.vwap, bool_contribution(vwap_side)),
        FactorScore::new("delta", readings.delta, bool_contribution(delta_aligned)),
        FactorScore::new("oi", readings.external.oi_change, bool_contribution(oi_moving)),
        FactorScore::new("volume", readings.volume_ratio, volume),
    ];

    let weighted = weights.vwap * bool_contribution(vwap_side)
        + weights.delta * bool_contribution(delta_aligned)
        + weights.oi * bool_contribution(oi_moving)
        + weights.volume * volume;

    LayerEvaluation {
        score: if vwap_side { weighted } else { 0.0 },
        passed_gate: vwap_side,
        factors,
    }
}
