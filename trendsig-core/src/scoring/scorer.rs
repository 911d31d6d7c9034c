//! Layer fusion: per-layer weighted scores into a single trade signal.

use super::factors::{
    evaluate_entry_layer, evaluate_factor_layer, ExternalFactors, FactorReadings, FactorScore,
};
use super::trend::{assess_trend, TrendAssessment, TrendDirection};
use super::weights::WeightProfile;
use crate::domain::{is_ordered_series, Candle, Signal, SymbolCategory};
use crate::error::SignalError;
use crate::harmonic::{detect_harmonic_pattern, HarmonicMatch};
use crate::indicators::{ema, order_flow_delta, vwap, DEFAULT_DELTA_LOOKBACK};
use serde::{Deserialize, Serialize};

/// Fused-score thresholds for the three signal strength tiers.
const STRONG_THRESHOLD: f64 = 0.70;
const MODERATE_THRESHOLD: f64 = 0.45;
const WEAK_THRESHOLD: f64 = 0.35;

const VOLUME_AVG_WINDOW: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreLayer {
    Trend,
    Factor,
    Entry,
}

/// A layer's final score after gating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedScore {
    pub layer: ScoreLayer,
    pub category: SymbolCategory,
    pub score: f64,
    pub passed_gate: bool,
}

/// How decisively the fused score cleared its thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalStrength {
    Strong,
    Moderate,
    Weak,
    None,
}

/// Relative weight of each layer in the fused score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerWeights {
    pub trend: f64,
    pub factor: f64,
    pub entry: f64,
}

impl LayerWeights {
    pub const fn base() -> Self {
        LayerWeights {
            trend: 0.5,
            factor: 0.35,
            entry: 0.15,
        }
    }

    /// Shift weight toward whichever layer reads strongest.
    ///
    /// Pure function of the three normalized layer scores; the adjustments
    /// mirror the original strategy tuning.
    pub fn dynamic(trend: f64, factor: f64, entry: f64) -> Self {
        if trend >= 0.8 {
            LayerWeights {
                trend: 0.6,
                factor: 0.3,
                entry: 0.1,
            }
        } else if factor >= 0.8 {
            LayerWeights {
                trend: 0.45,
                factor: 0.4,
                entry: 0.15,
            }
        } else if entry >= 0.8 {
            LayerWeights {
                trend: 0.5,
                factor: 0.3,
                entry: 0.2,
            }
        } else if trend >= 0.7 && factor >= 0.6 && entry >= 0.6 {
            LayerWeights {
                trend: 0.45,
                factor: 0.35,
                entry: 0.2,
            }
        } else {
            LayerWeights::base()
        }
    }
}

/// Full scoring output for one symbol at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolScore {
    pub symbol: String,
    pub category: SymbolCategory,
    pub trend: TrendAssessment,
    pub trend_score: WeightedScore,
    pub factor_score: WeightedScore,
    pub entry_score: WeightedScore,
    /// Per-factor diagnostics for the factor and entry layers.
    pub factor_detail: Vec<FactorScore>,
    pub entry_detail: Vec<FactorScore>,
    /// None when fewer than 50 candles were available.
    pub harmonic: Option<HarmonicMatch>,
    pub layer_weights: LayerWeights,
    /// Weighted fusion of the three layer scores, in [0, 1].
    pub fused_score: f64,
    pub strength: SignalStrength,
    pub signal: Signal,
}

fn volume_ratio(candles: &[Candle]) -> Option<f64> {
    if candles.len() < VOLUME_AVG_WINDOW {
        return None;
    }
    let window = &candles[candles.len() - VOLUME_AVG_WINDOW..];
    let avg = window.iter().map(|c| c.volume).sum::<f64>() / VOLUME_AVG_WINDOW as f64;
    let current = candles[candles.len() - 1].volume;
    if avg > 0.0 {
        Some(current / avg)
    } else {
        None
    }
}

/// Score one symbol over its candle history (oldest → newest).
///
/// Degrades gracefully: layers whose minimum candle count is not met come
/// back neutral instead of failing the call. Only malformed input (empty or
/// unordered candles) is an error.
pub fn score_symbol(
    symbol: &str,
    category: SymbolCategory,
    candles: &[Candle],
    external: &ExternalFactors,
    profile: &WeightProfile,
) -> Result<SymbolScore, SignalError> {
    if candles.is_empty() {
        return Err(SignalError::InsufficientData { needed: 1, got: 0 });
    }
    if !is_ordered_series(candles) {
        return Err(SignalError::InvalidParameter(
            "candle series is unordered or contains malformed candles".into(),
        ));
    }
    profile.validate()?;

    // Trend layer, neutral on insufficient history.
    let trend = match assess_trend(candles) {
        Ok(t) => t,
        Err(e) if e.is_degradable() => {
            tracing::debug!(symbol, error = %e, "trend layer degraded to RANGE");
            TrendAssessment {
                direction: TrendDirection::Range,
                confirmation_points: 0,
                score: 0.0,
                ma20: f64::NAN,
                ma50: f64::NAN,
                ma200: f64::NAN,
                adx: 0.0,
                bandwidth: 0.0,
            }
        }
        Err(e) => return Err(e),
    };

    // Harmonic matcher, absent on insufficient history.
    let harmonic = match detect_harmonic_pattern(candles) {
        Ok(m) => Some(m),
        Err(e) if e.is_degradable() => {
            tracing::debug!(symbol, error = %e, "harmonic matcher skipped");
            None
        }
        Err(e) => return Err(e),
    };

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let last = closes.len() - 1;
    let ema20 = ema(&closes, 20);
    let ema50 = ema(&closes, 50);

    let readings = FactorReadings {
        price: closes[last],
        ema20: ema20[last],
        ema50: ema50[last],
        vwap: vwap(candles),
        volume_ratio: volume_ratio(candles),
        delta: external
            .order_flow_delta
            .or_else(|| order_flow_delta(candles, DEFAULT_DELTA_LOOKBACK)),
        external: *external,
    };

    let factor_eval =
        evaluate_factor_layer(trend.direction, &readings, &profile.factor.get(category));
    let entry_eval = evaluate_entry_layer(trend.direction, &readings, &profile.entry.get(category));

    let layer_weights = LayerWeights::dynamic(trend.score, factor_eval.score, entry_eval.score);
    let fused_score = layer_weights.trend * trend.score
        + layer_weights.factor * factor_eval.score
        + layer_weights.entry * entry_eval.score;

    let directional = trend.direction != TrendDirection::Range;
    let actionable = directional && factor_eval.passed_gate && entry_eval.score > 0.0;

    let strength = if !actionable {
        SignalStrength::None
    } else if fused_score >= STRONG_THRESHOLD {
        SignalStrength::Strong
    } else if fused_score >= MODERATE_THRESHOLD {
        SignalStrength::Moderate
    } else if fused_score >= WEAK_THRESHOLD {
        SignalStrength::Weak
    } else {
        SignalStrength::None
    };

    let signal = match (strength, trend.direction) {
        (SignalStrength::None, _) => Signal::Hold,
        (_, TrendDirection::Up) => Signal::Buy,
        (_, TrendDirection::Down) => Signal::Sell,
        (_, TrendDirection::Range) => Signal::Hold,
    };

    tracing::debug!(
        symbol,
        ?signal,
        ?strength,
        fused_score,
        trend = trend.score,
        factor = factor_eval.score,
        entry = entry_eval.score,
        "symbol scored"
    );

    Ok(SymbolScore {
        symbol: symbol.to_string(),
        category,
        trend_score: WeightedScore {
            layer: ScoreLayer::Trend,
            category,
            score: trend.score,
            passed_gate: directional,
        },
        factor_score: WeightedScore {
            layer: ScoreLayer::Factor,
            category,
            score: factor_eval.score,
            passed_gate: factor_eval.passed_gate,
        },
        entry_score: WeightedScore {
            layer: ScoreLayer::Entry,
            category,
            score: entry_eval.score,
            passed_gate: entry_eval.passed_gate,
        },
        factor_detail: factor_eval.factors,
        entry_detail: entry_eval.factors,
        trend,
        harmonic,
        layer_weights,
        fused_score,
        strength,
        signal,
    })
}
