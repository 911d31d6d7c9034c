//! Sequential replay harness.
//!
//! At every candle the harness sees only the candles up to and including
//! that one. Time comes from candle close times, never from the wall clock,
//! so a replay is reproducible down to the byte.

use super::fingerprint::{run_fingerprint, Fingerprint};
use super::stats::BacktestResult;
use crate::domain::{is_ordered_series, Candle, ExitReason, SymbolCategory, TradeRecord};
use crate::error::SignalError;
use crate::indicators::{atr, directional_index, macd};
use crate::risk::{Confidence, PositionRisk, RiskParams};
use crate::scoring::{score_symbol, ExternalFactors, SignalStrength, WeightProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_ATR_PERIOD: usize = 14;
const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;
const ADX_PERIOD: usize = 14;

/// Per-tick external readings for the factor layers.
///
/// A replay over pure candle data uses [`NoExternalFactors`]; richer
/// datasets implement this to feed recorded funding, open interest and
/// order-flow series alongside the candles.
pub trait FactorProvider {
    fn factors_at(&self, index: usize, candle: &Candle) -> ExternalFactors;
}

/// Provider for candle-only datasets: every external factor is absent.
pub struct NoExternalFactors;

impl FactorProvider for NoExternalFactors {
    fn factors_at(&self, _index: usize, _candle: &Candle) -> ExternalFactors {
        ExternalFactors::default()
    }
}

/// Everything that parameterizes one run. Hashed into the fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestParams {
    pub symbol: String,
    pub category: SymbolCategory,
    pub risk: RiskParams,
    pub weights: WeightProfile,
    pub atr_period: usize,
}

impl BacktestParams {
    pub fn new(symbol: &str, category: SymbolCategory) -> Self {
        BacktestParams {
            symbol: symbol.to_string(),
            category,
            risk: RiskParams::default(),
            weights: WeightProfile::default(),
            atr_period: DEFAULT_ATR_PERIOD,
        }
    }
}

/// A tick the harness could not act on, with the reason it was skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedTick {
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub reason: String,
}

/// Full output of one replay.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestReport {
    pub fingerprint: Fingerprint,
    pub result: BacktestResult,
    pub trades: Vec<TradeRecord>,
    pub skipped: Vec<SkippedTick>,
}

/// Stronger signals earn tighter initial stops.
fn confidence_for(strength: SignalStrength) -> Option<Confidence> {
    match strength {
        SignalStrength::Strong => Some(Confidence::High),
        SignalStrength::Moderate => Some(Confidence::Med),
        SignalStrength::Weak => Some(Confidence::Low),
        SignalStrength::None => None,
    }
}

/// Latest ATR reading over the visible candles.
fn last_atr(candles: &[Candle], period: usize) -> Result<f64, SignalError> {
    if candles.len() < period + 1 {
        return Err(SignalError::InsufficientData {
            needed: period + 1,
            got: candles.len(),
        });
    }
    let series = atr(candles, period);
    match series.last() {
        Some(&v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(SignalError::InsufficientData {
            needed: period + 1,
            got: candles.len(),
        }),
    }
}

/// Momentum read for trend confirmation: fractional growth of the MACD
/// histogram magnitude over the last bar, and whether ADX is rising.
fn momentum_strengthening(candles: &[Candle]) -> (f64, bool) {
    let n = candles.len();
    if n < 2 {
        return (0.0, false);
    }
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let series = macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
    let (last, prev) = (series.histogram[n - 1], series.histogram[n - 2]);
    let hist_increase = if last.is_finite() && prev.is_finite() && prev.abs() > 0.0 {
        (last.abs() - prev.abs()) / prev.abs()
    } else {
        0.0
    };

    let di = directional_index(candles, ADX_PERIOD);
    let (adx_last, adx_prev) = (di.adx[n - 1], di.adx[n - 2]);
    let adx_rising = adx_last.is_finite() && adx_prev.is_finite() && adx_last > adx_prev;

    (hist_increase, adx_rising)
}

/// Replay the candle series start to finish.
///
/// Per tick: score the symbol on the visible prefix, manage any open
/// position (trend confirmation, trailing, exit checks, opposite-signal
/// replacement), then open on a gated signal if flat. Any position still
/// open after the last candle is force-closed MANUAL at that candle's
/// close. Unscorable ticks are recorded in `skipped`, never silently
/// dropped.
pub fn run_backtest(
    params: &BacktestParams,
    candles: &[Candle],
    provider: &dyn FactorProvider,
) -> Result<BacktestReport, SignalError> {
    if candles.is_empty() {
        return Err(SignalError::InsufficientData { needed: 1, got: 0 });
    }
    if !is_ordered_series(candles) {
        return Err(SignalError::InvalidParameter(
            "candle series is unordered or contains malformed candles".into(),
        ));
    }
    if params.atr_period == 0 {
        return Err(SignalError::InvalidParameter(
            "atr_period must be at least 1".into(),
        ));
    }
    params.risk.validate()?;
    params.weights.validate()?;

    let fingerprint = run_fingerprint(params, candles)?;

    let mut open: Option<PositionRisk> = None;
    let mut trades: Vec<TradeRecord> = Vec::new();
    let mut skipped: Vec<SkippedTick> = Vec::new();

    for (i, candle) in candles.iter().enumerate() {
        let visible = &candles[..=i];
        let price = candle.close;
        let now = candle.close_time;

        let external = provider.factors_at(i, candle);
        let score = match score_symbol(
            &params.symbol,
            params.category,
            visible,
            &external,
            &params.weights,
        ) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(index = i, error = %e, "tick skipped");
                skipped.push(SkippedTick {
                    index: i,
                    timestamp: now,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if let Some(risk) = open.as_mut() {
            let (hist_increase, adx_rising) = momentum_strengthening(visible);
            if let Ok(current_atr) = last_atr(visible, params.atr_period) {
                risk.confirm_trend(current_atr, hist_increase, adx_rising, now)?;
            }
            risk.update_trailing(price, now)?;
            if let Some(record) = risk.check_exit(price, now)? {
                trades.push(record);
                open = None;
            }
        }

        // A gated signal against the open side replaces the position.
        if let (Some(risk), Some(side)) = (open.as_mut(), score.signal.side()) {
            if side != risk.position().side {
                trades.push(risk.force_close(price, now, ExitReason::OppositeSignal)?);
                open = None;
            }
        }

        if open.is_none() {
            if let (Some(side), Some(confidence)) =
                (score.signal.side(), confidence_for(score.strength))
            {
                match last_atr(visible, params.atr_period) {
                    Ok(current_atr) => {
                        open = Some(PositionRisk::open(
                            &params.symbol,
                            side,
                            price,
                            now,
                            current_atr,
                            confidence,
                            &params.risk,
                        )?);
                    }
                    Err(e) if e.is_degradable() => {
                        tracing::warn!(index = i, error = %e, "entry skipped, no ATR");
                        skipped.push(SkippedTick {
                            index: i,
                            timestamp: now,
                            reason: e.to_string(),
                        });
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }

    if let Some(risk) = open.as_mut() {
        let last = &candles[candles.len() - 1];
        trades.push(risk.force_close(last.close, last.close_time, ExitReason::Manual)?);
    }

    let result = BacktestResult::from_trades(&trades);
    tracing::info!(
        symbol = %params.symbol,
        total_trades = result.total_trades,
        net_profit = result.net_profit,
        skipped = skipped.len(),
        fingerprint = %fingerprint,
        "replay finished"
    );

    Ok(BacktestReport {
        fingerprint,
        result,
        trades,
        skipped,
    })
}
