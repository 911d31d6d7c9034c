//! Higher-timeframe trend assessment.
//!
//! Direction requires the full price/MA20/MA50/MA200 ordering; a five-point
//! confirmation pass then has to accumulate at least three points or the
//! market is marked RANGE regardless of the ordering:
//! 1. MA alignment (the ordering itself)
//! 2. stability — the ordering held on the previous bar too
//! 3. strength — ADX above threshold with the matching DI ordering
//! 4. volatility — Bollinger bandwidth expanded past its floor
//! 5. momentum — price has pulled a minimum distance away from MA20

use crate::domain::Candle;
use crate::error::SignalError;
use crate::indicators::{bollinger_bandwidth, directional_index, sma};
use serde::{Deserialize, Serialize};

/// Minimum candles for a trend assessment (MA200 must be warm).
pub const TREND_MIN_CANDLES: usize = 200;

const ADX_PERIOD: usize = 14;
const ADX_THRESHOLD: f64 = 25.0;
const BBW_EXPANSION_FLOOR: f64 = 0.02;
const MOMENTUM_MIN_DISTANCE: f64 = 0.005;
const CONFIRMATION_REQUIRED: u8 = 3;
const CONFIRMATION_MAX: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Up,
    Down,
    Range,
}

/// Outcome of the trend pass, with the readings the other layers reuse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendAssessment {
    pub direction: TrendDirection,
    /// Confirmation points earned, 0..=5.
    pub confirmation_points: u8,
    /// `confirmation_points / 5`, the trend layer score.
    pub score: f64,
    pub ma20: f64,
    pub ma50: f64,
    pub ma200: f64,
    pub adx: f64,
    pub bandwidth: f64,
}

fn ordered_up(price: f64, ma20: f64, ma50: f64, ma200: f64) -> bool {
    price > ma20 && ma20 > ma50 && ma50 > ma200
}

fn ordered_down(price: f64, ma20: f64, ma50: f64, ma200: f64) -> bool {
    price < ma20 && ma20 < ma50 && ma50 < ma200
}

/// Assess the trend over `candles` (oldest → newest).
pub fn assess_trend(candles: &[Candle]) -> Result<TrendAssessment, SignalError> {
    if candles.len() < TREND_MIN_CANDLES {
        return Err(SignalError::InsufficientData {
            needed: TREND_MIN_CANDLES,
            got: candles.len(),
        });
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let last = closes.len() - 1;

    let ma20 = sma(&closes, 20);
    let ma50 = sma(&closes, 50);
    let ma200 = sma(&closes, 200);
    let di = directional_index(candles, ADX_PERIOD);
    let bbw = bollinger_bandwidth(&closes, 20, 2.0);

    let price = closes[last];
    let (m20, m50, m200) = (ma20[last], ma50[last], ma200[last]);
    let adx = di.adx[last];
    let bandwidth = bbw[last];

    let range = |points| TrendAssessment {
        direction: TrendDirection::Range,
        confirmation_points: points,
        score: points as f64 / CONFIRMATION_MAX as f64,
        ma20: m20,
        ma50: m50,
        ma200: m200,
        adx: if adx.is_nan() { 0.0 } else { adx },
        bandwidth: if bandwidth.is_nan() { 0.0 } else { bandwidth },
    };

    if m20.is_nan() || m50.is_nan() || m200.is_nan() {
        return Ok(range(0));
    }

    let candidate = if ordered_up(price, m20, m50, m200) {
        TrendDirection::Up
    } else if ordered_down(price, m20, m50, m200) {
        TrendDirection::Down
    } else {
        return Ok(range(0));
    };

    let mut points: u8 = 1; // alignment

    // Stability: the same ordering held on the previous bar.
    let prev = last - 1;
    let held_before = match candidate {
        TrendDirection::Up => ordered_up(closes[prev], ma20[prev], ma50[prev], ma200[prev]),
        TrendDirection::Down => ordered_down(closes[prev], ma20[prev], ma50[prev], ma200[prev]),
        TrendDirection::Range => false,
    };
    if held_before {
        points += 1;
    }

    // Strength: ADX over threshold with the DI ordering matching direction.
    if !adx.is_nan() && adx >= ADX_THRESHOLD {
        let di_ok = match candidate {
            TrendDirection::Up => di.di_plus[last] > di.di_minus[last],
            TrendDirection::Down => di.di_minus[last] > di.di_plus[last],
            TrendDirection::Range => false,
        };
        if di_ok {
            points += 1;
        }
    }

    // Volatility expansion.
    if !bandwidth.is_nan() && bandwidth > BBW_EXPANSION_FLOOR {
        points += 1;
    }

    // Momentum: price has pulled away from the short MA.
    if (price - m20).abs() / m20 >= MOMENTUM_MIN_DISTANCE {
        points += 1;
    }

    if points < CONFIRMATION_REQUIRED {
        tracing::debug!(?candidate, points, "MA ordering present but confirmation failed");
        return Ok(range(points));
    }

    Ok(TrendAssessment {
        direction: candidate,
        confirmation_points: points,
        score: points as f64 / CONFIRMATION_MAX as f64,
        ma20: m20,
        ma50: m50,
        ma200: m200,
        adx: if adx.is_nan() { 0.0 } else { adx },
        bandwidth: if bandwidth.is_nan() { 0.0 } else { bandwidth },
    })
}
