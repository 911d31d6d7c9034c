//! Key-point extraction for the X-A-B-C-D structure.
//!
//! Five consecutive, non-overlapping 10-candle windows over the most recent
//! 50 candles, oldest to newest, alternating extremum kinds:
//! X = lowest low, A = highest high, B = lowest low, C = highest high,
//! D = lowest low of the final window.
//!
//! When the result fails the X<A>B<C>D alternation the extractor degrades to
//! fixed positions (the first candle of each window, last candle for D).
//! This is a known approximation carried over from the strategy's original
//! tuning, surfaced via `PivotSource` rather than hidden.

use super::PatternPoints;
use crate::domain::{Candle, PivotKind, PivotPoint};
use crate::error::SignalError;
use serde::{Deserialize, Serialize};

/// Minimum candles for a detection pass: five 10-candle windows.
pub const HARMONIC_MIN_CANDLES: usize = 50;

const WINDOW: usize = 10;

/// How the X/A/B/C/D points were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PivotSource {
    /// Windowed extremum scan produced a structurally valid sequence.
    WindowExtrema,
    /// Alternation failed; fixed window positions were used instead.
    FixedFallback,
}

/// Extraction result: the five prices plus the pivot records behind them.
#[derive(Debug, Clone)]
pub struct KeyPoints {
    pub points: PatternPoints,
    pub pivots: Vec<PivotPoint>,
    pub source: PivotSource,
}

fn lowest_low(candles: &[Candle], start: usize, end: usize) -> (usize, f64) {
    let mut idx = start;
    let mut price = candles[start].low;
    for (i, c) in candles.iter().enumerate().take(end).skip(start) {
        if c.low < price {
            price = c.low;
            idx = i;
        }
    }
    (idx, price)
}

fn highest_high(candles: &[Candle], start: usize, end: usize) -> (usize, f64) {
    let mut idx = start;
    let mut price = candles[start].high;
    for (i, c) in candles.iter().enumerate().take(end).skip(start) {
        if c.high > price {
            price = c.high;
            idx = i;
        }
    }
    (idx, price)
}

fn pivot(candles: &[Candle], index: usize, price: f64, kind: PivotKind) -> PivotPoint {
    PivotPoint {
        index,
        timestamp: candles[index].open_time,
        price,
        kind,
    }
}

/// Extract X/A/B/C/D from the last 50 candles of `candles`.
pub fn extract_key_points(candles: &[Candle]) -> Result<KeyPoints, SignalError> {
    let len = candles.len();
    if len < HARMONIC_MIN_CANDLES {
        return Err(SignalError::InsufficientData {
            needed: HARMONIC_MIN_CANDLES,
            got: len,
        });
    }

    let base = len - HARMONIC_MIN_CANDLES;
    let (x_idx, x) = lowest_low(candles, base, base + WINDOW);
    let (a_idx, a) = highest_high(candles, base + WINDOW, base + 2 * WINDOW);
    let (b_idx, b) = lowest_low(candles, base + 2 * WINDOW, base + 3 * WINDOW);
    let (c_idx, c) = highest_high(candles, base + 3 * WINDOW, base + 4 * WINDOW);
    let (d_idx, d) = lowest_low(candles, base + 4 * WINDOW, len);

    // Shape invariant: X < A > B < C > D.
    if x < a && a > b && b < c && c > d {
        let pivots = vec![
            pivot(candles, x_idx, x, PivotKind::Low),
            pivot(candles, a_idx, a, PivotKind::High),
            pivot(candles, b_idx, b, PivotKind::Low),
            pivot(candles, c_idx, c, PivotKind::High),
            pivot(candles, d_idx, d, PivotKind::Low),
        ];
        return Ok(KeyPoints {
            points: PatternPoints { x, a, b, c, d },
            pivots,
            source: PivotSource::WindowExtrema,
        });
    }

    tracing::debug!(x, a, b, c, d, "pivot alternation failed, using fixed positions");

    let fx = candles[base].low;
    let fa = candles[base + WINDOW].high;
    let fb = candles[base + 2 * WINDOW].low;
    let fc = candles[base + 3 * WINDOW].high;
    let fd = candles[len - 1].low;
    let pivots = vec![
        pivot(candles, base, fx, PivotKind::Low),
        pivot(candles, base + WINDOW, fa, PivotKind::High),
        pivot(candles, base + 2 * WINDOW, fb, PivotKind::Low),
        pivot(candles, base + 3 * WINDOW, fc, PivotKind::High),
        pivot(candles, len - 1, fd, PivotKind::Low),
    ];
    Ok(KeyPoints {
        points: PatternPoints {
            x: fx,
            a: fa,
            b: fb,
            c: fc,
            d: fd,
        },
        pivots,
        source: PivotSource::FixedFallback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_candles;

    /// Closes tracing a zig-zag so that each 10-candle window holds one
    /// clean extremum: low near X, high near A, low near B, high near C,
    /// low near D.
    fn zigzag_closes(x: f64, a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
        let mut closes = Vec::with_capacity(50);
        for target in [x, a, b, c, d] {
            for i in 0..10 {
                // Drift away from the extremum inside the window so the
                // scan picks the intended candle.
                let off = if i == 5 { 0.0 } else { 3.0 + (i as f64 % 3.0) };
                let sign = if target == a || target == c { -1.0 } else { 1.0 };
                closes.push(target + sign * off);
            }
        }
        closes
    }

    #[test]
    fn too_few_candles_is_insufficient_data() {
        let candles = make_candles(&[100.0; 49]);
        let err = extract_key_points(&candles).unwrap_err();
        assert!(matches!(
            err,
            SignalError::InsufficientData { needed: 50, got: 49 }
        ));
    }

    #[test]
    fn alternating_structure_uses_window_extrema() {
        let closes = zigzag_closes(100.0, 150.0, 125.0, 160.0, 110.0);
        let candles = make_candles(&closes);
        let kp = extract_key_points(&candles).unwrap();
        assert_eq!(kp.source, PivotSource::WindowExtrema);
        assert!(kp.points.x < kp.points.a);
        assert!(kp.points.a > kp.points.b);
        assert!(kp.points.b < kp.points.c);
        assert!(kp.points.c > kp.points.d);
        assert_eq!(kp.pivots.len(), 5);
        assert_eq!(kp.pivots[0].kind, PivotKind::Low);
        assert_eq!(kp.pivots[1].kind, PivotKind::High);
    }

    #[test]
    fn monotone_series_falls_back_to_fixed_positions() {
        // A monotone ramp can never satisfy A > B, so the fallback engages.
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let candles = make_candles(&closes);
        let kp = extract_key_points(&candles).unwrap();
        assert_eq!(kp.source, PivotSource::FixedFallback);
        assert_eq!(kp.pivots[0].index, 0);
        assert_eq!(kp.pivots[4].index, 49);
    }

    #[test]
    fn only_last_fifty_candles_are_scanned() {
        // Deep history with an extreme low outside the 50-candle window
        // must not leak into X. The last pre-window close matches the zigzag
        // start so the boundary candle carries no stray extremum.
        let mut closes = vec![1.0; 29];
        closes.push(103.0);
        closes.extend(zigzag_closes(100.0, 150.0, 125.0, 160.0, 110.0));
        let candles = make_candles(&closes);
        let kp = extract_key_points(&candles).unwrap();
        assert!(kp.points.x > 50.0);
    }
}
