//! Candle-approximated order-flow delta.
//!
//! Without trade-level data the buy/sell split is approximated from candle
//! color: an up-close candle's volume counts as buying, a down-close
//! candle's as selling. Delta ratio = (buy - sell) / total over the last
//! `lookback` candles, in [-1, 1].

use crate::domain::Candle;

pub const DEFAULT_DELTA_LOOKBACK: usize = 20;

/// Net order-flow delta ratio over the last `lookback` candles.
///
/// `None` when the slice is empty or total volume is zero.
pub fn order_flow_delta(candles: &[Candle], lookback: usize) -> Option<f64> {
    if candles.is_empty() || lookback == 0 {
        return None;
    }
    let start = candles.len().saturating_sub(lookback);
    let window = &candles[start..];

    let mut buy = 0.0;
    let mut sell = 0.0;
    for c in window {
        if c.close >= c.open {
            buy += c.volume;
        } else {
            sell += c.volume;
        }
    }
    let total = buy + sell;
    if total > 0.0 {
        Some((buy - sell) / total)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles, DEFAULT_EPSILON};

    #[test]
    fn all_up_candles_full_positive_delta() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let candles = make_candles(&closes);
        assert_approx(
            order_flow_delta(&candles, 20).unwrap(),
            1.0,
            DEFAULT_EPSILON,
        );
    }

    #[test]
    fn mixed_candles_partial_delta() {
        // up, down, up with equal volume: delta = (2000 - 1000) / 3000
        let candles = make_candles(&[100.0, 99.0, 101.0]);
        // first candle opens at its own close (flat), counted as buying
        assert_approx(
            order_flow_delta(&candles, 20).unwrap(),
            1.0 / 3.0,
            DEFAULT_EPSILON,
        );
    }

    #[test]
    fn lookback_window_applies() {
        // 5 down candles then 20 up candles: only the up window is seen
        let mut closes: Vec<f64> = (0..5).map(|i| 100.0 - i as f64).collect();
        closes.extend((0..20).map(|i| 96.0 + i as f64));
        let candles = make_candles(&closes);
        assert_approx(
            order_flow_delta(&candles, 20).unwrap(),
            1.0,
            DEFAULT_EPSILON,
        );
    }

    #[test]
    fn empty_slice_is_none() {
        assert!(order_flow_delta(&[], 20).is_none());
    }
}
