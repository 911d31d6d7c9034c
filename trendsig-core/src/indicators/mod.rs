//! Indicator kernels feeding the trend/entry layers and the risk machine.
//!
//! All kernels share the same contract: input slices are oldest → newest,
//! output vectors are index-aligned with the input, and warmup/invalid
//! positions hold `NaN` rather than a sentinel value. Callers read the last
//! element and treat `NaN` as "not yet computable".

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod delta;
pub mod ema;
pub mod macd;
pub mod sma;
pub mod vwap;

pub use adx::{directional_index, DirectionalIndex};
pub use atr::{atr, true_range, wilder_smooth};
pub use bollinger::bollinger_bandwidth;
pub use delta::{order_flow_delta, DEFAULT_DELTA_LOOKBACK};
pub use ema::ema;
pub use macd::{macd, MacdSeries};
pub use sma::sma;
pub use vwap::vwap;

/// Create synthetic candles from close prices for testing.
///
/// Generates plausible OHLCV: open = prev_close (or close for the first
/// candle), high = max(open,close) + 1.0, low = min(open,close) - 1.0,
/// volume = 1000, 15-minute interval.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<crate::domain::Candle> {
    use crate::domain::Candle;
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let open_time = base + chrono::Duration::minutes(15 * i as i64);
            Candle {
                open_time,
                close_time: open_time + chrono::Duration::minutes(15),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
