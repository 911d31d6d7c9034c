//! Bollinger bandwidth — volatility expansion input to the trend layer.
//!
//! Middle = SMA(period), bands at ±mult standard deviations (population),
//! bandwidth = (upper - lower) / middle. NaN while the window is incomplete
//! or the middle band is zero.

use crate::indicators::sma::sma;

/// Bandwidth series for `closes` over `period` at `mult` deviations.
pub fn bollinger_bandwidth(closes: &[f64], period: usize, mult: f64) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    let middle = sma(closes, period);

    for i in (period - 1)..n {
        let m = middle[i];
        if m.is_nan() || m == 0.0 {
            continue;
        }
        let window = &closes[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        let variance =
            window.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / period as f64;
        let stdev = variance.sqrt();
        result[i] = 2.0 * mult * stdev / m;
    }

    result
}
