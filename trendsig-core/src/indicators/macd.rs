//! MACD histogram — momentum input to trend confirmation.
//!
//! MACD line = EMA(fast) - EMA(slow); signal = EMA(signal_period) of the
//! MACD line; histogram = MACD - signal. The risk machine compares the last
//! two histogram values to detect momentum strengthening.

use crate::indicators::ema::ema;

/// Index-aligned MACD / signal / histogram series.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// MACD over `closes` with the given periods (conventionally 12/26/9).
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdSeries {
    let n = closes.len();
    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);

    let mut macd_line = vec![f64::NAN; n];
    for i in 0..n {
        if !fast_ema[i].is_nan() && !slow_ema[i].is_nan() {
            macd_line[i] = fast_ema[i] - slow_ema[i];
        }
    }

    // The MACD line starts NaN until the slow EMA seeds; EMA the valid tail.
    let first_valid = macd_line.iter().position(|v| !v.is_nan());
    let mut signal = vec![f64::NAN; n];
    if let Some(start) = first_valid {
        let tail_signal = ema(&macd_line[start..], signal_period);
        signal[start..].copy_from_slice(&tail_signal);
    }

    let mut histogram = vec![f64::NAN; n];
    for i in 0..n {
        if !macd_line[i].is_nan() && !signal[i].is_nan() {
            histogram[i] = macd_line[i] - signal[i];
        }
    }

    MacdSeries {
        macd: macd_line,
        signal,
        histogram,
    }
}
