//! ADX with directional indexes (Wilder).
//!
//! Steps:
//! 1. Compute +DM and -DM from consecutive candles
//! 2. Smooth +DM, -DM, and TR using Wilder smoothing (alpha = 1/period)
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR)
//! 4. -DI = 100 * smoothed(-DM) / smoothed(TR)
//! 5. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 6. ADX = Wilder-smoothed DX
//!
//! The trend layer needs the DI ordering as well as the strength value, so
//! all three series are returned together.

use crate::domain::Candle;
use crate::indicators::atr::{true_range, wilder_smooth};

/// Index-aligned ADX / +DI / -DI series.
#[derive(Debug, Clone)]
pub struct DirectionalIndex {
    pub adx: Vec<f64>,
    pub di_plus: Vec<f64>,
    pub di_minus: Vec<f64>,
}

/// Compute ADX, +DI and -DI over `period`.
pub fn directional_index(candles: &[Candle], period: usize) -> DirectionalIndex {
    let n = candles.len();
    let nan = vec![f64::NAN; n];

    if n < 2 || period == 0 {
        return DirectionalIndex {
            adx: nan.clone(),
            di_plus: nan.clone(),
            di_minus: nan,
        };
    }

    let mut plus_dm = vec![f64::NAN; n];
    let mut minus_dm = vec![f64::NAN; n];

    for i in 1..n {
        if candles[i].high.is_nan()
            || candles[i].low.is_nan()
            || candles[i - 1].high.is_nan()
            || candles[i - 1].low.is_nan()
        {
            continue;
        }

        let high_diff = candles[i].high - candles[i - 1].high;
        let low_diff = candles[i - 1].low - candles[i].low;

        plus_dm[i] = if high_diff > low_diff && high_diff > 0.0 {
            high_diff
        } else {
            0.0
        };
        minus_dm[i] = if low_diff > high_diff && low_diff > 0.0 {
            low_diff
        } else {
            0.0
        };
    }

    let tr = true_range(candles);
    let smooth_tr = wilder_smooth(&tr, period);
    let smooth_plus_dm = wilder_smooth(&plus_dm, period);
    let smooth_minus_dm = wilder_smooth(&minus_dm, period);

    let mut di_plus = vec![f64::NAN; n];
    let mut di_minus = vec![f64::NAN; n];
    let mut dx = vec![f64::NAN; n];

    for i in 0..n {
        if smooth_tr[i].is_nan()
            || smooth_plus_dm[i].is_nan()
            || smooth_minus_dm[i].is_nan()
            || smooth_tr[i] == 0.0
        {
            continue;
        }

        let p = 100.0 * smooth_plus_dm[i] / smooth_tr[i];
        let m = 100.0 * smooth_minus_dm[i] / smooth_tr[i];
        di_plus[i] = p;
        di_minus[i] = m;

        let di_sum = p + m;
        dx[i] = if di_sum == 0.0 {
            0.0
        } else {
            100.0 * (p - m).abs() / di_sum
        };
    }

    DirectionalIndex {
        adx: wilder_smooth(&dx, period),
        di_plus,
        di_minus,
    }
}
