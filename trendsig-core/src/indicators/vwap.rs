//! Volume-weighted average price over a candle slice.

use crate::domain::Candle;

/// VWAP = Σ(typical_price × volume) / Σ(volume) over the whole slice.
///
/// `None` when the slice is empty or carries zero total volume.
pub fn vwap(candles: &[Candle]) -> Option<f64> {
    let mut pv = 0.0;
    let mut total_volume = 0.0;
    for c in candles {
        pv += c.typical_price() * c.volume;
        total_volume += c.volume;
    }
    if total_volume > 0.0 && pv.is_finite() {
        Some(pv / total_volume)
    } else {
        None
    }
}
