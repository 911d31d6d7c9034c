//! Candle — the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV candle for a single symbol on a single interval.
///
/// Candles arrive already fetched (oldest → newest) from an external data
/// collaborator; the core never performs I/O to obtain them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub close_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Basic OHLCV sanity check: high >= low, high bounds open/close, etc.
    pub fn is_sane(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
            && self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
            && self.volume >= 0.0
    }

    /// Typical price (HLC/3), used by VWAP.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

/// True when every candle is sane and open times are strictly increasing.
pub fn is_ordered_series(candles: &[Candle]) -> bool {
    candles.iter().all(Candle::is_sane)
        && candles.windows(2).all(|w| w[0].open_time < w[1].open_time)
}
