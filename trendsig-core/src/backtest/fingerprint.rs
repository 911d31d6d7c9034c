//! Run fingerprinting.
//!
//! A fingerprint is a blake3 hash over the run parameters and the full
//! candle series, so two reports can be compared for provenance: identical
//! fingerprints mean identical inputs.

use crate::domain::Candle;
use crate::error::SignalError;
use serde::{Deserialize, Serialize};

/// Hex-encoded blake3 digest of a run's inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash the run parameters and candle series.
///
/// Parameters are serialized through `serde_json::Value`, whose object maps
/// keep keys sorted; that gives a canonical byte sequence independent of
/// struct field order. Candles are hashed field by field as fixed-width
/// little-endian bytes.
pub fn run_fingerprint<P: Serialize>(
    params: &P,
    candles: &[Candle],
) -> Result<Fingerprint, SignalError> {
    let value = serde_json::to_value(params)
        .map_err(|e| SignalError::InvalidParameter(format!("unhashable params: {e}")))?;
    let canonical = value.to_string();

    let mut hasher = blake3::Hasher::new();
    hasher.update(canonical.as_bytes());
    for candle in candles {
        hasher.update(&candle.open_time.timestamp_millis().to_le_bytes());
        hasher.update(&candle.close_time.timestamp_millis().to_le_bytes());
        for field in [
            candle.open,
            candle.high,
            candle.low,
            candle.close,
            candle.volume,
        ] {
            hasher.update(&field.to_le_bytes());
        }
    }
    Ok(Fingerprint(hasher.finalize().to_hex().to_string()))
}
