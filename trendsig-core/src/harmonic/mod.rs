//! Harmonic pattern matcher.
//!
//! Five-point (X-A-B-C-D) structure detection over the most recent 50
//! candles, matched against three ratio templates (Cypher, Bat, Shark) in
//! fixed priority order. Pure: no I/O, recomputed per call.

pub mod detect;
pub mod pivots;
pub mod templates;

pub use detect::{detect_harmonic_pattern, fib_ratio, harmonic_direction};
pub use pivots::{extract_key_points, KeyPoints, PivotSource, HARMONIC_MIN_CANDLES};
pub use templates::{PatternTemplate, RatioBand, TEMPLATES};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternType {
    Cypher,
    Bat,
    Shark,
    None,
}

/// The X/A/B/C/D prices a match was evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternPoints {
    pub x: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

/// Result of one detection pass.
///
/// `points` is populated even for `PatternType::None` so callers can inspect
/// the raw structure when nothing matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarmonicMatch {
    pub pattern_type: PatternType,
    /// Mean per-ratio closeness, clamped to the template cap. 0 for None.
    pub confidence: f64,
    pub points: PatternPoints,
    /// How the pivots were obtained; `FixedFallback` flags the degraded path.
    pub pivot_source: PivotSource,
}

impl HarmonicMatch {
    pub fn none(points: PatternPoints, pivot_source: PivotSource) -> Self {
        HarmonicMatch {
            pattern_type: PatternType::None,
            confidence: 0.0,
            points,
            pivot_source,
        }
    }
}
