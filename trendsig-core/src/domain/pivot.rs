//! Pivot points — local extrema used as structural anchors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether the pivot is a local high or a local low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PivotKind {
    High,
    Low,
}

/// A local extremum in the candle series.
///
/// Transient: recomputed on each analysis call, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PivotPoint {
    /// Index into the candle slice the pivot was extracted from.
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub kind: PivotKind,
}
