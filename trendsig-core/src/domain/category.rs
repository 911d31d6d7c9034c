//! Symbol liquidity/volatility categories.
//!
//! Assigned externally (market-cap/volume classification) and consumed here
//! only to select a weight profile. Parsing is closed: unknown strings are
//! rejected at the boundary instead of silently defaulting.

use crate::error::SignalError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SymbolCategory {
    /// High-liquidity majors (BTC/ETH tier).
    Mainstream,
    /// High market cap with strong trending behavior.
    HighCapTrending,
    /// Mid-cap / hot rotation pairs.
    Trending,
    /// Small-cap, low-liquidity pairs; scored most conservatively.
    SmallCap,
}

impl SymbolCategory {
    pub const ALL: [SymbolCategory; 4] = [
        SymbolCategory::Mainstream,
        SymbolCategory::HighCapTrending,
        SymbolCategory::Trending,
        SymbolCategory::SmallCap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolCategory::Mainstream => "MAINSTREAM",
            SymbolCategory::HighCapTrending => "HIGH_CAP_TRENDING",
            SymbolCategory::Trending => "TRENDING",
            SymbolCategory::SmallCap => "SMALL_CAP",
        }
    }
}

impl FromStr for SymbolCategory {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MAINSTREAM" => Ok(SymbolCategory::Mainstream),
            "HIGH_CAP_TRENDING" => Ok(SymbolCategory::HighCapTrending),
            "TRENDING" => Ok(SymbolCategory::Trending),
            "SMALL_CAP" => Ok(SymbolCategory::SmallCap),
            other => Err(SignalError::InvalidParameter(format!(
                "unknown symbol category: {other}"
            ))),
        }
    }
}
