//! Domain model shared across the matcher, scorer, risk machine and harness.

pub mod candle;
pub mod category;
pub mod pivot;
pub mod position;
pub mod trade;

pub use candle::{is_ordered_series, Candle};
pub use category::SymbolCategory;
pub use pivot::{PivotKind, PivotPoint};
pub use position::{Position, PositionStatus, Side, TrailingState};
pub use trade::{ExitReason, TradeRecord};

use serde::{Deserialize, Serialize};

/// Final per-symbol trade signal after layer fusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// An actionable signal opens a position; HOLD does not.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Signal::Hold)
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            Signal::Buy => Some(Side::Long),
            Signal::Sell => Some(Side::Short),
            Signal::Hold => None,
        }
    }
}
