//! Multi-factor weighted scorer.
//!
//! Three analysis layers, each producing a score in [0, 1]:
//! - trend: higher-timeframe direction from MA ordering plus a five-point
//!   confirmation pass;
//! - factor: category-weighted confirmation factors behind the trend;
//! - entry: short-timeframe execution factors.
//!
//! Layer scores fuse through dynamic weights into a BUY/SELL/HOLD signal.
//! Missing external factors contribute zero; a failed hard gate forces the
//! affected layer score to zero outright.

pub mod factors;
pub mod scorer;
pub mod trend;
pub mod weights;

pub use factors::{ExternalFactors, FactorScore};
pub use scorer::{score_symbol, LayerWeights, ScoreLayer, SignalStrength, SymbolScore, WeightedScore};
pub use trend::{assess_trend, TrendAssessment, TrendDirection, TREND_MIN_CANDLES};
pub use weights::{EntryWeights, PerCategory, TrendFactorWeights, WeightProfile};
