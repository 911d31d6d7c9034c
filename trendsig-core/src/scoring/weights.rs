//! Category-indexed weight tables.
//!
//! One table per layer, four categories each, weights summing to 1 within a
//! layer. Profiles are plain serde structs so callers can load alternates
//! from TOML and swap them between runs; a profile is immutable during a
//! single scoring call.

use crate::domain::SymbolCategory;
use crate::error::SignalError;
use serde::{Deserialize, Serialize};

/// Factor-layer weights: confirmation factors behind an established trend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrendFactorWeights {
    pub breakout: f64,
    pub volume: f64,
    pub oi_change: f64,
    pub delta: f64,
    pub funding_rate: f64,
}

impl TrendFactorWeights {
    fn sum(&self) -> f64 {
        self.breakout + self.volume + self.oi_change + self.delta + self.funding_rate
    }
}

/// Entry-layer weights: short-timeframe execution factors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EntryWeights {
    pub vwap: f64,
    pub delta: f64,
    pub oi: f64,
    pub volume: f64,
}

impl EntryWeights {
    fn sum(&self) -> f64 {
        self.vwap + self.delta + self.oi + self.volume
    }
}

/// One value per symbol category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PerCategory<T> {
    pub mainstream: T,
    pub high_cap_trending: T,
    pub trending: T,
    pub small_cap: T,
}

impl<T: Copy> PerCategory<T> {
    pub fn get(&self, category: SymbolCategory) -> T {
        match category {
            SymbolCategory::Mainstream => self.mainstream,
            SymbolCategory::HighCapTrending => self.high_cap_trending,
            SymbolCategory::Trending => self.trending,
            SymbolCategory::SmallCap => self.small_cap,
        }
    }
}

/// The full weight configuration consumed by a scoring call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightProfile {
    pub factor: PerCategory<TrendFactorWeights>,
    pub entry: PerCategory<EntryWeights>,
}

const WEIGHT_SUM_EPSILON: f64 = 1e-9;

impl WeightProfile {
    /// Load a profile from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, SignalError> {
        let profile: WeightProfile = toml::from_str(text)
            .map_err(|e| SignalError::InvalidParameter(format!("weight profile: {e}")))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Every per-category table must sum to 1 and carry no negative weight.
    pub fn validate(&self) -> Result<(), SignalError> {
        for cat in SymbolCategory::ALL {
            let f = self.factor.get(cat);
            if (f.sum() - 1.0).abs() > WEIGHT_SUM_EPSILON {
                return Err(SignalError::InvalidParameter(format!(
                    "factor weights for {} sum to {}, expected 1",
                    cat.as_str(),
                    f.sum()
                )));
            }
            let e = self.entry.get(cat);
            if (e.sum() - 1.0).abs() > WEIGHT_SUM_EPSILON {
                return Err(SignalError::InvalidParameter(format!(
                    "entry weights for {} sum to {}, expected 1",
                    cat.as_str(),
                    e.sum()
                )));
            }
            let all = [f.breakout, f.volume, f.oi_change, f.delta, f.funding_rate,
                e.vwap, e.delta, e.oi, e.volume];
            if all.iter().any(|w| *w < 0.0 || !w.is_finite()) {
                return Err(SignalError::InvalidParameter(format!(
                    "negative or non-finite weight for {}",
                    cat.as_str()
                )));
            }
        }
        Ok(())
    }
}

impl Default for WeightProfile {
    fn default() -> Self {
        WeightProfile {
            factor: PerCategory {
                mainstream: TrendFactorWeights {
                    breakout: 0.30,
                    volume: 0.20,
                    oi_change: 0.25,
                    delta: 0.15,
                    funding_rate: 0.10,
                },
                high_cap_trending: TrendFactorWeights {
                    breakout: 0.25,
                    volume: 0.25,
                    oi_change: 0.20,
                    delta: 0.20,
                    funding_rate: 0.10,
                },
                trending: TrendFactorWeights {
                    breakout: 0.15,
                    volume: 0.30,
                    oi_change: 0.15,
                    delta: 0.30,
                    funding_rate: 0.10,
                },
                small_cap: TrendFactorWeights {
                    breakout: 0.15,
                    volume: 0.35,
                    oi_change: 0.15,
                    delta: 0.25,
                    funding_rate: 0.10,
                },
            },
            entry: PerCategory {
                mainstream: EntryWeights {
                    vwap: 0.40,
                    delta: 0.20,
                    oi: 0.20,
                    volume: 0.20,
                },
                high_cap_trending: EntryWeights {
                    vwap: 0.35,
                    delta: 0.25,
                    oi: 0.20,
                    volume: 0.20,
                },
                trending: EntryWeights {
                    vwap: 0.30,
                    delta: 0.25,
                    oi: 0.20,
                    volume: 0.25,
                },
                small_cap: EntryWeights {
                    vwap: 0.25,
                    delta: 0.25,
                    oi: 0.15,
                    volume: 0.35,
                },
            },
        }
    }
}
