//! Ratio templates for the three supported patterns.

use super::PatternType;

/// Half-open tolerance band: `lo <= ratio < hi`.
#[derive(Debug, Clone, Copy)]
pub struct RatioBand {
    pub lo: f64,
    pub hi: f64,
    /// Ideal Fibonacci value the closeness score is measured against.
    pub ideal: f64,
}

impl RatioBand {
    pub fn contains(&self, ratio: f64) -> bool {
        ratio >= self.lo && ratio < self.hi
    }

    /// `1 - |ratio - ideal| / ideal`, clamped to [0, 1].
    pub fn closeness(&self, ratio: f64) -> f64 {
        (1.0 - (ratio - self.ideal).abs() / self.ideal).clamp(0.0, 1.0)
    }
}

/// One pattern template: three segment-ratio bands and a confidence cap.
#[derive(Debug, Clone, Copy)]
pub struct PatternTemplate {
    pub pattern_type: PatternType,
    pub ab_xa: RatioBand,
    pub bc_ab: RatioBand,
    pub cd_xc: RatioBand,
    /// Upper bound on reported confidence; no pattern claims certainty.
    pub confidence_cap: f64,
}

impl PatternTemplate {
    /// All three ratios must sit inside their bands simultaneously.
    pub fn matches(&self, ab_xa: f64, bc_ab: f64, cd_xc: f64) -> bool {
        self.ab_xa.contains(ab_xa) && self.bc_ab.contains(bc_ab) && self.cd_xc.contains(cd_xc)
    }

    /// Mean of the three per-ratio closeness scores, capped.
    pub fn confidence(&self, ab_xa: f64, bc_ab: f64, cd_xc: f64) -> f64 {
        let mean = (self.ab_xa.closeness(ab_xa)
            + self.bc_ab.closeness(bc_ab)
            + self.cd_xc.closeness(cd_xc))
            / 3.0;
        mean.min(self.confidence_cap)
    }
}

/// Evaluation order is the priority order: Cypher, then Bat, then Shark.
pub const TEMPLATES: [PatternTemplate; 3] = [
    PatternTemplate {
        pattern_type: PatternType::Cypher,
        ab_xa: RatioBand { lo: 0.35, hi: 0.65, ideal: 0.5 },
        bc_ab: RatioBand { lo: 1.05, hi: 1.50, ideal: 1.272 },
        cd_xc: RatioBand { lo: 0.75, hi: 0.95, ideal: 0.836 },
        confidence_cap: 0.9,
    },
    PatternTemplate {
        pattern_type: PatternType::Bat,
        ab_xa: RatioBand { lo: 0.35, hi: 0.55, ideal: 0.441 },
        bc_ab: RatioBand { lo: 0.35, hi: 0.95, ideal: 0.634 },
        cd_xc: RatioBand { lo: 0.80, hi: 0.95, ideal: 0.886 },
        confidence_cap: 0.8,
    },
    PatternTemplate {
        pattern_type: PatternType::Shark,
        ab_xa: RatioBand { lo: 1.05, hi: 1.70, ideal: 1.374 },
        bc_ab: RatioBand { lo: 1.05, hi: 1.70, ideal: 1.374 },
        cd_xc: RatioBand { lo: 0.80, hi: 1.10, ideal: 0.943 },
        confidence_cap: 0.85,
    },
];
