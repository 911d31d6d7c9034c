//! Detection pass: ratios, template matching, directional bias.

use super::pivots::{extract_key_points, KeyPoints};
use super::templates::TEMPLATES;
use super::{HarmonicMatch, PatternPoints, PatternType};
use crate::domain::{Candle, Signal};
use crate::error::SignalError;

/// Fibonacci retracement ratio between two prices.
///
/// Zero when `start` is zero or the move is flat; both would otherwise
/// divide by zero or produce a meaningless ratio.
pub fn fib_ratio(start: f64, end: f64) -> f64 {
    if start == 0.0 || start == end {
        return 0.0;
    }
    ((end - start) / start).abs()
}

fn segment_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// The three segment ratios templates are tested against.
fn ratios(p: &PatternPoints) -> (f64, f64, f64) {
    let xa = (p.a - p.x).abs();
    let ab = (p.b - p.a).abs();
    let bc = (p.c - p.b).abs();
    let xc = (p.c - p.x).abs();
    let cd = (p.d - p.c).abs();

    (
        segment_ratio(ab, xa),
        segment_ratio(bc, ab),
        segment_ratio(cd, xc),
    )
}

/// Match the extracted key points against the templates in priority order.
pub fn match_points(kp: &KeyPoints) -> HarmonicMatch {
    let (ab_xa, bc_ab, cd_xc) = ratios(&kp.points);

    for template in &TEMPLATES {
        if template.matches(ab_xa, bc_ab, cd_xc) {
            let confidence = template.confidence(ab_xa, bc_ab, cd_xc);
            tracing::debug!(
                pattern = ?template.pattern_type,
                ab_xa,
                bc_ab,
                cd_xc,
                confidence,
                "harmonic template matched"
            );
            return HarmonicMatch {
                pattern_type: template.pattern_type,
                confidence,
                points: kp.points,
                pivot_source: kp.source,
            };
        }
    }

    HarmonicMatch::none(kp.points, kp.source)
}

/// Run a full detection pass over `candles`.
///
/// Fewer than 50 candles is a hard precondition failure here; the scoring
/// pipeline degrades it to a NONE match at its own level.
pub fn detect_harmonic_pattern(candles: &[Candle]) -> Result<HarmonicMatch, SignalError> {
    let kp = extract_key_points(candles)?;
    Ok(match_points(&kp))
}

/// Directional bias from the final leg: D below C means the structure is
/// awaiting a bounce (BUY), D above C a pullback (SELL).
pub fn harmonic_direction(points: &PatternPoints) -> Signal {
    if points.d < points.c {
        Signal::Buy
    } else if points.d > points.c {
        Signal::Sell
    } else {
        Signal::Hold
    }
}
