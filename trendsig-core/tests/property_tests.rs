//! Property tests for core invariants.
//!
//! Uses proptest to verify:
//! 1. Ratchet monotonicity — trailing stops only ever tighten
//! 2. Time-stop guard — profitable positions are never time-stopped
//! 3. Boundary-inclusive exit triggers
//! 4. Ratio and confidence bounds in the harmonic matcher
//! 5. Statistics identities over arbitrary trade sets

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use trendsig_core::backtest::BacktestResult;
use trendsig_core::domain::{ExitReason, Side, TradeRecord};
use trendsig_core::harmonic::{fib_ratio, PatternPoints, TEMPLATES};
use trendsig_core::risk::{stop_loss_hit, take_profit_hit, Confidence, PositionRisk, RiskParams};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
}

fn open_position(side: Side, atr: f64) -> PositionRisk {
    PositionRisk::open(
        "BTCUSDT",
        side,
        100.0,
        t0(),
        atr,
        Confidence::Med,
        &RiskParams::default(),
    )
    .unwrap()
}

fn make_trade(pnl: f64) -> TradeRecord {
    TradeRecord {
        symbol: "BTCUSDT".into(),
        side: Side::Long,
        entry_price: 100.0,
        entry_time: t0(),
        exit_price: 100.0 + pnl,
        exit_time: t0() + Duration::minutes(30),
        exit_reason: ExitReason::Manual,
        pnl,
        duration_ms: 30 * 60 * 1000,
    }
}

fn arb_price() -> impl Strategy<Value = f64> {
    (10.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

// ── 1. Ratchet monotonicity ──────────────────────────────────────────

proptest! {
    /// A long trailing stop never moves down, whatever the price path.
    #[test]
    fn long_trailing_stop_never_loosens(
        prices in prop::collection::vec(arb_price(), 1..60),
        atr in 0.5..5.0_f64,
    ) {
        let mut risk = open_position(Side::Long, atr);
        let mut last = risk.position().current_stop_loss;
        for price in prices {
            risk.update_trailing(price, t0()).unwrap();
            let sl = risk.position().current_stop_loss;
            prop_assert!(sl >= last, "stop loosened from {last} to {sl}");
            last = sl;
        }
    }

    /// A short trailing stop never moves up.
    #[test]
    fn short_trailing_stop_never_loosens(
        prices in prop::collection::vec(arb_price(), 1..60),
        atr in 0.5..5.0_f64,
    ) {
        let mut risk = open_position(Side::Short, atr);
        let mut last = risk.position().current_stop_loss;
        for price in prices {
            risk.update_trailing(price, t0()).unwrap();
            let sl = risk.position().current_stop_loss;
            prop_assert!(sl <= last, "stop loosened from {last} to {sl}");
            last = sl;
        }
    }
}

// ── 2. Time-stop guard ───────────────────────────────────────────────

proptest! {
    /// A position in profit is never closed by the time stop, no matter how
    /// long it has been held.
    #[test]
    fn profitable_position_never_time_stopped(
        profit in 0.01..50.0_f64,
        minutes in 0i64..100_000,
    ) {
        let mut risk = open_position(Side::Long, 2.0);
        let price = 100.0 + profit;
        if let Some(record) = risk.check_exit(price, t0() + Duration::minutes(minutes)).unwrap() {
            prop_assert_ne!(record.exit_reason, ExitReason::TimeStop);
        }
    }

    /// A position at or below breakeven held past the threshold always exits,
    /// through the stop or the time stop.
    #[test]
    fn stale_unprofitable_position_always_exits(
        loss in 0.0..10.0_f64,
        extra_minutes in 0i64..10_000,
    ) {
        let mut risk = open_position(Side::Long, 2.0);
        let price = 100.0 - loss;
        let now = t0() + Duration::minutes(60 + extra_minutes);
        let record = risk.check_exit(price, now).unwrap();
        prop_assert!(record.is_some());
        let reason = record.unwrap().exit_reason;
        prop_assert!(reason == ExitReason::TimeStop || reason == ExitReason::StopLoss);
    }
}

// ── 3. Boundary-inclusive triggers ───────────────────────────────────

proptest! {
    /// Touching the level exactly counts as triggered, both sides.
    #[test]
    fn exit_triggers_are_boundary_inclusive(level in arb_price()) {
        prop_assert!(stop_loss_hit(Side::Long, level, level));
        prop_assert!(stop_loss_hit(Side::Short, level, level));
        prop_assert!(take_profit_hit(Side::Long, level, level));
        prop_assert!(take_profit_hit(Side::Short, level, level));
    }

    /// A long stop fires exactly when price is at or below the stop.
    #[test]
    fn long_stop_hit_iff_at_or_below(price in arb_price(), stop in arb_price()) {
        prop_assert_eq!(stop_loss_hit(Side::Long, price, stop), price <= stop);
        prop_assert_eq!(take_profit_hit(Side::Long, price, stop), price >= stop);
    }
}

// ── 4. Harmonic ratio and confidence bounds ──────────────────────────

proptest! {
    /// fib_ratio is non-negative and finite for positive inputs, and zero
    /// on its defined degenerate cases.
    #[test]
    fn fib_ratio_is_bounded(start in 0.1..1000.0_f64, end in 0.1..1000.0_f64) {
        let r = fib_ratio(start, end);
        prop_assert!(r.is_finite());
        prop_assert!(r >= 0.0);
        prop_assert_eq!(fib_ratio(start, start), 0.0);
        prop_assert_eq!(fib_ratio(0.0, end), 0.0);
    }

    /// Whatever points come out of pivot extraction, a template confidence
    /// never exceeds its cap and never goes negative.
    #[test]
    fn template_confidence_respects_cap(
        x in 1.0..1000.0_f64,
        a in 1.0..1000.0_f64,
        b in 1.0..1000.0_f64,
        c in 1.0..1000.0_f64,
        d in 1.0..1000.0_f64,
    ) {
        let points = PatternPoints { x, a, b, c, d };
        let xa = (points.a - points.x).abs();
        let ab = (points.b - points.a).abs();
        let bc = (points.c - points.b).abs();
        let xc = (points.c - points.x).abs();
        let cd = (points.d - points.c).abs();
        let div = |n: f64, q: f64| if q == 0.0 { 0.0 } else { n / q };

        for template in &TEMPLATES {
            let conf = template.confidence(div(ab, xa), div(bc, ab), div(cd, xc));
            prop_assert!(conf >= 0.0);
            prop_assert!(conf <= template.confidence_cap + 1e-12);
        }
    }
}

// ── 5. Statistics identities ─────────────────────────────────────────

proptest! {
    /// Aggregates over arbitrary trade sets keep their defining identities.
    #[test]
    fn backtest_result_identities(pnls in prop::collection::vec(-50.0..50.0_f64, 0..40)) {
        let trades: Vec<TradeRecord> = pnls.iter().map(|&p| make_trade(p)).collect();
        let r = BacktestResult::from_trades(&trades);

        prop_assert_eq!(r.total_trades, trades.len());
        prop_assert!(r.winning_trades + r.losing_trades <= r.total_trades);
        prop_assert!((0.0..=1.0).contains(&r.win_rate));
        prop_assert!(r.gross_profit >= 0.0);
        prop_assert!(r.gross_loss >= 0.0);
        prop_assert!(r.profit_factor >= 0.0);
        prop_assert!(r.max_drawdown >= 0.0);
        prop_assert!((r.net_profit - (r.gross_profit - r.gross_loss)).abs() < 1e-9);
        // Drawdown can never exceed the total loss mass.
        prop_assert!(r.max_drawdown <= r.gross_loss + 1e-9);
    }
}
