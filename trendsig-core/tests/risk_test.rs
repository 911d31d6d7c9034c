//! Risk lifecycle integration tests: full open → manage → close sequences.

use chrono::{DateTime, Duration, TimeZone, Utc};
use trendsig_core::domain::{ExitReason, PositionStatus, Side, TrailingState};
use trendsig_core::risk::{Confidence, PositionRisk, RiskParams, StopTransition};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
}

fn tick(minutes: i64) -> DateTime<Utc> {
    t0() + Duration::minutes(minutes)
}

#[test]
fn long_ride_up_then_trailing_stop_out() {
    // entry 100, atr 2, high confidence: SL 97, TP 103.9, trigger 103,
    // trail step 1.
    let mut risk = PositionRisk::open(
        "BTCUSDT",
        Side::Long,
        100.0,
        t0(),
        2.0,
        Confidence::High,
        &RiskParams::default(),
    )
    .unwrap();

    let mut closed = None;
    for (minute, price) in [(15, 101.0), (30, 102.0), (45, 103.0), (60, 103.5)] {
        let now = tick(minute);
        risk.update_trailing(price, now).unwrap();
        if let Some(record) = risk.check_exit(price, now).unwrap() {
            closed = Some(record);
            break;
        }
    }

    // 103.5 clears the 103 trigger; the ratcheted stop sits at 102.5, but
    // the take profit at 103.9 has not printed yet and the position is
    // profitable, so nothing exits.
    assert!(closed.is_none());
    assert_eq!(risk.position().trailing, TrailingState::Active);
    assert!((risk.position().current_stop_loss - 102.5).abs() < 1e-9);

    // Pullback through the trailed stop closes at a profit.
    let record = risk.check_exit(102.4, tick(75)).unwrap().unwrap();
    assert_eq!(record.exit_reason, ExitReason::StopLoss);
    assert!(record.pnl > 0.0);
    assert_eq!(risk.position().status, PositionStatus::Closed);

    let transitions: Vec<_> = risk.events().iter().map(|e| e.transition).collect();
    assert_eq!(
        transitions,
        vec![
            StopTransition::Opened,
            StopTransition::TrailingActivated,
            StopTransition::TrailingAdvanced,
            StopTransition::TrailingAdvanced,
            StopTransition::Closed,
        ]
    );
}

#[test]
fn short_ride_down_hits_take_profit() {
    // entry 100 short, atr 2, med confidence (k=2): SL 104, TP 94.8.
    let mut risk = PositionRisk::open(
        "ETHUSDT",
        Side::Short,
        100.0,
        t0(),
        2.0,
        Confidence::Med,
        &RiskParams::default(),
    )
    .unwrap();

    assert!(risk.check_exit(98.0, tick(15)).unwrap().is_none());
    let record = risk.check_exit(94.8, tick(30)).unwrap().unwrap();
    assert_eq!(record.exit_reason, ExitReason::TakeProfit);
    assert!((record.pnl - 5.2).abs() < 1e-9);
}

#[test]
fn trend_confirmation_then_trailing_continues_from_moved_stop() {
    let mut risk = PositionRisk::open(
        "BTCUSDT",
        Side::Long,
        100.0,
        t0(),
        2.0,
        Confidence::High,
        &RiskParams::default(),
    )
    .unwrap();

    // Confirmation with a shrunken ATR pulls the stop to 99.16.
    assert!(risk.confirm_trend(0.3, 0.5, true, tick(15)).unwrap());
    assert!((risk.position().current_stop_loss - 99.16).abs() < 1e-9);

    // Trailing later ratchets from there, never backwards.
    assert!(risk.update_trailing(103.0, tick(30)).unwrap());
    assert!((risk.position().current_stop_loss - 102.0).abs() < 1e-9);
    assert!(!risk.confirm_trend(2.0, 0.5, true, tick(45)).unwrap());
    assert!((risk.position().current_stop_loss - 102.0).abs() < 1e-9);
}

#[test]
fn losing_position_times_out() {
    let mut risk = PositionRisk::open(
        "BTCUSDT",
        Side::Long,
        100.0,
        t0(),
        2.0,
        Confidence::Low,
        &RiskParams::default(),
    )
    .unwrap();

    // Drifting slightly red, never touching the 94.8 stop.
    for minute in [15, 30, 45] {
        assert!(risk.check_exit(99.5, tick(minute)).unwrap().is_none());
    }
    let record = risk.check_exit(99.5, tick(60)).unwrap().unwrap();
    assert_eq!(record.exit_reason, ExitReason::TimeStop);
    assert!((record.pnl + 0.5).abs() < 1e-9);
    assert_eq!(record.duration_ms, 60 * 60 * 1000);
}

#[test]
fn audit_trail_serializes() {
    let mut risk = PositionRisk::open(
        "BTCUSDT",
        Side::Long,
        100.0,
        t0(),
        2.0,
        Confidence::High,
        &RiskParams::default(),
    )
    .unwrap();
    risk.update_trailing(103.0, tick(15)).unwrap();
    risk.force_close(103.5, tick(30), ExitReason::Manual).unwrap();

    let json = serde_json::to_string(risk.events()).unwrap();
    assert!(json.contains("TRAILING_ACTIVATED"));
    assert!(json.contains("CLOSED"));
}
