//! JSON file store integration tests

use chrono::{Duration, Utc};
use poly_scout::data::{JsonFileStore, RunState, StateStore, StoreError};
use poly_scout::position::{
    BookState, ClosedTradeSummary, EntryFill, ExitPricing, ExitReason, ExitThresholds, Mark,
    Position, PositionStatus, TradeEvent,
};
use rust_decimal_macros::dec;
use tempfile::TempDir;
use tokio_test::assert_ok;

fn position() -> Position {
    let opened_at = Utc::now();
    Position {
        id: Position::derive_id(opened_at, "m1", "tok"),
        opened_at,
        market_id: "m1".to_string(),
        question: "Will it?".to_string(),
        token_id: "tok".to_string(),
        outcome: "Yes".to_string(),
        notional: dec!(50),
        entry: EntryFill {
            avg_price: dec!(0.40),
            shares: dec!(125),
            cost: dec!(50),
            book: BookState {
                bid: dec!(0.39),
                ask: dec!(0.40),
                mid: dec!(0.395),
            },
        },
        exits: ExitThresholds {
            take_profit: dec!(0.42),
            stop_loss: dec!(0.38),
            max_hold_secs: 1800,
        },
        status: PositionStatus::Open,
        last_mark: Some(Mark {
            mid: dec!(0.405),
            bid: dec!(0.40),
            ask: dec!(0.41),
            at: opened_at + Duration::seconds(30),
            unrealized_pnl: dec!(0),
        }),
    }
}

fn summary(position: &Position) -> ClosedTradeSummary {
    ClosedTradeSummary {
        position_id: position.id,
        market_id: position.market_id.clone(),
        question: position.question.clone(),
        token_id: position.token_id.clone(),
        outcome: position.outcome.clone(),
        opened_at: position.opened_at,
        closed_at: position.opened_at + Duration::minutes(3),
        duration_secs: 180,
        entry_avg_price: dec!(0.40),
        exit_avg_price: dec!(0.425),
        shares: dec!(125),
        pnl: dec!(3.125),
        reason: ExitReason::TakeProfit,
        exit_pricing: ExitPricing::Simulated,
    }
}

#[test]
fn test_run_state_with_open_position() {
    let dir = TempDir::new().unwrap();
    let store = assert_ok!(JsonFileStore::open(dir.path()));

    let mut state = RunState::new(Utc::now());
    state.open_position = Some(position());
    state.last_scan_at = Some(Utc::now());
    assert_ok!(store.save_run_state(&state));

    let reopened = JsonFileStore::open(dir.path()).unwrap();
    assert_eq!(reopened.load_run_state().unwrap(), Some(state));
}

#[test]
fn test_event_log_appends_in_order() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::open(dir.path()).unwrap();
    let position = position();
    let mark = position.last_mark.clone().unwrap();
    let summary = summary(&position);

    let events = vec![
        TradeEvent::opened(&position),
        TradeEvent::marked(&mark),
        TradeEvent::closed(&summary),
    ];
    for event in &events {
        assert_ok!(store.append_event(position.id, event));
    }

    assert_eq!(store.load_events(position.id).unwrap(), events);

    let raw = std::fs::read_to_string(
        dir.path()
            .join("trades")
            .join(format!("{}.jsonl", position.id)),
    )
    .unwrap();
    assert_eq!(raw.lines().count(), 3);
    assert!(raw.lines().next().unwrap().contains("\"event_type\":\"OPEN\""));
}

#[test]
fn test_summary_write_once_and_notify_once() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::open(dir.path()).unwrap();
    let summary = summary(&position());

    assert_ok!(store.record_close(&summary));
    assert!(matches!(
        store.write_summary(&summary),
        Err(StoreError::SummaryExists(id)) if id == summary.position_id
    ));
    assert_eq!(
        store.load_summary(summary.position_id).unwrap(),
        Some(summary.clone())
    );

    // Notification survives a reopen and fires once
    let reopened = JsonFileStore::open(dir.path()).unwrap();
    assert_eq!(reopened.take_unnotified().unwrap(), Some(summary));
    assert!(store.take_unnotified().unwrap().is_none());
    assert!(reopened.load_last_closed().unwrap().unwrap().notified);
}
