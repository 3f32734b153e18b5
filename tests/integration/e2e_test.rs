//! End-to-end integration tests

use crate::common::{binary_market, BookTable, StaticCatalog};
use chrono::{Duration, Utc};
use poly_scout::config::{PositionConfig, ScannerConfig, ScoringConfig};
use poly_scout::data::{JsonFileStore, StateStore};
use poly_scout::driver::{CycleOutcome, Driver};
use poly_scout::market::Market;
use poly_scout::orderbook::{OrderBook, PriceLevel};
use poly_scout::position::{ExitReason, PositionLifecycle, TradeEvent};
use poly_scout::scanner::Scanner;
use rust_decimal_macros::dec;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio_test::assert_ok;

fn driver(markets: Vec<Market>, books: Arc<BookTable>, dir: &Path) -> Driver {
    Driver::new(
        Arc::new(StaticCatalog(markets)),
        books,
        Arc::new(JsonFileStore::open(dir).unwrap()),
        Scanner::new(ScannerConfig::default(), ScoringConfig::default()),
        PositionLifecycle::new(PositionConfig::default()),
    )
}

#[tokio::test]
async fn test_report_ranks_and_drops_unusable_markets() {
    let dir = TempDir::new().unwrap();
    let now = Utc::now();

    let big = binary_market("big", dec!(100000), now);
    let small = binary_market("small", dec!(10000), now);
    let no_asks = binary_market("noasks", dec!(500000), now);
    let mut closed = binary_market("closed", dec!(500000), now);
    closed.closed = true;

    let books = Arc::new(BookTable::default());
    for id in ["big", "small", "closed"] {
        books.quote(&format!("{id}-yes"), dec!(0.49), dec!(0.51), dec!(1000));
        books.quote(&format!("{id}-no"), dec!(0.49), dec!(0.51), dec!(1000));
    }
    for token in ["noasks-yes", "noasks-no"] {
        books.insert(OrderBook::with_levels(
            token,
            vec![PriceLevel::new(dec!(0.49), dec!(1000))],
            vec![],
        ));
    }

    let driver = driver(vec![small, no_asks, big, closed], books.clone(), dir.path());
    let report = assert_ok!(driver.report_once(now).await);

    assert_eq!(report.len(), 2);
    assert_eq!(report[0].market.id, "big");
    assert_eq!(report[1].market.id, "small");
    assert!(report[0].score > report[1].score);
    assert_eq!(report[0].outcome, "Yes");

    // Closed market never reached the book source
    let fetched = books.fetches.lock().unwrap().clone();
    assert!(!fetched.iter().any(|t| t.starts_with("closed")));
    assert_eq!(books.fetch_count(), 6);

    // One-sided books leave no snapshot
    let snapshots = driver.store().load_snapshots().unwrap();
    assert_eq!(snapshots.len(), 4);
    assert!(snapshots.get("noasks-yes").is_none());
    assert!(dir.path().join("snapshots.json").exists());
}

#[tokio::test]
async fn test_monitor_resumes_after_restart() {
    let dir = TempDir::new().unwrap();
    let t0 = Utc::now();
    let markets = vec![binary_market("m1", dec!(60000), t0)];
    let books = Arc::new(BookTable::default());

    books.quote("m1-yes", dec!(0.39), dec!(0.40), dec!(1000));
    books.quote("m1-no", dec!(0.59), dec!(0.60), dec!(1000));

    let first = driver(markets.clone(), books.clone(), dir.path());
    let state = assert_ok!(first.load_state(t0));
    let (state, outcome) = assert_ok!(first.cycle(state, t0).await);
    assert!(matches!(outcome, CycleOutcome::NoOpportunity));

    let t1 = t0 + Duration::seconds(30);
    books.quote("m1-yes", dec!(0.41), dec!(0.42), dec!(1000));
    let (_, outcome) = assert_ok!(first.cycle(state, t1).await);
    let CycleOutcome::Opened(position) = outcome else {
        panic!("expected open, got {outcome:?}");
    };
    drop(first);

    // A fresh process picks the open position back up from disk
    let second = driver(markets, books.clone(), dir.path());
    let state = assert_ok!(second.load_state(Utc::now()));
    assert_eq!(state.open_position.as_ref().map(|p| p.id), Some(position.id));

    let t2 = t1 + Duration::seconds(30);
    books.quote("m1-yes", dec!(0.38), dec!(0.39), dec!(1000));
    let (state, outcome) = assert_ok!(second.cycle(state, t2).await);
    let CycleOutcome::Closed(summary) = outcome else {
        panic!("expected close, got {outcome:?}");
    };
    assert_eq!(summary.reason, ExitReason::StopLoss);
    assert_eq!(summary.position_id, position.id);
    assert!(summary.pnl < dec!(0));
    assert!(state.open_position.is_none());

    let store = JsonFileStore::open(dir.path()).unwrap();
    let events = store.load_events(position.id).unwrap();
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], TradeEvent::Open { .. }));
    assert!(matches!(events[1], TradeEvent::Mark { .. }));
    assert!(matches!(
        events[2],
        TradeEvent::Close {
            reason: ExitReason::StopLoss,
            ..
        }
    ));

    assert_eq!(store.take_unnotified().unwrap(), Some(summary));
    assert!(store.take_unnotified().unwrap().is_none());
}
