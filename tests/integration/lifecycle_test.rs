//! Position lifecycle driven by real scanner output

use crate::common::{binary_market, BookTable};
use chrono::{DateTime, Duration, Utc};
use poly_scout::config::{PositionConfig, ScannerConfig, ScoringConfig};
use poly_scout::orderbook::{OrderBook, PriceLevel};
use poly_scout::position::{ExitReason, LifecycleError, Position, PositionLifecycle, TickOutcome};
use poly_scout::scanner::{Opportunity, ScanMode, Scanner};
use poly_scout::snapshot::SnapshotBook;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio_test::{assert_err, assert_ok};

/// Live scan that promotes "m1-yes" with an ask of 0.40
async fn entry_opportunity(now: DateTime<Utc>) -> Opportunity {
    let scanner = Scanner::new(ScannerConfig::default(), ScoringConfig::default());
    let markets = vec![binary_market("m1", dec!(40000), now)];
    let books = BookTable::default();
    let mut snapshots = SnapshotBook::new();

    books.quote("m1-yes", dec!(0.37), dec!(0.38), dec!(2000));
    books.quote("m1-no", dec!(0.62), dec!(0.63), dec!(2000));
    let first = scanner
        .scan(&markets, &books, &mut snapshots, ScanMode::Live, now)
        .await;
    assert!(first.is_empty());

    books.quote("m1-yes", dec!(0.39), dec!(0.40), dec!(2000));
    let mut second = scanner
        .scan(&markets, &books, &mut snapshots, ScanMode::Live, now)
        .await;
    assert_eq!(second.len(), 1);
    second.remove(0)
}

fn quote(bid: Decimal, ask: Decimal) -> OrderBook {
    OrderBook::with_levels(
        "m1-yes",
        vec![PriceLevel::new(bid, dec!(2000))],
        vec![PriceLevel::new(ask, dec!(2000))],
    )
}

async fn open(now: DateTime<Utc>) -> (PositionLifecycle, Option<Position>) {
    let lifecycle = PositionLifecycle::new(PositionConfig::default());
    let opportunity = entry_opportunity(now).await;
    let mut slot = None;
    assert_ok!(lifecycle.open(&mut slot, &opportunity, now));
    (lifecycle, slot)
}

#[tokio::test]
async fn test_entry_thresholds() {
    let (_, slot) = open(Utc::now()).await;
    let position = slot.unwrap();

    assert_eq!(position.token_id, "m1-yes");
    assert_eq!(position.entry.avg_price, dec!(0.40));
    assert_eq!(position.exits.take_profit, dec!(0.42));
    assert_eq!(position.exits.stop_loss, dec!(0.38));
}

#[tokio::test]
async fn test_exit_scenarios() {
    let cases = [
        (dec!(0.425), Duration::minutes(1), ExitReason::TakeProfit),
        (dec!(0.37), Duration::minutes(1), ExitReason::StopLoss),
        (dec!(0.40), Duration::minutes(30), ExitReason::TimeStop),
        (dec!(0.50), Duration::minutes(45), ExitReason::TimeStop),
    ];

    for (bid, elapsed, expected) in cases {
        let now = Utc::now();
        let (lifecycle, mut slot) = open(now).await;
        let book = quote(bid, bid + dec!(0.01));

        let outcome = assert_ok!(lifecycle.tick(&mut slot, &book, now + elapsed));
        let TickOutcome::Closed { summary, .. } = outcome else {
            panic!("bid {bid}: expected close, got {outcome:?}");
        };
        assert_eq!(summary.reason, expected, "bid {bid}");
        assert_eq!(
            summary.pnl,
            (summary.exit_avg_price - dec!(0.40)) * summary.shares
        );
        assert!(slot.is_none());
    }
}

#[tokio::test]
async fn test_single_open_position() {
    let now = Utc::now();
    let (lifecycle, mut slot) = open(now).await;
    let opportunity = entry_opportunity(now).await;

    let err = assert_err!(lifecycle.open(&mut slot, &opportunity, now));
    assert!(matches!(err, LifecycleError::PositionAlreadyOpen(_)));

    // Slot frees up after a close
    let book = quote(dec!(0.45), dec!(0.46));
    assert_ok!(lifecycle.tick(&mut slot, &book, now));
    assert_ok!(lifecycle.open(&mut slot, &opportunity, now));
}
