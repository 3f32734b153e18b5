//! Order book fill simulation

use super::{BookSide, FillEstimate};
use crate::orderbook::OrderBook;
use rust_decimal::Decimal;

/// Unfilled notional below this is treated as filled
pub const FILL_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

/// Simulate a marketable order of `target_notional` currency units
///
/// Buys walk the asks cheapest first, sells walk the bids richest first,
/// regardless of the order the source delivered them in. Each level supplies
/// at most `price * size` of notional; the last level may be partially
/// consumed. Returns `None` when the book cannot absorb the full notional.
pub fn simulate_fill(
    book: &OrderBook,
    side: BookSide,
    target_notional: Decimal,
) -> Option<FillEstimate> {
    if target_notional <= Decimal::ZERO {
        return None;
    }

    let levels = match side {
        BookSide::Buy => book.sorted_asks(),
        BookSide::Sell => book.sorted_bids(),
    };

    let mut remaining = target_notional;
    let mut shares = Decimal::ZERO;
    let mut cost = Decimal::ZERO;
    let mut best_price: Option<Decimal> = None;
    let mut worst_price = Decimal::ZERO;
    let mut levels_consumed = 0;

    for level in &levels {
        if remaining <= FILL_EPSILON {
            break;
        }

        let level_notional = level.price * level.size;
        let take = remaining.min(level_notional);

        shares += take / level.price;
        cost += take;
        remaining -= take;
        levels_consumed += 1;

        best_price.get_or_insert(level.price);
        worst_price = level.price;
    }

    if remaining > FILL_EPSILON || shares <= Decimal::ZERO {
        tracing::trace!(
            token_id = %book.token_id,
            ?side,
            %target_notional,
            %remaining,
            "Insufficient depth for fill"
        );
        return None;
    }

    let best_price = best_price?;
    let (low, high) = match side {
        BookSide::Buy => (best_price, worst_price),
        BookSide::Sell => (worst_price, best_price),
    };

    // Division rounding at 28 digits can land a hair outside the touched range
    let avg_price = (cost / shares).max(low).min(high);

    Some(FillEstimate {
        avg_price,
        shares,
        notional_filled: cost,
        best_price,
        worst_price,
        levels_consumed,
    })
}
