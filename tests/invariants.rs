//! The six universally quantified invariants from the core's testable-properties list, each
//! exercised through the public `OrderBook`/`MatchingEngine` API only.
use ome_core::{AuditEvent, MatchingEngine, Nos, Order, OrderBook, OrderBookError, OrderType, Side};
use uuid::Uuid;

fn book() -> (OrderBook, crossbeam_channel::Receiver<AuditEvent>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (OrderBook::new("AAPL", tx), rx)
}

fn engine() -> MatchingEngine {
    let (tx, _rx) = crossbeam_channel::unbounded();
    let (engine, _reports) = MatchingEngine::new(tx);
    engine
}

fn limit_order(id: Uuid, side: Side, price: u32, qty: u32) -> Order {
    Order {
        id,
        symbol: "AAPL".to_string(),
        side,
        order_type: OrderType::Limit,
        price,
        qty,
        timestamp: 0,
        sequence_id: 0,
    }
}

fn nos(side: Side, order_type: OrderType, price: u32, qty: u32) -> Nos {
    Nos {
        order_id: Uuid::new_v4(),
        symbol: "AAPL".to_string(),
        side,
        order_type,
        price,
        qty,
        ts: 0,
    }
}

/// Invariant 1: a level's aggregate quantity always equals the sum of its resting orders' qty.
/// Exercised indirectly: after a partial match, the buy side's only resting order carries exactly
/// the shortfall, and nothing else is left to account for.
#[test]
fn invariant_total_qty_matches_sum_of_resting_orders() {
    let (mut b, _rx) = book();
    let buy = Uuid::new_v4();
    b.add(limit_order(buy, Side::Buy, 100, 10)).unwrap();
    b.add(limit_order(Uuid::new_v4(), Side::Sell, 100, 4)).unwrap();
    b.execute();

    assert_eq!(b.remaining_qty(buy), Some(6));
}

/// Invariant 2: an id is in the index iff it is present in exactly one level. Observed through
/// `contains`, which is backed directly by the id index.
#[test]
fn invariant_index_membership_matches_contains() {
    let (mut b, _rx) = book();
    let id = Uuid::new_v4();
    assert!(!b.contains(id));

    b.add(limit_order(id, Side::Buy, 100, 5)).unwrap();
    assert!(b.contains(id));

    b.cancel(id).unwrap();
    assert!(!b.contains(id));
}

/// Invariant 3: `best_bid`/`best_ask` always reflect the extremal non-empty price, surviving
/// cancels that remove the current best and expose a sparser level behind it.
#[test]
fn invariant_best_price_tracks_extremal_nonempty_level() {
    let (mut b, _rx) = book();
    let low = Uuid::new_v4();
    let high = Uuid::new_v4();
    b.add(limit_order(low, Side::Sell, 150, 5)).unwrap();
    b.add(limit_order(high, Side::Sell, 120, 5)).unwrap();
    assert_eq!(b.best_ask(), Some(120));

    b.cancel(high).unwrap();
    assert_eq!(b.best_ask(), Some(150));

    b.cancel(low).unwrap();
    assert_eq!(b.best_ask(), None);
}

/// Invariant 4: no report's `leaves_qty` is negative (structurally true of `u32`), and for a
/// non-rejected report `fill_qty + leaves_qty <= original_qty`.
#[test]
fn invariant_fill_and_leaves_never_exceed_original_qty() {
    let mut e = engine();
    e.on_nos(nos(Side::Sell, OrderType::Limit, 100, 4));
    let report = e.on_nos(nos(Side::Buy, OrderType::Limit, 100, 10));

    assert!(!report.reject);
    assert_eq!(report.fill_qty, 4);
    assert_eq!(report.leaves_qty, 6);
    assert!(report.fill_qty + report.leaves_qty <= 10);
}

/// Invariant 5: `add` followed by `cancel` of the same id on an otherwise empty book restores the
/// empty state exactly.
#[test]
fn invariant_add_then_cancel_restores_empty_book() {
    let (mut b, _rx) = book();
    let id = Uuid::new_v4();
    b.add(limit_order(id, Side::Buy, 500, 7)).unwrap();
    b.cancel(id).unwrap();

    assert_eq!(b.best_bid(), None);
    assert_eq!(b.best_ask(), None);
    assert!(!b.contains(id));
}

/// Invariant 6: a duplicate `add` with the same id is rejected and leaves the book's observable
/// state unchanged.
#[test]
fn invariant_duplicate_add_is_idempotent_rejection() {
    let (mut b, _rx) = book();
    let o = limit_order(Uuid::new_v4(), Side::Buy, 100, 10);
    let dup = o.clone();
    let id = o.id;
    b.add(o).unwrap();

    let before_best = b.best_bid();
    let before_qty = b.remaining_qty(id);

    assert_eq!(b.add(dup).unwrap_err(), OrderBookError::DuplicateId(id));
    assert_eq!(b.best_bid(), before_best);
    assert_eq!(b.remaining_qty(id), before_qty);
}
