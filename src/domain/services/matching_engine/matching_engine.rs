//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Normalizes an inbound NOS into an internal Order, dispatches it to the book for its symbol,
// and reports the outcome. One book per symbol, created lazily on first reference. Runs on a
// single thread: each `on_nos` call fully resolves (add, execute, optional IOC cleanup, report)
// before the next is accepted.
//
// | Name            | Description                                                           |
// |------------------|------------------------------------------------------------------------|
// | MatchingEngine   | symbol -> OrderBook map, sequencer, and outbound report producer.     |
//--------------------------------------------------------------------------------------------------
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::models::audit::AuditEvent;
use crate::domain::models::nos::{ExecutionReport, Nos};
use crate::domain::models::types::{MAX_PRICE, Order, OrderType, Side};
use crate::domain::services::orderbook::{OrderBook, OrderBookError};

/// Holds one [`OrderBook`] per symbol and turns each inbound [`Nos`] into an [`ExecutionReport`].
///
/// Not `Sync` by design — spec.md §5 bounds each book to a single writer thread, and this crate
/// models that as "the thread driving `on_nos`", with sharding across symbols left to the
/// (excluded) transport layer.
pub struct MatchingEngine {
    books: HashMap<String, OrderBook>,
    audit_tx: crossbeam_channel::Sender<AuditEvent>,
    outbound_tx: crossbeam_channel::Sender<ExecutionReport>,
    next_sequence_id: AtomicU64,
}

impl MatchingEngine {
    /// Builds an engine with no pre-warmed books, returning the receiver side of its outbound
    /// `ExecutionReport` queue.
    pub fn new(
        audit_tx: crossbeam_channel::Sender<AuditEvent>,
    ) -> (Self, crossbeam_channel::Receiver<ExecutionReport>) {
        let (outbound_tx, outbound_rx) = crossbeam_channel::unbounded();
        let engine = MatchingEngine {
            books: HashMap::new(),
            audit_tx,
            outbound_tx,
            next_sequence_id: AtomicU64::new(0),
        };
        (engine, outbound_rx)
    }

    /// Pre-creates empty books for `symbols`, so the first order for each doesn't pay book
    /// allocation on the hot path. Purely a warm-start convenience — `on_nos` creates missing
    /// books lazily regardless.
    pub fn warm_start(&mut self, symbols: &[String]) {
        for symbol in symbols {
            self.book_for(symbol);
        }
    }

    pub fn book(&self, symbol: &str) -> Option<&OrderBook> {
        self.books.get(symbol)
    }

    fn book_for(&mut self, symbol: &str) -> &mut OrderBook {
        self.books
            .entry(symbol.to_string())
            .or_insert_with(|| OrderBook::new(symbol, self.audit_tx.clone()))
    }

    /// Resolves/creates the book for `nos.symbol`, builds an internal order with type-specific
    /// price pre-processing, adds it, runs the matching pass, and reports the outcome. Returns
    /// the report it also pushed onto the outbound queue, so callers that drive the engine
    /// in-process don't need a separate receiver.
    pub fn on_nos(&mut self, nos: Nos) -> ExecutionReport {
        let sequence_id = self.next_sequence_id.fetch_add(1, Ordering::Relaxed);
        let book = self.book_for(&nos.symbol);

        let price = match nos.order_type {
            OrderType::Limit | OrderType::Ioc => nos.price,
            OrderType::Market => match nos.side {
                Side::Buy => book.best_ask().unwrap_or(MAX_PRICE),
                Side::Sell => book.best_bid().unwrap_or(0),
            },
        };

        let order = Order {
            id: nos.order_id,
            symbol: nos.symbol.clone(),
            side: nos.side,
            order_type: nos.order_type,
            price,
            qty: nos.qty,
            timestamp: nos.ts,
            sequence_id,
        };

        let report = match book.add(order) {
            Ok(()) => {
                book.execute();
                let remaining = book.remaining_qty(nos.order_id).unwrap_or(0);
                if nos.order_type == OrderType::Ioc && book.contains(nos.order_id) {
                    book.cancel(nos.order_id).expect(
                        "matching engine invariant violated: IOC residual vanished between contains and cancel",
                    );
                }
                let fill_qty = nos.qty - remaining;
                ExecutionReport::filled(&nos.symbol, nos.order_id, price, fill_qty, remaining)
            }
            Err(err) => ExecutionReport::rejected(&nos.symbol, nos.order_id, describe_rejection(&err)),
        };

        let _ = self.outbound_tx.send(report.clone());
        report
    }
}

fn describe_rejection(err: &OrderBookError) -> String {
    err.to_string()
}
