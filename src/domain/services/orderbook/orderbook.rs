//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The book for a single symbol: two dense price ladders (bid and ask), a FIFO `PriceLevel` at
// each tick, and an id index for O(1) cancel/modify. `execute` is the only place orders cross;
// `add`/`cancel`/`modify` only ever touch one side and one price.
//
// | Name            | Description                                                          |
// |------------------|----------------------------------------------------------------------|
// | OrderBookError   | Reasons `add`/`cancel`/`modify` refuse a request.                    |
// | OrderLocation    | Where a resting order lives: side, price, and its slab handle.       |
// | OrderBook        | The book itself.                                                     |
//--------------------------------------------------------------------------------------------------
use std::collections::HashMap;

use thiserror::Error;

use crate::domain::models::audit::AuditEvent;
use crate::domain::models::types::{MAX_PRICE, Order, OrderId, Side, now_ns};
use crate::domain::services::orderbook::price_level::PriceLevel;
use crate::domain::services::orderbook::slab::Handle;

/// Sentinel `best_ask_price` meaning "no resting asks" — one past the top of the ladder.
const NO_ASK: u32 = MAX_PRICE + 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderBookError {
    #[error("order id {0} already resting in book")]
    DuplicateId(OrderId),
    /// Retained for parity with the wire-level error taxonomy; unreachable through `add` once a
    /// `Side` has already been typed, since an out-of-range discriminant can't be constructed.
    #[error("side value outside {{0,1}}")]
    InvalidSide,
    #[error("price {0} outside [0, {MAX_PRICE}]")]
    InvalidPrice(u32),
    #[error("order id {0} not found")]
    OrderNotFound(OrderId),
}

#[derive(Debug, Clone, Copy)]
struct OrderLocation {
    side: Side,
    price: u32,
    handle: Handle,
}

/// A single symbol's book: two dense price ladders plus an id index for O(1) cancel/modify.
///
/// Ladders are `Vec<PriceLevel>` sized `MAX_PRICE + 1` and indexed directly by price, trading
/// memory for the guarantee that `add`/`cancel`/best-price maintenance never allocate or walk a
/// tree — the span between adjacent resting prices is where `execute` spends its time, not the
/// lookup.
pub struct OrderBook {
    symbol: String,
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
    best_bid_price: u32,
    best_ask_price: u32,
    index: HashMap<OrderId, OrderLocation>,
    audit_tx: crossbeam_channel::Sender<AuditEvent>,
}

impl OrderBook {
    pub fn new(symbol: impl Into<String>, audit_tx: crossbeam_channel::Sender<AuditEvent>) -> Self {
        let mut bids = Vec::with_capacity(MAX_PRICE as usize + 1);
        let mut asks = Vec::with_capacity(MAX_PRICE as usize + 1);
        for _ in 0..=MAX_PRICE {
            bids.push(PriceLevel::new());
            asks.push(PriceLevel::new());
        }
        OrderBook {
            symbol: symbol.into(),
            bids,
            asks,
            best_bid_price: 0,
            best_ask_price: NO_ASK,
            index: HashMap::new(),
            audit_tx,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Best resting bid, or `None` if the book has no bids. Distinguished from a genuine bid
    /// resting at price 0 by checking whether that level is actually occupied.
    pub fn best_bid(&self) -> Option<u32> {
        if self.best_bid_price == 0 && self.bids[0].is_empty() {
            None
        } else {
            Some(self.best_bid_price)
        }
    }

    pub fn best_ask(&self) -> Option<u32> {
        if self.best_ask_price > MAX_PRICE || self.asks[self.best_ask_price as usize].is_empty() {
            None
        } else {
            Some(self.best_ask_price)
        }
    }

    pub fn contains(&self, id: OrderId) -> bool {
        self.index.contains_key(&id)
    }

    /// Remaining qty of a resting order, if it's still in the book.
    pub fn remaining_qty(&self, id: OrderId) -> Option<u32> {
        let loc = self.index.get(&id)?;
        let level = self.level(loc.side, loc.price);
        level.get(loc.handle).map(|o| o.qty)
    }

    fn level(&self, side: Side, price: u32) -> &PriceLevel {
        match side {
            Side::Buy => &self.bids[price as usize],
            Side::Sell => &self.asks[price as usize],
        }
    }

    fn level_mut(&mut self, side: Side, price: u32) -> &mut PriceLevel {
        match side {
            Side::Buy => &mut self.bids[price as usize],
            Side::Sell => &mut self.asks[price as usize],
        }
    }

    /// Inserts a resting order at the tail of its (side, price) level. Does not cross the book —
    /// callers run `execute` afterward if the order might be marketable.
    pub fn add(&mut self, order: Order) -> Result<(), OrderBookError> {
        if order.price > MAX_PRICE {
            return Err(OrderBookError::InvalidPrice(order.price));
        }
        if self.index.contains_key(&order.id) {
            return Err(OrderBookError::DuplicateId(order.id));
        }

        let id = order.id;
        let side = order.side;
        let price = order.price;
        let event = AuditEvent::add(&order);

        let handle = self.level_mut(side, price).insert(order);
        self.index.insert(id, OrderLocation { side, price, handle });
        self.on_level_gained_order(side, price);

        self.emit(event);
        Ok(())
    }

    /// Removes a resting order outright.
    pub fn cancel(&mut self, id: OrderId) -> Result<(), OrderBookError> {
        let loc = self
            .index
            .remove(&id)
            .ok_or(OrderBookError::OrderNotFound(id))?;
        let order = self.level_mut(loc.side, loc.price).erase(loc.handle);
        self.on_level_may_have_emptied(loc.side, loc.price);

        self.emit(AuditEvent::cancel(&order));
        Ok(())
    }

    /// Changes price, qty, and/or side of a resting order. Always re-queues at the new tail —
    /// even when price and side are unchanged — so the order loses time priority against
    /// anything resting ahead of it, matching how the original engine's in-place modify behaves
    /// (see DESIGN.md). A `new_side` different from the order's current side relocates it to the
    /// opposite ladder (spec §4.2 regime (b)), running best-price repair on the vacated side and
    /// updating the cursor for the new one.
    pub fn modify(
        &mut self,
        id: OrderId,
        new_side: Side,
        new_price: u32,
        new_qty: u32,
    ) -> Result<(), OrderBookError> {
        if new_price > MAX_PRICE {
            return Err(OrderBookError::InvalidPrice(new_price));
        }
        let loc = *self.index.get(&id).ok_or(OrderBookError::OrderNotFound(id))?;

        let old_order = self.level_mut(loc.side, loc.price).erase(loc.handle);
        self.on_level_may_have_emptied(loc.side, loc.price);

        let mut new_order = old_order.clone();
        new_order.side = new_side;
        new_order.price = new_price;
        new_order.qty = new_qty;
        let event = AuditEvent::modify(&new_order, &old_order);

        let handle = self.level_mut(new_side, new_price).insert(new_order);
        self.index.insert(
            id,
            OrderLocation {
                side: new_side,
                price: new_price,
                handle,
            },
        );
        self.on_level_gained_order(new_side, new_price);

        self.emit(event);
        Ok(())
    }

    /// Crosses the book: while the best bid is at or above the best ask, matches the two FIFO
    /// heads at the resting (ask) side's price, fully consuming whichever side runs out first.
    /// Runs to quiescence — callers don't need to loop.
    pub fn execute(&mut self) {
        loop {
            if self.best_bid_price < self.best_ask_price {
                break;
            }
            let bid_price = self.best_bid_price;
            let ask_price = self.best_ask_price;
            if ask_price > MAX_PRICE || self.bids[bid_price as usize].is_empty() || self.asks[ask_price as usize].is_empty() {
                break;
            }

            let (buy_id, buy_handle) = {
                let o = self.bids[bid_price as usize]
                    .front()
                    .expect("best_bid_price invariant violated: level empty after non-empty check");
                (o.id, self.index[&o.id].handle)
            };
            let (sell_id, sell_handle) = {
                let o = self.asks[ask_price as usize]
                    .front()
                    .expect("best_ask_price invariant violated: level empty after non-empty check");
                (o.id, self.index[&o.id].handle)
            };

            let buy_qty = self.bids[bid_price as usize]
                .get_mut(buy_handle)
                .expect("index/level mismatch on buy side")
                .qty;
            let sell_qty = self.asks[ask_price as usize]
                .get_mut(sell_handle)
                .expect("index/level mismatch on sell side")
                .qty;
            let traded = buy_qty.min(sell_qty);

            self.bids[bid_price as usize].reduce_front_qty(buy_handle, traded);
            self.asks[ask_price as usize].reduce_front_qty(sell_handle, traded);

            self.emit(AuditEvent::matched(
                now_ns(),
                buy_id,
                bid_price,
                traded as u64,
                sell_id,
                ask_price,
            ));

            if self.bids[bid_price as usize]
                .get_mut(buy_handle)
                .expect("index/level mismatch on buy side")
                .qty
                == 0
            {
                self.index.remove(&buy_id);
                self.bids[bid_price as usize].erase(buy_handle);
            }
            if self.asks[ask_price as usize]
                .get_mut(sell_handle)
                .expect("index/level mismatch on sell side")
                .qty
                == 0
            {
                self.index.remove(&sell_id);
                self.asks[ask_price as usize].erase(sell_handle);
            }

            self.on_level_may_have_emptied(Side::Buy, bid_price);
            self.on_level_may_have_emptied(Side::Sell, ask_price);
        }
    }

    /// Widens the best-price cursor outward to include a newly inserted level, if it improved.
    fn on_level_gained_order(&mut self, side: Side, price: u32) {
        match side {
            Side::Buy => {
                if self.bids[self.best_bid_price as usize].is_empty() || price > self.best_bid_price {
                    self.best_bid_price = price;
                }
            }
            Side::Sell => {
                if self.best_ask_price > MAX_PRICE || self.asks[self.best_ask_price as usize].is_empty() || price < self.best_ask_price {
                    self.best_ask_price = price;
                }
            }
        }
    }

    /// After an erase, repairs the best-price cursor if the level it pointed at just went empty,
    /// rescanning inward from the old best toward the opposite extreme until a non-empty level
    /// (or the sentinel) is found.
    fn on_level_may_have_emptied(&mut self, side: Side, price: u32) {
        match side {
            Side::Buy => {
                if price != self.best_bid_price || !self.bids[price as usize].is_empty() {
                    return;
                }
                let mut p = self.best_bid_price;
                while p > 0 && self.bids[p as usize].is_empty() {
                    p -= 1;
                }
                self.best_bid_price = if self.bids[p as usize].is_empty() { 0 } else { p };
            }
            Side::Sell => {
                if price != self.best_ask_price || !self.asks[price as usize].is_empty() {
                    return;
                }
                let mut p = self.best_ask_price;
                while p < MAX_PRICE && self.asks[p as usize].is_empty() {
                    p += 1;
                }
                self.best_ask_price = if self.asks[p as usize].is_empty() { NO_ASK } else { p };
            }
        }
    }

    fn emit(&self, event: AuditEvent) {
        // An unbounded channel with a live receiver never fails here; a closed receiver means the
        // audit sink thread has already shut down, which only happens at process teardown.
        let _ = self.audit_tx.send(event);
    }
}
