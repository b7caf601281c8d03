//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// One price level: a FIFO queue of resting orders at a single (symbol, side, price) and the
// cached total_qty invariant (`total_qty == sum of resting qty`) that best-price and matching
// logic lean on without rescanning the queue.
//--------------------------------------------------------------------------------------------------
use super::slab::{Handle, Slab};
use crate::domain::models::types::Order;

/// FIFO queue of orders resting at one price, plus the running total of their `qty`.
pub struct PriceLevel {
    orders: Slab<Order>,
    total_qty: u64,
}

impl PriceLevel {
    pub fn new() -> Self {
        PriceLevel {
            orders: Slab::new(),
            total_qty: 0,
        }
    }

    /// Appends to the tail (time priority). Returns a handle stable across other inserts/erases
    /// at this level.
    pub fn insert(&mut self, order: Order) -> Handle {
        self.total_qty += order.qty as u64;
        self.orders.push_back(order)
    }

    /// Removes the order at `handle` in O(1) and keeps `total_qty` consistent.
    pub fn erase(&mut self, handle: Handle) -> Order {
        let order = self.orders.remove(handle);
        self.total_qty = self
            .total_qty
            .checked_sub(order.qty as u64)
            .expect("price level total_qty invariant violated: qty underflow on erase");
        order
    }

    /// Reference to the next order to match or cancel (FIFO head).
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    pub fn get(&self, handle: Handle) -> Option<&Order> {
        self.orders.get(handle)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut Order> {
        self.orders.get_mut(handle)
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn total_qty(&self) -> u64 {
        self.total_qty
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Decrements `front`'s qty by `amount` and keeps `total_qty` consistent. The caller is
    /// responsible for erasing the order once its qty reaches zero.
    pub fn reduce_front_qty(&mut self, handle: Handle, amount: u32) {
        self.total_qty = self
            .total_qty
            .checked_sub(amount as u64)
            .expect("price level total_qty invariant violated: qty underflow on match");
        let order = self
            .orders
            .get_mut(handle)
            .expect("price level invariant violated: front handle not found");
        order.qty = order
            .qty
            .checked_sub(amount)
            .expect("order qty invariant violated: match amount exceeds resting qty");
    }
}

impl Default for PriceLevel {
    fn default() -> Self {
        Self::new()
    }
}
