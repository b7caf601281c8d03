//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Core data types shared by the orderbook and matching engine: order identity, side, order type,
// the resting Order record, and the engine-wide constants that bound the price domain.
//
// | Name        | Description                                             |
// |-------------|----------------------------------------------------------|
// | Side        | BUY or SELL.                                              |
// | OrderType   | LIMIT, MARKET, or IOC.                                    |
// | Order       | A resting or in-flight order.                             |
//--------------------------------------------------------------------------------------------------
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Upper bound on price ticks. Ladders are dense arrays sized `MAX_PRICE + 1`.
pub const MAX_PRICE: u32 = 20_000;

/// Length in bytes of the opaque, client-assigned order identifier.
pub const ORDER_ID_LEN: usize = 16;

/// Default wait between forced audit-log flushes when no events arrive.
pub const DEFAULT_AUDIT_FLUSH_INTERVAL_MS: u64 = 500;

/// Maximum length of a symbol ticker, per the NOS wire contract.
pub const SYMBOL_MAX_LEN: usize = 8;

/// The side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    Buy = 0,
    Sell = 1,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// How a NOS should be matched against the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OrderType {
    /// Execute at the supplied price or better; rests if it doesn't fully cross.
    Limit = 0,
    /// Execute at the best available opposing price; the price is rewritten before insertion.
    Market = 1,
    /// Match what's immediately available at the limit price, cancel any residual.
    Ioc = 2,
}

/// An order's identity, exactly `ORDER_ID_LEN` bytes, opaque and client-assigned.
///
/// Represented as a [`Uuid`] purely because it is already a 16-byte, `Hash + Eq` wrapper with
/// byte-for-byte equality — no UUID version/variant is assumed or validated.
pub type OrderId = Uuid;

/// A resting order. Identity (`id`, `symbol`, `side`) is immutable once created; `price` and
/// `qty` may change under `modify`, and `qty` is decremented in place by `execute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Opaque, client-assigned identity.
    pub id: OrderId,
    /// Ticker, at most [`SYMBOL_MAX_LEN`] characters.
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    /// Ticks, bounded by [`MAX_PRICE`]. Rewritten for `Market` orders before insertion.
    pub price: u32,
    /// Remaining quantity. Must be `> 0` while resting in a price level.
    pub qty: u32,
    /// Nanoseconds since a monotonic epoch; used for FIFO priority and audit timestamps.
    pub timestamp: u64,
    /// Assigned by the matching engine on receipt, used to order same-timestamp arrivals.
    pub sequence_id: u64,
}

/// Current wall-clock time in nanoseconds since the Unix epoch, used to stamp audit events that
/// aren't tied to a specific resting order's own `timestamp` (namely `MATCH`).
pub fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before Unix epoch")
        .as_nanos() as u64
}

impl Order {
    #[cfg(test)]
    pub fn new_test(side: Side, price: u32, qty: u32, symbol: &str) -> Self {
        Order {
            id: Uuid::new_v4(),
            symbol: symbol.to_string(),
            side,
            order_type: OrderType::Limit,
            price,
            qty,
            timestamp: 0,
            sequence_id: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_opposite_round_trips() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn order_construction() {
        let o = Order::new_test(Side::Buy, 100, 10, "AAPL");
        assert_eq!(o.side, Side::Buy);
        assert_eq!(o.qty, 10);
        assert_eq!(o.price, 100);
    }
}
