pub mod orderbook;
pub mod price_level;
pub mod slab;

pub use self::orderbook::{OrderBook, OrderBookError};
