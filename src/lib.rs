pub mod config;
pub mod domain;

pub use config::Config;
pub use domain::models::audit::{AuditEvent, AuditEventKind};
pub use domain::models::nos::{ExecutionReport, Nos};
pub use domain::models::types::{
    DEFAULT_AUDIT_FLUSH_INTERVAL_MS, MAX_PRICE, ORDER_ID_LEN, Order, OrderId, OrderType, Side, SYMBOL_MAX_LEN,
};
pub use domain::services::audit::{AuditSink, AuditSinkError};
pub use domain::services::matching_engine::MatchingEngine;
pub use domain::services::orderbook::{OrderBook, OrderBookError};
