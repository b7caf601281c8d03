//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The normalized inbound message (NOS) and outbound ExecutionReport — the only two shapes the
// core exposes across the transport boundary (§6). Wire framing/encoding is out of scope.
//--------------------------------------------------------------------------------------------------
use serde::{Deserialize, Serialize};

use crate::domain::models::types::{OrderId, OrderType, Side};

/// A single client order request, already decoded off the wire by the (out-of-scope) transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nos {
    pub order_id: OrderId,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub price: u32,
    pub qty: u32,
    pub ts: u64,
}

/// The engine's reply to one [`Nos`]: fill outcome or rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub symbol: String,
    pub order_id: OrderId,
    pub fill_px: u32,
    pub fill_qty: u32,
    pub leaves_qty: u32,
    pub reject: bool,
    pub text: Option<String>,
}

impl ExecutionReport {
    pub fn filled(symbol: &str, order_id: OrderId, fill_px: u32, fill_qty: u32, leaves_qty: u32) -> Self {
        ExecutionReport {
            symbol: symbol.to_string(),
            order_id,
            fill_px,
            fill_qty,
            leaves_qty,
            reject: false,
            text: None,
        }
    }

    pub fn rejected(symbol: &str, order_id: OrderId, text: impl Into<String>) -> Self {
        ExecutionReport {
            symbol: symbol.to_string(),
            order_id,
            fill_px: 0,
            fill_qty: 0,
            leaves_qty: 0,
            reject: true,
            text: Some(text.into()),
        }
    }
}
