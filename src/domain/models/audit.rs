//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The audit event record appended by every book mutation and drained by the AuditSink.
//--------------------------------------------------------------------------------------------------
use crate::domain::models::types::{OrderId, Side};

/// The kind of book mutation an [`AuditEvent`] records. Encoded on the wire as `0..3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AuditEventKind {
    Add = 0,
    Cancel = 1,
    Modify = 2,
    Match = 3,
}

/// One append-only audit record.
///
/// `ADD`/`CANCEL` only populate the primary fields (secondary fields are zero/default).
/// `MODIFY` carries the new order in the primary fields and the pre-modify snapshot in the
/// secondary fields. `MATCH` carries the bid side in the primary fields and the ask side in the
/// secondary fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    pub timestamp: u64,
    pub id: OrderId,
    pub kind: AuditEventKind,
    pub price: u32,
    pub qty: u64,
    pub side: Side,

    pub id2: OrderId,
    pub price2: u32,
    pub qty2: u64,
    pub side2: Side,
}

impl AuditEvent {
    pub fn add(order: &crate::domain::models::types::Order) -> Self {
        Self::primary_only(AuditEventKind::Add, order)
    }

    pub fn cancel(order: &crate::domain::models::types::Order) -> Self {
        Self::primary_only(AuditEventKind::Cancel, order)
    }

    fn primary_only(kind: AuditEventKind, order: &crate::domain::models::types::Order) -> Self {
        AuditEvent {
            timestamp: order.timestamp,
            id: order.id,
            kind,
            price: order.price,
            qty: order.qty as u64,
            side: order.side,
            id2: OrderId::nil(),
            price2: 0,
            qty2: 0,
            side2: Side::Buy,
        }
    }

    pub fn modify(
        new_order: &crate::domain::models::types::Order,
        old_order: &crate::domain::models::types::Order,
    ) -> Self {
        AuditEvent {
            timestamp: new_order.timestamp,
            id: new_order.id,
            kind: AuditEventKind::Modify,
            price: new_order.price,
            qty: new_order.qty as u64,
            side: new_order.side,
            id2: old_order.id,
            price2: old_order.price,
            qty2: old_order.qty as u64,
            side2: old_order.side,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn matched(
        timestamp: u64,
        bid_id: OrderId,
        bid_price: u32,
        match_qty: u64,
        ask_id: OrderId,
        ask_price: u32,
    ) -> Self {
        AuditEvent {
            timestamp,
            id: bid_id,
            kind: AuditEventKind::Match,
            price: bid_price,
            qty: match_qty,
            side: Side::Buy,
            id2: ask_id,
            price2: ask_price,
            qty2: match_qty,
            side2: Side::Sell,
        }
    }

    /// Renders one `KEY=VALUE` audit line, newline-terminated, per the wire format in §6.
    pub fn to_line(&self) -> String {
        format!(
            "TIMESTAMP={} KIND={} PRICE={} QTY={} SIDE={} PRICE2={} QTY2={} SIDE2={} ORDID={} ORDID2={}\n",
            self.timestamp,
            self.kind as u8,
            self.price,
            self.qty,
            self.side as u8,
            self.price2,
            self.qty2,
            self.side2 as u8,
            self.id.simple(),
            self.id2.simple(),
        )
    }
}
