use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db_types::{Contract, OrderId};

/// Sent to the vendor when one of their sales receives its full payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFundedEvent {
    pub title: String,
    pub buyer_guid: String,
    pub buyer_blockchain_id: String,
    pub thumbnail: String,
    pub timestamp: i64,
    pub order_id: OrderId,
}

impl OrderFundedEvent {
    /// Builds the event from the contract. Missing listing or buyer details are left blank.
    pub fn new(contract: &Contract, order_id: OrderId) -> Self {
        let listing = contract.vendor_listings.first();
        let buyer_order = contract.buyer_order.as_ref();
        let buyer = buyer_order.and_then(|o| o.buyer_id.as_ref());
        Self {
            title: listing.map(|l| l.title.clone()).unwrap_or_default(),
            buyer_guid: buyer.map(|b| b.guid.clone()).unwrap_or_default(),
            buyer_blockchain_id: buyer.map(|b| b.blockchain_id.clone()).unwrap_or_default(),
            thumbnail: listing.and_then(|l| l.images.first().cloned()).unwrap_or_default(),
            timestamp: buyer_order.map(|o| o.timestamp).unwrap_or_else(DateTime::<Utc>::default).timestamp(),
            order_id,
        }
    }
}

/// Sent to the buyer when their purchase has been paid in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceivedEvent {
    pub order_id: OrderId,
}

/// Sent when a funded sale asks for more stock than is on hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryWarningEvent {
    pub order_id: OrderId,
    pub path: String,
    pub message: String,
}

impl InventoryWarningEvent {
    pub fn new(order_id: OrderId, path: &str) -> Self {
        let message = format!("order {order_id} exceeded on hand inventory for {path}");
        Self { order_id, path: path.to_string(), message }
    }
}

/// Everything the reconciler publishes on the outbound channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    #[serde(rename = "order")]
    OrderFunded(OrderFundedEvent),
    #[serde(rename = "payment")]
    PaymentReceived(PaymentReceivedEvent),
    #[serde(rename = "warning")]
    InventoryWarning(InventoryWarningEvent),
}

impl Notification {
    pub fn to_payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_payload(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}
