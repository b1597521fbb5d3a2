use std::{fmt::Display, str::FromStr};

pub use bazaar_common::Satoshis;
use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::helpers::{compute_order_id, SerializationError};

//--------------------------------------        OrderId        ---------------------------------------------------------
/// A content-derived order identifier. See [`compute_order_id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------          TxId         ---------------------------------------------------------
/// A chain transaction identifier, held as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct TxId(String);

impl TxId {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TxId {
    fn from(s: &str) -> Self {
        Self(s.to_ascii_lowercase())
    }
}

impl From<String> for TxId {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

//--------------------------------------       OrderState      ---------------------------------------------------------
/// The coarse lifecycle state of an order. This is tracked independently of the `funded` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderState {
    /// The buyer has not yet sent the order to the vendor.
    AwaitingPayment,
    /// The order has been sent, but the vendor has not confirmed it.
    Pending,
    /// The vendor has accepted the order.
    Confirmed,
    /// The payment address has received at least the requested amount.
    Funded,
    Fulfilled,
    Completed,
    Canceled,
    Declined,
    Refunded,
    Disputed,
    Resolved,
}

impl Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderState::AwaitingPayment => "AwaitingPayment",
            OrderState::Pending => "Pending",
            OrderState::Confirmed => "Confirmed",
            OrderState::Funded => "Funded",
            OrderState::Fulfilled => "Fulfilled",
            OrderState::Completed => "Completed",
            OrderState::Canceled => "Canceled",
            OrderState::Declined => "Declined",
            OrderState::Refunded => "Refunded",
            OrderState::Disputed => "Disputed",
            OrderState::Resolved => "Resolved",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order state: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderState {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AwaitingPayment" => Ok(Self::AwaitingPayment),
            "Pending" => Ok(Self::Pending),
            "Confirmed" => Ok(Self::Confirmed),
            "Funded" => Ok(Self::Funded),
            "Fulfilled" => Ok(Self::Fulfilled),
            "Completed" => Ok(Self::Completed),
            "Canceled" => Ok(Self::Canceled),
            "Declined" => Ok(Self::Declined),
            "Refunded" => Ok(Self::Refunded),
            "Disputed" => Ok(Self::Disputed),
            "Resolved" => Ok(Self::Resolved),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

impl From<String> for OrderState {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order state: {value}. But this conversion cannot fail. Defaulting to Pending");
            OrderState::Pending
        })
    }
}

//--------------------------------------        Contract       ---------------------------------------------------------
/// The immutable agreement between a buyer and a vendor.
///
/// A sale (vendor side) and a purchase (buyer side) are two views of the same contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub vendor_listings: Vec<Listing>,
    pub buyer_order: Option<BuyerOrder>,
}

impl Contract {
    /// Shorthand for [`compute_order_id`] on the buyer order.
    pub fn order_id(&self) -> Result<OrderId, SerializationError> {
        let order = self.buyer_order.as_ref().ok_or(SerializationError::MissingBuyerOrder)?;
        compute_order_id(order)
    }

    pub fn payment_terms(&self) -> Result<&PaymentTerms, SerializationError> {
        self.buyer_order
            .as_ref()
            .ok_or(SerializationError::MissingBuyerOrder)?
            .payment
            .as_ref()
            .ok_or(SerializationError::MissingField("payment"))
    }

    pub fn items(&self) -> &[OrderItem] {
        self.buyer_order.as_ref().map(|o| o.items.as_slice()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub slug: String,
    pub title: String,
    /// Content hashes of the listing images. The first one is used as the thumbnail.
    pub images: Vec<String>,
}

/// The buyer-facing part of a contract. Its canonical serialization determines the [`OrderId`], so field order here is
/// significant and must not change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerOrder {
    pub buyer_id: Option<BuyerId>,
    pub timestamp: DateTime<Utc>,
    pub items: Vec<OrderItem>,
    pub payment: Option<PaymentTerms>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerId {
    pub guid: String,
    pub blockchain_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub listing_slug: String,
    pub quantity: i64,
    pub options: Vec<ItemOption>,
}

impl OrderItem {
    /// The tokens identifying the selected configuration of this item, one per chosen option.
    pub fn variant_tokens(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.value.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOption {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTerms {
    /// The address the buyer must pay into.
    pub address: String,
    /// The total amount requested for the order.
    pub amount: Satoshis,
}

//--------------------------------------     FundingRecord     ---------------------------------------------------------
/// One accounted payment output contributing to an order's total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingRecord {
    pub txid: TxId,
    pub index: u32,
    pub value: Satoshis,
}

//--------------------------------------     PaymentOutput     ---------------------------------------------------------
/// An observed transaction output. Outputs arrive in batches, one batch per transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOutput {
    pub index: u32,
    pub value: Satoshis,
    #[serde(with = "hex::serde")]
    pub script: Vec<u8>,
}

impl PaymentOutput {
    pub fn new<S: Into<Vec<u8>>>(index: u32, value: Satoshis, script: S) -> Self {
        Self { index, value, script: script.into() }
    }
}

//--------------------------------------      TrackedOrder     ---------------------------------------------------------
/// An order as the order store knows it: the immutable contract plus its mutable funding state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedOrder {
    pub contract: Contract,
    pub state: OrderState,
    pub funded: bool,
    pub records: Vec<FundingRecord>,
}

impl TrackedOrder {
    pub fn new(contract: Contract, state: OrderState) -> Self {
        Self { contract, state, funded: false, records: Vec::new() }
    }

    pub fn total_funding(&self) -> Satoshis {
        self.records.iter().map(|r| r.value).sum()
    }
}

/// Which side of the contract an order store entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    Sale,
    Purchase,
}

impl Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderKind::Sale => f.write_str("sale"),
            OrderKind::Purchase => f.write_str("purchase"),
        }
    }
}

/// An order that has been matched to a payment address, tagged with the index it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderMatch {
    pub kind: OrderKind,
    pub order: TrackedOrder,
}

impl OrderMatch {
    pub fn sale(order: TrackedOrder) -> Self {
        Self { kind: OrderKind::Sale, order }
    }

    pub fn purchase(order: TrackedOrder) -> Self {
        Self { kind: OrderKind::Purchase, order }
    }
}
