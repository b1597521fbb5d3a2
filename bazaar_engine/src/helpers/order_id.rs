//! # Order identity
//!
//! An order is identified by the hash of its buyer order, so that the same contract always maps to the same id no
//! matter when, or how many times, it is fetched from the store.
//!
//! The id is built as follows:
//! 1. Serialize the [`BuyerOrder`] to canonical JSON. Struct fields serialize in declaration order and the buyer order
//!    contains no maps, so the encoding is deterministic.
//! 2. Hash the bytes with SHA-256.
//! 3. Prefix the digest with the multihash header `[0x12, 0x20]` (sha2-256, 32 bytes).
//! 4. Render the result in base-58. Every id is 46 characters long and starts with `Qm`.
use log::trace;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::db_types::{BuyerOrder, OrderId};

/// The multihash function code for SHA2-256.
pub const MULTIHASH_SHA2_256: u8 = 0x12;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
    #[error("The contract does not contain a buyer order")]
    MissingBuyerOrder,
    #[error("The buyer order is missing the required field '{0}'")]
    MissingField(&'static str),
    #[error("Could not encode the buyer order. {0}")]
    Encoding(String),
}

pub fn compute_order_id(order: &BuyerOrder) -> Result<OrderId, SerializationError> {
    if order.buyer_id.is_none() {
        return Err(SerializationError::MissingField("buyer_id"));
    }
    if order.payment.is_none() {
        return Err(SerializationError::MissingField("payment"));
    }
    let canonical = serde_json::to_vec(order).map_err(|e| SerializationError::Encoding(e.to_string()))?;
    let digest = Sha256::digest(&canonical);
    let mut multihash = Vec::with_capacity(digest.len() + 2);
    multihash.push(MULTIHASH_SHA2_256);
    multihash.push(digest.len() as u8);
    multihash.extend_from_slice(&digest);
    let id = bs58::encode(multihash).into_string();
    trace!("🧾️ Order id {id} computed from {} canonical bytes", canonical.len());
    Ok(OrderId(id))
}
