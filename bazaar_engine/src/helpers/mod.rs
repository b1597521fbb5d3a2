mod address_extractor;
mod order_id;

pub use address_extractor::{Network, StandardScriptExtractor};
pub use order_id::{compute_order_id, SerializationError, MULTIHASH_SHA2_256};
