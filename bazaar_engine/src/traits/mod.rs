//! # Collaborator contracts
//!
//! The reconciler does not own any storage. It consumes the following interfaces, which a backend must implement:
//!
//! * [`OrderStore`] looks up sales and purchases by their payment address and persists funding state.
//! * [`InventoryStore`] exposes on-hand quantities keyed by stock-keeping path.
//! * [`AddressExtractor`] turns an output script into the addresses it pays to.
mod address_extractor;
mod inventory_store;
mod order_store;

pub use address_extractor::AddressExtractor;
pub use inventory_store::InventoryStore;
pub use order_store::OrderStore;
