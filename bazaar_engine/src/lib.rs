//! Bazaar Payment Engine
//!
//! The payment engine matches payments observed on chain with the marketplace orders they pay for. Payments can
//! arrive in any order, be delivered more than once, or be split over several outputs. The engine makes sure that each
//! transaction is counted once per order, that funding totals add up, and that the side effects of an order becoming
//! funded (inventory adjustment and notification) happen exactly once.
//!
//! The library is divided into the following sections:
//! 1. The reconciler ([`mod@reconciler`]). [`PaymentReconciler`] is the single entry point for the wallet-sync process.
//! 2. Collaborator contracts ([`mod@traits`]). Order and inventory storage, and output-script address extraction,
//!    are supplied by the host application.
//! 3. Events ([`mod@events`]). Notifications leave the engine as serialized payloads on a bounded channel. Hooks can be
//!    registered to consume them.
//! 4. A process-local reference store ([`MemoryDatabase`]).
mod db;

pub mod db_types;
pub mod events;
pub mod helpers;
pub mod reconciler;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use db::{MemoryDatabase, MemoryDatabaseError};
pub use reconciler::{PaymentOutcome, PaymentReconciler, ReconcileError, ReconciliationReport};
pub use traits::{AddressExtractor, InventoryStore, OrderStore};
