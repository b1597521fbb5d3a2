//! # Reference storage backends
//!
//! The reconciler only talks to storage through the [`crate::traits`] contracts. [`MemoryDatabase`] is a small,
//! process-local implementation of those contracts. It is what the HTTP server runs against, and what the tests use.
mod memory;

pub use memory::{MemoryDatabase, MemoryDatabaseError};
