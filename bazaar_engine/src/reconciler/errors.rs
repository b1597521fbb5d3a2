use thiserror::Error;

use crate::{db_types::Satoshis, helpers::SerializationError};

/// Reasons a single payment output could not be applied. None of these are fatal to the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("Could not derive an order id. {0}")]
    Serialization(#[from] SerializationError),
    #[error("Payment outputs cannot carry a negative value ({0})")]
    NegativeAmount(Satoshis),
    #[error("The funding total for the order no longer fits in 64 bits")]
    AmountOverflow,
    #[error("A store call failed. {0}")]
    StoreUnavailable(String),
}

impl ReconcileError {
    pub fn store<E: std::error::Error>(e: E) -> Self {
        Self::StoreUnavailable(e.to_string())
    }
}
