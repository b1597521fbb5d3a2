use bazaar_engine::db_types::{Contract, OrderId, OrderKind, OrderState, PaymentOutput, TrackedOrder, TxId};
use serde::{Deserialize, Serialize};

/// The outputs of one transaction, as reported by the wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletOutputs {
    pub txid: TxId,
    pub outputs: Vec<PaymentOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrackedOrder {
    pub contract: Contract,
    #[serde(default = "default_state")]
    pub state: OrderState,
}

fn default_state() -> OrderState {
    OrderState::Pending
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryLevel {
    pub path: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIdResponse {
    pub order_id: OrderId,
}

/// A tracked order, tagged with whether it is a sale or a purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResult {
    pub kind: OrderKind,
    pub order_id: OrderId,
    #[serde(flatten)]
    pub order: TrackedOrder,
}
