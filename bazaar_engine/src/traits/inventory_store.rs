use std::collections::BTreeMap;

/// Keyed on-hand quantities. The key is a stock-keeping path such as `shirt/red/M`.
#[allow(async_fn_in_trait)]
pub trait InventoryStore {
    type Error: std::error::Error;

    /// A consistent view of every inventory entry and its current quantity.
    async fn snapshot(&self) -> Result<BTreeMap<String, i64>, Self::Error>;

    async fn set_quantity(&self, path: &str, quantity: i64) -> Result<(), Self::Error>;
}
