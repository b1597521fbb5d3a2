use crate::db_types::{Contract, FundingRecord, OrderId, OrderState, TrackedOrder};

/// The `OrderStore` trait defines how the reconciler finds orders and records their funding.
///
/// Sales and purchases live in separate indices. A lookup miss is not an error: backends return `Ok(None)` and the
/// payment is treated as unrelated to any tracked order.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    type Error: std::error::Error;

    /// Fetches the sale whose payment address is `address`.
    async fn find_sale_by_address(&self, address: &str) -> Result<Option<TrackedOrder>, Self::Error>;

    /// Fetches the purchase whose payment address is `address`.
    async fn find_purchase_by_address(&self, address: &str) -> Result<Option<TrackedOrder>, Self::Error>;

    /// Stores the given state for the sale with id `order_id`.
    async fn set_sale_state(
        &self,
        order_id: &OrderId,
        contract: &Contract,
        state: OrderState,
        funded: bool,
    ) -> Result<(), Self::Error>;

    /// Stores the given state for the purchase with id `order_id`.
    async fn set_purchase_state(
        &self,
        order_id: &OrderId,
        contract: &Contract,
        state: OrderState,
        funded: bool,
    ) -> Result<(), Self::Error>;

    /// Replaces the funded flag and funding records of a sale.
    async fn update_sale_funding(
        &self,
        order_id: &OrderId,
        funded: bool,
        records: &[FundingRecord],
    ) -> Result<(), Self::Error>;

    /// Replaces the funded flag and funding records of a purchase.
    async fn update_purchase_funding(
        &self,
        order_id: &OrderId,
        funded: bool,
        records: &[FundingRecord],
    ) -> Result<(), Self::Error>;
}
