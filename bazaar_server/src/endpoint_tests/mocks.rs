use bazaar_engine::{
    db_types::{Contract, FundingRecord, OrderId, OrderState, TrackedOrder},
    traits::OrderStore,
};
use mockall::mock;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct MockStoreError(pub String);

mock! {
    pub OrderStore {}
    impl OrderStore for OrderStore {
        type Error = MockStoreError;
        async fn find_sale_by_address(&self, address: &str) -> Result<Option<TrackedOrder>, MockStoreError>;
        async fn find_purchase_by_address(&self, address: &str) -> Result<Option<TrackedOrder>, MockStoreError>;
        async fn set_sale_state(&self, order_id: &OrderId, contract: &Contract, state: OrderState, funded: bool) -> Result<(), MockStoreError>;
        async fn set_purchase_state(&self, order_id: &OrderId, contract: &Contract, state: OrderState, funded: bool) -> Result<(), MockStoreError>;
        async fn update_sale_funding(&self, order_id: &OrderId, funded: bool, records: &[FundingRecord]) -> Result<(), MockStoreError>;
        async fn update_purchase_funding(&self, order_id: &OrderId, funded: bool, records: &[FundingRecord]) -> Result<(), MockStoreError>;
    }
}
