use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use log::*;
use thiserror::Error;

use crate::{
    db_types::{Contract, FundingRecord, OrderId, OrderKind, OrderState, TrackedOrder},
    helpers::SerializationError,
    traits::{InventoryStore, OrderStore},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryDatabaseError {
    #[error("The order cannot be tracked. {0}")]
    InvalidContract(#[from] SerializationError),
    #[error("Payment address {0} is already used by another {1}")]
    AddressInUse(String, OrderKind),
    #[error("No {1} with id {0} exists")]
    OrderNotFound(OrderId, OrderKind),
    #[error("Inventory quantities cannot be negative: {0} = {1}")]
    NegativeQuantity(String, i64),
    #[error("The database lock was poisoned by a panicking writer")]
    Poisoned,
}

#[derive(Debug, Default)]
struct OrderTable {
    orders: HashMap<OrderId, TrackedOrder>,
    by_address: HashMap<String, OrderId>,
}

impl OrderTable {
    fn insert(&mut self, kind: OrderKind, order: TrackedOrder) -> Result<OrderId, MemoryDatabaseError> {
        let order_id = order.contract.order_id()?;
        let address = order.contract.payment_terms()?.address.clone();
        match self.by_address.get(&address) {
            Some(existing) if existing != &order_id => return Err(MemoryDatabaseError::AddressInUse(address, kind)),
            _ => {},
        }
        match self.orders.get_mut(&order_id) {
            // Funding already recorded against this contract survives re-tracking
            Some(existing) => existing.state = order.state,
            None => {
                self.by_address.insert(address, order_id.clone());
                self.orders.insert(order_id.clone(), order);
            },
        }
        Ok(order_id)
    }

    fn by_address(&self, address: &str) -> Option<TrackedOrder> {
        self.by_address.get(address).and_then(|id| self.orders.get(id)).cloned()
    }

    fn get_mut(&mut self, order_id: &OrderId, kind: OrderKind) -> Result<&mut TrackedOrder, MemoryDatabaseError> {
        self.orders.get_mut(order_id).ok_or_else(|| MemoryDatabaseError::OrderNotFound(order_id.clone(), kind))
    }
}

#[derive(Debug, Default)]
struct Tables {
    sales: OrderTable,
    purchases: OrderTable,
    inventory: BTreeMap<String, i64>,
}

impl Tables {
    fn table(&mut self, kind: OrderKind) -> &mut OrderTable {
        match kind {
            OrderKind::Sale => &mut self.sales,
            OrderKind::Purchase => &mut self.purchases,
        }
    }
}

/// A process-local order and inventory store. Clones share the same underlying tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, MemoryDatabaseError> {
        self.tables.read().map_err(|_| MemoryDatabaseError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, MemoryDatabaseError> {
        self.tables.write().map_err(|_| MemoryDatabaseError::Poisoned)
    }

    /// Starts tracking a contract as a sale. The payment address is taken from the contract's payment terms.
    ///
    /// Re-inserting the same contract only updates its state. The funded flag and funding records are kept.
    pub fn insert_sale(&self, contract: Contract, state: OrderState) -> Result<OrderId, MemoryDatabaseError> {
        let id = self.write()?.sales.insert(OrderKind::Sale, TrackedOrder::new(contract, state))?;
        debug!("🗃️ Tracking sale {id}");
        Ok(id)
    }

    /// Starts tracking a contract as a purchase. See [`Self::insert_sale`].
    pub fn insert_purchase(&self, contract: Contract, state: OrderState) -> Result<OrderId, MemoryDatabaseError> {
        let id = self.write()?.purchases.insert(OrderKind::Purchase, TrackedOrder::new(contract, state))?;
        debug!("🗃️ Tracking purchase {id}");
        Ok(id)
    }

    pub fn fetch_sale(&self, order_id: &OrderId) -> Result<Option<TrackedOrder>, MemoryDatabaseError> {
        Ok(self.read()?.sales.orders.get(order_id).cloned())
    }

    pub fn fetch_purchase(&self, order_id: &OrderId) -> Result<Option<TrackedOrder>, MemoryDatabaseError> {
        Ok(self.read()?.purchases.orders.get(order_id).cloned())
    }

    /// The sale or purchase paying to `address`, with sales taking precedence.
    pub fn fetch_by_address(&self, address: &str) -> Result<Option<(OrderKind, TrackedOrder)>, MemoryDatabaseError> {
        let tables = self.read()?;
        let result = tables
            .sales
            .by_address(address)
            .map(|o| (OrderKind::Sale, o))
            .or_else(|| tables.purchases.by_address(address).map(|o| (OrderKind::Purchase, o)));
        Ok(result)
    }

    pub fn inventory_level(&self, path: &str) -> Result<Option<i64>, MemoryDatabaseError> {
        Ok(self.read()?.inventory.get(path).copied())
    }

    fn set_state(
        &self,
        kind: OrderKind,
        order_id: &OrderId,
        state: OrderState,
        funded: bool,
    ) -> Result<(), MemoryDatabaseError> {
        let mut tables = self.write()?;
        let order = tables.table(kind).get_mut(order_id, kind)?;
        order.state = state;
        // The funded flag only ever moves forward
        order.funded |= funded;
        trace!("🗃️ {kind} {order_id} is now {state}");
        Ok(())
    }

    fn set_funding(
        &self,
        kind: OrderKind,
        order_id: &OrderId,
        funded: bool,
        records: &[FundingRecord],
    ) -> Result<(), MemoryDatabaseError> {
        let mut tables = self.write()?;
        let order = tables.table(kind).get_mut(order_id, kind)?;
        order.funded |= funded;
        order.records = records.to_vec();
        trace!("🗃️ {kind} {order_id} has {} funding records. Funded: {}", order.records.len(), order.funded);
        Ok(())
    }
}

impl OrderStore for MemoryDatabase {
    type Error = MemoryDatabaseError;

    async fn find_sale_by_address(&self, address: &str) -> Result<Option<TrackedOrder>, Self::Error> {
        Ok(self.read()?.sales.by_address(address))
    }

    async fn find_purchase_by_address(&self, address: &str) -> Result<Option<TrackedOrder>, Self::Error> {
        Ok(self.read()?.purchases.by_address(address))
    }

    async fn set_sale_state(
        &self,
        order_id: &OrderId,
        _contract: &Contract,
        state: OrderState,
        funded: bool,
    ) -> Result<(), Self::Error> {
        self.set_state(OrderKind::Sale, order_id, state, funded)
    }

    async fn set_purchase_state(
        &self,
        order_id: &OrderId,
        _contract: &Contract,
        state: OrderState,
        funded: bool,
    ) -> Result<(), Self::Error> {
        self.set_state(OrderKind::Purchase, order_id, state, funded)
    }

    async fn update_sale_funding(
        &self,
        order_id: &OrderId,
        funded: bool,
        records: &[FundingRecord],
    ) -> Result<(), Self::Error> {
        self.set_funding(OrderKind::Sale, order_id, funded, records)
    }

    async fn update_purchase_funding(
        &self,
        order_id: &OrderId,
        funded: bool,
        records: &[FundingRecord],
    ) -> Result<(), Self::Error> {
        self.set_funding(OrderKind::Purchase, order_id, funded, records)
    }
}

impl InventoryStore for MemoryDatabase {
    type Error = MemoryDatabaseError;

    async fn snapshot(&self) -> Result<BTreeMap<String, i64>, Self::Error> {
        Ok(self.read()?.inventory.clone())
    }

    async fn set_quantity(&self, path: &str, quantity: i64) -> Result<(), Self::Error> {
        if quantity < 0 {
            return Err(MemoryDatabaseError::NegativeQuantity(path.to_string(), quantity));
        }
        self.write()?.inventory.insert(path.to_string(), quantity);
        Ok(())
    }
}
