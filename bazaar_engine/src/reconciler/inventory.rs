use log::*;
use serde::Serialize;

use crate::{
    db_types::{Contract, OrderId},
    events::{InventoryWarningEvent, Notification, Notifier},
    traits::InventoryStore,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryChange {
    pub path: String,
    pub before: i64,
    pub after: i64,
}

/// What a call to [`InventoryAdjuster::adjust_for_order`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InventoryAdjustment {
    pub changes: Vec<InventoryChange>,
    /// Paths for which the order asked for more than was on hand. These were left untouched.
    pub oversold: Vec<String>,
}

/// Decrements on-hand stock when a sale is funded.
///
/// Inventory is advisory. If the store cannot be read the adjustment is abandoned without complaint, so that payment
/// accounting never waits on it.
pub struct InventoryAdjuster<I> {
    store: I,
    notifier: Notifier,
}

impl<I> InventoryAdjuster<I> {
    pub fn new(store: I, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &I {
        &self.store
    }
}

impl<I: InventoryStore> InventoryAdjuster<I> {
    /// For every line item, every entry whose path contains all of the item's variant tokens and whose quantity is
    /// positive is decremented by the item quantity. Entries that would go negative are reported as oversold instead.
    pub async fn adjust_for_order(&self, contract: &Contract, order_id: &OrderId) -> InventoryAdjustment {
        let mut result = InventoryAdjustment::default();
        let mut inventory = match self.store.snapshot().await {
            Ok(inv) => inv,
            Err(e) => {
                debug!("📦️ Could not read inventory for order {order_id}. Skipping the adjustment. {e}");
                return result;
            },
        };
        for item in contract.items() {
            if item.quantity <= 0 {
                let slug = &item.listing_slug;
                debug!("📦️ Ignoring line item {slug} with quantity {} in order {order_id}", item.quantity);
                continue;
            }
            let tokens = item.variant_tokens();
            for (path, on_hand) in inventory.iter_mut() {
                if *on_hand <= 0 || !tokens.iter().all(|t| path.contains(t)) {
                    continue;
                }
                let remaining = *on_hand - item.quantity;
                if remaining < 0 {
                    warn!("📦️ Order {order_id} purchased more inventory for {path} than we have on hand");
                    let warning = Notification::InventoryWarning(InventoryWarningEvent::new(order_id.clone(), path));
                    self.notifier.notify_best_effort(&warning);
                    result.oversold.push(path.clone());
                    continue;
                }
                match self.store.set_quantity(path, remaining).await {
                    Ok(()) => {
                        debug!("📦️ Adjusting inventory for {path} to {remaining}");
                        result.changes.push(InventoryChange { path: path.clone(), before: *on_hand, after: remaining });
                        *on_hand = remaining;
                    },
                    Err(e) => warn!("📦️ Could not set inventory for {path} to {remaining}. {e}"),
                }
            }
        }
        result
    }
}
