//! # Payment reconciliation
//!
//! [`PaymentReconciler`] is the entry point for the wallet-sync process. Every time a transaction paying to one of
//! our addresses is observed, the wallet calls [`PaymentReconciler::on_payments_observed`] with the transaction id and
//! the relevant outputs. The same transaction may be delivered more than once; redelivery is a no-op.
//!
//! For each output the reconciler
//! 1. extracts the destination address from the output script, skipping outputs it cannot attribute (e.g. change),
//! 2. looks for a sale paying to that address, and failing that, a purchase,
//! 3. applies the payment to the order via [`PaymentReconciler::apply_payment`].
//!
//! ## Locking
//!
//! A whole batch is processed under one reconciler-wide lock, so funding updates form a single total order and two
//! overlapping callbacks can never both read the same funding records before either writes. The price is that
//! unrelated orders are serialized too. Callback volume is low compared to how long the lock is held, so this is
//! acceptable. A map of per-order locks created on demand would lift the restriction if it ever matters.
//!
//! The outbound notification channel is bounded and sends wait for capacity while the lock is held. A slow consumer
//! therefore stalls later batches. The channel belongs to the caller, who sizes it accordingly.
mod errors;
mod funding;
mod inventory;

pub use errors::ReconcileError;
pub use funding::{accumulate, Accumulation};
pub use inventory::{InventoryAdjuster, InventoryAdjustment, InventoryChange};
use log::*;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    db_types::{FundingRecord, OrderId, OrderKind, OrderMatch, OrderState, PaymentOutput, Satoshis, TrackedOrder, TxId},
    events::{Notification, Notifier, OrderFundedEvent, PaymentReceivedEvent},
    helpers::StandardScriptExtractor,
    traits::{AddressExtractor, InventoryStore, OrderStore},
};

/// The result of applying one output to one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The transaction had already been recorded against the order. Nothing changed.
    Duplicate,
    /// A new funding record was stored.
    Recorded { order_id: OrderId, kind: OrderKind, total: Satoshis, newly_funded: bool },
}

/// A summary of one call to [`PaymentReconciler::on_payments_observed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    pub txid: TxId,
    /// Outputs that produced a new funding record.
    pub applied: usize,
    /// Outputs whose transaction was already recorded against the matched order.
    pub duplicates: usize,
    /// Outputs whose script yielded no usable address.
    pub skipped_no_address: usize,
    /// Outputs paying to an address that no tracked order uses.
    pub skipped_unmatched: usize,
    /// Outputs abandoned because of a store or serialization failure.
    pub failed: usize,
    /// Orders that became funded during this batch.
    pub funded: Vec<OrderId>,
}

impl ReconciliationReport {
    pub fn new(txid: TxId) -> Self {
        Self {
            txid,
            applied: 0,
            duplicates: 0,
            skipped_no_address: 0,
            skipped_unmatched: 0,
            failed: 0,
            funded: Vec::new(),
        }
    }
}

pub struct PaymentReconciler<B, I, A = StandardScriptExtractor> {
    orders: B,
    inventory: InventoryAdjuster<I>,
    extractor: A,
    notifier: Notifier,
    lock: Mutex<()>,
}

impl<B, I, A> PaymentReconciler<B, I, A> {
    pub fn new(orders: B, inventory: I, extractor: A, notifier: Notifier) -> Self {
        let inventory = InventoryAdjuster::new(inventory, notifier.clone());
        Self { orders, inventory, extractor, notifier, lock: Mutex::new(()) }
    }

    pub fn orders(&self) -> &B {
        &self.orders
    }

    pub fn inventory(&self) -> &I {
        self.inventory.store()
    }

    pub fn extractor(&self) -> &A {
        &self.extractor
    }
}

impl<B, I, A> PaymentReconciler<B, I, A>
where
    B: OrderStore,
    I: InventoryStore,
    A: AddressExtractor,
{
    /// Reconciles every output of the transaction `txid` against the tracked orders.
    ///
    /// This never fails as a whole. Problems with individual outputs are logged, counted in the report, and the rest
    /// of the batch carries on.
    pub async fn on_payments_observed(&self, txid: &TxId, outputs: &[PaymentOutput]) -> ReconciliationReport {
        let _guard = self.lock.lock().await;
        trace!("🧾️ Reconciling {} outputs of transaction {txid}", outputs.len());
        let mut report = ReconciliationReport::new(txid.clone());
        for output in outputs {
            let Some(address) = self.extractor.first_address(&output.script) else {
                trace!("🧾️ Output {txid}:{} has no usable address. Skipping.", output.index);
                report.skipped_no_address += 1;
                continue;
            };
            let matched = match self.find_order(&address).await {
                Ok(Some(m)) => m,
                Ok(None) => {
                    trace!("🧾️ No order is waiting on {address}. Skipping {txid}:{}.", output.index);
                    report.skipped_unmatched += 1;
                    continue;
                },
                Err(e) => {
                    warn!("🧾️ Could not look up the order for {address}. Skipping {txid}:{}. {e}", output.index);
                    report.failed += 1;
                    continue;
                },
            };
            match self.apply_payment(matched, txid, output).await {
                Ok(PaymentOutcome::Duplicate) => report.duplicates += 1,
                Ok(PaymentOutcome::Recorded { order_id, newly_funded, .. }) => {
                    report.applied += 1;
                    if newly_funded {
                        report.funded.push(order_id);
                    }
                },
                Err(e) => {
                    warn!("🧾️ Could not apply {txid}:{} paying {address}. {e}", output.index);
                    report.failed += 1;
                },
            }
        }
        debug!(
            "🧾️ Transaction {txid} reconciled. {} applied, {} duplicates, {} unmatched, {} failed, {} funded",
            report.applied,
            report.duplicates,
            report.skipped_unmatched,
            report.failed,
            report.funded.len()
        );
        report
    }

    /// Finds the order paying to `address`, preferring the sale index over the purchase index.
    pub async fn find_order(&self, address: &str) -> Result<Option<OrderMatch>, ReconcileError> {
        if let Some(order) = self.orders.find_sale_by_address(address).await.map_err(ReconcileError::store)? {
            return Ok(Some(OrderMatch::sale(order)));
        }
        let purchase = self.orders.find_purchase_by_address(address).await.map_err(ReconcileError::store)?;
        Ok(purchase.map(OrderMatch::purchase))
    }

    /// Applies one output to a matched order.
    ///
    /// * If the transaction is already recorded against the order, nothing happens.
    /// * If the order was not yet funded and the running total reaches the requested amount, the order becomes funded.
    ///   For a sale, a `Confirmed` state moves to `Funded`, inventory is decremented and the vendor is notified. For a
    ///   purchase, the state moves to `Funded` and the buyer is notified.
    /// * In every other case, the output is appended to the order's funding records.
    ///
    /// This does not take the reconciler lock. Callers other than [`Self::on_payments_observed`] must make sure they
    /// are the only writer for the order.
    pub async fn apply_payment(
        &self,
        matched: OrderMatch,
        txid: &TxId,
        output: &PaymentOutput,
    ) -> Result<PaymentOutcome, ReconcileError> {
        let OrderMatch { kind, order } = matched;
        let TrackedOrder { contract, state, mut funded, mut records } = order;
        let Accumulation { total, already_seen } = accumulate(&records, txid, output)?;
        if already_seen {
            debug!("🧾️ Transaction {txid} has already been recorded for this {kind}. Ignoring it.");
            return Ok(PaymentOutcome::Duplicate);
        }
        let order_id = contract.order_id()?;
        let requested = contract.payment_terms()?.amount;
        let mut newly_funded = false;
        if !funded && total >= requested {
            funded = true;
            newly_funded = true;
            let notification = match kind {
                OrderKind::Sale => {
                    info!("🧾️ Received payment for order {order_id}. {total} of {requested} requested.");
                    if state == OrderState::Confirmed {
                        self.orders
                            .set_sale_state(&order_id, &contract, OrderState::Funded, funded)
                            .await
                            .map_err(ReconcileError::store)?;
                    } else {
                        debug!("🧾️ Sale {order_id} is {state}, not Confirmed. Its state is left as is.");
                    }
                    let adjustment = self.inventory.adjust_for_order(&contract, &order_id).await;
                    trace!("🧾️ Inventory adjusted for {order_id}: {adjustment:?}");
                    Notification::OrderFunded(OrderFundedEvent::new(&contract, order_id.clone()))
                },
                OrderKind::Purchase => {
                    info!("🧾️ Payment for purchase {order_id} detected. {total} of {requested} requested.");
                    self.orders
                        .set_purchase_state(&order_id, &contract, OrderState::Funded, funded)
                        .await
                        .map_err(ReconcileError::store)?;
                    Notification::PaymentReceived(PaymentReceivedEvent { order_id: order_id.clone() })
                },
            };
            if !self.notifier.notify(&notification).await {
                warn!("🧾️ The funding notification for {order_id} could not be delivered");
            }
        }
        records.push(FundingRecord { txid: txid.clone(), index: output.index, value: output.value });
        let stored = match kind {
            OrderKind::Sale => self.orders.update_sale_funding(&order_id, funded, &records).await,
            OrderKind::Purchase => self.orders.update_purchase_funding(&order_id, funded, &records).await,
        };
        stored.map_err(ReconcileError::store)?;
        trace!("🧾️ {kind} {order_id} now has {} funding records totalling {total}", records.len());
        Ok(PaymentOutcome::Recorded { order_id, kind, total, newly_funded })
    }
}
