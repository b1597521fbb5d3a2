use crate::{
    db_types::{FundingRecord, PaymentOutput, Satoshis, TxId},
    reconciler::ReconcileError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accumulation {
    /// The new output's value plus every existing record's value.
    pub total: Satoshis,
    /// True if an existing record already carries this transaction id. The caller must not mutate anything.
    pub already_seen: bool,
}

/// Works out how much an order would have received if `output` were added to `records`.
///
/// Fails if the output's value is negative, or if the total overflows.
pub fn accumulate(
    records: &[FundingRecord],
    txid: &TxId,
    output: &PaymentOutput,
) -> Result<Accumulation, ReconcileError> {
    if output.value.is_negative() {
        return Err(ReconcileError::NegativeAmount(output.value));
    }
    let total = records
        .iter()
        .try_fold(output.value, |acc, r| acc.checked_add(r.value))
        .ok_or(ReconcileError::AmountOverflow)?;
    let already_seen = records.iter().any(|r| &r.txid == txid);
    Ok(Accumulation { total, already_seen })
}
