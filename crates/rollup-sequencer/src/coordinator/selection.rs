//! Transaction selection under resource constraints.

use std::collections::{HashMap, HashSet};

use rollup_types::{
    AssetId, BridgeCallData, Commitment, CoordinatorError, RollupResources, RollupTimeouts,
    RollupTx, TxFeeResolver,
};

use super::config::RollupCoordinatorConfig;
use crate::bridge_queue::BridgeTxQueue;

/// The outcome of one selection pass: the txs taken into the batch, the resources they consumed,
/// and the note commitments of everything discarded (for chain-of-rejects propagation).
pub(crate) struct SelectionOutcome {
    pub selected: Vec<RollupTx>,
    pub resources: RollupResources,
    pub discarded_commitments: HashSet<Commitment>,
}

struct SelectionCtx<'a, F> {
    fee_resolver: &'a F,
    flush: bool,
    timeouts: &'a RollupTimeouts,
    total_slots: usize,
    max_gas: u64,
    max_call_data: u64,
}

/// Stable-partitions `pending` so every `DEFI_CLAIM` precedes every other tx, preserving relative
/// order within each group.
fn presort(pending: Vec<RollupTx>) -> Vec<RollupTx> {
    let (mut claims, rest): (Vec<_>, Vec<_>) = pending.into_iter().partition(|tx| tx.tx_type().is_defi_claim());
    claims.extend(rest);
    claims
}

fn discard(tx: &RollupTx, discarded: &mut HashSet<Commitment>) {
    discarded.insert(tx.note_commitment_1());
    discarded.insert(tx.note_commitment_2());
}

pub(crate) async fn select_batch<F: TxFeeResolver>(
    fee_resolver: &F,
    config: &RollupCoordinatorConfig,
    pending: Vec<RollupTx>,
    flush: bool,
    timeouts: &RollupTimeouts,
) -> Result<SelectionOutcome, CoordinatorError> {
    let pending = presort(pending);
    let total_slots = config.total_slots();
    let base_verification_gas = fee_resolver.unadjusted_base_verification_gas().await?;
    // `maxUnadjustedGas`/`maxTxCallData` are per-tx ceilings; the rollup-wide ceiling a batch
    // is actually checked against (`maxGasForRollup`) is their product with the slot count —
    // otherwise a single average tx's cost would never fit more than a couple of txs into a
    // rollup sized for `total_slots`.
    let max_gas = (total_slots as u64).saturating_mul(fee_resolver.max_unadjusted_gas().await?);
    let max_call_data = (total_slots as u64).saturating_mul(fee_resolver.max_tx_call_data().await?);

    let ctx = SelectionCtx {
        fee_resolver,
        flush,
        timeouts,
        total_slots,
        max_gas,
        max_call_data,
    };

    let mut resources = RollupResources::new(
        (total_slots as u64).saturating_mul(base_verification_gas),
        config.num_bridge_calls_per_block,
        config.number_of_assets,
    );
    let mut selected = Vec::new();
    let mut discarded = HashSet::new();
    let mut bridge_queues: HashMap<BridgeCallData, BridgeTxQueue> = HashMap::new();

    for tx in pending {
        if selected.len() >= total_slots {
            break;
        }

        if tx.tx_type().is_account() {
            let gas_delta = fee_resolver
                .unadjusted_tx_gas(tx.fee_asset_id(), tx.tx_type())
                .await?
                .saturating_sub(base_verification_gas);
            let call_data_delta = fee_resolver.tx_call_data(tx.tx_type()).await?;
            if resources.fits(gas_delta, call_data_delta, max_gas, max_call_data) {
                resources.reserve(gas_delta, call_data_delta);
                selected.push(tx);
            }
            // Not discarded: an ACCOUNT tx has no commitments anyone chains to.
            continue;
        }

        let asset_id: AssetId = tx.fee_asset_id();
        let is_fee_paying = fee_resolver.is_fee_paying_asset(asset_id).await?;

        if is_fee_paying && !resources.asset_ids().contains(asset_id) && resources.asset_ids().is_full() {
            discard(&tx, &mut discarded);
            continue;
        }
        if tx.has_backward_link() && discarded.contains(&tx.backward_link()) {
            discard(&tx, &mut discarded);
            continue;
        }

        if tx.tx_type().is_defi_deposit() {
            let admitted = admit_defi_deposit(
                &ctx,
                &tx,
                is_fee_paying,
                &mut resources,
                &mut selected,
                &mut bridge_queues,
            )
            .await?;
            if !admitted {
                // Left in the pending pool untouched: queued-but-not-yet-profitable DeFi
                // deposits are not discarded — only flush or profitability admits them.
                continue;
            }
        } else {
            let gas_delta = fee_resolver
                .unadjusted_tx_gas(asset_id, tx.tx_type())
                .await?
                .saturating_sub(base_verification_gas);
            let call_data_delta = fee_resolver.tx_call_data(tx.tx_type()).await?;
            if resources.fits(gas_delta, call_data_delta, max_gas, max_call_data) {
                resources.reserve(gas_delta, call_data_delta);
                if is_fee_paying {
                    resources.asset_ids_mut().insert(asset_id);
                }
                selected.push(tx);
            } else {
                discard(&tx, &mut discarded);
            }
        }
    }

    Ok(SelectionOutcome {
        selected,
        resources,
        discarded_commitments: discarded,
    })
}

/// Returns `true` iff `tx` (or, via bulk entry, its queued siblings) were admitted into `selected`.
async fn admit_defi_deposit<F: TxFeeResolver>(
    ctx: &SelectionCtx<'_, F>,
    tx: &RollupTx,
    is_fee_paying: bool,
    resources: &mut RollupResources,
    selected: &mut Vec<RollupTx>,
    bridge_queues: &mut HashMap<BridgeCallData, BridgeTxQueue>,
) -> Result<bool, CoordinatorError> {
    let bcd = tx.bridge_call_data().copied().ok_or_else(|| {
        CoordinatorError::invariant_violated(format!(
            "DEFI_DEPOSIT tx {:?} missing bridge call data",
            tx.id()
        ))
    })?;

    if resources.bridge_call_datas().contains(&bcd) {
        let gas_delta = ctx.fee_resolver.single_bridge_tx_gas(&bcd).await?;
        let call_data_delta = ctx.fee_resolver.tx_call_data(tx.tx_type()).await?;
        return Ok(try_admit_single(
            ctx, tx, asset_for(is_fee_paying, tx), gas_delta, call_data_delta, resources, selected,
        ));
    }

    if resources.bridge_call_datas().is_full() {
        return Ok(false);
    }

    if ctx.flush {
        let bridge_gas = ctx.fee_resolver.full_bridge_gas_from_contract(&bcd).await?;
        let per_tx_gas = ctx.fee_resolver.single_bridge_tx_gas(&bcd).await?;
        let call_data_delta = ctx.fee_resolver.tx_call_data(tx.tx_type()).await?;
        return Ok(try_admit_new_bridge(
            ctx,
            tx,
            bcd,
            asset_for(is_fee_paying, tx),
            bridge_gas + per_tx_gas,
            call_data_delta,
            resources,
            selected,
        ));
    }

    let queue = bridge_queues
        .entry(bcd)
        .or_insert_with(|| BridgeTxQueue::new(bcd, ctx.timeouts.bridge_timeout(&bcd)));

    if queue.transaction_has_timed_out(tx) {
        let bridge_gas = ctx.fee_resolver.full_bridge_gas_from_contract(&bcd).await?;
        let per_tx_gas = ctx.fee_resolver.single_bridge_tx_gas(&bcd).await?;
        let call_data_delta = ctx.fee_resolver.tx_call_data(tx.tx_type()).await?;
        return Ok(try_admit_new_bridge(
            ctx,
            tx,
            bcd,
            asset_for(is_fee_paying, tx),
            bridge_gas + per_tx_gas,
            call_data_delta,
            resources,
            selected,
        ));
    }

    queue.add(tx.clone());
    let slots_remaining = ctx.total_slots - selected.len();
    let gas_remaining = ctx.max_gas.saturating_sub(resources.gas_used());
    let call_data_remaining = ctx.max_call_data.saturating_sub(resources.call_data_used());
    let queue_selection = queue
        .txs_to_rollup(ctx.fee_resolver, slots_remaining, resources.asset_ids(), gas_remaining, call_data_remaining)
        .await?;

    if queue_selection.txs.is_empty() {
        return Ok(false);
    }

    resources.bridge_call_datas_mut().insert(bcd);
    resources.reserve(queue_selection.gas_consumed, queue_selection.call_data_consumed);
    *resources.asset_ids_mut() = queue_selection.asset_ids;
    selected.extend(queue_selection.txs);
    Ok(true)
}

fn asset_for(is_fee_paying: bool, tx: &RollupTx) -> Option<AssetId> {
    is_fee_paying.then(|| tx.fee_asset_id())
}

fn try_admit_single<F>(
    ctx: &SelectionCtx<'_, F>,
    tx: &RollupTx,
    asset_id: Option<AssetId>,
    gas_delta: u64,
    call_data_delta: u64,
    resources: &mut RollupResources,
    selected: &mut Vec<RollupTx>,
) -> bool {
    if !resources.fits(gas_delta, call_data_delta, ctx.max_gas, ctx.max_call_data) {
        return false;
    }
    resources.reserve(gas_delta, call_data_delta);
    if let Some(asset_id) = asset_id {
        resources.asset_ids_mut().insert(asset_id);
    }
    selected.push(tx.clone());
    true
}

fn try_admit_new_bridge<F>(
    ctx: &SelectionCtx<'_, F>,
    tx: &RollupTx,
    bcd: BridgeCallData,
    asset_id: Option<AssetId>,
    gas_delta: u64,
    call_data_delta: u64,
    resources: &mut RollupResources,
    selected: &mut Vec<RollupTx>,
) -> bool {
    if !resources.fits(gas_delta, call_data_delta, ctx.max_gas, ctx.max_call_data) {
        return false;
    }
    if !resources.bridge_call_datas_mut().insert(bcd) {
        return false;
    }
    resources.reserve(gas_delta, call_data_delta);
    if let Some(asset_id) = asset_id {
        resources.asset_ids_mut().insert(asset_id);
    }
    selected.push(tx.clone());
    true
}

#[cfg(test)]
mod tests {
    use rollup_types::{
        test_utils::*, MockTxFeeResolver, RollupTimeouts, RollupTxId, TxType, ZERO_COMMITMENT,
    };

    use super::*;

    fn resolver() -> MockTxFeeResolver {
        let mut r = MockTxFeeResolver::new();
        r.expect_unadjusted_base_verification_gas().returning(|| Ok(1_000));
        r.expect_unadjusted_tx_gas().returning(|_, _| Ok(1_000));
        r.expect_tx_call_data().returning(|_| Ok(100));
        r.expect_is_fee_paying_asset().returning(|_| Ok(true));
        r.expect_max_unadjusted_gas().returning(|| Ok(1_000_000));
        r.expect_max_tx_call_data().returning(|| Ok(1_000_000));
        r.expect_single_bridge_tx_gas().returning(|_| Ok(10_000));
        r.expect_full_bridge_gas_from_contract().returning(|_| Ok(50_000));
        r
    }

    fn transfer_with_link(id: u64, asset_id: AssetId, note_commitment_1: Commitment, backward_link: Commitment) -> RollupTx {
        RollupTx::new(
            RollupTxId(id),
            TxType::Transfer,
            asset_id,
            0,
            None,
            note_commitment_1,
            commitment(id as u8 + 100),
            backward_link,
            0,
            [0u8; 32],
            [0u8; 32],
            0,
            None,
            None,
        )
    }

    #[tokio::test]
    async fn defi_claim_sorts_before_payments() {
        let payment = transfer_tx(1, 0, 0, 0);
        let claim = RollupTx::new(
            RollupTxId(2),
            TxType::DefiClaim,
            0,
            0,
            None,
            commitment(10),
            commitment(11),
            ZERO_COMMITMENT,
            0,
            [0u8; 32],
            [0u8; 32],
            0,
            None,
            None,
        );
        let sorted = presort(vec![payment.clone(), claim.clone(), payment.clone()]);
        assert_eq!(sorted[0].id(), claim.id());
        assert_eq!(sorted[1].id(), payment.id());
        assert_eq!(sorted[2].id(), payment.id());
    }

    #[tokio::test]
    async fn slot_saturation_selects_first_n() {
        let config = RollupCoordinatorConfig::with_slots(4, 1);
        let pending: Vec<_> = (0..6).map(|i| transfer_tx(i, 0, 0, 0)).collect();
        let outcome = select_batch(&resolver(), &config, pending, false, &RollupTimeouts::disabled())
            .await
            .unwrap();
        assert_eq!(outcome.selected.len(), 4);
    }

    #[tokio::test]
    async fn chain_rejection_cascades_through_backward_link() {
        // Force the asset-set cap to 0 so the very first non-account tx is always discarded by
        // saturation; t4 chains off t3's commitment, t5 chains off t4's.
        let config = RollupCoordinatorConfig {
            number_of_assets: 0,
            ..RollupCoordinatorConfig::with_slots(10, 1)
        };

        let t3 = transfer_with_link(3, 9, commitment(3), ZERO_COMMITMENT);
        let t4 = transfer_with_link(4, 9, commitment(4), commitment(3));
        let t5 = transfer_with_link(5, 9, commitment(5), commitment(4));

        let outcome = select_batch(&resolver(), &config, vec![t3, t4, t5], false, &RollupTimeouts::disabled())
            .await
            .unwrap();
        assert!(outcome.selected.is_empty());
        assert!(outcome.discarded_commitments.contains(&commitment(3)));
        assert!(outcome.discarded_commitments.contains(&commitment(4)));
        assert!(outcome.discarded_commitments.contains(&commitment(5)));
    }

    #[tokio::test]
    async fn flush_admits_a_new_bridge_immediately() {
        let config = RollupCoordinatorConfig::with_slots(10, 1);
        let bcd = bridge_call_data(1);
        let tx = defi_deposit_tx(1, bcd, 0);
        let outcome = select_batch(&resolver(), &config, vec![tx], true, &RollupTimeouts::disabled())
            .await
            .unwrap();
        assert_eq!(outcome.selected.len(), 1);
        assert!(outcome.resources.bridge_call_datas().contains(&bcd));
    }

    #[tokio::test]
    async fn defi_deposit_without_profitability_or_flush_stays_queued_not_discarded() {
        let config = RollupCoordinatorConfig::with_slots(10, 1);
        let bcd = bridge_call_data(1);
        let tx = defi_deposit_tx(1, bcd, 0);
        let outcome = select_batch(&resolver(), &config, vec![tx], false, &RollupTimeouts::disabled())
            .await
            .unwrap();
        assert!(outcome.selected.is_empty());
        assert!(outcome.discarded_commitments.is_empty());
    }
}
