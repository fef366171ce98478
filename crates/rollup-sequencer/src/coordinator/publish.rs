//! Publication decision and the prove → aggregate → publish pipeline.

use std::collections::HashMap;

use futures::future::try_join_all;
use rollup_types::{
    BridgeCallData, BridgeProfile, CoordinatorError, RollupAggregator, RollupCreator, RollupDb,
    RollupProfile, RollupPublisher, RollupTimeouts, TxFeeResolver, TxFeeResolverError, TxType,
    ZERO_COMMITMENT,
};

use super::{config::RollupCoordinatorConfig, ctx::CoordinatorCtx, selection::SelectionOutcome};

/// Computes the summary profile for a selection outcome, whether or not it is ultimately
/// published.
///
/// `gasBalance` is `Σ(feePaid − minFee) − ΣbridgeGasStillOutstanding`, with the rollup's
/// own fixed verification cost folded in as an implicit "outstanding" floor — otherwise a single
/// modestly-paying tx could never be unprofitable.
pub(crate) async fn compute_profile<F: TxFeeResolver>(
    fee_resolver: &F,
    config: &RollupCoordinatorConfig,
    outcome: &SelectionOutcome,
) -> Result<RollupProfile, TxFeeResolverError> {
    let total_txs = outcome.selected.len() as u32;
    let mut num_txs_per_type: HashMap<TxType, u32> = HashMap::new();
    let mut per_bridge: HashMap<BridgeCallData, (u32, u64, i64)> = HashMap::new();
    let mut gas_balance: i128 = 0;

    for tx in &outcome.selected {
        *num_txs_per_type.entry(tx.tx_type()).or_insert(0) += 1;
        gas_balance += i128::from(tx.excess_gas());
        // Only a DEFI_DEPOSIT's bridge_call_data marks a live bridge-slot consumption; a
        // DEFI_CLAIM may carry one too, as a reference to the deposit it redeems, and must not be
        // folded into the bridge's gas/slot accounting a second time.
        if tx.tx_type() == TxType::DefiDeposit {
            if let Some(bcd) = tx.bridge_call_data() {
                let entry = per_bridge.entry(*bcd).or_insert((0, tx.created(), 0));
                entry.0 += 1;
                entry.1 = entry.1.min(tx.created());
                entry.2 += tx.excess_gas();
            }
        }
    }

    let mut bridge_profiles = Vec::with_capacity(per_bridge.len());
    for (bcd, (num_txs, earliest, excess_sum)) in &per_bridge {
        bridge_profiles.push(BridgeProfile::new(*bcd, *num_txs, *earliest));
        let bridge_gas = fee_resolver.full_bridge_gas_from_contract(bcd).await?;
        let outstanding = (i128::from(bridge_gas) - i128::from(*excess_sum)).max(0);
        gas_balance -= outstanding;
    }

    let base_verification_gas = fee_resolver.unadjusted_base_verification_gas().await?;
    let base_cost = i128::from(config.total_slots() as u64) * i128::from(base_verification_gas);
    gas_balance -= base_cost;

    Ok(RollupProfile::new(
        total_txs,
        total_txs,
        outcome.resources.gas_used(),
        outcome.resources.call_data_used(),
        gas_balance,
        bridge_profiles,
        num_txs_per_type,
        0,
        0,
        false,
    ))
}

/// Whether the just-selected batch should be published now.
pub(crate) async fn should_publish<F: TxFeeResolver>(
    fee_resolver: &F,
    flush: bool,
    profile: &RollupProfile,
    outcome: &SelectionOutcome,
    timeouts: &RollupTimeouts,
    total_slots: usize,
) -> Result<bool, TxFeeResolverError> {
    if flush || profile.is_profitable() {
        return Ok(true);
    }

    if let Some(base) = timeouts.base_timeout() {
        // Gated on tx_type rather than bridge_call_data().is_none(): a DEFI_CLAIM referencing
        // its deposit still owes the base deadline like any non-bridge tx.
        let base_deadline_hit = outcome
            .selected
            .iter()
            .any(|tx| tx.tx_type() != TxType::DefiDeposit && tx.created() < base.time());
        if base_deadline_hit {
            return Ok(true);
        }
    }

    for bridge_profile in profile.bridge_profiles() {
        if let Some(bridge_timeout) = timeouts.bridge_timeout(&bridge_profile.bridge_call_data()) {
            if bridge_profile.earliest_tx() < bridge_timeout.time() {
                return Ok(true);
            }
        }
    }

    let max_unadjusted_gas = fee_resolver.max_unadjusted_gas().await?;
    let max_gas_for_rollup = (total_slots as u64).saturating_mul(max_unadjusted_gas);
    if max_gas_for_rollup.saturating_sub(profile.total_gas()) < max_unadjusted_gas {
        return Ok(true);
    }

    let max_tx_call_data = fee_resolver.max_tx_call_data().await?;
    let max_call_data_for_rollup = (total_slots as u64).saturating_mul(max_tx_call_data);
    if max_call_data_for_rollup.saturating_sub(profile.total_call_data()) < max_tx_call_data {
        return Ok(true);
    }

    Ok(outcome.selected.len() >= total_slots)
}

/// Builds circuit inputs and inner proofs for the selected batch, aggregates them, and publishes
/// the result, tagging it with `rollup_id`.
///
/// Inner circuits are built strictly sequentially — they mutate the shared Merkle trees —
/// while inner proofs, pure functions of their already-built circuit input, are produced
/// concurrently. Returns whether the publisher accepted the rollup.
pub(crate) async fn build_and_publish<F, R, A, P, D>(
    ctx: &CoordinatorCtx<F, R, A, P, D>,
    rollup_id: u64,
    outcome: &SelectionOutcome,
) -> Result<bool, CoordinatorError>
where
    F: TxFeeResolver,
    R: RollupCreator,
    A: RollupAggregator,
    P: RollupPublisher,
    D: RollupDb,
{
    let bridge_call_datas = outcome.resources.bridge_call_datas().padded();
    let asset_ids = outcome.resources.asset_ids().as_vec();
    let is_first = rollup_id == 0;

    let mut circuit_inputs = Vec::new();
    for chunk in outcome.selected.chunks(ctx.config.num_inner_rollup_txs) {
        let circuit_input = ctx.creator.create_rollup(chunk, &bridge_call_datas, &asset_ids, is_first).await?;
        circuit_inputs.push(circuit_input);
    }

    let inner_proofs = try_join_all(
        outcome
            .selected
            .chunks(ctx.config.num_inner_rollup_txs)
            .zip(circuit_inputs)
            .map(|(chunk, circuit_input)| ctx.creator.create(chunk, circuit_input)),
    )
    .await?;

    // The Merkle world-state (old root / path / defi notes threaded through aggregation) is
    // managed entirely outside this core; building and publishing it is out of scope here.
    let mut rollup_dao = ctx
        .aggregator
        .aggregate_rollup_proofs(inner_proofs, ZERO_COMMITMENT, Vec::new(), Vec::new(), bridge_call_datas, asset_ids)
        .await?;
    rollup_dao.rollup_id = rollup_id;

    let estimated_l1_gas = outcome.resources.gas_used();
    Ok(ctx.publisher.publish_rollup(rollup_dao, estimated_l1_gas).await?)
}
