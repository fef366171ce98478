//! Tick driver: ties selection and the publication decision together through the
//! BUILDING/PUBLISHING/INTERRUPTED state machine and its two checkpoints.

use rollup_types::{
    CoordinatorError, RollupAggregator, RollupCreator, RollupDb, RollupProfile, RollupPublisher,
    RollupTimeouts, RollupTxId, TxFeeResolver,
};
use tracing::{debug, error, warn};

use super::{
    ctx::CoordinatorCtx,
    publish,
    selection,
    state::{CoordinatorPhase, CoordinatorState},
};

pub(crate) async fn run_tick<F, R, A, P, D>(
    ctx: &CoordinatorCtx<F, R, A, P, D>,
    state: &mut CoordinatorState,
    flush: bool,
    timeouts: &RollupTimeouts,
) -> Result<RollupProfile, CoordinatorError>
where
    F: TxFeeResolver,
    R: RollupCreator,
    A: RollupAggregator,
    P: RollupPublisher,
    D: RollupDb,
{
    state.interrupt.reset();
    let rollup_id = state.next_rollup_id();
    debug!(rollup_id, flush, "tick started");

    let pending = ctx.db.fetch_pending_txs().await.map_err(|err| {
        warn!(rollup_id, error = %err, "fetch_pending_txs failed; retrying next tick");
        CoordinatorError::from(err)
    })?;
    debug!(rollup_id, pending = pending.len(), "fetched pending txs");

    let outcome = selection::select_batch(ctx.fee_resolver.as_ref(), &ctx.config, pending, flush, timeouts)
        .await
        .map_err(|err| {
            warn!(rollup_id, error = %err, "selection failed; retrying next tick");
            CoordinatorError::from(err)
        })?;

    if outcome.selected.len() > ctx.config.total_slots() {
        error!(rollup_id, selected = outcome.selected.len(), "selected more txs than available slots");
        return Err(CoordinatorError::invariant_violated("selected.len() exceeds total_slots"));
    }
    debug!(
        rollup_id,
        selected = outcome.selected.len(),
        discarded = outcome.discarded_commitments.len(),
        "batch selected"
    );

    // Checkpoint 1: immediately after selection completes.
    state.interrupt.checkpoint()?;

    let profile = publish::compute_profile(ctx.fee_resolver.as_ref(), &ctx.config, &outcome)
        .await
        .map_err(|err| {
            warn!(rollup_id, error = %err, "profile computation failed; retrying next tick");
            CoordinatorError::from(err)
        })?;

    let should_publish = publish::should_publish(
        ctx.fee_resolver.as_ref(),
        flush,
        &profile,
        &outcome,
        timeouts,
        ctx.config.total_slots(),
    )
    .await
    .map_err(|err| {
        warn!(rollup_id, error = %err, "publish-trigger evaluation failed; retrying next tick");
        CoordinatorError::from(err)
    })?;

    if !should_publish {
        debug!(rollup_id, "batch not yet publishable; holding for next tick");
        return Ok(profile.with_published(false));
    }

    // Checkpoint 2: immediately before publishing.
    state.interrupt.set_phase(CoordinatorPhase::Publishing);
    state.interrupt.checkpoint()?;

    let selected_ids: Vec<RollupTxId> = outcome.selected.iter().map(|tx| tx.id()).collect();
    let accepted = publish::build_and_publish(ctx, rollup_id, &outcome).await.map_err(|err| {
        warn!(rollup_id, error = %err, "publish pipeline failed; batch abandoned, retrying next tick");
        CoordinatorError::from(err)
    })?;

    if !accepted {
        warn!(rollup_id, "publisher declined rollup; batch abandoned, retrying next tick");
        return Ok(profile.with_published(false));
    }

    ctx.db.delete_txs(&selected_ids).await.map_err(|err| {
        error!(rollup_id, error = %err, "failed to delete published txs from the pending set");
        CoordinatorError::from(err)
    })?;

    state.advance_rollup_id();
    debug!(rollup_id, "rollup published");
    Ok(profile.with_published(true))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rollup_types::{
        test_utils::transfer_tx, CircuitInput, InnerProof, MockRollupAggregator, MockRollupCreator,
        MockRollupDb, MockRollupPublisher, MockTxFeeResolver, RollupDao, RollupTimeouts,
    };

    use super::*;
    use crate::coordinator::{config::RollupCoordinatorConfig, ctx::CoordinatorCtx};

    fn fee_resolver() -> MockTxFeeResolver {
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

    /// 3 pending transfers into a 2-slot rollup fill every slot, which is itself a publish
    /// trigger (`|selected| = totalSlots`) — the tick should prove, aggregate,
    /// publish, and advance the rollup id despite an unprofitable, non-deadlined batch.
    #[tokio::test]
    async fn slot_saturation_drives_a_full_tick_to_publication() {
        let config = RollupCoordinatorConfig::with_slots(2, 1);

        let mut db = MockRollupDb::new();
        db.expect_fetch_pending_txs()
            .returning(|| Ok((0..3).map(|i| transfer_tx(i, 0, 0, 0)).collect()));
        db.expect_delete_txs().returning(|ids| {
            assert_eq!(ids.len(), 2);
            Ok(())
        });

        let mut creator = MockRollupCreator::new();
        creator.expect_create_rollup().returning(|_, _, _, _| Ok(CircuitInput(Vec::new())));
        creator.expect_create().returning(|_, _| Ok(InnerProof(Vec::new())));

        let mut aggregator = MockRollupAggregator::new();
        aggregator.expect_aggregate_rollup_proofs().returning(|_, _, _, _, _, _| {
            Ok(RollupDao {
                rollup_id: 0,
                aggregated_proof: Vec::new(),
            })
        });

        let mut publisher = MockRollupPublisher::new();
        publisher.expect_publish_rollup().returning(|_, _| Ok(true));

        let ctx = CoordinatorCtx {
            config,
            fee_resolver: Arc::new(fee_resolver()),
            creator: Arc::new(creator),
            aggregator: Arc::new(aggregator),
            publisher: Arc::new(publisher),
            db: Arc::new(db),
        };
        let mut state = CoordinatorState::new(0);

        let profile = run_tick(&ctx, &mut state, false, &RollupTimeouts::disabled()).await.unwrap();

        assert!(profile.published());
        assert_eq!(profile.total_txs(), 2);
        assert_eq!(state.next_rollup_id(), 1);
        assert_eq!(state.phase(), CoordinatorPhase::Publishing);
    }

    #[tokio::test]
    async fn unprofitable_undeadlined_partial_batch_is_held_for_next_tick() {
        let config = RollupCoordinatorConfig::with_slots(10, 1);

        let mut db = MockRollupDb::new();
        db.expect_fetch_pending_txs().returning(|| Ok(vec![transfer_tx(1, 0, 0, 0)]));

        let ctx = CoordinatorCtx {
            config,
            fee_resolver: Arc::new(fee_resolver()),
            creator: Arc::new(MockRollupCreator::new()),
            aggregator: Arc::new(MockRollupAggregator::new()),
            publisher: Arc::new(MockRollupPublisher::new()),
            db: Arc::new(db),
        };
        let mut state = CoordinatorState::new(0);

        let profile = run_tick(&ctx, &mut state, false, &RollupTimeouts::disabled()).await.unwrap();

        assert!(!profile.published());
        assert_eq!(state.next_rollup_id(), 0);
    }
}
