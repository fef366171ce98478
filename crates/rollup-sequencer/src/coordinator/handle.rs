//! Handle and factory for the rollup coordinator.

use std::sync::Arc;

use rollup_types::{
    CoordinatorError, RollupAggregator, RollupCreator, RollupDb, RollupPublisher, TxFeeResolver,
};

use super::{
    config::RollupCoordinatorConfig, ctx::CoordinatorCtx, state::CoordinatorState,
    RollupCoordinator,
};

/// Handle letting an external driver interrupt an in-flight coordinator.
///
/// Holds the same `creator`/`aggregator` handles the running tick uses, so `interrupt()` can ask
/// both collaborators to tear down in-flight proof work in addition to raising the cooperative
/// flag the tick checkpoints poll.
#[derive(Debug, Clone)]
pub struct CoordinatorHandle<R, A>
where
    R: RollupCreator,
    A: RollupAggregator,
{
    interrupt: Arc<super::state::InterruptFlag>,
    creator: Arc<R>,
    aggregator: Arc<A>,
}

impl<R, A> CoordinatorHandle<R, A>
where
    R: RollupCreator,
    A: RollupAggregator,
{
    /// Requests cancellation. A no-op if the coordinator is already past the publishing
    /// checkpoint, unless `should_throw` is set, in which case this call itself returns an error.
    ///
    /// Always asks `creator` and `aggregator` to interrupt their own in-flight work, even when
    /// the flag request itself turns out to be a no-op — proof generation may be mid-flight from
    /// a tick that has already passed the checkpoint this flag gates.
    pub fn interrupt(&self, should_throw: bool) -> Result<(), CoordinatorError> {
        let result = self.interrupt.request(should_throw);
        self.creator.interrupt();
        self.aggregator.interrupt();
        result
    }
}

/// Construct a coordinator and its handle.
///
/// `next_rollup_id` should be read from [`RollupDb`]'s persisted counter so ids stay monotonic
/// across restarts.
#[expect(clippy::too_many_arguments, reason = "one field per required collaborator")]
pub fn create_coordinator<F, R, A, P, D>(
    config: RollupCoordinatorConfig,
    next_rollup_id: u64,
    fee_resolver: Arc<F>,
    creator: Arc<R>,
    aggregator: Arc<A>,
    publisher: Arc<P>,
    db: Arc<D>,
) -> (CoordinatorHandle<R, A>, RollupCoordinator<F, R, A, P, D>)
where
    F: TxFeeResolver,
    R: RollupCreator,
    A: RollupAggregator,
    P: RollupPublisher,
    D: RollupDb,
{
    let state = CoordinatorState::new(next_rollup_id);
    let handle = CoordinatorHandle {
        interrupt: state.interrupt.clone(),
        creator: creator.clone(),
        aggregator: aggregator.clone(),
    };
    let ctx = CoordinatorCtx {
        config,
        fee_resolver,
        creator,
        aggregator,
        publisher,
        db,
    };
    (handle, RollupCoordinator { ctx, state })
}

#[cfg(test)]
mod tests {
    use rollup_types::{
        MockRollupAggregator, MockRollupCreator, MockRollupDb, MockRollupPublisher,
        MockTxFeeResolver,
    };

    use super::*;

    #[test]
    fn interrupt_forwards_to_both_collaborators() {
        let mut creator = MockRollupCreator::new();
        creator.expect_interrupt().times(1).return_const(());
        let mut aggregator = MockRollupAggregator::new();
        aggregator.expect_interrupt().times(1).return_const(());

        let (handle, _coordinator) = create_coordinator(
            RollupCoordinatorConfig::default(),
            0,
            Arc::new(MockTxFeeResolver::new()),
            Arc::new(creator),
            Arc::new(aggregator),
            Arc::new(MockRollupPublisher::new()),
            Arc::new(MockRollupDb::new()),
        );

        handle.interrupt(false).unwrap();
    }
}
