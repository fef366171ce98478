//! The batch scheduler: transaction selection, the publication decision, and the
//! BUILDING/PUBLISHING/INTERRUPTED state machine that drives them.

pub mod config;
pub(crate) mod ctx;
pub mod handle;
mod publish;
mod selection;
pub(crate) mod state;
mod task;

use rollup_types::{
    CoordinatorError, RollupAggregator, RollupCreator, RollupDb, RollupProfile, RollupPublisher,
    RollupTimeouts, TxFeeResolver,
};

pub use state::CoordinatorPhase;

use ctx::CoordinatorCtx;
use state::CoordinatorState;

/// Selects pending txs into a batch under resource constraints, decides whether the result is
/// worth publishing, and if so drives proving, aggregation, and publication.
///
/// Constructed via [`handle::create_coordinator`], which also hands back the
/// [`handle::CoordinatorHandle`] used to interrupt it from outside a running tick.
pub struct RollupCoordinator<F, R, A, P, D>
where
    F: TxFeeResolver,
    R: RollupCreator,
    A: RollupAggregator,
    P: RollupPublisher,
    D: RollupDb,
{
    ctx: CoordinatorCtx<F, R, A, P, D>,
    state: CoordinatorState,
}

impl<F, R, A, P, D> RollupCoordinator<F, R, A, P, D>
where
    F: TxFeeResolver,
    R: RollupCreator,
    A: RollupAggregator,
    P: RollupPublisher,
    D: RollupDb,
{
    /// Runs one tick: fetches the current pending set, selects a batch, decides whether to
    /// publish it, and if so proves, aggregates, and publishes it. Ticks are serialized by an
    /// external driver — the coordinator itself only ever runs one at a time.
    pub async fn tick(&mut self, flush: bool, timeouts: &RollupTimeouts) -> Result<RollupProfile, CoordinatorError> {
        task::run_tick(&self.ctx, &mut self.state, flush, timeouts).await
    }

    /// Where this coordinator is within its current (or most recently completed) tick.
    pub fn phase(&self) -> CoordinatorPhase {
        self.state.phase()
    }

    /// The `rollup_id` the next successful publish will be assigned.
    pub fn next_rollup_id(&self) -> u64 {
        self.state.next_rollup_id()
    }
}
