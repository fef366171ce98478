//! Context holding the coordinator's collaborator dependencies.

use std::sync::Arc;

use rollup_types::{RollupAggregator, RollupCreator, RollupDb, RollupPublisher, TxFeeResolver};

use super::config::RollupCoordinatorConfig;

/// Everything the coordinator needs besides its mutable [`super::state::CoordinatorState`], kept
/// separate so state can be recovered independently (e.g. the next `rollup_id` comes from
/// [`RollupDb`] on restart).
pub(crate) struct CoordinatorCtx<F, R, A, P, D>
where
    F: TxFeeResolver,
    R: RollupCreator,
    A: RollupAggregator,
    P: RollupPublisher,
    D: RollupDb,
{
    pub config: RollupCoordinatorConfig,
    pub fee_resolver: Arc<F>,
    pub creator: Arc<R>,
    pub aggregator: Arc<A>,
    pub publisher: Arc<P>,
    pub db: Arc<D>,
}
