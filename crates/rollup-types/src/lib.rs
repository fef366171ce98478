//! Core data model and collaborator contracts for the rollup batching coordinator.
//!
//! This crate has no behavior of its own: it defines the types the coordinator, the bridge
//! queues, and the block-level validator operate on, plus the trait boundaries towards the
//! proving backend, the settlement publisher, the pending-tx database, and the fee/bridge
//! configuration oracles. Those collaborators are implemented elsewhere; this crate only states
//! their contract.

mod bridge;
mod bridge_call_data;
mod clock;
mod error;
mod profile;
mod resources;
mod timeouts;
mod traits;
mod tx;

pub use bridge::BridgeConfig;
pub use bridge_call_data::{AssetRef, BridgeCallData};
pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-utils"))]
pub use clock::FakeClock;
pub use error::{
    BridgeResolverError, ChainViewError, CoordinatorError, RollupAggregatorError,
    RollupCreatorError, RollupDbError, RollupPublisherError, TxFeeResolverError,
};
pub use profile::{BridgeProfile, RollupProfile};
pub use resources::{AssetSet, BridgeCallDataSet, RollupResources};
pub use timeouts::{RollupTimeouts, Timeout};
pub use traits::{
    BridgeResolver, ChainView, CircuitInput, InnerProof, RollupAggregator, RollupCreator,
    RollupDao, RollupDb, RollupPublisher, TxFeeResolver,
};
pub use tx::{
    AssetId, Commitment, Nullifier, RollupTx, RollupTxId, Timestamp, TxType, ZERO_COMMITMENT,
};

#[cfg(feature = "test-utils")]
pub mod test_utils;

#[cfg(feature = "test-utils")]
pub use traits::{
    MockBridgeResolver, MockChainView, MockRollupAggregator, MockRollupCreator, MockRollupDb,
    MockRollupPublisher, MockTxFeeResolver,
};
