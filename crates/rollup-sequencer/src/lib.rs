//! Admission and publication pipeline for the rollup batching coordinator.
//!
//! Four pieces compose into the pipeline described at the crate's data-flow level: the
//! [`publish_time`] manager computes wall-clock deadlines; [`bridge_queue`] holds per-bridge
//! DeFi deposits until they are profitable or deadlined; [`coordinator`] selects a batch under
//! resource constraints and decides whether to publish it; [`validator`] rejects pending txs made
//! stale by a newly settled block. None of the four touches proving, settlement, or Merkle
//! world-state directly — those are the collaborator traits defined in `rollup-types`.

pub mod bridge_queue;
pub mod coordinator;
pub mod publish_time;
pub mod validator;

pub use bridge_queue::BridgeTxQueue;
pub use coordinator::{
    config::RollupCoordinatorConfig,
    handle::{create_coordinator, CoordinatorHandle},
    CoordinatorPhase, RollupCoordinator,
};
pub use publish_time::PublishTimeManager;
pub use validator::validate_block;
