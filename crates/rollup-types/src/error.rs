//! Error taxonomy shared across the coordinator, the bridge queues, and the validator.
//!
//! Each collaborator trait in [`crate::traits`] owns a narrow, opaque error type of its own
//! (mirroring `StorageError`/`OLClientError` elsewhere in this workspace); [`CoordinatorError`] is
//! the one type threaded through the core, wrapping each of them via `#[from]` so a single `?`
//! chain can cross collaborator boundaries without losing which collaborator actually failed.

use thiserror::Error;

/// A [`crate::BridgeResolver`] call failed.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct BridgeResolverError(#[from] eyre::Error);

/// A [`crate::TxFeeResolver`] call failed.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct TxFeeResolverError(#[from] eyre::Error);

/// A [`crate::RollupCreator`] call (circuit construction or inner proving) failed.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct RollupCreatorError(#[from] eyre::Error);

/// A [`crate::RollupAggregator`] call failed.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct RollupAggregatorError(#[from] eyre::Error);

/// A [`crate::RollupPublisher`] call failed.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct RollupPublisherError(#[from] eyre::Error);

/// A [`crate::RollupDb`] call failed.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct RollupDbError(#[from] eyre::Error);

/// A [`crate::ChainView`] call failed.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ChainViewError(#[from] eyre::Error);

/// Errors the core can surface:
///
/// - [`CoordinatorError::Interrupted`] is a normal shutdown signal, not a failure.
/// - [`CoordinatorError::InvariantViolated`] is a programmer error: fatal, never caught inside
///   the core.
/// - The per-collaborator variants each wrap a failure from that specific collaborator (proving
///   backend, aggregator, publisher, database, fee/bridge oracles, chain view); they are logged
///   and the batch is abandoned, never rethrown past the tick boundary.
/// - [`CoordinatorError::MetricsFailed`] is swallowed after logging and never affects the
///   publication outcome.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// Surfaced at a checkpoint when `interrupt()` was called.
    #[error("interrupted")]
    Interrupted,

    /// A system invariant was violated (e.g. more txs selected than available slots).
    #[error("invariant violated: {0}")]
    InvariantViolated(String),

    /// The bridge-configuration registry failed.
    #[error(transparent)]
    BridgeResolver(#[from] BridgeResolverError),

    /// The fee/gas oracle failed.
    #[error(transparent)]
    TxFeeResolver(#[from] TxFeeResolverError),

    /// The proving backend failed to build a circuit or an inner proof.
    #[error(transparent)]
    RollupCreator(#[from] RollupCreatorError),

    /// The aggregation backend failed.
    #[error(transparent)]
    RollupAggregator(#[from] RollupAggregatorError),

    /// The settlement-layer publisher failed.
    #[error(transparent)]
    RollupPublisher(#[from] RollupPublisherError),

    /// The pending-tx database failed.
    #[error(transparent)]
    RollupDb(#[from] RollupDbError),

    /// The chain-state view consulted by the block validator failed.
    #[error(transparent)]
    ChainView(#[from] ChainViewError),

    /// A metrics-reporting call failed; never affects publication outcome.
    #[error("metrics failed: {0}")]
    MetricsFailed(String),
}

impl CoordinatorError {
    pub fn invariant_violated(msg: impl Into<String>) -> Self {
        Self::InvariantViolated(msg.into())
    }

    pub fn metrics_failed(msg: impl Into<String>) -> Self {
        Self::MetricsFailed(msg.into())
    }

    /// Whether this error represents a cooperative shutdown rather than a failure.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}
