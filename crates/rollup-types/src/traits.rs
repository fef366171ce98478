//! Collaborator contracts: the boundary between the coordinator core and everything it must not
//! know how to do itself — proving, aggregation, settlement, persistence, and fee/bridge
//! configuration lookups.
//!
//! Every trait here is `#[async_trait]` and gains a mock under `test-utils` via
//! `mockall::automock`, matching the collaborator boundary pattern used for the batch proving and
//! DA backends elsewhere in this workspace.

use async_trait::async_trait;

use crate::{
    bridge::BridgeConfig,
    bridge_call_data::BridgeCallData,
    error::{
        BridgeResolverError, ChainViewError, RollupAggregatorError, RollupCreatorError,
        RollupDbError, RollupPublisherError, TxFeeResolverError,
    },
    tx::AssetId, tx::RollupTx, tx::RollupTxId, tx::TxType, Commitment,
};

/// Opaque circuit input produced by [`RollupCreator::create_rollup`] and consumed by
/// [`RollupCreator::create`]. The coordinator never inspects its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitInput(pub Vec<u8>);

/// An inner proof for a single rollup, opaque to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerProof(pub Vec<u8>);

/// The aggregated proof plus the rollup id it was assigned, ready for
/// [`RollupPublisher::publish_rollup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollupDao {
    pub rollup_id: u64,
    pub aggregated_proof: Vec<u8>,
}

/// Source of per-bridge configuration (gas cost, batch size, rollup frequency) and
/// human-readable descriptions for logging.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait BridgeResolver: Send + Sync {
    /// Returns the currently known configuration for every bridge with at least one queued
    /// `DEFI_DEPOSIT`.
    async fn get_bridge_configs(&self) -> Result<Vec<BridgeConfig>, BridgeResolverError>;

    /// Returns a human-readable description of a bridge call, for logging only.
    async fn get_bridge_description(
        &self,
        bridge_call_data: &BridgeCallData,
    ) -> Result<Option<String>, BridgeResolverError>;
}

/// Source of gas and call-data costs used by the resource accounting during selection.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait TxFeeResolver: Send + Sync {
    /// Fixed verification gas charged once per rollup, independent of its contents.
    async fn unadjusted_base_verification_gas(&self) -> Result<u64, TxFeeResolverError>;

    /// Gas a single tx of `tx_type` paying in `asset_id` costs to verify.
    async fn unadjusted_tx_gas(
        &self,
        asset_id: AssetId,
        tx_type: TxType,
    ) -> Result<u64, TxFeeResolverError>;

    /// Call-data bytes a single tx of `tx_type` occupies on L1.
    async fn tx_call_data(&self, tx_type: TxType) -> Result<u64, TxFeeResolverError>;

    /// Gas a single `DEFI_DEPOSIT` tx routed through `bridge_call_data` costs, amortized evenly
    /// across the bridge's configured batch size.
    async fn single_bridge_tx_gas(
        &self,
        bridge_call_data: &BridgeCallData,
    ) -> Result<u64, TxFeeResolverError>;

    /// Full on-chain execution gas for a bridge interaction, as quoted by the bridge contract
    /// itself rather than amortized.
    async fn full_bridge_gas_from_contract(
        &self,
        bridge_call_data: &BridgeCallData,
    ) -> Result<u64, TxFeeResolverError>;

    /// Whether fees may be paid in `asset_id`.
    async fn is_fee_paying_asset(&self, asset_id: AssetId) -> Result<bool, TxFeeResolverError>;

    /// Gas budget available to a single rollup.
    async fn max_unadjusted_gas(&self) -> Result<u64, TxFeeResolverError>;

    /// Call-data budget available to a single rollup.
    async fn max_tx_call_data(&self) -> Result<u64, TxFeeResolverError>;
}

/// Produces circuit inputs and inner proofs for a selected batch of txs.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait RollupCreator: Send + Sync {
    /// Builds the circuit input for `txs`, given the padded bridge calls and asset ids the batch
    /// will commit to. `is_first` marks the genesis rollup, which skips predecessor-root checks.
    async fn create_rollup(
        &self,
        txs: &[RollupTx],
        bridge_call_datas: &[BridgeCallData],
        asset_ids: &[AssetId],
        is_first: bool,
    ) -> Result<CircuitInput, RollupCreatorError>;

    /// Runs the inner proof for `txs` against a previously built `circuit_input`.
    async fn create(
        &self,
        txs: &[RollupTx],
        circuit_input: CircuitInput,
    ) -> Result<InnerProof, RollupCreatorError>;

    /// Cooperatively cancels any in-flight proof generation; a subsequent call may still
    /// complete if it had already finished.
    fn interrupt(&self);
}

/// Aggregates inner proofs into a single proof suitable for settlement.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait RollupAggregator: Send + Sync {
    /// Combines `inners` into a [`RollupDao`], threading the defi-interaction Merkle context
    /// through so claim notes can be verified against the root the
    /// batch commits to.
    #[expect(clippy::too_many_arguments, reason = "aggregation inputs are independent collaborator parameters")]
    async fn aggregate_rollup_proofs(
        &self,
        inners: Vec<InnerProof>,
        old_defi_root: Commitment,
        old_defi_path: Vec<Commitment>,
        defi_notes: Vec<Commitment>,
        padded_bridge_call_data: Vec<BridgeCallData>,
        asset_ids: Vec<AssetId>,
    ) -> Result<RollupDao, RollupAggregatorError>;

    /// Cooperatively cancels any in-flight aggregation.
    fn interrupt(&self);
}

/// Publishes an aggregated rollup to settlement.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait RollupPublisher: Send + Sync {
    /// Submits `rollup` for settlement. Returns `true` once the publication is confirmed,
    /// `false` if it should be retried with a fresh estimate.
    async fn publish_rollup(
        &self,
        rollup: RollupDao,
        estimated_l1_gas: u64,
    ) -> Result<bool, RollupPublisherError>;
}

/// Persistence for the admission queue: the set of txs waiting to be selected into a rollup.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait RollupDb: Send + Sync {
    /// All txs currently admitted and not yet included in a published rollup.
    async fn fetch_pending_txs(&self) -> Result<Vec<RollupTx>, RollupDbError>;

    /// Removes `ids` from the pending set, typically once their rollup has published.
    async fn delete_txs(&self, ids: &[RollupTxId]) -> Result<(), RollupDbError>;
}

/// Read-only view onto settled on-chain state, consulted by the block-level validator.
///
/// Gives the validator's nullifier and deposit-cap checks a concrete, mockable seam onto chain
/// state rather than reaching into a node client directly.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait ChainView: Send + Sync {
    /// Whether `nullifier` has already been spent as of the settled block under validation.
    async fn is_nullifier_spent(&self, nullifier: Commitment) -> Result<bool, ChainViewError>;

    /// The still-unconsumed deposit balance pending for `(asset_id, owner)` on L1.
    async fn user_pending_deposit(
        &self,
        asset_id: AssetId,
        owner: [u8; 20],
    ) -> Result<u128, ChainViewError>;
}
